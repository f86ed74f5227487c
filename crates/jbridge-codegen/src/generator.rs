//! Generation driver.
//!
//! A run proceeds in rounds. Each round emits every class in the TypeSet that
//! is not done yet, in name order; emitting a class can grow the TypeSet, so
//! rounds repeat until one adds nothing new. All output is built in memory
//! and only [`GenerationOutput::write_to`] touches the filesystem.

use crate::aggregator::{EmittedClass, ManifestAggregator, ModuleAggregator, ModuleSummary};
use crate::closure::{ClosureAnalyzer, TypeSet};
use crate::emit::EmitContext;
use crate::header::emit_header;
use crate::implementation::emit_implementation;
use crate::members::MemberSelector;
use crate::naming::{self, ReservedWords};
use crate::partition::{partition, wrapper_file_name};
use jbridge_core::{
    BridgeError, BridgeResult, ClassId, FileSplit, GenerationRequest, ModuleConfig,
    ReflectionProvider, TypeRef,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A generated file, relative to the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything one run produced
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Headers, implementation files and aggregator files
    pub files: Vec<GeneratedFile>,
    /// Emitted classes, in emission order
    pub emitted: Vec<String>,
    /// Final type closure, by name
    pub typeset: Vec<String>,
    /// Classes found in import directories, by name
    pub imported: Vec<String>,
}

impl GenerationOutput {
    /// Look up a file by its path relative to the output root
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Write every file below `root`, creating directories as needed
    pub fn write_to(&self, root: impl AsRef<Path>) -> BridgeResult<()> {
        let root = root.as_ref();
        for file in &self.files {
            let path = root.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| BridgeError::io(parent, e))?;
            }
            std::fs::write(&path, &file.contents).map_err(|e| BridgeError::io(&path, e))?;
        }
        Ok(())
    }
}

/// Drives one generation run over a reflection provider
pub struct Generator<'a, P: ReflectionProvider + ?Sized> {
    provider: &'a P,
    request: &'a GenerationRequest,
    reserved: ReservedWords,
    aggregator: Box<dyn ModuleAggregator + 'a>,
}

impl<'a, P: ReflectionProvider + ?Sized> Generator<'a, P> {
    /// Create a generator; modules get a [`ManifestAggregator`] by default
    pub fn new(provider: &'a P, request: &'a GenerationRequest) -> Self {
        Self {
            provider,
            request,
            reserved: ReservedWords::new().with_extra(&request.reserved),
            aggregator: Box::new(ManifestAggregator),
        }
    }

    /// Replace the module aggregator
    pub fn with_aggregator(mut self, aggregator: impl ModuleAggregator + 'a) -> Self {
        self.aggregator = Box::new(aggregator);
        self
    }

    /// Directory of the module's files relative to the output root
    pub fn module_dir(&self) -> PathBuf {
        match &self.request.module {
            Some(module) => PathBuf::from(format!("_{}", module.name)),
            None => PathBuf::new(),
        }
    }

    /// Run the closure and emit every wrapper
    pub fn generate(&self) -> BridgeResult<GenerationOutput> {
        let request = self.request;
        let provider = self.provider;
        request.validate()?;

        let selector = MemberSelector::new(
            ClosureAnalyzer::new(provider, &request.packages, &request.excludes),
            &self.reserved,
            request.generics,
            &request.extension_marker,
        );
        let analyzer = selector.analyzer();
        let ctx = EmitContext::new(provider, &self.reserved)
            .with_thread_safe_init(request.thread_safe_init);

        let mut typeset = TypeSet::new();
        analyzer.seed(&mut typeset)?;

        let imported = self.imported_classes()?;
        typeset.extend(imported.iter().copied());
        let mut done = imported.clone();

        let mut names = WrapperNames::new(request.module.as_ref(), &request.renames);
        for &id in &sorted_by_name(provider, imported.iter().copied()) {
            let class = provider.class(id);
            names.register(&class.name, class.simple_name())?;
        }

        let mut listed: BTreeMap<ClassId, Vec<String>> = BTreeMap::new();
        for class in &request.classes {
            if analyzer.is_request_excluded(&class.name) {
                debug!(class = %class.name, "requested class is excluded");
                continue;
            }
            let id = provider.find_class(&class.name)?;
            analyzer.add_required_types(&TypeRef::Plain(id), &mut typeset, request.generics)?;
            listed
                .entry(id)
                .or_default()
                .extend(class.members.iter().cloned());
        }

        let mut wrappers = Vec::new();
        let mut round = 0;
        loop {
            let todo = sorted_by_name(provider, typeset.difference(&done).copied());
            if todo.is_empty() {
                break;
            }
            round += 1;
            debug!(round, classes = todo.len(), "emission round");

            for id in todo {
                let class = provider.class(id);
                let members = listed.get(&id).map(Vec::as_slice).unwrap_or(&[]);
                let table = selector.select(id, members, &mut typeset)?;
                let header = emit_header(&ctx, &table)?;
                let implementation = emit_implementation(&ctx, &table)?;
                let wrapper_name = names.register(&class.name, class.simple_name())?;
                debug!(
                    class = %class.name,
                    constructors = table.constructors.len(),
                    methods = table.methods.len(),
                    fields = table.static_fields.len() + table.instance_fields.len(),
                    "emitted wrapper"
                );
                wrappers.push(Wrapper {
                    name: class.name.clone(),
                    wrapper_name,
                    header,
                    implementation,
                });
                done.insert(id);
            }
        }

        let files = self.layout(&wrappers, &typeset, &imported)?;
        let output = GenerationOutput {
            files,
            emitted: wrappers.iter().map(|w| w.name.clone()).collect(),
            typeset: names_of(provider, &typeset),
            imported: names_of(provider, &imported),
        };

        info!(
            emitted = output.emitted.len(),
            typeset = output.typeset.len(),
            imported = output.imported.len(),
            files = output.files.len(),
            rounds = round,
            "generation complete"
        );
        Ok(output)
    }

    /// Place headers and implementations, then run the module aggregator
    fn layout(
        &self,
        wrappers: &[Wrapper],
        typeset: &TypeSet,
        imported: &TypeSet,
    ) -> BridgeResult<Vec<GeneratedFile>> {
        let module_dir = self.module_dir();
        let mut files = Vec::new();

        for wrapper in wrappers {
            files.push(GeneratedFile {
                path: module_dir.join(naming::include_path(&wrapper.name)),
                contents: wrapper.header.clone(),
            });
        }

        match self.request.files {
            FileSplit::Separate => {
                for wrapper in wrappers {
                    files.push(GeneratedFile {
                        path: module_dir.join(naming::source_path(&wrapper.name)),
                        contents: wrapper.implementation.clone(),
                    });
                }
            }
            FileSplit::Count(count) => {
                let bodies: Vec<&str> = wrappers.iter().map(|w| w.implementation.as_str()).collect();
                for (index, chunk) in partition(bodies, count).into_iter().enumerate() {
                    files.push(GeneratedFile {
                        path: module_dir.join(wrapper_file_name(index, count)),
                        contents: chunk.concat(),
                    });
                }
            }
        }

        if let Some(module) = &self.request.module {
            let summary = ModuleSummary {
                module: module.name.clone(),
                emitted: wrappers
                    .iter()
                    .map(|w| EmittedClass {
                        name: w.name.clone(),
                        wrapper_name: w.wrapper_name.clone().unwrap_or_else(|| w.name.clone()),
                        header: naming::include_path(&w.name),
                    })
                    .collect(),
                imported: names_of(self.provider, imported),
                typeset: names_of(self.provider, typeset),
            };
            files.extend(self.aggregator.aggregate(&summary, &module_dir)?);
        }

        Ok(files)
    }

    /// Classes whose headers already exist in an import directory.
    ///
    /// Headers that do not name a known class are skipped.
    fn imported_classes(&self) -> BridgeResult<TypeSet> {
        let mut imported = TypeSet::new();
        for dir in &self.request.imports {
            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = entry.map_err(|e| BridgeError::io(dir, e.into()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(dir) else {
                    continue;
                };
                let Some(name) = naming::class_name_from_header(relative) else {
                    continue;
                };
                match self.provider.find_class(&name) {
                    Ok(id) => {
                        imported.insert(id);
                    }
                    Err(_) => debug!(header = %relative.display(), "header names no known class"),
                }
            }
        }
        Ok(imported)
    }
}

struct Wrapper {
    name: String,
    wrapper_name: Option<String>,
    header: String,
    implementation: String,
}

/// Module-wide wrapper names; only tracked when a module is configured
struct WrapperNames<'r> {
    module: Option<&'r ModuleConfig>,
    renames: &'r BTreeMap<String, String>,
    assigned: BTreeMap<String, String>,
}

impl<'r> WrapperNames<'r> {
    fn new(module: Option<&'r ModuleConfig>, renames: &'r BTreeMap<String, String>) -> Self {
        Self {
            module,
            renames,
            assigned: BTreeMap::new(),
        }
    }

    /// Assign the wrapper name of `class`
    fn register(&mut self, class: &str, simple_name: &str) -> BridgeResult<Option<String>> {
        let Some(module) = self.module else {
            return Ok(None);
        };
        let name = match self.renames.get(class) {
            Some(rename) => rename.clone(),
            None if module.use_full_names => class.to_string(),
            None => simple_name.to_string(),
        };
        if !module.use_full_names {
            if let Some(existing) = self.assigned.get(&name)
                && existing != class
            {
                return Err(BridgeError::RenameCollision {
                    class: class.to_string(),
                    name,
                    existing: existing.clone(),
                });
            }
            self.assigned.insert(name.clone(), class.to_string());
        }
        Ok(Some(name))
    }
}

fn sorted_by_name<P: ReflectionProvider + ?Sized>(
    provider: &P,
    ids: impl Iterator<Item = ClassId>,
) -> Vec<ClassId> {
    let mut ids: Vec<ClassId> = ids.collect();
    ids.sort_by(|a, b| provider.name(*a).cmp(provider.name(*b)));
    ids
}

fn names_of<P: ReflectionProvider + ?Sized>(provider: &P, ids: &TypeSet) -> Vec<String> {
    let names: BTreeSet<&str> = ids.iter().map(|&id| provider.name(id)).collect();
    names.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "generator/generator_tests.rs"]
mod generator_tests;
