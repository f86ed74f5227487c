//! Request flags shared by `generate` and `check`

use anyhow::{Context, Result};
use clap::Args;
use jbridge_core::{ClassPool, FileSplit, GenerationRequest, ModuleConfig};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Classes to wrap, `a.b.C` or `a.b.C:member` to also wrap a non-public member
    pub classes: Vec<String>,

    /// JSON class model to reflect over
    #[arg(short, long)]
    pub model: PathBuf,

    /// TOML request file; command-line values are applied on top of it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Package whose classes are wrapped when referenced (repeatable)
    #[arg(short, long = "package")]
    pub packages: Vec<String>,

    /// Package or class never wrapped (repeatable)
    #[arg(short, long = "exclude")]
    pub excludes: Vec<String>,

    /// Follow erased signatures only
    #[arg(long)]
    pub no_generics: bool,

    /// Number of implementation files, or `separate` for one per class
    #[arg(short, long)]
    pub files: Option<FileSplit>,

    /// Wrapper renames, `a.b.C=Name,d.e.F=Other`
    #[arg(long)]
    pub rename: Option<String>,

    /// Extra reserved words, comma separated
    #[arg(long)]
    pub reserved: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Module name; enables module aggregation
    #[arg(long)]
    pub module: Option<String>,

    /// Qualify module wrapper names instead of failing on duplicates
    #[arg(long)]
    pub use_full_names: bool,

    /// Include directory of headers generated by another module (repeatable)
    #[arg(short, long = "import")]
    pub imports: Vec<PathBuf>,

    /// Emit the unguarded class initializer
    #[arg(long)]
    pub unsafe_init: bool,
}

impl RequestArgs {
    /// Build the request: the config file if given, then every flag over it
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let mut request = match &self.config {
            Some(path) => GenerationRequest::from_path(path)
                .with_context(|| format!("Failed to load request: {}", path.display()))?,
            None => GenerationRequest::new(),
        };

        for class in &self.classes {
            request
                .add_class(class)
                .with_context(|| format!("Invalid class argument '{class}'"))?;
        }
        request.packages.extend(self.packages.iter().cloned());
        request.excludes.extend(self.excludes.iter().cloned());
        request.imports.extend(self.imports.iter().cloned());

        if self.no_generics {
            request.generics = false;
        }
        if self.unsafe_init {
            request.thread_safe_init = false;
        }
        if let Some(files) = self.files {
            request.files = files;
        }
        if let Some(output) = &self.output {
            request.output = output.clone();
        }
        if let Some(renames) = &self.rename {
            request.renames.extend(parse_renames(renames)?);
        }
        if let Some(reserved) = &self.reserved {
            request.reserved.extend(split_list(reserved).map(str::to_string));
        }

        if let Some(name) = &self.module {
            let mut module = ModuleConfig::new(name.as_str());
            module.use_full_names = request.module.as_ref().is_some_and(|m| m.use_full_names);
            request.module = Some(module);
        }
        if self.use_full_names {
            match request.module.as_mut() {
                Some(module) => module.use_full_names = true,
                None => anyhow::bail!("--use-full-names requires a module"),
            }
        }

        request.validate().context("Invalid request")?;
        Ok(request)
    }

    /// Load the class model
    pub fn load_model(&self) -> Result<ClassPool> {
        ClassPool::from_path(&self.model)
            .with_context(|| format!("Failed to load class model: {}", self.model.display()))
    }
}

/// Parse `a.b.C=Name,d.e.F=Other`
pub fn parse_renames(text: &str) -> Result<Vec<(String, String)>> {
    split_list(text)
        .map(|entry| match entry.split_once('=') {
            Some((class, name)) if !class.trim().is_empty() && !name.trim().is_empty() => {
                Ok((class.trim().to_string(), name.trim().to_string()))
            }
            _ => anyhow::bail!("Invalid rename '{entry}', expected class=name"),
        })
        .collect()
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}
