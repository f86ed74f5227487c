//! Generation request configuration

use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything one generation run needs besides the reflection provider.
///
/// Loadable from a `jbridge.toml`; every field has a default so a partial
/// file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Classes to wrap, each with its non-public member allow-list
    pub classes: Vec<ClassRequest>,

    /// Packages whose classes are pulled in when referenced
    pub packages: BTreeSet<String>,

    /// Package prefixes and class names never wrapped
    pub excludes: BTreeSet<String>,

    /// Traverse generic signatures when computing the closure
    pub generics: bool,

    /// How implementation files are split
    pub files: FileSplit,

    /// Wrapper name overrides, keyed by class name
    pub renames: BTreeMap<String, String>,

    /// Extra reserved words, added to the built-in table
    pub reserved: Vec<String>,

    /// Output root
    pub output: PathBuf,

    /// Module aggregation, when set
    pub module: Option<ModuleConfig>,

    /// Include directories holding headers generated by other modules
    pub imports: Vec<PathBuf>,

    /// Emit the lock-guarded class initializer
    pub thread_safe_init: bool,

    /// Marker method that switches a class to non-virtual extension calls
    pub extension_marker: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("build")
}

fn default_extension_marker() -> String {
    "pythonExtension".to_string()
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            packages: BTreeSet::new(),
            excludes: BTreeSet::new(),
            generics: true,
            files: FileSplit::default(),
            renames: BTreeMap::new(),
            reserved: Vec::new(),
            output: default_output(),
            module: None,
            imports: Vec::new(),
            thread_safe_init: true,
            extension_marker: default_extension_marker(),
        }
    }
}

impl GenerationRequest {
    /// Create a request with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML request
    pub fn from_toml(text: &str) -> BridgeResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML request from disk
    pub fn from_path(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BridgeError::io(path, e))?;
        Self::from_toml(&text)
    }

    /// Add a class in textual form, `a.b.C` or `a.b.C:member`.
    ///
    /// Repeating a class accumulates its members.
    pub fn add_class(&mut self, text: &str) -> BridgeResult<()> {
        let parsed: ClassRequest = text.parse()?;
        match self.classes.iter_mut().find(|c| c.name == parsed.name) {
            Some(existing) => {
                for member in parsed.members {
                    if !existing.members.contains(&member) {
                        existing.members.push(member);
                    }
                }
            }
            None => self.classes.push(parsed),
        }
        Ok(())
    }

    /// Builder form of [`add_class`](Self::add_class) for a plain class name
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.classes.push(ClassRequest::new(name));
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.packages.insert(package.into());
        self
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.excludes.insert(exclude.into());
        self
    }

    /// Directory the header tree and implementation files are written to
    pub fn cpp_dir(&self) -> PathBuf {
        match &self.module {
            Some(module) => self.output.join(format!("_{}", module.name)),
            None => self.output.clone(),
        }
    }

    /// Reject values the generator cannot work with
    pub fn validate(&self) -> BridgeResult<()> {
        if self.files == FileSplit::Count(0) {
            return Err(BridgeError::Config(
                "files must be at least 1 or \"separate\"".to_string(),
            ));
        }
        if let Some(class) = self.classes.iter().find(|c| c.name.trim().is_empty()) {
            return Err(BridgeError::Config(format!(
                "empty class name in request (members: {:?})",
                class.members
            )));
        }
        if let Some(module) = &self.module
            && module.name.trim().is_empty()
        {
            return Err(BridgeError::Config("module name is empty".to_string()));
        }
        if let Some((class, name)) = self.renames.iter().find(|(_, name)| !is_identifier(name)) {
            return Err(BridgeError::Config(format!(
                "rename of {class} to '{name}' is not a valid identifier"
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A requested class and the non-public members to wrap anyway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

impl ClassRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }
}

impl FromStr for ClassRequest {
    type Err = BridgeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (name, member) = match text.split_once(':') {
            Some((name, member)) => (name.trim(), Some(member.trim())),
            None => (text.trim(), None),
        };
        if name.is_empty() {
            return Err(BridgeError::Config(format!("no class name in '{text}'")));
        }
        let mut request = ClassRequest::new(name);
        match member {
            Some("") => {
                return Err(BridgeError::Config(format!("no member name in '{text}'")));
            }
            Some(member) => request.members.push(member.to_string()),
            None => {}
        }
        Ok(request)
    }
}

/// Module aggregation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,

    /// Allow duplicate simple names, qualifying wrapper names instead
    #[serde(default)]
    pub use_full_names: bool,
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_full_names: false,
        }
    }
}

/// How implementation code is split across files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FileSplitRepr", into = "FileSplitRepr")]
pub enum FileSplit {
    /// A fixed number of balanced files
    Count(usize),
    /// One implementation file per class, next to its header
    Separate,
}

impl Default for FileSplit {
    fn default() -> Self {
        FileSplit::Count(1)
    }
}

impl fmt::Display for FileSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSplit::Count(n) => write!(f, "{n}"),
            FileSplit::Separate => write!(f, "separate"),
        }
    }
}

impl FromStr for FileSplit {
    type Err = BridgeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("separate") {
            return Ok(FileSplit::Separate);
        }
        text.parse::<usize>().map(FileSplit::Count).map_err(|_| {
            BridgeError::Config(format!(
                "files must be a number or \"separate\", got '{text}'"
            ))
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FileSplitRepr {
    Count(usize),
    Name(String),
}

impl TryFrom<FileSplitRepr> for FileSplit {
    type Error = BridgeError;

    fn try_from(repr: FileSplitRepr) -> Result<Self, Self::Error> {
        match repr {
            FileSplitRepr::Count(n) => Ok(FileSplit::Count(n)),
            FileSplitRepr::Name(name) => name.parse(),
        }
    }
}

impl From<FileSplit> for FileSplitRepr {
    fn from(split: FileSplit) -> Self {
        match split {
            FileSplit::Count(n) => FileSplitRepr::Count(n),
            FileSplit::Separate => FileSplitRepr::Name("separate".to_string()),
        }
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
