//! Module aggregation boundary.
//!
//! After every wrapper is emitted, a configured module hands a
//! [`ModuleSummary`] of the run to a [`ModuleAggregator`], which may add files
//! of its own (an embedding entry point, a manifest). Aggregators only add
//! files; they never change the wrappers.

use crate::generator::GeneratedFile;
use jbridge_core::BridgeResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One generated wrapper as seen by an aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedClass {
    /// Binary Java name
    pub name: String,
    /// Name the module exposes the wrapper under
    pub wrapper_name: String,
    /// Header path relative to the module directory
    pub header: String,
}

/// What a generation run produced for one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub module: String,
    /// Emitted classes, in emission order
    pub emitted: Vec<EmittedClass>,
    /// Classes generated by imported modules, by name
    pub imported: Vec<String>,
    /// Final type closure, by name
    pub typeset: Vec<String>,
}

/// Builds module-level files from a finished run
pub trait ModuleAggregator {
    /// Produce extra files; paths are relative to the output root
    fn aggregate(&self, summary: &ModuleSummary, cpp_dir: &Path) -> BridgeResult<Vec<GeneratedFile>>;
}

/// Writes `<module>.json` describing the run
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestAggregator;

impl ModuleAggregator for ManifestAggregator {
    fn aggregate(&self, summary: &ModuleSummary, cpp_dir: &Path) -> BridgeResult<Vec<GeneratedFile>> {
        let mut contents = serde_json::to_string_pretty(summary)?;
        contents.push('\n');
        Ok(vec![GeneratedFile {
            path: cpp_dir.join(format!("{}.json", summary.module)),
            contents,
        }])
    }
}
