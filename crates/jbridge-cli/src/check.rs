//! `jbridge check`

use crate::args::RequestArgs;
use anyhow::{Context, Result};
use jbridge_codegen::{ClosureAnalyzer, TypeSet};
use jbridge_core::{ClassPool, GenerationRequest, ReflectionProvider, TypeRef};

/// What a request would generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Requested classes that resolve and are not excluded
    pub requested: usize,
    /// Requested classes skipped by an exclude entry
    pub excluded: Vec<String>,
    /// Bootstrap classes plus the superclass closure of every requested class
    pub closure: usize,
}

/// Check command implementation
pub fn run(args: RequestArgs) -> Result<()> {
    println!("Checking model: {}", args.model.display());

    let request = args.to_request()?;
    let pool = args.load_model()?;
    let report = check(&pool, &request)?;

    println!("✓ Classes in model: {}", pool.len());
    println!("✓ Requested classes: {}", report.requested);
    for name in &report.excluded {
        println!("  excluded: {name}");
    }
    println!("✓ Initial closure: {} classes", report.closure);
    println!("\nRequest is valid!");

    Ok(())
}

/// Resolve every requested class and size the initial closure
pub fn check(pool: &ClassPool, request: &GenerationRequest) -> Result<CheckReport> {
    let analyzer = ClosureAnalyzer::new(pool, &request.packages, &request.excludes);
    let mut typeset = TypeSet::new();
    analyzer.seed(&mut typeset)?;

    let mut requested = 0;
    let mut excluded = Vec::new();
    for class in &request.classes {
        if analyzer.is_request_excluded(&class.name) {
            excluded.push(class.name.clone());
            continue;
        }
        let id = pool
            .find_class(&class.name)
            .with_context(|| format!("Requested class {} does not resolve", class.name))?;
        analyzer.add_required_types(&TypeRef::Plain(id), &mut typeset, request.generics)?;
        requested += 1;
    }

    Ok(CheckReport {
        requested,
        excluded,
        closure: typeset.len(),
    })
}
