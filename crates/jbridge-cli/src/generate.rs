//! `jbridge generate`

use crate::args::RequestArgs;
use anyhow::{Context, Result};
use jbridge_codegen::{GenerationOutput, Generator};
use jbridge_core::{ClassPool, GenerationRequest};
use tracing::info;

/// Generate command implementation
pub fn run(args: RequestArgs) -> Result<()> {
    let request = args.to_request()?;
    let pool = args.load_model()?;

    let output = generate(&pool, &request)?;
    output
        .write_to(&request.output)
        .with_context(|| format!("Failed to write output to {}", request.output.display()))?;

    println!(
        "Generated {} wrappers in {} files under {}",
        output.emitted.len(),
        output.files.len(),
        request.cpp_dir().display()
    );
    if !output.imported.is_empty() {
        println!("Skipped {} imported classes", output.imported.len());
    }
    Ok(())
}

/// Run the generator, keeping everything in memory
pub fn generate(pool: &ClassPool, request: &GenerationRequest) -> Result<GenerationOutput> {
    info!(
        classes = request.classes.len(),
        packages = request.packages.len(),
        model = pool.len(),
        "starting generation"
    );
    Generator::new(pool, request)
        .generate()
        .context("Generation failed")
}
