//! jbridge CLI - JNI wrapper generator
//!
//! Commands:
//! - `jbridge generate` - Generate C++ wrappers for Java classes
//! - `jbridge check` - Validate a request against a class model

use clap::{Parser, Subcommand};
use jbridge_core::{BridgeError, LogLevel};
use std::process::ExitCode;

mod args;
mod check;
mod generate;
mod logging;

use args::RequestArgs;

#[derive(Parser)]
#[command(name = "jbridge")]
#[command(author, version, about = "JNI wrapper generator for Java classes", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate C++ wrappers and write them to the output directory
    Generate(RequestArgs),

    /// Validate the request and report the class closure without writing
    Check(RequestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(LogLevel::from_verbosity(cli.verbose));

    let result = match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Check(args) => check::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Process exit status for a failed run; generator errors keep their code
fn exit_status(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BridgeError>())
        .and_then(|bridge| u8::try_from(bridge.error_code()).ok())
        .unwrap_or(1)
}
