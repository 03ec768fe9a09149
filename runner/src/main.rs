//! Probe runner
//!
//! Host-side tooling: cross-builds the probe binaries and executes each scenario in its own
//! emulator sub-process, which is the isolation boundary between scenarios.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

mod artifacts;
mod logger;
mod path;
mod project;
mod run;
mod test;

// —————————————————————————————— CLI Parsing ——————————————————————————————— //

#[derive(Parser)]
struct CliArgs {
    #[command(subcommand)]
    command: Subcommands,
}

#[derive(Subcommand)]
enum Subcommands {
    /// Run a single probe on QEMU
    Run(RunArgs),
    /// Run all the scenarios from scenarios.toml
    Test(TestArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Name of the probe to run
    #[arg(short, long)]
    probe: String,
    #[arg(short, long, action)]
    verbose: bool,
}

#[derive(Args)]
struct TestArgs {
    #[arg(short, long, action)]
    verbose: bool,
}

// —————————————————————————————— Entry Point ——————————————————————————————— //

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let verbose = match &args.command {
        Subcommands::Run(args) => args.verbose,
        Subcommands::Test(args) => args.verbose,
    };
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::init(level);

    match args.command {
        Subcommands::Run(args) => run::run(&args),
        Subcommands::Test(args) => test::run_tests(&args),
    }
}
