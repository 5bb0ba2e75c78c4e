//! Command-line argument parsing and dispatch.
//!
//! A `clap`-derived struct is parsed once at the top of `run_cli`,
//! dispatching to a handler function per mode. This tool has exactly two
//! modes — run a file, or start the interactive reader — so a single
//! optional positional argument stands in for a subcommand.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use noetic_engine::StdoutSink;
use noetic_judge::HttpJudge;

use crate::driver;
use crate::manifest::Manifest;
use crate::repl;

/// `noetic [FILE]` — runs `FILE` as a batch program, or starts the
/// interactive reader if no file is given.
#[derive(Parser)]
#[command(name = "noetic")]
#[command(about = "An interpreter for the noetic logic language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Program file to run. Starts the interactive reader if omitted.
    pub file: Option<PathBuf>,
}

/// Parses arguments and dispatches to batch or interactive mode:
/// `<program> <file>` runs a file, no arguments starts interactive mode.
pub async fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.file {
        Some(path) => cmd_run_file(&path).await,
        None => cmd_interactive().await,
    }
}

async fn cmd_run_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let manifest = Manifest::load_near(dir);
    let judge = HttpJudge::new(manifest.judge_config());

    driver::run_source(&source, Box::new(judge), Box::new(StdoutSink)).await?;
    Ok(())
}

async fn cmd_interactive() -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let manifest = Manifest::load_near(&cwd);
    repl::run(manifest.judge_config()).await;
    Ok(())
}
