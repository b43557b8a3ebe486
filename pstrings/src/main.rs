//! # pstrings - Main Entry Point
//!
//! Parses the command line, builds the selection criteria once, then scans
//! each target pid in order and writes accepted strings to stdout.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::debug;

use pstrings::cli::Args;
use pstrings::domain::ConfigError;
use pstrings::output::Emitter;
use pstrings::pipeline::scan_targets;
use pstrings::process::Ptrace;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    std::process::exit(match run() {
        Ok(code) => code,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<ConfigError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<i32> {
    let args = Args::parse();

    let criteria = args.selection()?;
    let targets = args.targets()?;
    debug!(
        "min length {}, permissions {}, density {:?}, locale {:?}",
        criteria.min_length(),
        criteria.permissions().as_str(),
        criteria.density(),
        criteria.charset().locale()
    );

    let stdout = io::stdout();
    let mut emitter = Emitter::new(BufWriter::new(stdout.lock()), args.annotations());

    let summary = scan_targets(&Ptrace, &criteria, &targets, &mut emitter)
        .context("Failed to write output")?;

    debug!(
        "{} of {} targets scanned, {} strings",
        summary.scanned.len(),
        targets.len(),
        summary.records()
    );

    Ok(if summary.all_succeeded() { EXIT_SUCCESS } else { EXIT_ERROR })
}
