//! Headless entry point for the lightning generator.
//!
//! Usage: `bolt-run [config.json]`. Without a path the default
//! configuration is used. The classified bolt is printed to stdout as JSON;
//! progress goes through `log` (set `RUST_LOG=debug` for per-step output).

mod runner;

use runner::{RunError, Runner};
use std::{path::PathBuf, process::ExitCode};

fn run() -> Result<(), RunError> {
    let cfg = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => runner::load_config(&path)?,
        None => bolt_core::Config::default(),
    };

    let mut runner = Runner::new(cfg);
    runner.run_once()?;
    println!("{}", runner.to_json()?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
