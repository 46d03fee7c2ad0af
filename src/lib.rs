//! # swaplang
//!
//! Host for the swaplang expression language: runs program files or inline
//! source, re-runs files on change, and offers an interactive REPL.
//!
//! ## Modules
//!
//! - `config`: Command line configuration.
//! - `runner`: Runs one translation unit and reports output, faults and the
//!   final environment.
//! - `commands`: The REPL command registry (`env`, `tokens`, `ast`, `load`, ...).
//! - `repl`: The Read-Eval-Print Loop and file watching.
//!
//! Lexing, parsing and evaluation live in `swaplang-core`.

pub mod commands;
pub mod config;
pub mod repl;
pub mod runner;

pub use crate::config::Config;
pub use swaplang_core::{interpret, Environment, Error, Expr, Interpreter, Value};

/// Run according to `config`. Returns false when the program faulted.
pub fn run(config: &Config) -> anyhow::Result<bool> {
    config.apply();

    if config.is_interactive() {
        repl::start()?;
        return Ok(true);
    }

    if let Some(source) = &config.eval {
        let mut interpreter = Interpreter::new();
        return Ok(runner::run_source(&mut interpreter, source, config));
    }

    match &config.file {
        Some(path) if config.watch => {
            runner::watch_file(path, config)?;
            Ok(true)
        }
        Some(path) => runner::run_file(path, config),
        None => Ok(true),
    }
}
