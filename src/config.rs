//! Command line configuration

use clap::Parser;
use std::path::PathBuf;

/// swaplang runs tiny programs of assignments, `swap` and `print`.
///
/// With no FILE and no `--eval`, an interactive session starts.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Program file to run
    #[arg(conflicts_with = "eval")]
    pub file: Option<PathBuf>,

    /// Run this program text instead of a file
    #[arg(short, long, value_name = "SOURCE")]
    pub eval: Option<String>,

    /// Print every variable and its bound expression after the run
    #[arg(short, long)]
    pub dump_env: bool,

    /// Print the token stream before running
    #[arg(long)]
    pub tokens: bool,

    /// Print the parsed statements before running
    #[arg(long)]
    pub ast: bool,

    /// Re-run FILE whenever it changes
    #[arg(short, long, requires = "file")]
    pub watch: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Config {
    /// True when no program was given and the REPL should start
    pub fn is_interactive(&self) -> bool {
        self.file.is_none() && self.eval.is_none()
    }

    /// Apply process-wide settings
    pub fn apply(&self) {
        if self.no_color {
            colored::control::set_override(false);
        }
    }
}
