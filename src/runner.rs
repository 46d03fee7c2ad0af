//! Runs translation units for the CLI, the REPL and file watching, and
//! prints their output, faults and environment dumps.

use crate::config::Config;
use crate::repl::watcher::{FileWatcher, WatchEvent};
use anyhow::{Context, Result};
use colored::*;
use crossbeam_channel::unbounded;
use std::path::Path;
use swaplang_core::parser::{parse, tokenize, Environment, Error, Interpreter};

/// What one run produced
#[derive(Debug, Default)]
pub struct Outcome {
    /// Lines printed before the run ended, successfully or not
    pub output: Vec<String>,
    pub error: Option<Error>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `source` against the interpreter's session
pub fn execute(interpreter: &mut Interpreter, source: &str) -> Outcome {
    let result = interpreter.run_source(source);

    Outcome {
        output: interpreter.take_output(),
        error: result.err(),
    }
}

/// Print output lines to stdout and the fault, if any, to stderr
pub fn report(outcome: &Outcome, source: &str) {
    for line in &outcome.output {
        println!("{}", line);
    }
    if let Some(err) = &outcome.error {
        eprintln!("{}", err.render(source));
    }
}

/// One line per token: position, kind and lexeme
pub fn describe_tokens(source: &str) -> Result<String, Error> {
    let mut scratch = Environment::new();
    let tokens = tokenize(source, &mut scratch)?;

    Ok(tokens
        .iter()
        .map(|token| format!("{:>6}  {}", token.span.to_string().dimmed(), token))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// One line per statement, tagged with the marker it dispatches on.
///
/// Parses against a copy of `env` so the session is not modified.
pub fn describe_program(source: &str, env: &Environment) -> Result<String, Error> {
    let mut scratch = env.clone();
    let tokens = tokenize(source, &mut scratch)?;
    let program = parse(tokens, &mut scratch)?;

    Ok(program
        .statements
        .iter()
        .map(|stmt| {
            let marker = match stmt.marker() {
                (kind, Some(spelling)) => format!("[{} {}]", kind, spelling),
                (kind, None) => format!("[{}]", kind),
            };
            format!("{} {}", marker.bright_blue(), stmt)
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Environment dump, one `name = expr` line per variable
pub fn describe_environment(env: &Environment) -> String {
    if env.is_empty() {
        return "No variables".dimmed().to_string();
    }

    env.bindings()
        .map(|(name, expr)| match expr {
            Some(expr) => format!("{} = {}", name.bright_green(), expr),
            None => format!("{} = {}", name.bright_green(), "<unbound>".dimmed()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run one program as configured: optional token/tree listings, the run
/// itself, then an optional environment dump. Returns false on a fault.
pub fn run_source(interpreter: &mut Interpreter, source: &str, config: &Config) -> bool {
    if config.tokens {
        match describe_tokens(source) {
            Ok(listing) => println!("{}", listing),
            Err(err) => {
                eprintln!("{}", err.render(source));
                return false;
            }
        }
    }

    if config.ast {
        match describe_program(source, interpreter.environment()) {
            Ok(listing) => println!("{}", listing),
            Err(err) => {
                eprintln!("{}", err.render(source));
                return false;
            }
        }
    }

    let outcome = execute(interpreter, source);
    report(&outcome, source);

    if config.dump_env {
        println!("{}", describe_environment(interpreter.environment()));
    }

    outcome.is_ok()
}

/// Run a program file in a fresh session
pub fn run_file(path: &Path, config: &Config) -> Result<bool> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;

    let mut interpreter = Interpreter::new();
    Ok(run_source(&mut interpreter, &source, config))
}

/// Run a file, then run it again in a fresh session every time it changes.
///
/// Blocks until the watcher shuts down.
pub fn watch_file(path: &Path, config: &Config) -> Result<()> {
    let (tx, rx) = unbounded();
    let mut watcher = FileWatcher::new(tx).context("Failed to create file watcher")?;
    watcher
        .watch(path)
        .with_context(|| format!("Failed to watch '{}'", path.display()))?;

    run_file(path, config)?;
    println!(
        "{} Watching {} for changes...",
        "👀".bright_cyan(),
        path.display().to_string().bright_green()
    );

    for event in rx {
        match event {
            WatchEvent::Changed(changed) => {
                println!("{} File changed: {}", "⚡".bright_yellow(), changed.display());
                match run_file(path, config) {
                    Ok(true) => println!("{} Reloaded successfully", "✓".bright_green()),
                    Ok(false) => {}
                    Err(e) => eprintln!("{} {:#}", "Error:".red(), e),
                }
            }
            WatchEvent::Failed(e) => eprintln!("{} Watch error: {}", "Error:".red(), e),
        }
    }

    Ok(())
}
