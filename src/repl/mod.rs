//! REPL (Read-Eval-Print Loop) for the swaplang language

use crate::commands::{create_registry, CommandContext, CommandRegistry, CommandResult};
use crate::repl::watcher::{FileWatcher, WatchEvent};
use crate::runner::{execute, report};
use anyhow::Result;
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::path::Path;
use std::thread;

pub mod watcher;

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// What the loop should do after a line was handled
#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    Continue,
    Exit,
    Watch(String),
    Unwatch(String),
}

/// Run one input line as a command or, failing that, as a program
pub fn handle_line(line: &str, registry: &CommandRegistry, ctx: &mut CommandContext) -> LineOutcome {
    match registry.execute(line, ctx) {
        CommandResult::Success => {}
        CommandResult::Message(msg) => println!("{}", msg),
        CommandResult::Exit => return LineOutcome::Exit,
        CommandResult::Error(e) => println!("{} {}", "Error:".bright_red().bold(), e.red()),
        CommandResult::Watch(path) => return LineOutcome::Watch(path),
        CommandResult::Unwatch(path) => return LineOutcome::Unwatch(path),
        CommandResult::NotACommand => {
            let outcome = execute(&mut ctx.interpreter, line);
            report(&outcome, line);
        }
    }
    LineOutcome::Continue
}

/// Interactive REPL for the swaplang language
pub struct Repl {
    editor: Option<DefaultEditor>,
    registry: CommandRegistry,
    /// Session state shared by commands and programs
    ctx: CommandContext,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
    tx_watcher: Sender<WatchEvent>,
    rx_watcher: Receiver<WatchEvent>,

    // File watcher, created on first `watch`
    watcher: Option<FileWatcher>,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new() -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        let (tx_input, rx_input) = unbounded();
        let (tx_watcher, rx_watcher) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            registry: create_registry(),
            ctx: CommandContext::new(),
            tx_input,
            rx_input,
            tx_watcher,
            rx_watcher,
            watcher: None,
        })
    }

    fn start_watching(&mut self, path: &str) {
        if self.watcher.is_none() {
            match FileWatcher::new(self.tx_watcher.clone()) {
                Ok(w) => self.watcher = Some(w),
                Err(e) => println!("{} Failed to create watcher: {}", "Error:".red(), e),
            }
        }

        if let Some(w) = &mut self.watcher {
            if let Err(e) = w.watch(path) {
                println!("{} Failed to watch {}: {}", "Error:".red(), path, e);
            } else {
                println!(
                    "{} Watching {} for changes...",
                    "👀".bright_cyan(),
                    path.bright_green()
                );
            }
        }
    }

    fn stop_watching(&mut self, path: &str) {
        match &mut self.watcher {
            Some(w) => match w.unwatch(path) {
                Ok(()) => println!("Stopped watching {}", path.bright_green()),
                Err(e) => println!("{} Failed to unwatch {}: {}", "Error:".red(), path, e),
            },
            None => println!("{} Not watching any files", "Error:".red()),
        }
    }

    /// Re-run a changed file from a clean environment
    fn reload(&mut self, path: &Path) {
        println!("{} File changed: {}", "⚡".bright_yellow(), path.display());

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                println!("Reloading...");
                self.ctx.interpreter.environment_mut().clear();
                let outcome = execute(&mut self.ctx.interpreter, &contents);
                report(&outcome, &contents);
                if outcome.is_ok() {
                    println!("{} Reloaded successfully", "✓".bright_green());
                }
            }
            Err(e) => println!("{} Failed to read file: {}", "Error:".red(), e),
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "swaplang".bright_cyan().bold());
        println!(
            "Type statements like: {}, {}, {}",
            "x = 4".cyan(),
            "swap x y".cyan(),
            "print x * 2".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        // Readline blocks, so it gets its own thread
        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow::anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "swap>".bright_magenta().bold());
            let readline = editor.readline(&prompt);

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if line.is_empty() {
                            continue;
                        }
                        match handle_line(&line, &self.registry, &mut self.ctx) {
                            LineOutcome::Continue => {}
                            LineOutcome::Exit => {
                                println!("{}", "Goodbye!".bright_cyan());
                                break;
                            }
                            LineOutcome::Watch(path) => self.start_watching(&path),
                            LineOutcome::Unwatch(path) => self.stop_watching(&path),
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{}", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(self.rx_watcher) -> msg => match msg {
                    Ok(WatchEvent::Changed(path)) => self.reload(&path),
                    Ok(WatchEvent::Failed(e)) => println!("{} Watch error: {}", "Error:".red(), e),
                    Err(_) => break, // Channel closed
                }
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new().map_err(|e| anyhow::anyhow!("Failed to initialize REPL: {}", e))?;
    repl.run()
}
