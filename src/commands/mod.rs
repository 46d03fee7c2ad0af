//! Command registry for REPL commands
//!
//! Lines matching a registered prefix run a command; anything else is a
//! program for the session interpreter.

pub mod general;

use swaplang_core::parser::Interpreter;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Not a command, run it as a program
    NotACommand,
    /// Error occurred
    Error(String),
    /// Watch a file for changes
    Watch(String),
    /// Stop watching a file
    Unwatch(String),
}

/// Context passed to command handlers
#[derive(Debug, Default)]
pub struct CommandContext {
    /// Session interpreter; its environment persists across lines
    pub interpreter: Interpreter,
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                // `load = 1` assigns a variable that happens to share a command name
                if args.starts_with('=') {
                    break;
                }
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);
    registry.register("env", general::cmd_env);
    registry.register("tokens", general::cmd_tokens);
    registry.register("ast", general::cmd_ast);
    registry.register("reset", general::cmd_reset);
    registry.register("load", general::cmd_load);
    registry.register("watch", general::cmd_watch);
    registry.register("unwatch", general::cmd_unwatch);

    registry
}
