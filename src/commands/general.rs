//! General REPL commands (help, quit, env, tokens, ast, reset, load, watch)

use crate::commands::{CommandContext, CommandResult};
use crate::runner::{describe_environment, describe_program, describe_tokens, execute, report};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `env` command
pub fn cmd_env(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(describe_environment(ctx.interpreter.environment()))
}

/// Handle `tokens <source>` command
pub fn cmd_tokens(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: tokens <source>".to_string());
    }
    match describe_tokens(args) {
        Ok(listing) => CommandResult::Message(listing),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `ast <source>` command
pub fn cmd_ast(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: ast <source>".to_string());
    }
    match describe_program(args, ctx.interpreter.environment()) {
        Ok(listing) if listing.is_empty() => {
            CommandResult::Message("(no statements)".dimmed().to_string())
        }
        Ok(listing) => CommandResult::Message(listing),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `reset` command
pub fn cmd_reset(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.interpreter.environment_mut().clear();
    CommandResult::Message("Environment cleared".bright_green().to_string())
}

/// Handle `load <file>` command: run a file against the current session
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }

    let source = match std::fs::read_to_string(args) {
        Ok(source) => source,
        Err(e) => return CommandResult::Error(format!("Failed to read '{}': {}", args, e)),
    };

    let outcome = execute(&mut ctx.interpreter, &source);
    report(&outcome, &source);
    CommandResult::Success
}

/// Handle `watch <file>` command
pub fn cmd_watch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: watch <file>".to_string());
    }
    CommandResult::Watch(args.to_string())
}

/// Handle `unwatch <file>` command
pub fn cmd_unwatch(args: &str, _ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: unwatch <file>".to_string());
    }
    CommandResult::Unwatch(args.to_string())
}

/// Print help information
fn print_help() {
    println!("{}", "swaplang Help".bold());
    println!("{}", "=============".bold());
    println!();
    println!("{}", "Statements:".green());
    println!("  {}         - Bind x to the expression (not its value)", "x = 1 + 2".cyan());
    println!("  {}          - Exchange the bindings of x and y", "swap x y".cyan());
    println!("  {}   - Evaluate and print", "print x * (y - 1)".cyan());
    println!();
    println!("{}", "Arithmetic:".green());
    println!("  {}  integer operators", "+ - *".cyan());
    println!("  {}      true division, always a float: 7 / 2 = 3.5", "/".cyan());
    println!();
    println!("{}", "Comments:".green());
    println!("  {} and {} run to the end of the line", "--".cyan(), "->".cyan());
    println!();
    println!("{}", "Deferred evaluation:".green());
    println!("  every read of a variable re-runs its definition");
    println!("  {}", "x = 4  y = x  x = 9  print y".cyan());
    println!("  9");
    println!();
    println!("{}", "Commands:".green());
    println!("  {}            - Show every variable and its expression", "env".cyan());
    println!("  {}   - Show the token stream", "tokens <source>".cyan());
    println!("  {}      - Show the parsed statements", "ast <source>".cyan());
    println!("  {}          - Forget all variables", "reset".cyan());
    println!("  {}    - Run a file in this session", "load <file>".cyan());
    println!("  {}   - Re-run a file whenever it changes", "watch <file>".cyan());
    println!("  {} - Stop watching a file", "unwatch <file>".cyan());
    println!("  {}      - Leave the REPL", "quit, exit".cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_registry;

    #[test]
    fn test_env_lists_session_bindings() {
        colored::control::set_override(false);
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        ctx.interpreter.run_source("x = 4 y = x").unwrap();

        assert_eq!(
            registry.execute("env", &mut ctx),
            CommandResult::Message("x = 4\ny = x".to_string())
        );
    }

    #[test]
    fn test_reset_clears_environment() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();
        ctx.interpreter.run_source("x = 4").unwrap();

        registry.execute("reset", &mut ctx);

        assert!(ctx.interpreter.environment().is_empty());
    }

    #[test]
    fn test_tokens_and_ast_need_source() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        assert!(matches!(registry.execute("tokens", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(registry.execute("ast", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(
            registry.execute("tokens x = 1", &mut ctx),
            CommandResult::Message(_)
        ));
    }

    #[test]
    fn test_ast_reports_syntax_errors() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        match registry.execute("ast print (1", &mut ctx) {
            CommandResult::Error(msg) => assert!(msg.contains("closing parenthesis")),
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_runs_in_session() {
        let path = std::env::temp_dir().join(format!("swaplang-load-{}.swap", std::process::id()));
        std::fs::write(&path, "a = 2\nb = a * 3").unwrap();

        let registry = create_registry();
        let mut ctx = CommandContext::new();
        let result = registry.execute(&format!("load {}", path.display()), &mut ctx);

        assert_eq!(result, CommandResult::Success);
        assert!(ctx.interpreter.environment().is_bound("b"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_load_missing_file() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        assert!(matches!(
            registry.execute("load /no/such/file.swap", &mut ctx),
            CommandResult::Error(_)
        ));
    }

    #[test]
    fn test_watch_commands() {
        let registry = create_registry();
        let mut ctx = CommandContext::new();

        assert_eq!(
            registry.execute("watch prog.swap", &mut ctx),
            CommandResult::Watch("prog.swap".to_string())
        );
        assert_eq!(
            registry.execute("unwatch prog.swap", &mut ctx),
            CommandResult::Unwatch("prog.swap".to_string())
        );
        assert!(matches!(registry.execute("watch", &mut ctx), CommandResult::Error(_)));
    }
}
