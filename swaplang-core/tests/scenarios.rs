use swaplang_core::parser::{
    tokenize, ArithmeticError, Environment, Error, EvalError, Expr, Interpreter, SyntaxError,
    TokenKind, MAX_EXPRESSION_DEPTH,
};
use swaplang_core::interpret;

fn output(source: &str) -> Vec<String> {
    interpret(source)
        .unwrap_or_else(|e| panic!("program failed: {}\n{}", e, source))
        .output
}

#[test]
fn test_assignment_then_read() {
    assert_eq!(output("x = 4\nprint x"), vec!["4"]);
}

#[test]
fn test_deferred_evaluation_aliasing() {
    let run = interpret("x = 4\ny = x\nx = 9\nprint y").unwrap();

    assert_eq!(run.output, vec!["9"]);
    // y still holds the reference, not a value
    assert_eq!(run.environment.get("y"), Some(&Expr::identifier("x")));
}

#[test]
fn test_alias_follows_later_swap() {
    assert_eq!(output("a = 1\nb = 2\nc = a * 10 + b\nswap a b\nprint c"), vec!["21"]);
}

#[test]
fn test_swap_exchanges_bindings() {
    assert_eq!(output("x = 4\ny = 2\nswap x y\nprint x\nprint y"), vec!["2", "4"]);
}

#[test]
fn test_parse_time_binding_uses_last_assignment() {
    // Assignments bind while parsing, before anything runs
    assert_eq!(output("x = 1\nprint x\nx = 2"), vec!["2"]);
}

#[test]
fn test_worked_example() {
    let source = "\
x = 4
y = 2
-- swap
swap x y
-- print
print 1 + (x * y) - (6 / x) -> 6
";
    // After the swap x = 2 and y = 4. Division yields a float that is
    // truncated when it becomes an operand of `-`.
    let (x, y) = (2_i64, 4_i64);
    let quotient = 6.0 / x as f64;
    let expected = 1 + (x * y) - quotient.trunc() as i64;

    let run = interpret(source).unwrap();
    assert_eq!(run.output, vec![expected.to_string()]);
    assert_eq!(run.environment.to_string(), "x = 2\ny = 4");
}

#[test]
fn test_comments_are_elided() {
    let plain = "x = 4\nprint x + 1";
    let commented = "x = 4\n-- ignored text\nprint x + 1 -> five";

    let mut env = Environment::new();
    let plain_kinds: Vec<TokenKind> = tokenize(plain, &mut env)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    let commented_kinds: Vec<TokenKind> = tokenize(commented, &mut env)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(plain_kinds, commented_kinds);
    assert_eq!(output(plain), output(commented));
}

#[test]
fn test_unknown_character_is_lex_error() {
    let err = interpret("x = 4 @").unwrap_err();
    assert!(matches!(err, Error::Lex(ref e) if e.character == '@'));
}

#[test]
fn test_unterminated_parenthesis_is_syntax_error() {
    let err = interpret("print (1 + 2").unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax(SyntaxError::UnexpectedEndOfInput { .. })
    ));
}

#[test]
fn test_never_assigned_is_eval_error() {
    let err = interpret("y = 3\nprint y + z").unwrap_err();
    assert_eq!(
        err,
        Error::Eval(EvalError::UnboundVariable {
            name: "z".to_string()
        })
    );
}

#[test]
fn test_long_flat_chain_is_a_syntax_error() {
    let source = format!("x = 1{}\nprint x", " + 1".repeat(25_000));
    let err = interpret(&source).unwrap_err();

    assert!(matches!(
        err,
        Error::Syntax(SyntaxError::NestingTooDeep { .. })
    ));
    assert_eq!(err.span().map(|s| s.line), Some(1));
}

#[test]
fn test_chain_within_limit_evaluates() {
    let terms = MAX_EXPRESSION_DEPTH;
    let source = format!("x = 1{}\nprint x", " + 1".repeat(terms));

    let run = interpret(&source).unwrap();
    assert_eq!(run.output, vec![(terms + 1).to_string()]);
}

#[test]
fn test_chained_variables_hit_evaluation_limit() {
    // Each definition is legal on its own; reading c walks all three trees
    let chain = " + 1".repeat(MAX_EXPRESSION_DEPTH);
    let source = format!("a = 1{0}\nb = a{0}\nc = b{0}\nprint c", chain);

    let err = interpret(&source).unwrap_err();
    assert!(matches!(err, Error::Eval(EvalError::RecursionLimit { .. })));
}

#[test]
fn test_division_by_zero_from_variables() {
    let err = interpret("a = 2\nb = a - 2\nprint a / b").unwrap_err();
    assert_eq!(
        err,
        Error::Eval(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
    );
}

#[test]
fn test_case_insensitive_source() {
    assert_eq!(output("Total = 3\nPRINT total * TOTAL"), vec!["9"]);
}

#[test]
fn test_environment_dump_after_run() {
    let run = interpret("b = 1\na = b + (2 * 3)\nc = (a - b) - 1\nprint c").unwrap();

    assert_eq!(run.output, vec!["5"]);
    assert_eq!(
        run.environment.to_string(),
        "b = 1\na = b + 2 * 3\nc = a - b - 1"
    );
}

#[test]
fn test_failed_unit_keeps_earlier_output() {
    let mut interpreter = Interpreter::new();

    let err = interpreter
        .run_source("x = 5\nprint x\nprint x / 0\nprint 99")
        .unwrap_err();

    assert!(matches!(err, Error::Eval(_)));
    assert_eq!(interpreter.take_output(), vec!["5"]);
}

#[test]
fn test_syntax_error_runs_nothing() {
    let mut interpreter = Interpreter::new();

    let err = interpreter.run_source("print 1\nprint (2").unwrap_err();

    assert!(matches!(err, Error::Syntax(_)));
    assert!(interpreter.take_output().is_empty());
}

#[test]
fn test_diagnostic_names_line() {
    let source = "x = 4\nprint x +\n";
    let err = interpret("x = 4\nswap x 7").unwrap_err();

    assert_eq!(err.span().map(|s| s.line), Some(2));
    assert!(interpret(source).unwrap_err().span().is_none());
}

#[cfg(feature = "serde")]
#[test]
fn test_environment_serializes() {
    let run = interpret("x = 1 + y\ny = 2").unwrap();
    let json = serde_json::to_string(&run.environment).unwrap();
    let back: Environment = serde_json::from_str(&json).unwrap();

    assert_eq!(back, run.environment);
}
