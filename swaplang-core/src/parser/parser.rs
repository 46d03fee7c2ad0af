use crate::parser::ast::{BinaryOp, Expr, Program, Statement};
use crate::parser::environment::Environment;
use crate::parser::error::SyntaxError;
use crate::parser::lexer::{Span, Token, TokenKind};

/// Deepest parenthesis nesting accepted before giving up
pub const MAX_NESTING_DEPTH: usize = 256;

/// Deepest operator tree a single expression may build, parenthesized or not.
///
/// Kept below `MAX_EVAL_DEPTH` so any accepted literal tree can be cloned,
/// dropped, printed and evaluated without exhausting the stack.
pub const MAX_EXPRESSION_DEPTH: usize = 512;

/// Recursive descent parser over a lexed token vector.
///
/// Grammar:
/// ```text
/// program        := assignment | swap_statement | PRINT expression
/// assignment     := IDENTIFIER EQUALS expression
/// swap_statement := SWAP IDENTIFIER IDENTIFIER
/// expression     := term ((PLUS | MINUS) term)*
/// term           := factor ((MULTIPLY | DIVIDE) factor)*
/// factor         := IDENTIFIER | INTEGER | LPAR expression RPAR
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Take the current token, failing at end of input
    fn next(&mut self, expected: &'static str) -> Result<Token, SyntaxError> {
        let token = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or(SyntaxError::UnexpectedEndOfInput { expected })?;
        self.position += 1;
        Ok(token)
    }

    /// Take the current token if it has the given kind
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, SyntaxError> {
        let token = self.next(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(SyntaxError::UnexpectedToken { token, expected })
        }
    }

    /// Operator at the current position if it is one of `ops`
    fn match_operator(&self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        self.current()
            .and_then(|token| BinaryOp::from_token(token.kind))
            .filter(|op| ops.contains(op))
    }

    /// Parse every statement until the tokens are exhausted.
    ///
    /// Assignments are stored in `env` as they are parsed.
    pub fn parse_program(&mut self, env: &mut Environment) -> Result<Program, SyntaxError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            program.push(self.parse_statement(env)?);
        }

        Ok(program)
    }

    /// Parse one top-level statement, dispatching on its first token
    /// Grammar: program = assignment | swap_statement | PRINT expression
    pub fn parse_statement(&mut self, env: &mut Environment) -> Result<Statement, SyntaxError> {
        let token = self.next("statement")?;

        match token.kind {
            TokenKind::Identifier => self.parse_assignment(token, env),
            TokenKind::Keyword if token.is_keyword("SWAP") => self.parse_swap(),
            TokenKind::Keyword if token.is_keyword("PRINT") => {
                Ok(Statement::Print(self.parse_expression()?))
            }
            _ => Err(SyntaxError::UnexpectedToken {
                token,
                expected: "assignment, SWAP or PRINT",
            }),
        }
    }

    /// Grammar: assignment = IDENTIFIER EQUALS expression
    fn parse_assignment(
        &mut self,
        identifier: Token,
        env: &mut Environment,
    ) -> Result<Statement, SyntaxError> {
        self.expect(TokenKind::Equals, "'=' after variable name")?;
        let value = self.parse_expression()?;

        let name = identifier.lexeme().to_string();
        env.bind(&name, value.clone());

        Ok(Statement::Assign { name, value })
    }

    /// Grammar: swap_statement = SWAP IDENTIFIER IDENTIFIER
    fn parse_swap(&mut self) -> Result<Statement, SyntaxError> {
        let first = self.expect(TokenKind::Identifier, "variable name after SWAP")?;
        let second = self.expect(TokenKind::Identifier, "second variable name after SWAP")?;

        Ok(Statement::Swap {
            first: first.lexeme().to_string(),
            second: second.lexeme().to_string(),
        })
    }

    /// Parse additive operations, folding left
    /// Grammar: expression = term (('+' | '-') term)*
    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        self.expression().map(|(expr, _)| expr)
    }

    /// Expression together with the height of its operator tree
    fn expression(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let (mut left, mut height) = self.term()?;

        while let Some(op) = self.match_operator(&[BinaryOp::Add, BinaryOp::Sub]) {
            let span = self.advance_operator();
            let (right, right_height) = self.term()?;
            height = Self::fold_height(height, right_height, span)?;
            left = Expr::binary(op, left, right);
        }

        Ok((left, height))
    }

    /// Parse multiplicative operations, folding left
    /// Grammar: term = factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let (mut left, mut height) = self.factor()?;

        while let Some(op) = self.match_operator(&[BinaryOp::Mul, BinaryOp::Div]) {
            let span = self.advance_operator();
            let (right, right_height) = self.factor()?;
            height = Self::fold_height(height, right_height, span)?;
            left = Expr::binary(op, left, right);
        }

        Ok((left, height))
    }

    /// Step over the operator matched by `match_operator`, returning its position
    fn advance_operator(&mut self) -> Span {
        let span = self.current().map(|token| token.span).unwrap_or_default();
        self.position += 1;
        span
    }

    /// Height of a new binary node over two operands
    fn fold_height(left: usize, right: usize, span: Span) -> Result<usize, SyntaxError> {
        let height = left.max(right) + 1;
        if height > MAX_EXPRESSION_DEPTH {
            return Err(SyntaxError::NestingTooDeep { span });
        }
        Ok(height)
    }

    /// Grammar: factor = IDENTIFIER | INTEGER | '(' expression ')'
    fn factor(&mut self) -> Result<(Expr, usize), SyntaxError> {
        let token = self.next("expression")?;

        match token.kind {
            TokenKind::Identifier => Ok((Expr::identifier(token.lexeme()), 0)),
            TokenKind::Integer => Ok((Expr::integer(token.lexeme()), 0)),
            TokenKind::LeftParen => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(SyntaxError::NestingTooDeep { span: token.span });
                }

                self.depth += 1;
                let inner = self.expression();
                self.depth -= 1;
                let inner = inner?;

                match self.current() {
                    Some(next) if next.kind == TokenKind::RightParen => {
                        self.position += 1;
                        Ok(inner)
                    }
                    Some(next) => Err(SyntaxError::ExpectedClosingParen { span: next.span }),
                    None => Err(SyntaxError::UnexpectedEndOfInput {
                        expected: "closing parenthesis",
                    }),
                }
            }
            _ => Err(SyntaxError::UnexpectedToken {
                token,
                expected: "number, variable or '('",
            }),
        }
    }
}

/// Parse a whole token vector into a program, binding assignments in `env`
pub fn parse(tokens: Vec<Token>, env: &mut Environment) -> Result<Program, SyntaxError> {
    Parser::new(tokens).parse_program(env)
}

/// Parse a token vector that must hold exactly one expression.
///
/// Leaves no trace in any environment.
pub fn parse_expression(tokens: Vec<Token>) -> Result<Expr, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expression()?;

    match parser.current() {
        Some(token) => Err(SyntaxError::UnexpectedToken {
            token: token.clone(),
            expected: "end of expression",
        }),
        None => Ok(expr),
    }
}
