use crate::parser::environment::Environment;
use crate::parser::error::LexError;
use std::fmt;

/// Words the lexer turns into [`TokenKind::Keyword`] instead of identifiers.
pub const RESERVED: [&str; 2] = ["PRINT", "SWAP"];

/// 1-based source position of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Kinds of tokens in the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Keyword,
    /// Synthetic assignment marker; never produced by the lexer
    Assign,
    Identifier,
    Integer,
    Plus,
    Minus,
    Multiply,
    Divide,
    LeftParen,
    RightParen,
    Equals,
}

impl TokenKind {
    /// Fixed spelling of punctuation kinds
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            TokenKind::Plus => Some("+"),
            TokenKind::Minus => Some("-"),
            TokenKind::Multiply => Some("*"),
            TokenKind::Divide => Some("/"),
            TokenKind::LeftParen => Some("("),
            TokenKind::RightParen => Some(")"),
            TokenKind::Equals => Some("="),
            TokenKind::Keyword
            | TokenKind::Assign
            | TokenKind::Identifier
            | TokenKind::Integer => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Divide => "DIVIDE",
            TokenKind::LeftParen => "LPAR",
            TokenKind::RightParen => "RPAR",
            TokenKind::Equals => "EQUALS",
        };
        write!(f, "{}", name)
    }
}

/// A lexical unit: kind, literal text and where it started
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<String>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: Option<String>, span: Span) -> Self {
        Token { kind, lexeme, span }
    }

    /// Punctuation token carrying its own symbol as lexeme
    pub fn symbol(kind: TokenKind, span: Span) -> Self {
        Token::new(kind, kind.symbol().map(str::to_string), span)
    }

    pub fn lexeme(&self) -> &str {
        self.lexeme.as_deref().unwrap_or("")
    }

    /// True for a keyword token spelled `word` (upper case)
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme() == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) => write!(f, "{}('{}')", self.kind, lexeme),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Scans source text into tokens
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    current_char: Option<char>,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Lexer {
            input: chars,
            position: 0,
            current_char,
            line: 1,
            column: 1,
        }
    }

    fn advance(&mut self) {
        if self.current_char == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Discard a comment up to, not including, the next newline
    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut result = String::new();

        while let Some(ch) = self.current_char {
            if accept(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        result
    }

    /// Read an alphabetic run as a keyword or an identifier.
    ///
    /// Identifiers are declared in `env` so every lexed name is a key.
    fn read_word(&mut self, env: &mut Environment) -> Token {
        let span = self.span();
        let word = self.read_while(char::is_alphabetic);
        let upper = word.to_uppercase();

        if RESERVED.contains(&upper.as_str()) {
            Token::new(TokenKind::Keyword, Some(upper), span)
        } else {
            let name = word.to_lowercase();
            env.declare(&name);
            Token::new(TokenKind::Identifier, Some(name), span)
        }
    }

    /// Get the next token, or `None` at end of input
    pub fn next_token(&mut self, env: &mut Environment) -> Result<Option<Token>, LexError> {
        loop {
            let span = self.span();

            let kind = match self.current_char {
                None => return Ok(None),

                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                    continue;
                }

                Some('-') if matches!(self.peek(), Some('-') | Some('>')) => {
                    self.skip_comment();
                    continue;
                }

                Some(ch) if ch.is_ascii_digit() => {
                    let number = self.read_while(|c| c.is_ascii_digit());
                    return Ok(Some(Token::new(TokenKind::Integer, Some(number), span)));
                }

                Some(ch) if ch.is_alphabetic() => return Ok(Some(self.read_word(env))),

                Some('+') => TokenKind::Plus,
                Some('-') => TokenKind::Minus,
                Some('*') => TokenKind::Multiply,
                Some('/') => TokenKind::Divide,
                Some('(') => TokenKind::LeftParen,
                Some(')') => TokenKind::RightParen,
                Some('=') => TokenKind::Equals,

                Some(ch) => return Err(LexError::new(ch, span)),
            };

            self.advance();
            return Ok(Some(Token::symbol(kind, span)));
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self, env: &mut Environment) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token(env)? {
            tokens.push(token);
        }

        Ok(tokens)
    }
}

/// Convenience function to tokenize a source string
pub fn tokenize(source: &str, env: &mut Environment) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut env = Environment::new();
        tokenize(source, &mut env)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("+-*/()="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Multiply,
                TokenKind::Divide,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Equals,
            ]
        );
    }

    #[test]
    fn test_integer_is_greedy_and_textual() {
        let mut env = Environment::new();
        let tokens = tokenize("007 42", &mut env).unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].lexeme(), "007");
        assert_eq!(tokens[1].lexeme(), "42");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let mut env = Environment::new();
        let tokens = tokenize("print Swap PRINT", &mut env).unwrap();

        assert!(tokens[0].is_keyword("PRINT"));
        assert!(tokens[1].is_keyword("SWAP"));
        assert!(tokens[2].is_keyword("PRINT"));
        assert!(env.is_empty());
    }

    #[test]
    fn test_identifiers_are_lowercased_and_declared() {
        let mut env = Environment::new();
        let tokens = tokenize("Foo = BAR", &mut env).unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme(), "foo");
        assert_eq!(tokens[2].lexeme(), "bar");

        assert!(env.is_declared("foo"));
        assert!(env.is_declared("bar"));
        assert!(env.get("foo").is_none());
    }

    #[test]
    fn test_word_stops_at_digit() {
        let mut env = Environment::new();
        let tokens = tokenize("x2", &mut env).unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme(), "x");
        assert_eq!(tokens[1].kind, TokenKind::Integer);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("x = 1 -- set x\n-> arrow comment\nprint x"),
            kinds("x = 1\n\nprint x")
        );
    }

    #[test]
    fn test_comment_at_end_of_input() {
        assert_eq!(kinds("print 6 -> 6"), vec![TokenKind::Keyword, TokenKind::Integer]);
    }

    #[test]
    fn test_lone_minus() {
        assert_eq!(
            kinds("1 - 2 -"),
            vec![
                TokenKind::Integer,
                TokenKind::Minus,
                TokenKind::Integer,
                TokenKind::Minus,
            ]
        );
    }

    #[test]
    fn test_spans_track_lines() {
        let mut env = Environment::new();
        let tokens = tokenize("x = 4\n  -- note\n  print x", &mut env).unwrap();

        assert_eq!(tokens[0].span, Span::new(1, 1));
        assert_eq!(tokens[2].span, Span::new(1, 5));
        assert_eq!(tokens[3].span, Span::new(3, 3));
        assert_eq!(tokens[4].span, Span::new(3, 9));
    }

    #[test]
    fn test_invalid_character() {
        let mut env = Environment::new();
        let err = tokenize("x = 4\ny = @", &mut env).unwrap_err();

        assert_eq!(err.character, '@');
        assert_eq!(err.span, Span::new(2, 5));
        assert!(err.to_string().contains("Unknown character"));
    }

    #[test]
    fn test_empty_input() {
        assert!(kinds("").is_empty());
        assert!(kinds("  \n\t-- only a comment").is_empty());
    }

    #[test]
    fn test_token_display() {
        let mut env = Environment::new();
        let tokens = tokenize("swap a b +", &mut env).unwrap();

        assert_eq!(tokens[0].to_string(), "KEYWORD('SWAP')");
        assert_eq!(tokens[1].to_string(), "IDENTIFIER('a')");
        assert_eq!(tokens[3].to_string(), "PLUS('+')");
    }
}
