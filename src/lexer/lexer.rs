use tracing::{debug, warn};

use crate::error::LexError;

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS},
    Token, TokenKind,
};

#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    index: usize,
    line: usize,
}

impl Lexer {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            tokens: vec![],
            errors: vec![],
            index: 0,
            line: 1,
        }
    }

    fn new_token(&mut self, kind: TokenKind, s: String) {
        self.index += s.chars().count();
        self.tokens.push(Token {
            kind,
            text: s,
            line: self.line,
        });
    }

    fn parse_number(&mut self) {
        let s: String = self.chars[self.index..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        self.new_token(TokenKind::Num, s);
    }

    /// `[a-z][a-z0-9]*`, with reserved words overriding the identifier kind.
    fn parse_identifier(&mut self) {
        let s: String = self.chars[self.index..]
            .iter()
            .take_while(|&&c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();

        let kind = KEYWORDS.get(s.as_str()).copied().unwrap_or(TokenKind::Ident);
        self.new_token(kind, s);
    }

    /// Skips a `/* ... */` comment. Returns false, consuming nothing, when
    /// the comment is never closed.
    fn skip_comment(&mut self) -> bool {
        let rest = &self.chars[self.index + 2..];
        let Some(end) = rest.windows(2).position(|w| w == ['*', '/']) else {
            return false;
        };
        self.line += rest[..end].iter().filter(|&&c| c == '\n').count();
        self.index += end + 4;
        true
    }

    fn illegal_character(&mut self, character: char) {
        let error = LexError::IllegalCharacter {
            character,
            line: self.line,
        };
        warn!("{}", error);
        self.errors.push(error);
        self.index += 1;
    }

    fn _tokenize(&mut self) {
        while self.index < self.chars.len() {
            let c = self.chars[self.index];
            let c2 = self.chars[self.index..].iter().take(2).collect::<String>();

            if c == ' ' || c == '\t' || c == '\r' {
                self.index += 1;
            } else if c == '\n' {
                self.line += 1;
                self.index += 1;
            } else if c2 == "/*" && self.skip_comment() {
                continue;
            } else if c.is_ascii_digit() {
                self.parse_number();
            } else if c.is_ascii_lowercase() {
                self.parse_identifier();
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(*kind, c2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(*kind, c.to_string());
            } else {
                self.illegal_character(c);
            }
        }
    }

    /// Tokenizes `s`, dropping illegal characters. Each one is logged.
    pub fn tokenize(s: &str) -> Vec<Token> {
        Self::tokenize_with_errors(s).0
    }

    /// Tokenizes `s`, also returning every illegal character that was skipped.
    pub fn tokenize_with_errors(s: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(s);
        lexer._tokenize();
        debug!(
            tokens = lexer.tokens.len(),
            errors = lexer.errors.len(),
            lines = lexer.line,
            "lexing finished"
        );

        (lexer.tokens, lexer.errors)
    }
}
