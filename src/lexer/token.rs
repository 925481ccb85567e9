use std::fmt;

use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "else" => TokenKind::Else,
    "if" => TokenKind::If,
    "int" => TokenKind::Int,
    "print" => TokenKind::Print,
    "read" => TokenKind::Read,
    "return" => TokenKind::Return,
    "while" => TokenKind::While,
};

pub(super) static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "<=" => TokenKind::LessEqual,
    ">=" => TokenKind::GreaterEqual,
    "==" => TokenKind::DoubleEqual,
    "!=" => TokenKind::NotEqual,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    ';' => TokenKind::SemiColon,
    ',' => TokenKind::Comma,
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '/' => TokenKind::Slash,
    '*' => TokenKind::Star,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '{' => TokenKind::OpenCurlyBrace,
    '}' => TokenKind::CloseCurlyBrace,
    '[' => TokenKind::OpenSquareBrace,
    ']' => TokenKind::CloseSquareBrace,
    '<' => TokenKind::LessThan,
    '>' => TokenKind::GreaterThan,
    '=' => TokenKind::Equal,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Else,
    If,
    Int,
    Print,
    Read,
    Return,
    While,

    Ident,
    Num,

    SemiColon,
    Comma,
    Plus,
    Minus,
    Slash,
    Star,
    OpenParen,
    CloseParen,
    OpenCurlyBrace,
    CloseCurlyBrace,
    OpenSquareBrace,
    CloseSquareBrace,

    LessEqual,
    LessThan,
    GreaterEqual,
    GreaterThan,
    DoubleEqual,
    Equal,
    NotEqual,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Else => "'else'",
            TokenKind::If => "'if'",
            TokenKind::Int => "'int'",
            TokenKind::Print => "'print'",
            TokenKind::Read => "'read'",
            TokenKind::Return => "'return'",
            TokenKind::While => "'while'",
            TokenKind::Ident => "identifier",
            TokenKind::Num => "integer literal",
            TokenKind::SemiColon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Slash => "'/'",
            TokenKind::Star => "'*'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenCurlyBrace => "'{'",
            TokenKind::CloseCurlyBrace => "'}'",
            TokenKind::OpenSquareBrace => "'['",
            TokenKind::CloseSquareBrace => "']'",
            TokenKind::LessEqual => "'<='",
            TokenKind::LessThan => "'<'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::GreaterThan => "'>'",
            TokenKind::DoubleEqual => "'=='",
            TokenKind::Equal => "'='",
            TokenKind::NotEqual => "'!='",
        };
        f.write_str(s)
    }
}

/// A lexed token. `text` is the exact source slice, `line` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?} {:?}", self.line, self.kind, self.text)
    }
}
