//! Tokenizer for XPath-flavoured form expressions
//!
//! Never fails: characters it does not understand become `Unknown` tokens so
//! that malformed input degrades into fewer matches instead of an error.

use crate::utils::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// QName such as `my:Field`, `string-length` or `xdUser:get-UserName`
    Name(String),
    /// Contents of a quoted literal, quotes removed
    Str(String),
    Number(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Slash,
    DoubleSlash,
    Dot,
    DotDot,
    At,
    Dollar,
    Pipe,
    Plus,
    Minus,
    Star,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Unknown(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }

    /// Name text if this is a name token
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Name(name) => Some(name),
            _ => None,
        }
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-' || ch == '.'
}

struct Cursor<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut rest = self.source[self.pos..].chars();
        rest.next();
        rest.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}

/// Split an expression into tokens. Whitespace is dropped.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor { source, pos: 0 };

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos;

        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }

        let kind = match ch {
            '"' | '\'' => {
                cursor.bump();
                let body_start = cursor.pos;
                match source[body_start..].find(ch) {
                    Some(rel) => {
                        cursor.pos = body_start + rel + 1;
                        TokenKind::Str(source[body_start..body_start + rel].to_string())
                    }
                    // Unterminated literal runs to the end of the input
                    None => {
                        cursor.pos = source.len();
                        TokenKind::Str(source[body_start..].to_string())
                    }
                }
            }

            '0'..='9' => {
                cursor.eat_digits();
                if cursor.peek() == Some('.')
                    && matches!(cursor.peek_second(), Some(c) if c.is_ascii_digit())
                {
                    cursor.bump();
                    cursor.eat_digits();
                }
                TokenKind::Number(source[start..cursor.pos].to_string())
            }

            '.' => {
                cursor.bump();
                if cursor.eat('.') {
                    TokenKind::DotDot
                } else if matches!(cursor.peek(), Some(c) if c.is_ascii_digit()) {
                    cursor.eat_digits();
                    TokenKind::Number(source[start..cursor.pos].to_string())
                } else {
                    TokenKind::Dot
                }
            }

            c if is_name_start(c) => {
                cursor.bump();
                let mut seen_colon = false;
                loop {
                    match cursor.peek() {
                        Some(next) if is_name_char(next) => {
                            cursor.bump();
                        }
                        // Namespace separator: one colon followed by a name start
                        Some(':')
                            if !seen_colon
                                && cursor.peek_second().map(is_name_start).unwrap_or(false) =>
                        {
                            seen_colon = true;
                            cursor.bump();
                        }
                        _ => break,
                    }
                }
                // A trailing hyphen or dot belongs to the next token
                let mut text = &source[start..cursor.pos];
                while text.len() > 1 && (text.ends_with('-') || text.ends_with('.')) {
                    text = &text[..text.len() - 1];
                }
                cursor.pos = start + text.len();
                TokenKind::Name(text.to_string())
            }

            '/' => {
                cursor.bump();
                if cursor.eat('/') {
                    TokenKind::DoubleSlash
                } else {
                    TokenKind::Slash
                }
            }

            '!' => {
                cursor.bump();
                if cursor.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Unknown('!')
                }
            }

            '<' => {
                cursor.bump();
                if cursor.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }

            '>' => {
                cursor.bump();
                if cursor.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }

            other => {
                cursor.bump();
                match other {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    ',' => TokenKind::Comma,
                    '@' => TokenKind::At,
                    '$' => TokenKind::Dollar,
                    '|' => TokenKind::Pipe,
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '=' => TokenKind::Eq,
                    unknown => TokenKind::Unknown(unknown),
                }
            }
        };

        tokens.push(Token::new(kind, start, cursor.pos));
    }

    tokens
}
