//! Input parsers: HyperBench, PACE 2019, and the Update (PACE-plus-specials) extension.
//!
//! All three formats share the same lexical core — identifiers built from alphanumerics plus
//! `_ : @ ; -`, `%`/`//` line comments, and free whitespace — so the tokenizer lives here once
//! and each format module only adds its own grammar on top.

pub mod hyperbench;
pub mod pace;
pub mod update;

use crate::error::GhdError;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '@' | ';' | '-' | '.')
}

/// A minimal hand-rolled tokenizer: strips comments, then splits the remainder into identifiers
/// and single-character punctuation (`(`, `)`, `,`, `.`, `👻`, `✨`), tracking line numbers for
/// error reporting.
pub(crate) struct Tokenizer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Ident(String),
    Punct(char),
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Tokenizer {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    if *c == '\n' {
                        self.line += 1;
                    }
                    self.chars.next();
                }
                Some('%') => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'/') {
                        while let Some(&c) = self.chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.chars.next();
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn next_token(&mut self) -> Option<Token> {
        self.skip_trivia();
        let &c = self.chars.peek()?;
        if matches!(c, '(' | ')' | ',' | '.' | '👻' | '✨') {
            self.chars.next();
            return Some(Token::Punct(c));
        }
        if is_ident_char(c) {
            let mut ident = String::new();
            while let Some(&c) = self.chars.peek() {
                if is_ident_char(c) {
                    ident.push(c);
                    self.chars.next();
                } else {
                    break;
                }
            }
            return Some(Token::Ident(ident));
        }
        // Unrecognized punctuation is skipped rather than rejected, matching the original
        // lexer's permissive "Punct" catch-all.
        self.chars.next();
        self.next_token()
    }

    pub(crate) fn peek_token(&mut self) -> Option<Token> {
        let save = self.chars.clone();
        let save_line = self.line;
        let tok = self.next_token();
        self.chars = save;
        self.line = save_line;
        tok
    }

    fn expect_ident(&mut self) -> Result<String, GhdError> {
        match self.next_token() {
            Some(Token::Ident(s)) => Ok(s),
            other => Err(GhdError::Parse {
                line: self.line,
                message: format!("expected an identifier, got {other:?}"),
            }),
        }
    }

    fn expect_punct(&mut self, expected: char) -> Result<(), GhdError> {
        match self.next_token() {
            Some(Token::Punct(c)) if c == expected => Ok(()),
            other => Err(GhdError::Parse {
                line: self.line,
                message: format!("expected {expected:?}, got {other:?}"),
            }),
        }
    }
}

/// Parses one `name(v1,v2,...)` edge, interning vertex names via `intern`.
pub(crate) fn parse_edge_body(
    tok: &mut Tokenizer<'_>,
) -> Result<(String, Vec<String>), GhdError> {
    let name = tok.expect_ident()?;
    tok.expect_punct('(')?;
    let mut vertices = Vec::new();
    loop {
        match tok.peek_token() {
            Some(Token::Punct(')')) => {
                tok.next_token();
                break;
            }
            Some(Token::Ident(_)) => {
                vertices.push(tok.expect_ident()?);
                if let Some(Token::Punct(',')) = tok.peek_token() {
                    tok.next_token();
                }
            }
            other => {
                return Err(GhdError::Parse {
                    line: tok.line(),
                    message: format!("expected a vertex name or ')', got {other:?}"),
                });
            }
        }
    }
    Ok((name, vertices))
}
