//! Core lexer implementation.

use rillc_util::{DiagnosticBuilder, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for Rill source code.
///
/// Transforms source text into a stream of tokens. Lexical errors are
/// reported to the diagnostic handler and lexing continues, so a single
/// pass yields every token the source can form plus every problem it
/// contains.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Error sink for lexical diagnostics.
    handler: &'a Handler,

    /// Starting byte offset of the current token.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    token_start_line: u32,

    /// Column where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns a token with kind [`TokenKind::Eof`] once the
    /// input is exhausted (and on every call thereafter).
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.token(TokenKind::Eof);
        }

        let c = self.cursor.current_char();
        match c {
            '(' => {
                self.cursor.advance();
                self.token(TokenKind::LParen)
            }
            ')' => {
                self.cursor.advance();
                self.token(TokenKind::RParen)
            }
            '{' => {
                self.cursor.advance();
                self.token(TokenKind::LBrace)
            }
            '}' => {
                self.cursor.advance();
                self.token(TokenKind::RBrace)
            }
            ',' => {
                self.cursor.advance();
                self.token(TokenKind::Comma)
            }
            '.' => {
                self.cursor.advance();
                self.token(TokenKind::Dot)
            }
            '-' => {
                self.cursor.advance();
                self.token(TokenKind::Minus)
            }
            '+' => {
                self.cursor.advance();
                self.token(TokenKind::Plus)
            }
            ';' => {
                self.cursor.advance();
                self.token(TokenKind::Semicolon)
            }
            '*' => {
                self.cursor.advance();
                self.token(TokenKind::Star)
            }
            '/' => {
                // Comments were consumed above, so this is division.
                self.cursor.advance();
                self.token(TokenKind::Slash)
            }
            '!' => self.lex_bang(),
            '=' => self.lex_equals(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if super::identifier::is_ident_start(c) => self.lex_identifier(),
            c => {
                self.cursor.advance();
                self.report_error(format!(
                    "Unexpected character '{}' at line {}.",
                    c, self.token_start_line
                ));
                self.token(TokenKind::Invalid(c.to_string()))
            }
        }
    }

    /// Builds a token of `kind` spanning from the current token start to
    /// the cursor position.
    pub(crate) fn token(&self, kind: TokenKind) -> Token {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        Token::new(kind, span)
    }

    /// Reports a lexical error at the current token position.
    pub(crate) fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }

    /// Line where the current token starts.
    pub(crate) fn token_line(&self) -> u32 {
        self.token_start_line
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
