//! One- and two-character operator lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `!` or `!=`.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::BangEqual)
        } else {
            self.token(TokenKind::Bang)
        }
    }

    /// Lexes `=` or `==`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::EqualEqual)
        } else {
            self.token(TokenKind::Equal)
        }
    }

    /// Lexes `<` or `<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::LessEqual)
        } else {
            self.token(TokenKind::Less)
        }
    }

    /// Lexes `>` or `>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::GreaterEqual)
        } else {
            self.token(TokenKind::Greater)
        }
    }
}
