//! String literal lexing.

use rillc_util::Symbol;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    ///
    /// Strings are delimited by double quotes and may span multiple lines;
    /// the literal is the contents without the quotes. There is no escape
    /// processing.
    ///
    /// An unterminated string is reported and yields an `Invalid` token
    /// carrying the partial text.
    pub(crate) fn lex_string(&mut self) -> Token {
        self.cursor.advance();

        while self.cursor.current_char() != '"' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }

        if self.cursor.is_at_end() {
            let line = self.token_line();
            self.report_error(format!("Unterminated string at line {line}."));
            let text = self.cursor.slice_from(self.token_start).to_string();
            return self.token(TokenKind::Invalid(text));
        }

        // The closing quote.
        self.cursor.advance();

        let text = self.cursor.slice_from(self.token_start);
        let contents = &text[1..text.len() - 1];
        self.token(TokenKind::Str(Symbol::intern(contents)))
    }
}
