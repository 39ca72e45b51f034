//! Number literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// Numbers are one or more digits, optionally followed by `.` and one
    /// or more digits. A trailing dot with no fractional digits is not
    /// part of the number; the `.` is left for the next token.
    ///
    /// All numbers decode to `f64`.
    pub(crate) fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(self.token_start);
        match text.parse::<f64>() {
            Ok(value) => self.token(TokenKind::Number(value)),
            Err(e) => {
                self.report_error(format!("Invalid number literal '{text}': {e}."));
                self.token(TokenKind::Invalid(text.to_string()))
            }
        }
    }
}
