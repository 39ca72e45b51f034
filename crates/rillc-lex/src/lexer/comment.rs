//! Whitespace and comment skipping.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and `//` line comments.
    ///
    /// Recognized whitespace is space, carriage return, tab, and newline;
    /// the cursor's line counter advances on newlines. A `//` starts a
    /// comment running to the end of the line; the terminating newline is
    /// consumed on the next loop iteration.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\r' | '\t' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }
}
