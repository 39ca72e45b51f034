//! rillc-lex - Lexical analyzer for the Rill language.
//!
//! Turns source text into a token sequence. The lexer never aborts:
//! problems are reported to the shared diagnostic [`Handler`] and lexing
//! continues, producing an `Invalid` token for input it cannot form a
//! token from. The emitted sequence always ends with an `Eof` token.
//!
//! ```
//! use rillc_lex::{tokenize, TokenKind};
//! use rillc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("print 1 + 2;", &handler);
//! assert!(!handler.has_errors());
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

pub mod cursor;
mod lexer;
mod token;


pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

use rillc_util::Handler;

/// Lexes `source` to completion.
///
/// The returned sequence always ends with an `Eof` token; any lexical
/// errors are recorded in `handler`.
pub fn tokenize(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}
