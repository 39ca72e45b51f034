//! rillc-par - Parser for the Rill language.
//!
//! A hand-written recursive descent parser. Statements follow the grammar
//! directly; expressions use a Pratt loop over binding powers, which keeps
//! the whole precedence ladder in one table instead of one function per
//! level.
//!
//! Errors are reported to the diagnostic [`Handler`] in the
//! `Error at '<lexeme>': <message>` format and the parser synchronizes to
//! the next statement boundary, dropping the broken declaration. Whatever
//! parses cleanly is still returned, so one typo does not hide every later
//! error.
//!
//! ```
//! use rillc_lex::tokenize;
//! use rillc_par::Parser;
//! use rillc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("print 1 + 2;", &handler);
//! let statements = Parser::new(tokens, &handler).parse();
//! assert_eq!(statements.len(), 1);
//! assert!(!handler.has_errors());
//! ```

pub mod ast;
mod expr;
mod stmt;

#[cfg(test)]
mod edge_cases;

pub use ast::{BinOp, Expr, Lit, LogicalOp, Stmt, UnOp};

use rillc_lex::{Token, TokenKind};
use rillc_util::{Handler, Span, Symbol};

/// Recursive descent parser.
pub struct Parser<'a> {
    /// Token stream from the lexer, terminated by `Eof`.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Error sink.
    handler: &'a Handler,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `tokens`.
    ///
    /// An `Eof` terminator is appended if the stream lacks one, so the
    /// parser never reads past the end.
    pub fn new(mut tokens: Vec<Token>, handler: &'a Handler) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            position: 0,
            handler,
        }
    }

    /// Parses the token stream into a list of statements.
    ///
    /// Declarations that fail to parse are dropped after synchronization;
    /// the rest of the program is still returned.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.parse_declaration() {
                Some(stmt) => statements.push(stmt),
                None => self.recover_to_sync_point(),
            }
        }

        statements
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    /// True when the current token has exactly the given kind.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    /// Consumes the current token when it matches.
    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or reports `message`.
    ///
    /// Returns the consumed token's span.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Span> {
        if self.check(&kind) {
            let span = self.current().span;
            self.advance();
            Some(span)
        } else {
            self.error_at_current(message);
            None
        }
    }

    /// Consumes an identifier or reports `message`.
    pub(crate) fn expect_ident(&mut self, message: &str) -> Option<(Symbol, Span)> {
        if let TokenKind::Ident(name) = self.current().kind {
            let span = self.current().span;
            self.advance();
            Some((name, span))
        } else {
            self.error_at_current(message);
            None
        }
    }

    // ------------------------------------------------------------------
    // Error reporting and recovery
    // ------------------------------------------------------------------

    /// Reports a parse error at the current token.
    pub(crate) fn error_at_current(&self, message: &str) {
        let token = self.current();
        self.error_at(token.kind.clone(), token.span, message);
    }

    /// Reports a parse error at a specific token.
    pub(crate) fn error_at_token(&self, token: &Token, message: &str) {
        self.error_at(token.kind.clone(), token.span, message);
    }

    fn error_at(&self, kind: TokenKind, span: Span, message: &str) {
        let formatted = if kind == TokenKind::Eof {
            format!("Error at end: {message}")
        } else {
            format!("Error at '{kind}': {message}")
        };
        self.handler.error(formatted, span);
    }

    /// Skips tokens until just past a `;` or in front of a token that can
    /// start a statement. Called after a parse error to resume at a
    /// plausible boundary.
    pub(crate) fn recover_to_sync_point(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.current().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}
