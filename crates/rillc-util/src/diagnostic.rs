//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Compile-time problems are collected into a [`Handler`] rather than
//! aborting the phase that found them: the lexer keeps lexing past an
//! unexpected character, the parser synchronizes and keeps parsing. The
//! driver decides afterwards what to print and whether later stages run.
//!
//! # Examples
//!
//! ```
//! use rillc_util::{DiagnosticBuilder, Handler, Span};
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("Unexpected character '@'.")
//!     .span(Span::point(3, 14))
//!     .emit(&handler);
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A problem that makes the input invalid.
    Error,
    /// A problem worth mentioning that does not invalidate the input.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with severity and location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// The message, already formatted for display.
    pub message: String,
    /// Source location the diagnostic points at.
    pub span: Span,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span,
        }
    }
}

/// Fluent constructor for diagnostics.
///
/// # Examples
///
/// ```
/// use rillc_util::{DiagnosticBuilder, Handler, Level, Span};
///
/// let diag = DiagnosticBuilder::error("Expect ';' after value.")
///     .span(Span::point(1, 12))
///     .build();
/// assert_eq!(diag.level, Level::Error);
/// ```
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
}

impl DiagnosticBuilder {
    /// Start building an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            span: Span::DUMMY,
        }
    }

    /// Start building a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
            span: Span::DUMMY,
        }
    }

    /// Attach a source location.
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Finish building without emitting.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
        }
    }

    /// Finish building and hand the diagnostic to `handler`.
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.build());
    }
}

/// Handler for collecting and reporting diagnostics.
///
/// Uses interior mutability so every phase can hold a shared reference
/// while still recording what it finds.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error at `span`.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit_diagnostic(Diagnostic::error(message, span));
    }

    /// Record a warning at `span`.
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.emit_diagnostic(Diagnostic::warning(message, span));
    }

    /// Record a pre-built diagnostic.
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True when at least one error was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Snapshot of everything recorded so far, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
