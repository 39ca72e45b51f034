//! rillc-util - Shared infrastructure for the Rill toolchain.
//!
//! This crate provides the pieces every phase needs:
//! - `span` - Source location tracking
//! - `symbol` - Interned strings for identifiers and string literals
//! - `diagnostic` - Error and warning collection

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use span::Span;
pub use symbol::Symbol;
