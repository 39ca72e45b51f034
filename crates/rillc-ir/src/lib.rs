//! rillc-ir - Intermediate representation for the Rill toolchain.
//!
//! Defines the flat, stack-oriented instruction set the VM executes, the
//! dynamically typed runtime [`Value`], and the lowering pass that turns
//! the parser's AST into an instruction list.
//!
//! ```
//! use rillc_ir::{Instr, IrGen};
//! use rillc_lex::tokenize;
//! use rillc_par::Parser;
//! use rillc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = tokenize("print 1 + 2;", &handler);
//! let statements = Parser::new(tokens, &handler).parse();
//! let instrs = IrGen::new().generate(&statements, &handler);
//! assert_eq!(instrs.last(), Some(&Instr::Print));
//! ```

mod ir;
mod lower;
mod value;


pub use ir::{Instr, Label};
pub use lower::IrGen;
pub use value::Value;
