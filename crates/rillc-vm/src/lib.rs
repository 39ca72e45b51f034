//! rillc-vm - Stack virtual machine for the Rill IR.
//!
//! Resolves symbolic labels to instruction indices at load time, then
//! executes the instruction list against a value stack, a flat global
//! name table, and a call stack. See [`Vm`] for the execution model and
//! [`RuntimeError`] for everything that can go wrong at runtime.

mod builtins;
mod error;
mod vm;

#[cfg(test)]
mod edge_cases;

pub use builtins::is_builtin;
pub use error::RuntimeError;
pub use vm::Vm;

// The IR types travel with the VM everywhere it is used.
pub use rillc_ir::{Instr, Label, Value};
