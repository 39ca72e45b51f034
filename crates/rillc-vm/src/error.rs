//! Runtime errors.
//!
//! Any of these terminates the current execution; the VM object itself
//! stays usable (the REPL keeps going after reporting one).

use thiserror::Error;

use rillc_ir::Label;
use rillc_util::Symbol;

/// An error raised while executing IR.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(Symbol),

    #[error("Undefined function: {0}")]
    UndefinedFunction(Symbol),

    #[error("'{0}' is not a function.")]
    NotCallable(Symbol),

    #[error("Unknown label: {0}")]
    UnknownLabel(Label),

    #[error("Operands must be numbers.")]
    NumberOperands,

    #[error("Operands must be two numbers or two strings.")]
    AddOperands,

    #[error("Operand must be a number.")]
    NumberOperand,

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Expected {expected} arguments but got {found} in call to '{name}'.")]
    ArityMismatch {
        name: Symbol,
        expected: usize,
        found: usize,
    },

    #[error("Value stack underflow.")]
    StackUnderflow,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
