//! Built-in functions.
//!
//! The standard library is two functions: `print` and `clock`. Built-ins
//! are dispatched by name at CALL time when the name is not bound to a
//! user function; a user function of the same name shadows the built-in.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use rillc_ir::Value;
use rillc_util::Symbol;

use crate::error::RuntimeError;

/// True when `name` names a built-in function.
pub fn is_builtin(name: &str) -> bool {
    matches!(name, "print" | "clock")
}

/// Invokes a built-in: pops its arguments from `stack` and returns its
/// result. The caller pushes the result.
pub(crate) fn call_builtin(
    name: Symbol,
    argc: usize,
    stack: &mut Vec<Value>,
    out: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    match name.as_str() {
        "print" => {
            check_arity(name, 1, argc)?;
            let value = stack.pop().ok_or(RuntimeError::StackUnderflow)?;
            writeln!(out, "{value}")?;
            Ok(Value::Nil)
        }
        "clock" => {
            check_arity(name, 0, argc)?;
            let seconds = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);
            Ok(Value::Number(seconds))
        }
        _ => Err(RuntimeError::UndefinedFunction(name)),
    }
}

fn check_arity(name: Symbol, expected: usize, found: usize) -> Result<(), RuntimeError> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::ArityMismatch {
            name,
            expected,
            found,
        })
    }
}
