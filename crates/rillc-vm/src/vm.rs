//! The stack virtual machine.
//!
//! Executes a flat instruction list against a value stack, a flat global
//! name table, and a call stack of `(return address, globals snapshot)`
//! frames. Labels are resolved to instruction indices once, at load time,
//! so dispatch is O(1).
//!
//! Scoping note: there is no lexical scope chain at runtime. `PARAM`
//! stores into the same flat table as every other name; a call snapshots
//! the caller's table and `RETURN` restores it, re-applying any names the
//! callee created that did not exist at call time. Top-level definitions
//! made inside a function therefore survive the return, and recursive
//! calls get their caller's bindings back afterwards.

use std::io::{self, Write};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use rillc_ir::{Instr, Label, Value};
use rillc_util::Symbol;

use crate::builtins;
use crate::error::RuntimeError;

/// A call frame: where to resume, and the caller's globals to restore.
struct Frame {
    return_ip: usize,
    saved_globals: IndexMap<Symbol, Value>,
}

/// The virtual machine.
///
/// One instance can execute many programs in sequence; `load` starts
/// fresh while `extend` appends a chunk and keeps the global table, which
/// is how the REPL carries state from line to line.
pub struct Vm {
    /// The loaded program.
    instrs: Vec<Instr>,

    /// Instruction pointer: index of the next instruction to execute.
    ip: usize,

    /// The value stack.
    stack: Vec<Value>,

    /// Flat name table. Insertion-ordered so dumps and tests are
    /// deterministic.
    globals: IndexMap<Symbol, Value>,

    /// Label positions, resolved at load time.
    labels: FxHashMap<Label, usize>,

    /// Arity recorded by the FUNC marker following each function label.
    arities: FxHashMap<Label, usize>,

    /// Call stack.
    frames: Vec<Frame>,

    /// Where `print` output goes.
    out: Box<dyn Write>,
}

impl Vm {
    /// Creates a VM printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates a VM printing to the given sink.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            instrs: Vec::new(),
            ip: 0,
            stack: Vec::new(),
            globals: IndexMap::new(),
            labels: FxHashMap::default(),
            arities: FxHashMap::default(),
            frames: Vec::new(),
            out,
        }
    }

    /// Replaces the program and resets all state, including globals.
    pub fn load(&mut self, instrs: Vec<Instr>) {
        self.instrs.clear();
        self.labels.clear();
        self.arities.clear();
        self.globals.clear();
        self.extend(instrs);
    }

    /// Appends a chunk of instructions and prepares to execute it.
    ///
    /// Labels in the chunk are indexed, the stack and call stack are
    /// cleared, and the instruction pointer is set to the chunk start.
    /// Globals are kept, and earlier chunks stay addressable, so function
    /// handles created by them remain callable.
    pub fn extend(&mut self, chunk: Vec<Instr>) {
        let base = self.instrs.len();
        for (offset, instr) in chunk.iter().enumerate() {
            if let Instr::Label(label) = instr {
                self.labels.insert(*label, base + offset);
                if let Some(Instr::Func { arity, .. }) = chunk.get(offset + 1) {
                    self.arities.insert(*label, *arity);
                }
            }
        }
        self.instrs.extend(chunk);
        self.ip = base;
        self.stack.clear();
        self.frames.clear();
    }

    /// Executes from the current instruction pointer until the end of the
    /// program or a runtime error.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while self.ip < self.instrs.len() {
            let instr = self.instrs[self.ip].clone();
            self.ip += 1;
            self.execute(instr)?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// The value bound to `name`, if any. Exposed for tests and tooling.
    pub fn global(&self, name: Symbol) -> Option<&Value> {
        self.globals.get(&name)
    }

    /// Current value stack depth. Exposed for tests.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn execute(&mut self, instr: Instr) -> Result<(), RuntimeError> {
        match instr {
            Instr::Const(value) => self.stack.push(value),
            Instr::Load(name) => {
                let value = self
                    .globals
                    .get(&name)
                    .cloned()
                    .ok_or(RuntimeError::UndefinedVariable(name))?;
                self.stack.push(value);
            }
            Instr::Store(name) => {
                let value = self.pop()?;
                self.globals.insert(name, value);
            }
            Instr::Pop => {
                self.pop()?;
            }
            Instr::Dup => {
                let value = self
                    .stack
                    .last()
                    .cloned()
                    .ok_or(RuntimeError::StackUnderflow)?;
                self.stack.push(value);
            }

            Instr::Add => {
                let b = self.pop()?;
                let a = self.pop()?;
                let result = match (a, b) {
                    (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
                    (Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
                    _ => return Err(RuntimeError::AddOperands),
                };
                self.stack.push(result);
            }
            Instr::Sub => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Number(a - b));
            }
            Instr::Mul => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Number(a * b));
            }
            Instr::Div => {
                let (a, b) = self.pop_numbers()?;
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                self.stack.push(Value::Number(a / b));
            }
            Instr::Neg => match self.pop()? {
                Value::Number(n) => self.stack.push(Value::Number(-n)),
                _ => return Err(RuntimeError::NumberOperand),
            },
            Instr::Not => {
                let value = self.pop()?;
                self.stack.push(Value::Bool(!value.is_truthy()));
            }

            Instr::Equal => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.stack.push(Value::Bool(a == b));
            }
            Instr::NotEqual => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.stack.push(Value::Bool(a != b));
            }
            Instr::Greater => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Bool(a > b));
            }
            Instr::GreaterEqual => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Bool(a >= b));
            }
            Instr::Less => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Bool(a < b));
            }
            Instr::LessEqual => {
                let (a, b) = self.pop_numbers()?;
                self.stack.push(Value::Bool(a <= b));
            }

            Instr::Print => {
                let value = self.pop()?;
                writeln!(self.out, "{value}")?;
            }

            Instr::Jmp(label) => {
                self.ip = self.label_target(label)?;
            }
            Instr::JmpFalse(label) => {
                // A missing label is fatal whether or not the branch is
                // taken.
                let target = self.label_target(label)?;
                let condition = self.pop()?;
                if !condition.is_truthy() {
                    self.ip = target;
                }
            }
            Instr::JmpTrue(label) => {
                let target = self.label_target(label)?;
                let condition = self.pop()?;
                if condition.is_truthy() {
                    self.ip = target;
                }
            }

            // Metadata only; positions were indexed at load time.
            Instr::Label(_) | Instr::Func { .. } => {}

            Instr::Param(name) => {
                let value = self.pop()?;
                self.globals.insert(name, value);
            }
            Instr::Call { name, argc } => self.call(name, argc)?,
            Instr::Return => {
                let result = self.pop()?;
                if let Some(frame) = self.frames.pop() {
                    let callee_globals =
                        std::mem::replace(&mut self.globals, frame.saved_globals);
                    // Names created during the call that did not exist at
                    // call time propagate back to the caller.
                    for (name, value) in callee_globals {
                        if !self.globals.contains_key(&name) {
                            self.globals.insert(name, value);
                        }
                    }
                    self.ip = frame.return_ip;
                }
                // At top level there is no frame to pop; the value just
                // stays on the stack.
                self.stack.push(result);
            }
        }
        Ok(())
    }

    fn call(&mut self, name: Symbol, argc: usize) -> Result<(), RuntimeError> {
        if let Some(Value::Fn(label)) = self.globals.get(&name) {
            let label = *label;
            let target = self.label_target(label)?;
            if let Some(&arity) = self.arities.get(&label) {
                if arity != argc {
                    return Err(RuntimeError::ArityMismatch {
                        name,
                        expected: arity,
                        found: argc,
                    });
                }
            }
            self.frames.push(Frame {
                return_ip: self.ip,
                saved_globals: self.globals.clone(),
            });
            self.ip = target;
            return Ok(());
        }

        if builtins::is_builtin(name.as_str()) {
            let result = builtins::call_builtin(name, argc, &mut self.stack, &mut self.out)?;
            self.stack.push(result);
            return Ok(());
        }

        if self.globals.contains_key(&name) {
            Err(RuntimeError::NotCallable(name))
        } else {
            Err(RuntimeError::UndefinedFunction(name))
        }
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    fn pop_numbers(&mut self) -> Result<(f64, f64), RuntimeError> {
        let b = self.pop()?;
        let a = self.pop()?;
        match (a, b) {
            (Value::Number(a), Value::Number(b)) => Ok((a, b)),
            _ => Err(RuntimeError::NumberOperands),
        }
    }

    fn label_target(&self, label: Label) -> Result<usize, RuntimeError> {
        self.labels
            .get(&label)
            .copied()
            .ok_or(RuntimeError::UnknownLabel(label))
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
