//! AST to IR lowering.
//!
//! Structured control flow becomes labels and conditional jumps;
//! short-circuit operators become `DUP`-and-branch sequences; function
//! declarations become a jump over the body plus a function-handle
//! constant bound to the function's name.
//!
//! Lowering is a single pass and never back-patches: jumps reference
//! symbolic labels that the VM resolves at load time.

use rillc_par::{BinOp, Expr, Lit, LogicalOp, Stmt, UnOp};
use rillc_util::Handler;

use crate::ir::{Instr, Label};
use crate::value::Value;

/// IR generator.
///
/// Fresh labels are unique per generator instance; reusing one generator
/// across several `generate` calls (as the REPL does) keeps later chunks
/// from colliding with labels already handed out.
#[derive(Default)]
pub struct IrGen {
    instrs: Vec<Instr>,
    next_label: u32,
}

impl IrGen {
    /// Creates a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowers `statements` to a flat instruction list, reporting lowering
    /// diagnostics to `handler`.
    pub fn generate(&mut self, statements: &[Stmt], handler: &Handler) -> Vec<Instr> {
        for stmt in statements {
            self.lower_stmt(stmt, handler);
        }
        std::mem::take(&mut self.instrs)
    }

    fn fresh_label(&mut self) -> Label {
        self.next_label += 1;
        Label(self.next_label)
    }

    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    fn lower_stmt(&mut self, stmt: &Stmt, handler: &Handler) {
        match stmt {
            Stmt::Expression(expr) => {
                self.lower_expr(expr, handler);
                self.emit(Instr::Pop);
            }
            Stmt::Print(expr) => {
                self.lower_expr(expr, handler);
                self.emit(Instr::Print);
            }
            Stmt::Let { name, initializer } => {
                match initializer {
                    Some(expr) => self.lower_expr(expr, handler),
                    // A bare `let` defaults to 0.
                    None => self.emit(Instr::Const(Value::Number(0.0))),
                }
                self.emit(Instr::Store(*name));
            }
            Stmt::Block(statements) => {
                for stmt in statements {
                    self.lower_stmt(stmt, handler);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let else_label = self.fresh_label();
                let end_label = self.fresh_label();

                self.lower_expr(condition, handler);
                self.emit(Instr::JmpFalse(else_label));
                self.lower_stmt(then_branch, handler);
                self.emit(Instr::Jmp(end_label));

                self.emit(Instr::Label(else_label));
                if let Some(else_branch) = else_branch {
                    self.lower_stmt(else_branch, handler);
                }
                self.emit(Instr::Label(end_label));
            }
            Stmt::While { condition, body } => {
                let start_label = self.fresh_label();
                let end_label = self.fresh_label();

                self.emit(Instr::Label(start_label));
                self.lower_expr(condition, handler);
                self.emit(Instr::JmpFalse(end_label));
                self.lower_stmt(body, handler);
                self.emit(Instr::Jmp(start_label));
                self.emit(Instr::Label(end_label));
            }
            Stmt::Function { name, params, body } => {
                let start_label = self.fresh_label();
                let end_label = self.fresh_label();

                // Jump over the body so declaration does not execute it.
                self.emit(Instr::Jmp(end_label));
                self.emit(Instr::Label(start_label));
                self.emit(Instr::Func {
                    name: *name,
                    arity: params.len(),
                });
                for param in params {
                    self.emit(Instr::Param(*param));
                }
                for stmt in body {
                    self.lower_stmt(stmt, handler);
                }
                // Implicit return for bodies that fall off the end.
                self.emit(Instr::Const(Value::Nil));
                self.emit(Instr::Return);

                self.emit(Instr::Label(end_label));
                // The function's runtime value is its start label.
                self.emit(Instr::Const(Value::Fn(start_label)));
                self.emit(Instr::Store(*name));
            }
            Stmt::Return { value, .. } => {
                match value {
                    Some(expr) => self.lower_expr(expr, handler),
                    None => self.emit(Instr::Const(Value::Nil)),
                }
                self.emit(Instr::Return);
            }
        }
    }

    fn lower_expr(&mut self, expr: &Expr, handler: &Handler) {
        match expr {
            Expr::Literal(lit) => {
                let value = match lit {
                    Lit::Nil => Value::Nil,
                    Lit::Bool(b) => Value::Bool(*b),
                    Lit::Number(n) => Value::Number(*n),
                    Lit::Str(s) => Value::Str(s.as_str().to_string()),
                };
                self.emit(Instr::Const(value));
            }
            Expr::Variable { name, .. } => {
                self.emit(Instr::Load(*name));
            }
            Expr::Grouping(inner) => self.lower_expr(inner, handler),
            Expr::Unary { op, rhs } => {
                self.lower_expr(rhs, handler);
                self.emit(match op {
                    UnOp::Neg => Instr::Neg,
                    UnOp::Not => Instr::Not,
                });
            }
            Expr::Binary { lhs, op, rhs } => {
                self.lower_expr(lhs, handler);
                self.lower_expr(rhs, handler);
                self.emit(match op {
                    BinOp::Add => Instr::Add,
                    BinOp::Sub => Instr::Sub,
                    BinOp::Mul => Instr::Mul,
                    BinOp::Div => Instr::Div,
                    BinOp::Equal => Instr::Equal,
                    BinOp::NotEqual => Instr::NotEqual,
                    BinOp::Greater => Instr::Greater,
                    BinOp::GreaterEqual => Instr::GreaterEqual,
                    BinOp::Less => Instr::Less,
                    BinOp::LessEqual => Instr::LessEqual,
                });
            }
            Expr::Logical { lhs, op, rhs } => {
                // The left value doubles as the result when it decides the
                // outcome, hence the DUP before the branch.
                let end_label = self.fresh_label();
                self.lower_expr(lhs, handler);
                self.emit(Instr::Dup);
                self.emit(match op {
                    LogicalOp::Or => Instr::JmpTrue(end_label),
                    LogicalOp::And => Instr::JmpFalse(end_label),
                });
                self.emit(Instr::Pop);
                self.lower_expr(rhs, handler);
                self.emit(Instr::Label(end_label));
            }
            Expr::Assign { name, value, .. } => {
                // Assignment is an expression; DUP keeps the assigned
                // value as the result.
                self.lower_expr(value, handler);
                self.emit(Instr::Dup);
                self.emit(Instr::Store(*name));
            }
            Expr::Call {
                callee,
                paren,
                args,
            } => {
                let Expr::Variable { name, .. } = &**callee else {
                    handler.error("Can only call named functions.", *paren);
                    self.emit(Instr::Const(Value::Nil));
                    return;
                };

                // Arguments are emitted in reverse source order so the
                // first argument ends up on top of the stack, where the
                // callee's first PARAM pops it.
                for arg in args.iter().rev() {
                    self.lower_expr(arg, handler);
                }
                self.emit(Instr::Call {
                    name: *name,
                    argc: args.len(),
                });
            }
        }
    }
}
