//! Expression parsing.
//!
//! Expressions use a Pratt loop: each infix operator has a pair of
//! binding powers, and a single recursive function handles the entire
//! precedence ladder. Assignment sits above the loop because its target
//! needs validating rather than evaluating.
//!
//! Binding powers, loosest to tightest (left-associative pairs):
//!
//! | Operator            | (lbp, rbp) |
//! |---------------------|------------|
//! | `or`                | (1, 2)     |
//! | `and`               | (3, 4)     |
//! | `==` `!=`           | (5, 6)     |
//! | `<` `<=` `>` `>=`   | (7, 8)     |
//! | `+` `-`             | (9, 10)    |
//! | `*` `/`             | (11, 12)   |
//! | unary `!` `-`       | rbp 13     |
//!
//! Calls bind tighter than unary and are handled as a postfix loop.

use rillc_lex::TokenKind;

use crate::ast::{BinOp, Expr, Lit, LogicalOp, UnOp};
use crate::Parser;

/// Binding power of the operand of a prefix operator. Tighter than every
/// binary operator so `-a * b` parses as `(-a) * b`.
const UNARY_BP: u8 = 13;

// Argument lists share the parameter cap.
use crate::stmt::MAX_PARAMS as MAX_ARGS;

impl<'a> Parser<'a> {
    /// Parses an expression.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    /// Assignment is right-associative and only valid when the target is
    /// a plain variable. On an invalid target the error is reported and
    /// the left-hand side stands as the expression's value.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_expr_with_min_bp(0)?;

        if self.match_token(&TokenKind::Equal) {
            let equals = self.previous().clone();
            let value = self.parse_assignment()?;

            if let Expr::Variable { name, span } = expr {
                return Some(Expr::Assign {
                    name,
                    span,
                    value: Box::new(value),
                });
            }

            self.error_at_token(&equals, "Invalid assignment target.");
            return Some(expr);
        }

        Some(expr)
    }

    /// The Pratt loop: parse a prefix expression, then fold in infix
    /// operators whose left binding power reaches `min_bp`.
    fn parse_expr_with_min_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let (lbp, rbp) = match self.infix_binding_power() {
                Some(bp) if bp.0 >= min_bp => bp,
                _ => break,
            };
            debug_assert!(lbp < rbp, "infix operators are left-associative");

            let op = self.current().kind.clone();
            self.advance();

            let rhs = self.parse_expr_with_min_bp(rbp)?;
            lhs = combine(lhs, &op, rhs);
        }

        Some(lhs)
    }

    /// Binding powers for the token at the current position, if it is an
    /// infix operator.
    fn infix_binding_power(&self) -> Option<(u8, u8)> {
        match self.current().kind {
            TokenKind::Or => Some((1, 2)),
            TokenKind::And => Some((3, 4)),
            TokenKind::EqualEqual | TokenKind::BangEqual => Some((5, 6)),
            TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => Some((7, 8)),
            TokenKind::Plus | TokenKind::Minus => Some((9, 10)),
            TokenKind::Star | TokenKind::Slash => Some((11, 12)),
            _ => None,
        }
    }

    /// Prefix position: a unary operator or an atom with postfix calls.
    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current().kind {
            TokenKind::Bang => {
                self.advance();
                let rhs = self.parse_expr_with_min_bp(UNARY_BP)?;
                Some(Expr::Unary {
                    op: UnOp::Not,
                    rhs: Box::new(rhs),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let rhs = self.parse_expr_with_min_bp(UNARY_BP)?;
                Some(Expr::Unary {
                    op: UnOp::Neg,
                    rhs: Box::new(rhs),
                })
            }
            _ => {
                let atom = self.parse_primary()?;
                self.parse_postfix(atom)
            }
        }
    }

    /// Postfix position: zero or more call suffixes.
    fn parse_postfix(&mut self, mut expr: Expr) -> Option<Expr> {
        while self.match_token(&TokenKind::LParen) {
            expr = self.finish_call(expr)?;
        }
        Some(expr)
    }

    /// Argument list and closing paren, with the `(` already consumed.
    fn finish_call(&mut self, callee: Expr) -> Option<Expr> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                if args.len() >= MAX_ARGS {
                    self.error_at_current("Can't have more than 255 arguments.");
                }
                args.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.expect(TokenKind::RParen, "Expect ')' after arguments.")?;
        Some(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    /// Literals, variables, and grouping.
    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::False => {
                self.advance();
                Some(Expr::Literal(Lit::Bool(false)))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::Literal(Lit::Bool(true)))
            }
            TokenKind::Nil => {
                self.advance();
                Some(Expr::Literal(Lit::Nil))
            }
            TokenKind::Number(value) => {
                self.advance();
                Some(Expr::Literal(Lit::Number(value)))
            }
            TokenKind::Str(value) => {
                self.advance();
                Some(Expr::Literal(Lit::Str(value)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Some(Expr::Variable {
                    name,
                    span: token.span,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "Expect ')' after expression.")?;
                Some(Expr::Grouping(Box::new(inner)))
            }
            _ => {
                self.error_at_current("Expect expression.");
                None
            }
        }
    }
}

fn combine(lhs: Expr, op: &TokenKind, rhs: Expr) -> Expr {
    let logical = match op {
        TokenKind::Or => Some(LogicalOp::Or),
        TokenKind::And => Some(LogicalOp::And),
        _ => None,
    };
    if let Some(op) = logical {
        return Expr::Logical {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        };
    }

    let op = match op {
        TokenKind::EqualEqual => BinOp::Equal,
        TokenKind::BangEqual => BinOp::NotEqual,
        TokenKind::Greater => BinOp::Greater,
        TokenKind::GreaterEqual => BinOp::GreaterEqual,
        TokenKind::Less => BinOp::Less,
        TokenKind::LessEqual => BinOp::LessEqual,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        _ => unreachable!("infix_binding_power admits only infix operators"),
    };
    Expr::Binary {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    }
}
