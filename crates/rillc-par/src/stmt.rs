//! Statement and declaration parsing.

use rillc_lex::TokenKind;

use crate::ast::{Expr, Lit, Stmt};
use crate::Parser;

/// Parameter and argument lists are capped; exceeding the cap is a
/// diagnostic but does not abort the parse.
pub(crate) const MAX_PARAMS: usize = 255;

impl<'a> Parser<'a> {
    /// `declaration := function | let | statement`
    pub(crate) fn parse_declaration(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::Function => {
                self.advance();
                self.parse_fn_decl()
            }
            TokenKind::Let => {
                self.advance();
                self.parse_let_stmt()
            }
            _ => self.parse_stmt(),
        }
    }

    /// `statement := for | if | print | return | while | block | exprStmt`
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::For => {
                self.advance();
                self.parse_for_stmt()
            }
            TokenKind::If => {
                self.advance();
                self.parse_if_stmt()
            }
            TokenKind::Print => {
                self.advance();
                self.parse_print_stmt()
            }
            TokenKind::Return => {
                self.advance();
                self.parse_return_stmt()
            }
            TokenKind::While => {
                self.advance();
                self.parse_while_stmt()
            }
            TokenKind::LBrace => {
                self.advance();
                Some(Stmt::Block(self.parse_block()?))
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// Function declaration, with the `function` keyword already consumed.
    fn parse_fn_decl(&mut self) -> Option<Stmt> {
        let (name, _) = self.expect_ident("Expect function name.")?;
        self.expect(TokenKind::LParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                if params.len() >= MAX_PARAMS {
                    self.error_at_current("Can't have more than 255 parameters.");
                }
                let (param, _) = self.expect_ident("Expect parameter name.")?;
                params.push(param);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expect ')' after parameters.")?;

        self.expect(TokenKind::LBrace, "Expect '{' before function body.")?;
        let body = self.parse_block()?;
        Some(Stmt::Function { name, params, body })
    }

    /// Variable declaration, with the `let` keyword already consumed.
    fn parse_let_stmt(&mut self) -> Option<Stmt> {
        let (name, _) = self.expect_ident("Expect variable name.")?;

        let initializer = if self.match_token(&TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Some(Stmt::Let { name, initializer })
    }

    /// `for` desugars to a `while` loop:
    /// `Block([init, While(cond, Block([body, Expression(incr)]))])`,
    /// with a missing condition replaced by `true`.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::LParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_token(&TokenKind::Semicolon) {
            None
        } else if self.match_token(&TokenKind::Let) {
            Some(self.parse_let_stmt()?)
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let condition = if !self.check(&TokenKind::Semicolon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(&TokenKind::RParen) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::RParen, "Expect ')' after for clauses.")?;

        let mut body = self.parse_stmt()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        let condition = condition.unwrap_or(Expr::Literal(Lit::Bool(true)));
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Some(body)
    }

    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::LParen, "Expect '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Some(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_print_stmt(&mut self) -> Option<Stmt> {
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after value.")?;
        Some(Stmt::Print(value))
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let keyword = self.previous().span;
        let value = if !self.check(&TokenKind::Semicolon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Some(Stmt::Return { keyword, value })
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::LParen, "Expect '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen, "Expect ')' after condition.")?;
        let body = Box::new(self.parse_stmt()?);

        Some(Stmt::While { condition, body })
    }

    /// Block body, with the `{` already consumed.
    ///
    /// A declaration that fails inside the block is dropped after
    /// synchronization, same as at top level.
    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_declaration() {
                Some(stmt) => statements.push(stmt),
                None => self.recover_to_sync_point(),
            }
        }

        self.expect(TokenKind::RBrace, "Expect '}' after block.")?;
        Some(statements)
    }

    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Some(Stmt::Expression(expr))
    }
}
