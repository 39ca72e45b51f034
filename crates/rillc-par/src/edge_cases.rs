//! Edge case tests for rillc-par.

use rillc_lex::tokenize;
use rillc_util::{Handler, Symbol};

use crate::ast::{Expr, Lit, Stmt};
use crate::Parser;

fn parse(source: &str) -> (Vec<Stmt>, Handler) {
    let handler = Handler::new();
    let tokens = tokenize(source, &handler);
    let statements = Parser::new(tokens, &handler).parse();
    (statements, handler)
}

fn parse_ok(source: &str) -> Vec<Stmt> {
    let (statements, handler) = parse(source);
    assert!(
        !handler.has_errors(),
        "unexpected errors: {:?}",
        handler.diagnostics()
    );
    statements
}

fn messages(handler: &Handler) -> Vec<String> {
    handler.diagnostics().into_iter().map(|d| d.message).collect()
}

#[test]
fn test_empty_program() {
    assert!(parse_ok("").is_empty());
}

#[test]
fn test_let_without_initializer() {
    let statements = parse_ok("let x;");
    assert_eq!(
        statements,
        vec![Stmt::Let {
            name: Symbol::intern("x"),
            initializer: None
        }]
    );
}

#[test]
fn test_if_without_else() {
    let statements = parse_ok("if (true) print 1;");
    match &statements[0] {
        Stmt::If { else_branch, .. } => assert!(else_branch.is_none()),
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_else_binds_to_nearest_if() {
    let statements = parse_ok("if (a) if (b) print 1; else print 2;");
    match &statements[0] {
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(else_branch.is_none());
            assert!(matches!(
                **then_branch,
                Stmt::If {
                    else_branch: Some(_),
                    ..
                }
            ));
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_for_desugars_to_while() {
    let statements = parse_ok("for (let i = 0; i < 3; i = i + 1) print i;");
    // Block([Let, While(cond, Block([Print, Expression(increment)]))])
    match &statements[0] {
        Stmt::Block(parts) => {
            assert_eq!(parts.len(), 2);
            assert!(matches!(parts[0], Stmt::Let { .. }));
            match &parts[1] {
                Stmt::While { body, .. } => match &**body {
                    Stmt::Block(inner) => {
                        assert_eq!(inner.len(), 2);
                        assert!(matches!(inner[0], Stmt::Print(_)));
                        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
                    }
                    other => panic!("expected block body, got {other:?}"),
                },
                other => panic!("expected while, got {other:?}"),
            }
        }
        other => panic!("expected block, got {other:?}"),
    }
}

#[test]
fn test_for_with_empty_clauses() {
    // No initializer, no condition, no increment: bare While(true, body).
    let statements = parse_ok("for (;;) print 1;");
    match &statements[0] {
        Stmt::While { condition, body } => {
            assert_eq!(*condition, Expr::Literal(Lit::Bool(true)));
            assert!(matches!(**body, Stmt::Print(_)));
        }
        other => panic!("expected while, got {other:?}"),
    }
}

#[test]
fn test_for_without_initializer_has_no_outer_block() {
    let statements = parse_ok("for (; i < 3;) print i;");
    assert!(matches!(statements[0], Stmt::While { .. }));
}

#[test]
fn test_return_without_value() {
    let statements = parse_ok("function f() { return; }");
    match &statements[0] {
        Stmt::Function { body, .. } => {
            assert!(matches!(body[0], Stmt::Return { value: None, .. }));
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn test_function_with_params() {
    let statements = parse_ok("function add(a, b) { return a + b; }");
    match &statements[0] {
        Stmt::Function { name, params, body } => {
            assert_eq!(*name, Symbol::intern("add"));
            assert_eq!(
                params,
                &vec![Symbol::intern("a"), Symbol::intern("b")]
            );
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected function, got {other:?}"),
    }
}

#[test]
fn test_nested_blocks() {
    let statements = parse_ok("{ { print 1; } }");
    match &statements[0] {
        Stmt::Block(outer) => assert!(matches!(outer[0], Stmt::Block(_))),
        other => panic!("expected block, got {other:?}"),
    }
}

#[test]
fn test_missing_semicolon_reports_spec_format() {
    let (_, handler) = parse("print 1");
    assert_eq!(
        messages(&handler),
        vec!["Error at end: Expect ';' after value.".to_string()]
    );
}

#[test]
fn test_error_at_lexeme_format() {
    let (_, handler) = parse("let 1 = 2;");
    assert_eq!(
        messages(&handler),
        vec!["Error at '1': Expect variable name.".to_string()]
    );
}

#[test]
fn test_invalid_assignment_target() {
    let (statements, handler) = parse("1 + 2 = 3;");
    assert_eq!(
        messages(&handler),
        vec!["Error at '=': Invalid assignment target.".to_string()]
    );
    // Recovery: the statement survives with the LHS as its value.
    assert_eq!(statements.len(), 1);
    assert!(matches!(
        statements[0],
        Stmt::Expression(Expr::Binary { .. })
    ));
}

#[test]
fn test_synchronize_recovers_at_semicolon() {
    let (statements, handler) = parse("let = 5; print 2;");
    assert!(handler.has_errors());
    // The broken declaration is dropped, the next one parses.
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], Stmt::Print(_)));
}

#[test]
fn test_synchronize_recovers_at_statement_keyword() {
    let (statements, handler) = parse("let x + while (false) print 1; print 2;");
    assert!(handler.has_errors());
    // Recovery stops in front of `while`; both statements after the broken
    // declaration survive.
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], Stmt::While { .. }));
    assert!(matches!(statements[1], Stmt::Print(_)));
}

#[test]
fn test_multiple_errors_all_reported() {
    let (_, handler) = parse("let; print 1; let; print 2;");
    assert_eq!(handler.error_count(), 2);
}

#[test]
fn test_statements_before_error_are_kept() {
    let (statements, handler) = parse("print 1; )");
    assert!(handler.has_errors());
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_too_many_arguments_is_reported_but_not_fatal() {
    let args = (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let (statements, handler) = parse(&format!("f({args});"));
    assert!(messages(&handler)
        .iter()
        .any(|m| m.contains("Can't have more than 255 arguments.")));
    // The call still parses, with all arguments present.
    match &statements[0] {
        Stmt::Expression(Expr::Call { args, .. }) => assert_eq!(args.len(), 256),
        other => panic!("expected call, got {other:?}"),
    }
}

#[test]
fn test_too_many_parameters_is_reported_but_not_fatal() {
    let params = (0..256).map(|i| format!("p{i}")).collect::<Vec<_>>().join(", ");
    let (statements, handler) = parse(&format!("function big({params}) {{ return; }}"));
    assert!(messages(&handler)
        .iter()
        .any(|m| m.contains("Can't have more than 255 parameters.")));
    assert!(matches!(statements[0], Stmt::Function { .. }));
}

#[test]
fn test_unclosed_paren_at_eof() {
    let (_, handler) = parse("print (1 + 2");
    assert!(messages(&handler)[0].starts_with("Error at end:"));
}

#[test]
fn test_invalid_token_from_lexer_fails_parse() {
    let (statements, handler) = parse("let x = @;");
    // One lex error for '@' and one parse error at the invalid token.
    assert!(handler.error_count() >= 2);
    assert!(statements.is_empty());
}

#[test]
fn test_keyword_as_variable_name_fails() {
    let (_, handler) = parse("let while = 1;");
    assert_eq!(
        messages(&handler),
        vec!["Error at 'while': Expect variable name.".to_string()]
    );
}

#[test]
fn test_block_error_drops_only_broken_declaration() {
    let (statements, handler) = parse("{ let = 1; print 2; }");
    assert!(handler.has_errors());
    match &statements[0] {
        Stmt::Block(inner) => {
            assert_eq!(inner.len(), 1);
            assert!(matches!(inner[0], Stmt::Print(_)));
        }
        other => panic!("expected block, got {other:?}"),
    }
}
