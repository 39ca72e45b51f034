//! Edge case tests for rillc-vm: full lex → parse → lower → run pipelines
//! with captured output.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use rillc_ir::IrGen;
use rillc_lex::tokenize;
use rillc_par::Parser;
use rillc_util::{Handler, Symbol};

use crate::{RuntimeError, Value, Vm};

/// A `Write` sink that can be read back after the VM is done with it.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output is UTF-8")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run(source: &str) -> (Vm, String) {
    let (vm, output, result) = run_raw(source);
    result.expect("program should run cleanly");
    (vm, output.contents())
}

fn run_fail(source: &str) -> (RuntimeError, String) {
    let (_, output, result) = run_raw(source);
    (
        result.expect_err("program should fail at runtime"),
        output.contents(),
    )
}

fn run_raw(source: &str) -> (Vm, SharedBuf, Result<(), RuntimeError>) {
    let handler = Handler::new();
    let tokens = tokenize(source, &handler);
    let statements = Parser::new(tokens, &handler).parse();
    assert!(
        !handler.has_errors(),
        "unexpected compile errors: {:?}",
        handler.diagnostics()
    );
    let instrs = IrGen::new().generate(&statements, &handler);

    let output = SharedBuf::default();
    let mut vm = Vm::with_output(Box::new(output.clone()));
    vm.load(instrs);
    let result = vm.run();
    (vm, output, result)
}

fn sym(name: &str) -> Symbol {
    Symbol::intern(name)
}

#[test]
fn test_arithmetic_precedence() {
    let (_, output) = run("print 1 + 2 * 3;");
    assert_eq!(output, "7\n");
}

#[test]
fn test_grouping_and_variables() {
    let (_, output) = run("let a = 2; let b = 3; print a * (a + b);");
    assert_eq!(output, "10\n");
}

#[test]
fn test_while_loop() {
    let (_, output) = run("let i = 0; while (i < 3) { print i; i = i + 1; }");
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn test_if_else() {
    let (_, output) = run("if (1 < 2) print \"yes\"; else print \"no\";");
    assert_eq!(output, "yes\n");
}

#[test]
fn test_for_loop() {
    let (_, output) = run("for (let i = 0; i < 3; i = i + 1) print i;");
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn test_function_call() {
    let (_, output) = run("function sq(x) { return x * x; } print sq(5);");
    assert_eq!(output, "25\n");
}

#[test]
fn test_two_parameter_function_argument_order() {
    let (_, output) = run("function f(a, b) { return a - b; } print f(10, 3);");
    assert_eq!(output, "7\n");
}

#[test]
fn test_recursion() {
    // Recursion works because each call snapshots the caller's globals
    // and the return restores them.
    let (_, output) = run(
        "function fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(10);",
    );
    assert_eq!(output, "55\n");
}

#[test]
fn test_function_without_return_yields_nil() {
    let (_, output) = run("function noop() { let x = 1; } print noop();");
    assert_eq!(output, "nil\n");
}

#[test]
fn test_or_short_circuit_skips_side_effects() {
    let (_, output) = run(
        "let x = 0; function bump() { x = 1; return true; } true or bump(); print x;",
    );
    assert_eq!(output, "0\n");
}

#[test]
fn test_and_short_circuit_skips_side_effects() {
    let (_, output) = run(
        "let x = 0; function bump() { x = 1; return true; } false and bump(); print x;",
    );
    assert_eq!(output, "0\n");
}

#[test]
fn test_or_evaluates_rhs_when_lhs_falsy() {
    let (_, output) = run(
        "let x = 0; function bump() { x = 1; return true; } nil or bump(); print x;",
    );
    assert_eq!(output, "1\n");
}

#[test]
fn test_logical_operators_yield_operand_values() {
    let (_, output) = run("print 1 or 2; print nil or 2; print 1 and 2; print false and 2;");
    assert_eq!(output, "1\n2\n2\nfalse\n");
}

#[test]
fn test_assignment_is_an_expression() {
    let (_, output) = run("let a = 1; let b = 2; print a = b = 5; print a; print b;");
    assert_eq!(output, "5\n5\n5\n");
}

#[test]
fn test_top_level_let_survives_call() {
    let (vm, output) = run(
        "let a = 1; function f() { return 2; } f(); print a;",
    );
    assert_eq!(output, "1\n");
    assert_eq!(vm.global(sym("a")), Some(&Value::Number(1.0)));
}

#[test]
fn test_let_inside_function_propagates_when_new() {
    // The documented flat-globals rule: a name first bound during a call
    // stays bound afterwards.
    let (vm, _) = run("function f() { let created = 7; return 0; } f();");
    assert_eq!(vm.global(sym("created")), Some(&Value::Number(7.0)));
}

#[test]
fn test_let_inside_function_does_not_clobber_existing() {
    let (_, output) = run(
        "let a = 1; function f() { let a = 99; return a; } print f(); print a;",
    );
    assert_eq!(output, "99\n1\n");
}

#[test]
fn test_arity_mismatch_produces_error_not_output() {
    let (err, output) = run_fail("function g(x) { return x; } print g(1, 2);");
    assert!(matches!(
        err,
        RuntimeError::ArityMismatch {
            expected: 1,
            found: 2,
            ..
        }
    ));
    // The mismatch is detected at the call, before anything prints.
    assert_eq!(output, "");
}

#[test]
fn test_division_by_zero_is_fatal() {
    let (err, _) = run_fail("print 1 / 0;");
    assert!(matches!(err, RuntimeError::DivisionByZero));
}

#[test]
fn test_undefined_variable_is_fatal() {
    let (err, _) = run_fail("print ghost;");
    assert!(matches!(err, RuntimeError::UndefinedVariable(_)));
}

#[test]
fn test_undefined_function_is_fatal() {
    let (err, _) = run_fail("ghost();");
    assert!(matches!(err, RuntimeError::UndefinedFunction(_)));
}

#[test]
fn test_output_before_error_is_kept() {
    let (err, output) = run_fail("print 1; print 2; print ghost;");
    assert!(matches!(err, RuntimeError::UndefinedVariable(_)));
    assert_eq!(output, "1\n2\n");
}

#[test]
fn test_string_concatenation_end_to_end() {
    let (_, output) = run("print \"foo\" + \"bar\";");
    assert_eq!(output, "foobar\n");
}

#[test]
fn test_number_formatting() {
    let (_, output) = run("print 7; print 2.5; print 10 / 4; print -0.5;");
    assert_eq!(output, "7\n2.5\n2.5\n-0.5\n");
}

#[test]
fn test_truthiness_in_conditions() {
    let (_, output) = run(
        "if (0) print \"zero\"; if (\"\") print \"empty\"; if (nil) print \"nil\"; else print \"no nil\";",
    );
    assert_eq!(output, "zero\nempty\nno nil\n");
}

#[test]
fn test_clock_is_callable_from_source() {
    let (_, output) = run("let t = clock(); print t >= 0;");
    assert_eq!(output, "true\n");
}

#[test]
fn test_stack_is_balanced_after_each_statement() {
    let (vm, _) = run(
        "let a = 1; a = a + 1; print a; if (a == 2) print \"two\"; while (a < 4) a = a + 1;",
    );
    assert_eq!(vm.stack_depth(), 0);
}

#[test]
fn test_nested_function_definition_on_call() {
    // Declaring a function inside a function binds the inner name when
    // the outer one runs, under the new-globals rule.
    let (_, output) = run(
        "function outer() { function inner() { return 5; } return inner(); } print outer(); print inner();",
    );
    assert_eq!(output, "5\n5\n");
}
