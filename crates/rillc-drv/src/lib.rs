//! rillc-drv - Driver for the Rill toolchain.
//!
//! Wires the stages together: lex → parse → lower → execute. Two modes:
//! batch (run a script file) and interactive (one evaluation per line,
//! same VM throughout, so globals and function definitions persist).
//!
//! Diagnostics accumulated during compilation are printed to stderr;
//! execution is suppressed only when the parser produced no statements at
//! all. Runtime errors are printed with a `Runtime Error:` prefix and end
//! the current execution, not the process.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use rillc_ir::IrGen;
use rillc_lex::tokenize;
use rillc_par::Parser;
use rillc_util::Handler;
use rillc_vm::Vm;

/// Which stage to stop after when emitting intermediate output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emit {
    /// Lexer output.
    Tokens,
    /// Parser output.
    Ast,
    /// IR generator output.
    Ir,
}

/// How one source unit fared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Executed to completion.
    Completed,
    /// Compile errors suppressed execution (no statements parsed).
    CompileError,
    /// Execution started and hit a runtime error.
    RuntimeError,
}

/// An interactive-or-batch evaluation session.
///
/// Owns the VM and one IR generator. Reusing the generator keeps labels
/// unique across evaluations, so function handles created by earlier
/// lines stay valid; the VM appends each new chunk and keeps globals.
pub struct Session {
    vm: Vm,
    gen: IrGen,
}

impl Session {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// A session printing to the given sink.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            vm: Vm::with_output(out),
            gen: IrGen::new(),
        }
    }

    /// Compiles and executes one source unit.
    ///
    /// Compile diagnostics go to stderr. Execution runs whenever the
    /// parser produced at least one statement, matching the accumulate-
    /// and-continue error policy of the front end.
    pub fn run_source(&mut self, source: &str) -> Outcome {
        let handler = Handler::new();

        let tokens = tokenize(source, &handler);
        debug!(tokens = tokens.len(), "lexed");

        let statements = Parser::new(tokens, &handler).parse();
        debug!(statements = statements.len(), "parsed");

        if statements.is_empty() {
            report_diagnostics(&handler);
            return if handler.has_errors() {
                Outcome::CompileError
            } else {
                Outcome::Completed
            };
        }

        let instrs = self.gen.generate(&statements, &handler);
        debug!(instructions = instrs.len(), "lowered");
        report_diagnostics(&handler);

        self.vm.extend(instrs);
        match self.vm.run() {
            Ok(()) => Outcome::Completed,
            Err(err) => {
                eprintln!("Runtime Error: {err}");
                Outcome::RuntimeError
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a script file.
///
/// Compile and runtime errors are reported but do not produce an `Err`;
/// only failing to read the file does.
pub fn run_file(path: &Path, emit: Option<Emit>) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("could not read script '{}'", path.display()))?;

    if let Some(stage) = emit {
        let stdout = io::stdout();
        emit_stage(&source, stage, &mut stdout.lock())?;
        return Ok(());
    }

    let mut session = Session::new();
    session.run_source(&source);
    Ok(())
}

/// Runs the interactive prompt.
///
/// Each non-empty line is one evaluation; an empty line or end of input
/// exits. Errors of any kind are reported and the prompt resumes.
pub fn run_prompt() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() {
            break;
        }

        session.run_source(line);
    }

    Ok(())
}

/// Compiles `source` up to `stage` and pretty-prints that stage's output.
pub fn emit_stage(source: &str, stage: Emit, out: &mut dyn Write) -> anyhow::Result<()> {
    let handler = Handler::new();

    let tokens = tokenize(source, &handler);
    if stage == Emit::Tokens {
        for token in &tokens {
            writeln!(out, "{:>4}  {:?}", token.span.line, token.kind)?;
        }
        report_diagnostics(&handler);
        return Ok(());
    }

    let statements = Parser::new(tokens, &handler).parse();
    if stage == Emit::Ast {
        writeln!(out, "{statements:#?}")?;
        report_diagnostics(&handler);
        return Ok(());
    }

    let instrs = IrGen::new().generate(&statements, &handler);
    for (index, instr) in instrs.iter().enumerate() {
        writeln!(out, "{index:3}: {instr}")?;
    }
    report_diagnostics(&handler);
    Ok(())
}

fn report_diagnostics(handler: &Handler) {
    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic.message);
    }
}
