//! The `rill` binary.
//!
//! `rill [script]` runs a file; with no arguments it starts the
//! interactive prompt. More than one script is a usage error (exit code
//! 64). Reported lex, parse, and runtime errors do not change the exit
//! code; only failing to start (unreadable file, bad flags) does.

use std::path::PathBuf;
use std::process;

use anyhow::anyhow;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rillc_drv::{run_file, run_prompt, Emit};

/// Interpreter for the Rill scripting language.
#[derive(Parser, Debug)]
#[command(name = "rill")]
#[command(version)]
#[command(about = "Interpreter for the Rill scripting language", long_about = None)]
struct Cli {
    /// Script to run; omit to start the interactive prompt
    script: Option<PathBuf>,

    /// Stop after the named stage and print its output
    #[arg(long, value_enum, value_name = "STAGE")]
    emit: Option<EmitArg>,

    /// Enable verbose logging
    #[arg(short, long, env = "RILL_VERBOSE")]
    verbose: bool,
}

/// CLI spelling of the emit stages.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum EmitArg {
    Tokens,
    Ast,
    Ir,
}

impl From<EmitArg> for Emit {
    fn from(arg: EmitArg) -> Self {
        match arg {
            EmitArg::Tokens => Emit::Tokens,
            EmitArg::Ast => Emit::Ast,
            EmitArg::Ir => Emit::Ir,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // Extra positional arguments are the classic usage error.
        Err(err) if err.kind() == ErrorKind::UnknownArgument => {
            eprintln!("Usage: rill [script]");
            process::exit(64);
        }
        Err(err) => err.exit(),
    };

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("error: {err}");
        process::exit(1);
    }

    let result = match cli.script {
        Some(path) => run_file(&path, cli.emit.map(Into::into)),
        None => run_prompt(),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

/// Initializes tracing to stderr. `RUST_LOG` overrides the default
/// level; `--verbose` forces `debug`.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
