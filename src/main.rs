//! hackasm CLI - assembles Hack macro assembly to binary.
//!
//! Usage:
//!     hackasm <file.asm>...
//!     hackasm Prog.asm -o out/Prog.hack
//!     hackasm Prog.asm --emit expanded

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use hackasm::{assemble_file, expand_file};
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// 16-bit machine words, one per line (.hack)
    Binary,
    /// Canonical assembly after macro expansion (.expanded.asm)
    Expanded,
}

#[derive(Parser, Debug)]
#[command(name = "hackasm")]
#[command(version)]
#[command(about = "Hack assembler with shorthand macro expansion")]
#[command(author = "nand2tetris")]
struct Args {
    /// Assembly source files
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Output file (only with a single input; defaults to <FILE>.hack)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to write
    #[arg(long, value_enum, default_value_t = Emit::Binary)]
    emit: Emit,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn default_output(input: &Path, emit: Emit) -> PathBuf {
    match emit {
        Emit::Binary => input.with_extension("hack"),
        Emit::Expanded => input.with_extension("expanded.asm"),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    if args.output.is_some() && args.files.len() > 1 {
        tracing::error!("--output requires exactly one input file");
        return ExitCode::from(2);
    }

    let mut errors = 0;

    for input in &args.files {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output(input, args.emit));
        let start = Instant::now();

        let result = match args.emit {
            Emit::Binary => assemble_file(input, &output),
            Emit::Expanded => expand_file(input, &output),
        };

        match result {
            Ok(count) => {
                tracing::debug!(
                    lines = count,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "assembled {}",
                    input.display()
                );
                println!("{} -> {}", input.display(), output.display());
            }
            Err(e) => {
                tracing::error!(file = %input.display(), line = e.line(), "{e}");
                errors += 1;
            }
        }
    }

    if errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
