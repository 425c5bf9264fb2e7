//! Hack Macro Assembler
//!
//! Translates Hack assembly, extended with a small set of shorthand forms, to
//! 16-bit binary machine code.
//!
//! # Pipeline
//!
//! 1. Normalize: strip comments and whitespace, drop blank lines.
//! 2. Expand: rewrite shorthand (`i++`, `x=y`, `D;JGT:END`, ...) into
//!    canonical instructions.
//! 3. Resolve: one pass that binds labels and variables.
//! 4. Generate: a second pass that emits one 16-character word per
//!    instruction.
//!
//! The resolve pass always completes before generation starts, so labels can
//! be referenced before they are declared.

pub mod codegen;
pub mod error;
pub mod macros;
pub mod normalize;
pub mod parser;
pub mod symbols;
pub mod tables;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codegen::HackCodeGen;
pub use crate::error::{AsmError, Result};
pub use crate::macros::CanonicalLine;
use crate::macros::expand;
use crate::normalize::source_lines;
pub use crate::symbols::SymbolTable;

/// Normalize and macro-expand a source text into canonical instructions.
pub fn expand_source(source: &str) -> Vec<CanonicalLine<'_>> {
    let canonical = expand(source_lines(source));
    debug!(
        source_lines = source.lines().count(),
        canonical = canonical.len(),
        "macro expansion complete"
    );
    canonical
}

/// Assemble a source text into one binary word per instruction.
pub fn assemble_lines(source: &str) -> Result<Vec<String>> {
    let canonical = expand_source(source);

    // Pass 1: symbol table
    let symbols = SymbolTable::build(&canonical)?;

    // Pass 2: code generation
    HackCodeGen::hack().generate(&canonical, &symbols)
}

/// Assemble Hack assembly source to newline-separated binary.
pub fn assemble(source: &str) -> Result<String> {
    Ok(assemble_lines(source)?.join("\n"))
}

/// Assemble `input` and write the binary to `output`.
///
/// Returns the number of words written. Nothing is written if assembly
/// fails.
pub fn assemble_file(input: &Path, output: &Path) -> Result<usize> {
    let source = fs::read_to_string(input).map_err(|e| AsmError::io(input, e))?;
    let words = assemble_lines(&source)?;

    let mut text = String::with_capacity(words.len() * 17);
    for word in &words {
        text.push_str(word);
        text.push('\n');
    }
    fs::write(output, text).map_err(|e| AsmError::io(output, e))?;

    Ok(words.len())
}

/// Expand `input` and write the canonical assembly to `output`.
///
/// Returns the number of canonical lines written.
pub fn expand_file(input: &Path, output: &Path) -> Result<usize> {
    let source = fs::read_to_string(input).map_err(|e| AsmError::io(input, e))?;
    let canonical = expand_source(&source);

    let mut text = String::new();
    for line in &canonical {
        text.push_str(&line.text);
        text.push('\n');
    }
    fs::write(output, text).map_err(|e| AsmError::io(output, e))?;

    Ok(canonical.len())
}
