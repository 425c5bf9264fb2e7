//! Error types for assembly.
//!
//! Every translation error names the 1-based source line it came from and the
//! raw text of that line, even when the failing instruction was produced by
//! macro expansion.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("line {line}: cannot parse line: {text}")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: symbol '{symbol}' cannot start with a digit: {text}")]
    InvalidLabel {
        line: usize,
        text: String,
        symbol: String,
    },

    #[error("line {line}: duplicate label: {label}")]
    DuplicateLabel {
        line: usize,
        text: String,
        label: String,
    },

    #[error("line {line}: address cannot be negative: {text}")]
    NegativeLiteral { line: usize, text: String },

    #[error("line {line}: address {value} does not fit in 15 bits: {text}")]
    Overflow {
        line: usize,
        text: String,
        value: String,
    },

    #[error("line {line}: invalid dest field '{mnemonic}': {text}")]
    InvalidDest {
        line: usize,
        text: String,
        mnemonic: String,
    },

    #[error("line {line}: invalid comp field '{mnemonic}': {text}")]
    InvalidComp {
        line: usize,
        text: String,
        mnemonic: String,
    },

    #[error("line {line}: invalid jump field '{mnemonic}': {text}")]
    InvalidJump {
        line: usize,
        text: String,
        mnemonic: String,
    },

    #[error("line {line}: unresolved symbol '{symbol}': {text}")]
    UnresolvedSymbol {
        line: usize,
        text: String,
        symbol: String,
    },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AsmError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            AsmError::MalformedLine { line, .. }
            | AsmError::InvalidLabel { line, .. }
            | AsmError::DuplicateLabel { line, .. }
            | AsmError::NegativeLiteral { line, .. }
            | AsmError::Overflow { line, .. }
            | AsmError::InvalidDest { line, .. }
            | AsmError::InvalidComp { line, .. }
            | AsmError::InvalidJump { line, .. }
            | AsmError::UnresolvedSymbol { line, .. } => Some(*line),
            AsmError::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AsmError>;
