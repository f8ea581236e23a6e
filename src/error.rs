use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building, querying or transforming protein sequences and
/// their collections.
#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("invalid character `{symbol}` for protein sequence{}", fmt_position(.position))]
    InvalidCharacter {
        symbol: char,
        position: Option<usize>,
    },

    #[error("a protein character must be exactly one symbol, got `{0}`")]
    InvalidSymbolCount(String),

    #[error("position {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("sequences must be aligned (equal length including gaps) to {0}")]
    NotAligned(&'static str),

    #[error("sequences must share the same length excluding gaps to {0}")]
    NotFixedLength(&'static str),

    #[error("sequences already contain gaps; cannot {0}")]
    AlreadyGapped(&'static str),

    #[error("sequence id `{0}` not found")]
    NotFound(String),

    #[error("sequence index {0} not found in the alignment mapping")]
    MissingMapping(usize),

    #[error(
        "invalid mapping for sequence at index {index}: \
        mapping has {mapped} positions but the sequence has {len} characters"
    )]
    MappingOutOfRange {
        index: usize,
        mapped: usize,
        len: usize,
    },

    #[error("structure file {0} does not exist")]
    StructureNotFound(PathBuf),

    #[error("malformed FASTA at line {line}: {reason}")]
    MalformedFasta { line: usize, reason: String },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("{tool} could not be found; is it installed and on PATH? (tried `{path}`)")]
    ToolNotFound { tool: &'static str, path: String },

    #[error("{tool} exited with {status}\nstderr:\n{stderr}")]
    ToolFailed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn fmt_position(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(" at position {p}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SequenceError>;
