//! Library-level error type.
//!
//! Reserved for conditions a caller can legitimately hit — a malformed input file, a width of
//! zero, an unknown algorithm name. Violations of the engine's own internal invariants (a
//! component computation disagreeing with itself, a cache returning a malformed entry) are bugs,
//! not user errors, and are left to `panic!`/`debug_assert!` instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhdError {
    #[error("failed to parse hypergraph input at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("width must be a positive integer, got {0}")]
    InvalidWidth(usize),

    #[error("unknown algorithm {0:?}; expected one of balsep, detk, logk")]
    UnknownAlgorithm(String),

    #[error("vertex name {0:?} was never interned")]
    UnknownVertexName(String),

    #[error("edge name {0} referenced in an update directive does not exist")]
    UnknownEdgeName(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
