//! Error types for isomesh

use thiserror::Error;

/// Main error type for isomesh operations
///
/// Extraction itself never fails: out-of-range reads return the empty
/// sentinel and degenerate edges fall back to the midpoint. These variants
/// cover the fallible edges around it (building grids from raw buffers,
/// validating configuration, setting up worker pools).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for isomesh operations
pub type Result<T> = std::result::Result<T, Error>;
