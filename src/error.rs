//! Error types for shoal.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe network
//! conditions are not errors; they are absorbed into
//! [`ProbeOutcome`](crate::scanner::ProbeOutcome). Only specification
//! parsing and unrecoverable setup failures surface here.

use crate::types::PortError;
use thiserror::Error;

/// Main error type for scanning operations.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid port specification: {0}")]
    InvalidSpec(#[from] PortError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
