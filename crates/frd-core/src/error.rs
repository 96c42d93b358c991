//! Error types
//!
//! Every fallible operation in the crate reports one of the variants below.
//! Operations are atomic: on error no operand is modified and no partial
//! object is returned.

use thiserror::Error;

use crate::timebase::Timebase;

/// Errors produced by frequency response construction, algebra and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrdError {
    /// Wrong argument shape/type or unrecognized configuration keyword
    #[error("construction error: {0}")]
    Construction(String),

    /// Input/output counts incompatible between two operands
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Frequency grids of two responses differ beyond tolerance
    #[error("frequency grid mismatch: {0}")]
    GridMismatch(String),

    /// Argument outside the domain an operation is defined on
    #[error("domain error: {0}")]
    Domain(String),

    /// Linear algebra failure (e.g. singular matrix)
    #[error("numeric error: {0}")]
    Numeric(String),

    /// Operand cannot be converted to frequency response data
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Two timebases cannot be reconciled to a common value
    #[error("incompatible timebases: {left} and {right}")]
    IncompatibleTimebase { left: Timebase, right: Timebase },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FrdError>;
