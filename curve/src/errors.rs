//! Error types for field and curve arithmetic.

use thiserror::Error;

/// Result type for field and curve operations.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Errors that can occur while doing arithmetic over a prime field or an
/// elliptic curve defined over one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// Division by, or inversion of, the zero element.
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),

    /// Two field elements with different moduli were combined.
    #[error("field elements have different moduli")]
    DomainMismatch,

    /// A point fails the curve equation, or no square root exists while
    /// recovering a coordinate.
    #[error("invalid point: {0}")]
    InvalidPoint(String),

    /// A byte encoding is out of range or structurally malformed.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A caller supplied value outside of its documented range.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// Unknown curve name or malformed domain parameters.
    #[error("curve configuration error: {0}")]
    Config(String),

    /// An invariant of the group law was broken. This is never expected to
    /// happen for valid inputs.
    #[error("internal error: {0}")]
    Internal(&'static str),
}
