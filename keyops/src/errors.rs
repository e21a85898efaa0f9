//! Error types for the key-level protocols.

use curve::CurveError;
use thiserror::Error;

/// Result type for key generation, signing, verification and key agreement.
pub type Result<T> = std::result::Result<T, KeyOpsError>;

/// Errors that can occur in the protocols built on top of the curve crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyOpsError {
    /// Field or curve arithmetic failed underneath a protocol step.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// The signing nonce produced `r = 0` or `s = 0` or has no inverse
    /// modulo the group order.
    ///
    /// The signature is unusable but nothing is wrong with the key; signing
    /// again with a fresh nonce is expected to succeed.
    #[error("nonce rejected: {0}")]
    NonceRejected(&'static str),

    /// A caller supplied value outside of its documented range, or inputs
    /// that break a documented contract such as distinct messages.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// The hash algorithm tag is not one of the supported names.
    #[error("unknown hash algorithm {0:?}")]
    UnknownHashAlgorithm(String),

    /// A key and a point from two different curve domains were combined.
    #[error("key and point belong to different curves")]
    CurveMismatch,
}
