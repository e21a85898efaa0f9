//! Elliptic curve groups over prime fields.
//!
//! This crate provides modular arithmetic over a prime field, affine points
//! on short Weierstrass and twisted Edwards curves, a registry of named curve
//! domains, and helpers for random sampling and multi-scalar multiplication.
//! Key-level protocols built on top of it live in the `keyops` crate.
//!
//! All arithmetic is variable time: scalar multiplication branches on the
//! bits of the scalar and inversion runs the extended Euclidean algorithm.
//! Nothing here is hardened against timing or cache side channels, so it
//! must not handle secrets an attacker can measure.

mod domain;
mod edwards;
mod encoding;
mod errors;
mod field;
mod group;
mod msm;
mod random;
pub mod registry;
mod weierstrass;

pub use domain::CurveDomain;
pub use edwards::{EdwardsCurve, EdwardsParams, EdwardsPoint};
pub use encoding::{byte_len, to_be_padded, to_le_padded};
pub use errors::{CurveError, Result};
pub use field::FieldElement;
pub use group::{Curve, CurvePoint};
pub use msm::{double_scalar_mul, multi_scalar_mul};
pub use random::random_between;
pub use weierstrass::{CompressedPoint, WeierstrassCurve, WeierstrassParams, WeierstrassPoint};
