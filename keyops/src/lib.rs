//! Key-level protocols over the curves of the `curve` crate.
//!
//! This library implements:
//! - Key pairs over any supported curve
//! - ECDSA over short Weierstrass curves, with SHA-1 and SHA-2 digests
//! - EdDSA over twisted Edwards curves as specified in RFC 8032
//! - ECIES shared-secret derivation
//! - Recovery of an ECDSA private key from two signatures with a reused nonce
//!
//! # Example
//!
//! ```
//! use curve::registry;
//! use keyops::{HashAlgorithm, KeyPair, ecdsa};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let curve = registry::weierstrass("secp112r1").unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! let keypair = KeyPair::generate(&curve, &mut rng).unwrap();
//!
//! let signature = ecdsa::sign(&keypair, b"foobar", HashAlgorithm::Sha1, &mut rng).unwrap();
//! assert!(ecdsa::verify(keypair.public(), b"foobar", &signature).unwrap());
//! assert!(!ecdsa::verify(keypair.public(), b"foobaz", &signature).unwrap());
//! ```
//!
//! # Security Considerations
//!
//! - Always use a cryptographically secure random number generator (CSRNG)
//! - An ECDSA nonce must never be used for two messages, see
//!   [`recover_private_key`]
//! - [`KeyPair::from_known_scalar`] and the `*_with_nonce` functions exist for
//!   reproducible tests and must not be used with production keys
//! - The underlying arithmetic is variable time and leaks through timing

mod constants;
pub mod ecdsa;
pub mod eddsa;
pub mod ecies;
mod errors;
mod hashing;
mod keys;
mod recovery;


pub use ecdsa::EcdsaSignature;
pub use ecies::EciesSecret;
pub use eddsa::{EddsaSignature, EddsaSigningKey};
pub use errors::{KeyOpsError, Result};
pub use hashing::HashAlgorithm;
pub use keys::KeyPair;
pub use recovery::{RecoveredKey, recover_private_key};
