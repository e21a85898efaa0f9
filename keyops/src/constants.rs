//! Constants used by the signature schemes.

use crate::hashing::HashAlgorithm;

/// Number of fresh nonces tried by randomized ECDSA signing before the last
/// rejection is handed back to the caller.
///
/// A rejection has probability around `2/n` per attempt, so running out of
/// attempts on a real curve means the randomness source is broken.
pub(crate) const MAX_NONCE_ATTEMPTS: usize = 64;

/// Hash function EdDSA is instantiated with (Ed25519 uses SHA-512).
pub(crate) const EDDSA_HASH: HashAlgorithm = HashAlgorithm::Sha512;
