//! ECDSA over short Weierstrass curves.

use curve::{
    Curve, CurveError, CurvePoint, FieldElement, WeierstrassCurve, WeierstrassPoint,
    double_scalar_mul, random_between,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::constants::MAX_NONCE_ATTEMPTS;
use crate::errors::{KeyOpsError, Result};
use crate::hashing::HashAlgorithm;
use crate::keys::KeyPair;

/// An ECDSA signature `(r, s)` together with the hash it was computed over.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EcdsaSignature {
    /// `x(k * G) mod n` for the signing nonce `k`
    pub r: BigUint,
    /// `k^-1 * (e + r * d) mod n`
    pub s: BigUint,
    /// Hash algorithm applied to the message before signing
    pub hash: HashAlgorithm,
}

/// Converts a message digest to an integer modulo `n`.
///
/// The digest is read big-endian. If it has more bits than `n`, only its
/// leftmost `bits(n)` bits are kept, as in SEC1 and FIPS 186.
pub fn digest_to_integer(digest: &[u8], n: &BigUint) -> BigUint {
    let mut e = BigUint::from_bytes_be(digest);
    let digest_bits = 8 * digest.len() as u64;
    if digest_bits > n.bits() {
        e >>= digest_bits - n.bits();
    }
    e % n
}

fn check_nonce(nonce: &BigUint, n: &BigUint) -> Result<()> {
    if nonce.is_zero() || nonce >= n {
        return Err(KeyOpsError::PreconditionViolated(
            "nonce must lie in [1, n - 1]".into(),
        ));
    }
    Ok(())
}

/// Signs a precomputed digest with a caller-chosen nonce.
///
/// Reusing a nonce across two messages discloses the private key, see
/// [`crate::recover_private_key`].
///
/// # Errors
///
/// - [`KeyOpsError::PreconditionViolated`] if the nonce is outside `[1, n - 1]`
/// - [`KeyOpsError::NonceRejected`] if the nonce yields `r = 0` or `s = 0`;
///   signing again with a different nonce is expected to succeed
#[instrument(level = "debug", skip_all, fields(curve = key.curve().name(), hash = %hash))]
pub fn sign_digest_with_nonce(
    key: &KeyPair<WeierstrassPoint>,
    digest: &[u8],
    hash: HashAlgorithm,
    nonce: &BigUint,
) -> Result<EcdsaSignature> {
    let curve = key.curve();
    let n = curve.n();
    check_nonce(nonce, n)?;

    let e = digest_to_integer(digest, n);
    let commitment = curve.mul_generator(nonce)?;
    let Some(x) = commitment.x() else {
        return Err(KeyOpsError::NonceRejected("nonce point is at infinity"));
    };
    let r = x.value() % n;
    if r.is_zero() {
        return Err(KeyOpsError::NonceRejected("r is zero"));
    }

    let zero = FieldElement::new(BigUint::zero(), n.clone())?;
    let k_inv = zero
        .sibling(nonce.clone())
        .inverse()
        .map_err(|_| KeyOpsError::NonceRejected("nonce is not invertible modulo n"))?;
    let rd = zero.sibling(r.clone()).mul(&zero.sibling(key.private_scalar().clone()))?;
    let s = k_inv.mul(&zero.sibling(e).add(&rd)?)?;
    if s.is_zero() {
        return Err(KeyOpsError::NonceRejected("s is zero"));
    }
    if s.inverse().is_err() {
        return Err(KeyOpsError::NonceRejected("s is not invertible modulo n"));
    }

    Ok(EcdsaSignature {
        r,
        s: s.into_value(),
        hash,
    })
}

/// Hashes `message` with `hash` and signs it with a caller-chosen nonce.
pub fn sign_with_nonce(
    key: &KeyPair<WeierstrassPoint>,
    message: &[u8],
    hash: HashAlgorithm,
    nonce: &BigUint,
) -> Result<EcdsaSignature> {
    sign_digest_with_nonce(key, &hash.digest(message), hash, nonce)
}

/// Hashes `message` with `hash` and signs it with a nonce drawn from `rng`.
///
/// Rejected nonces are replaced by fresh ones; only a persistently failing
/// randomness source makes this return [`KeyOpsError::NonceRejected`].
///
/// # Example
///
/// ```
/// use curve::registry;
/// use keyops::{HashAlgorithm, KeyPair, ecdsa};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let curve = registry::weierstrass("secp256k1").unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let keypair = KeyPair::generate(&curve, &mut rng).unwrap();
///
/// let signature = ecdsa::sign(&keypair, b"hello", HashAlgorithm::Sha256, &mut rng).unwrap();
/// assert!(ecdsa::verify(keypair.public(), b"hello", &signature).unwrap());
/// ```
pub fn sign<R: Rng + ?Sized>(
    key: &KeyPair<WeierstrassPoint>,
    message: &[u8],
    hash: HashAlgorithm,
    rng: &mut R,
) -> Result<EcdsaSignature> {
    let digest = hash.digest(message);
    let high = key.curve().n() - 1u32;
    let mut last = KeyOpsError::NonceRejected("no nonce attempted");

    for _ in 0..MAX_NONCE_ATTEMPTS {
        let nonce = random_between(rng, &BigUint::one(), &high)?;
        match sign_digest_with_nonce(key, &digest, hash, &nonce) {
            Err(KeyOpsError::NonceRejected(reason)) => {
                warn!(reason, "nonce rejected, drawing a new one");
                last = KeyOpsError::NonceRejected(reason);
            }
            other => return other,
        }
    }

    Err(last)
}

/// Verifies a signature over a precomputed digest.
///
/// # Returns
///
/// - `Ok(true)` if the signature is valid
/// - `Ok(false)` if it is not, including when `r` or `s` is outside `(0, n)`
/// - `Err(KeyOpsError::PreconditionViolated)` if the public key is the point
///   at infinity
#[instrument(level = "debug", skip_all, fields(curve = public.curve().name()))]
pub fn verify_digest(
    public: &WeierstrassPoint,
    digest: &[u8],
    signature: &EcdsaSignature,
) -> Result<bool> {
    if public.is_infinity() {
        return Err(KeyOpsError::PreconditionViolated(
            "public key is the point at infinity".into(),
        ));
    }
    let curve: &WeierstrassCurve = public.curve();
    let n = curve.n();
    let in_range = |v: &BigUint| !v.is_zero() && v < n;
    if !in_range(&signature.r) || !in_range(&signature.s) {
        debug!("signature component outside (0, n)");
        return Ok(false);
    }

    let zero = FieldElement::new(BigUint::zero(), n.clone())?;
    let w = match zero.sibling(signature.s.clone()).inverse() {
        Ok(w) => w,
        Err(CurveError::Arithmetic(_)) => {
            debug!("s is not invertible modulo n");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };
    let u1 = zero.sibling(digest_to_integer(digest, n)).mul(&w)?;
    let u2 = zero.sibling(signature.r.clone()).mul(&w)?;

    let point = double_scalar_mul(u1.value(), &curve.generator(), u2.value(), public)?;
    let valid = match point.x() {
        Some(x) => x.value() % n == signature.r,
        None => false,
    };
    if !valid {
        debug!("signature does not match");
    }
    Ok(valid)
}

/// Hashes `message` with the algorithm recorded in `signature` and verifies.
pub fn verify(public: &WeierstrassPoint, message: &[u8], signature: &EcdsaSignature) -> Result<bool> {
    verify_digest(public, &signature.hash.digest(message), signature)
}
