//! ECIES shared-secret derivation.
//!
//! Only the key agreement is provided: the sender obtains a point `S` to key a
//! symmetric cipher with and a point `R` to transmit, from which the holder of
//! the private key reconstructs `S`. Choosing and running the cipher is left to
//! the caller.

use curve::{Curve, CurvePoint, random_between};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;
use tracing::instrument;

use crate::errors::{KeyOpsError, Result};
use crate::keys::KeyPair;

/// The sender's side of an ECIES exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EciesSecret<P: CurvePoint> {
    /// `R = r * G`, transmitted alongside the ciphertext
    pub r_point: P,
    /// `S = r * Q`, the shared secret
    pub shared: P,
}

/// Derives a shared secret for `public` with a nonce drawn from `rng`.
///
/// # Example
///
/// ```
/// use curve::registry;
/// use keyops::{KeyPair, ecies};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let curve = registry::weierstrass("secp192k1").unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let recipient = KeyPair::generate(&curve, &mut rng).unwrap();
///
/// let secret = ecies::encrypt(recipient.public(), &mut rng).unwrap();
/// let shared = ecies::decrypt(&recipient, &secret.r_point).unwrap();
/// assert_eq!(shared, secret.shared);
/// ```
pub fn encrypt<P: CurvePoint, R: Rng + ?Sized>(public: &P, rng: &mut R) -> Result<EciesSecret<P>> {
    let high = public.curve().order() - 1u32;
    let nonce = random_between(rng, &BigUint::one(), &high)?;
    encrypt_with_nonce(public, &nonce)
}

/// Derives a shared secret for `public` with a caller-chosen nonce in
/// `[1, n - 1]`.
///
/// A predictable nonce makes the shared secret predictable; this exists for
/// reproducible tests.
#[instrument(level = "debug", skip_all, fields(curve = public.curve().name()))]
pub fn encrypt_with_nonce<P: CurvePoint>(public: &P, nonce: &BigUint) -> Result<EciesSecret<P>> {
    let curve = public.curve();
    if public.is_identity() {
        return Err(KeyOpsError::PreconditionViolated(
            "recipient public key is the identity".into(),
        ));
    }
    if nonce.is_zero() || nonce >= curve.order() {
        return Err(KeyOpsError::PreconditionViolated(
            "nonce must lie in [1, n - 1]".into(),
        ));
    }

    Ok(EciesSecret {
        r_point: curve.mul_generator(nonce)?,
        shared: public.scalar_mul(nonce)?,
    })
}

/// Reconstructs the shared secret `S = d * R` on the recipient's side.
#[instrument(level = "debug", skip_all, fields(curve = key.curve().name()))]
pub fn decrypt<P: CurvePoint>(key: &KeyPair<P>, r_point: &P) -> Result<P> {
    if r_point.curve() != key.curve() {
        return Err(KeyOpsError::CurveMismatch);
    }
    Ok(r_point.scalar_mul(key.private_scalar())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve::registry;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_nonce_agreement() {
        let curve = registry::weierstrass("secp112r1").unwrap();
        let key = KeyPair::from_known_scalar(&curve, 0x12345u32.into()).unwrap();
        let secret = encrypt_with_nonce(key.public(), &BigUint::from(1000u32)).unwrap();
        assert_eq!(secret.r_point, curve.generator().mul_u64(1000).unwrap());
        assert_eq!(secret.shared, curve.generator().mul_u64(1000 * 0x12345).unwrap());
        assert_eq!(decrypt(&key, &secret.r_point).unwrap(), secret.shared);
    }

    #[test]
    fn test_curve_mismatch() {
        let p256 = registry::weierstrass("secp256r1").unwrap();
        let k1 = registry::weierstrass("secp256k1").unwrap();
        let key = KeyPair::from_known_scalar(&p256, 42u32.into()).unwrap();
        assert_eq!(decrypt(&key, &k1.generator()), Err(KeyOpsError::CurveMismatch));
    }

    #[test]
    fn test_invalid_nonce_and_key() {
        let curve = registry::ed25519().unwrap();
        let key = KeyPair::from_known_scalar(&curve, 5u32.into()).unwrap();
        assert!(encrypt_with_nonce(key.public(), &BigUint::zero()).is_err());
        assert!(encrypt_with_nonce(key.public(), curve.order()).is_err());
        assert!(encrypt_with_nonce(&curve.identity(), &BigUint::one()).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_agreement(d in 1u64..u64::MAX, r in 1u64..u64::MAX) {
            let curve = registry::weierstrass("secp112r1").unwrap();
            let key = KeyPair::from_known_scalar(&curve, d.into()).unwrap();
            let secret = encrypt_with_nonce(key.public(), &r.into()).unwrap();
            prop_assert_eq!(decrypt(&key, &secret.r_point).unwrap(), secret.shared);
        }
    }
}
