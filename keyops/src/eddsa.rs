//! EdDSA over twisted Edwards curves, instantiated as in RFC 8032.
//!
//! Unlike ECDSA, the signing nonce is derived from the secret key and the
//! message, so signing consumes no randomness and can never reuse a nonce
//! across different messages.

use curve::{
    Curve, CurveError, CurvePoint, EdwardsCurve, EdwardsPoint, double_scalar_mul, to_le_padded,
};
use num_bigint::BigUint;
use rand::Rng;
use tracing::{debug, instrument};

use crate::constants::EDDSA_HASH;
use crate::errors::{KeyOpsError, Result};

/// Secret key material expanded from a seed.
///
/// The seed is hashed with SHA-512. The lower half, clamped, becomes the
/// private scalar; the upper half is the prefix that nonces are derived from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EddsaSigningKey {
    seed: Vec<u8>,
    scalar: BigUint,
    prefix: Vec<u8>,
    public: EdwardsPoint,
    public_encoded: Vec<u8>,
}

/// An EdDSA signature `(R, s)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EddsaSignature {
    r_point: EdwardsPoint,
    s: BigUint,
}

fn hash_to_scalar(parts: &[&[u8]], l: &BigUint) -> BigUint {
    let input = parts.concat();
    BigUint::from_bytes_le(&EDDSA_HASH.digest(&input)) % l
}

impl EddsaSigningKey {
    /// Expands a seed of exactly one point-encoding width into a signing key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyOpsError::PreconditionViolated`] if the seed has the wrong
    /// length or the curve's encoding width does not match SHA-512.
    #[instrument(level = "debug", skip_all, fields(curve = curve.name()))]
    pub fn from_seed(curve: &EdwardsCurve, seed: &[u8]) -> Result<Self> {
        let len = curve.encoding_len();
        if 2 * len != EDDSA_HASH.output_len() {
            return Err(KeyOpsError::PreconditionViolated(format!(
                "{} encodes points in {len} bytes, {EDDSA_HASH} needs {}",
                curve.name(),
                EDDSA_HASH.output_len() / 2
            )));
        }
        if seed.len() != len {
            return Err(KeyOpsError::PreconditionViolated(format!(
                "seed must be {len} bytes, got {}",
                seed.len()
            )));
        }

        let expanded = EDDSA_HASH.digest(seed);
        let (lower, upper) = expanded.split_at(len);

        // Clear the cofactor bits and the top bit, then set the bit below it.
        let bits = curve.encoding_bits() as u64;
        let mut scalar = BigUint::from_bytes_le(lower);
        for i in 0..curve.cofactor().trailing_zeros().unwrap_or(0) {
            scalar.set_bit(i, false);
        }
        scalar.set_bit(bits - 1, false);
        scalar.set_bit(bits - 2, true);

        let public = curve.mul_generator(&scalar)?;
        let public_encoded = public.encode()?;

        Ok(Self {
            seed: seed.to_vec(),
            scalar,
            prefix: upper.to_vec(),
            public,
            public_encoded,
        })
    }

    /// Generates a signing key from a random seed.
    pub fn generate<R: Rng + ?Sized>(curve: &EdwardsCurve, rng: &mut R) -> Result<Self> {
        let mut seed = vec![0u8; curve.encoding_len()];
        rng.fill(seed.as_mut_slice());
        Self::from_seed(curve, &seed)
    }

    #[inline]
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// The clamped private scalar `a` with `A = a * B`.
    #[inline]
    pub fn private_scalar(&self) -> &BigUint {
        &self.scalar
    }

    #[inline]
    pub fn public(&self) -> &EdwardsPoint {
        &self.public
    }

    /// Encoded public key, the form it is published and hashed in.
    #[inline]
    pub fn public_encoded(&self) -> &[u8] {
        &self.public_encoded
    }

    /// Signs a message.
    ///
    /// The nonce is `r = H(prefix || M) mod L`, then with `R = r * B` and
    /// `k = H(R || A || M) mod L` the response is `s = r + k * a mod L`.
    #[instrument(level = "debug", skip_all, fields(curve = self.public.curve().name(), len = message.len()))]
    pub fn sign(&self, message: &[u8]) -> Result<EddsaSignature> {
        let curve = self.public.curve();
        let l = curve.l();

        let r = hash_to_scalar(&[self.prefix.as_slice(), message], l);
        let r_point = curve.mul_generator(&r)?;
        let k = hash_to_scalar(
            &[r_point.encode()?.as_slice(), self.public_encoded.as_slice(), message],
            l,
        );
        let s = (r + k * &self.scalar) % l;

        Ok(EddsaSignature { r_point, s })
    }
}

impl EddsaSignature {
    #[inline]
    pub fn r_point(&self) -> &EdwardsPoint {
        &self.r_point
    }

    #[inline]
    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// `encode(R) || s` with `s` little-endian in one point-encoding width.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let len = self.r_point.curve().encoding_len();
        let mut out = self.r_point.encode()?;
        out.extend_from_slice(&to_le_padded(&self.s, len)?);
        Ok(out)
    }

    /// Parses an encoded signature.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidEncoding`] (wrapped) if the length
    /// is wrong, `R` does not decode to a curve point, or `s >= L`.
    pub fn decode(curve: &EdwardsCurve, bytes: &[u8]) -> Result<Self> {
        let len = curve.encoding_len();
        if bytes.len() != 2 * len {
            return Err(CurveError::InvalidEncoding(format!(
                "expected {} signature bytes, got {}",
                2 * len,
                bytes.len()
            ))
            .into());
        }
        let (r_bytes, s_bytes) = bytes.split_at(len);
        let r_point = curve.decode_point(r_bytes)?;
        let s = BigUint::from_bytes_le(s_bytes);
        if &s >= curve.l() {
            return Err(
                CurveError::InvalidEncoding("s is not below the group order".into()).into(),
            );
        }
        Ok(Self { r_point, s })
    }
}

/// Verifies `signature` over `message` against the public point `public`.
///
/// Checks `s * B == R + k * A` with `k = H(R || A || M) mod L`. A signature
/// whose `s` is not below `L` is rejected.
#[instrument(level = "debug", skip_all, fields(curve = public.curve().name(), len = message.len()))]
pub fn verify(public: &EdwardsPoint, message: &[u8], signature: &EddsaSignature) -> Result<bool> {
    let curve = public.curve();
    if signature.r_point.curve() != curve {
        return Err(KeyOpsError::CurveMismatch);
    }
    let l = curve.l();
    if &signature.s >= l {
        debug!("s is not below the group order");
        return Ok(false);
    }

    let k = hash_to_scalar(
        &[signature.r_point.encode()?.as_slice(), public.encode()?.as_slice(), message],
        l,
    );
    // s * B - k * A must land on R.
    let expected_r = double_scalar_mul(&signature.s, &curve.generator(), &k, &public.negate())?;

    let valid = expected_r == signature.r_point;
    if !valid {
        debug!("signature does not match");
    }
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve::registry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Vector {
        seed: &'static str,
        public: &'static str,
        message: &'static str,
        signature: &'static str,
    }

    // RFC 8032, section 7.1, tests 1 and 2.
    const VECTORS: [Vector; 2] = [
        Vector {
            seed: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
            public: "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
            message: "",
            signature: "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
                        5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
        },
        Vector {
            seed: "4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb",
            public: "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c",
            message: "72",
            signature: "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
                        085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00",
        },
    ];

    #[test]
    fn test_rfc8032_vectors() {
        let curve = registry::ed25519().unwrap();
        for v in VECTORS {
            let key = EddsaSigningKey::from_seed(&curve, &hex::decode(v.seed).unwrap()).unwrap();
            assert_eq!(hex::encode(key.public_encoded()), v.public);

            let message = hex::decode(v.message).unwrap();
            let sig = key.sign(&message).unwrap();
            assert_eq!(hex::encode(sig.encode().unwrap()), v.signature);

            let public = curve.decode_point(&hex::decode(v.public).unwrap()).unwrap();
            let decoded = EddsaSignature::decode(&curve, &hex::decode(v.signature).unwrap()).unwrap();
            assert_eq!(decoded, sig);
            assert!(verify(&public, &message, &decoded).unwrap());
        }
    }

    #[test]
    fn test_clamping() {
        let curve = registry::ed25519().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let key = EddsaSigningKey::generate(&curve, &mut rng).unwrap();
        let a = key.private_scalar();
        assert!(!a.bit(0) && !a.bit(1) && !a.bit(2));
        assert!(a.bit(254) && !a.bit(255));
        assert_eq!(key.seed().len(), 32);
    }

    #[test]
    fn test_tampering_is_detected() {
        let curve = registry::ed25519().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let key = EddsaSigningKey::generate(&curve, &mut rng).unwrap();
        let message = b"attack at dawn".to_vec();
        let sig = key.sign(&message).unwrap();
        assert!(verify(key.public(), &message, &sig).unwrap());

        let mut altered = message.clone();
        altered[0] ^= 1;
        assert!(!verify(key.public(), &altered, &sig).unwrap());

        let other = EddsaSigningKey::generate(&curve, &mut rng).unwrap();
        assert!(!verify(other.public(), &message, &sig).unwrap());

        let shifted = EddsaSignature {
            r_point: sig.r_point().clone(),
            s: (sig.s() + 1u32) % curve.l(),
        };
        assert!(!verify(key.public(), &message, &shifted).unwrap());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let curve = registry::ed25519().unwrap();
        let key = EddsaSigningKey::from_seed(&curve, &[3u8; 32]).unwrap();
        assert_eq!(key.sign(b"foobar").unwrap(), key.sign(b"foobar").unwrap());
        assert_ne!(
            key.sign(b"foobar").unwrap().r_point(),
            key.sign(b"foobaz").unwrap().r_point()
        );
    }

    #[test]
    fn test_malformed_signatures() {
        let curve = registry::ed25519().unwrap();
        let key = EddsaSigningKey::from_seed(&curve, &[9u8; 32]).unwrap();
        let bytes = key.sign(b"foobar").unwrap().encode().unwrap();

        assert!(EddsaSignature::decode(&curve, &bytes[..63]).is_err());

        let mut large_s = bytes.clone();
        large_s[32..].copy_from_slice(&to_le_padded(curve.l(), 32).unwrap());
        assert!(matches!(
            EddsaSignature::decode(&curve, &large_s),
            Err(KeyOpsError::Curve(CurveError::InvalidEncoding(_)))
        ));

        let unreduced = EddsaSignature {
            r_point: curve.generator(),
            s: curve.l().clone(),
        };
        assert!(!verify(key.public(), b"foobar", &unreduced).unwrap());
    }

    #[test]
    fn test_seed_length() {
        let curve = registry::ed25519().unwrap();
        assert!(matches!(
            EddsaSigningKey::from_seed(&curve, &[0u8; 31]),
            Err(KeyOpsError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn test_verification_equation() {
        let curve = registry::ed25519().unwrap();
        let key = EddsaSigningKey::from_seed(&curve, &[3u8; 32]).unwrap();
        let sig = key.sign(b"foobar").unwrap();
        let k = hash_to_scalar(
            &[sig.r_point.encode().unwrap().as_slice(), key.public_encoded(), b"foobar".as_slice()],
            curve.l(),
        );
        let rhs = sig.r_point.add(&key.public().scalar_mul(&k).unwrap()).unwrap();
        assert_eq!(curve.mul_generator(&sig.s).unwrap(), rhs);
        assert!(verify(key.public(), b"foobar", &sig).unwrap());

        // R + B in place of R.
        let shifted = EddsaSignature {
            r_point: sig.r_point.add(&curve.generator()).unwrap(),
            s: sig.s.clone(),
        };
        assert!(!verify(key.public(), b"foobar", &shifted).unwrap());
    }
}
