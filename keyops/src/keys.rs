//! Key pairs over any supported curve.

use curve::{Curve, CurvePoint, random_between};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;
use tracing::{instrument, warn};

use crate::errors::{KeyOpsError, Result};

/// A private scalar together with its public point.
///
/// The private scalar lies in `[1, n - 1]` where `n` is the order of the base
/// point, and the public point is `scalar * G`.
///
/// # Example
///
/// ```
/// use curve::registry;
/// use keyops::KeyPair;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let curve = registry::weierstrass("secp112r1").unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let keypair = KeyPair::generate(&curve, &mut rng).unwrap();
/// assert!(!keypair.public().is_infinity());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair<P: CurvePoint> {
    scalar: BigUint,
    public: P,
}

impl<P: CurvePoint> KeyPair<P> {
    /// Generates a key pair with a private scalar drawn uniformly from
    /// `[1, n - 1]`.
    ///
    /// # Arguments
    ///
    /// * `curve` - The domain the key lives on
    /// * `rng` - A cryptographically secure random number generator
    #[instrument(level = "debug", skip_all, fields(curve = curve.name()))]
    pub fn generate<C, R>(curve: &C, rng: &mut R) -> Result<Self>
    where
        C: Curve<Point = P>,
        R: Rng + ?Sized,
    {
        let high = curve.order() - 1u32;
        let scalar = random_between(rng, &BigUint::one(), &high)?;
        Self::from_scalar(curve, scalar)
    }

    /// Builds the key pair for a caller-chosen private scalar.
    ///
    /// This exists for reproducible tests and demonstrations only. A key whose
    /// scalar is known in advance is not secret, so this constructor must not
    /// be used for production keys.
    ///
    /// # Errors
    ///
    /// Returns [`KeyOpsError::PreconditionViolated`] if `scalar` is outside
    /// `[1, n - 1]`.
    #[instrument(level = "debug", skip_all, fields(curve = curve.name()))]
    pub fn from_known_scalar<C: Curve<Point = P>>(curve: &C, scalar: BigUint) -> Result<Self> {
        warn!("building a key pair from a caller-chosen scalar; not suitable for production");
        Self::from_scalar(curve, scalar)
    }

    fn from_scalar<C: Curve<Point = P>>(curve: &C, scalar: BigUint) -> Result<Self> {
        if scalar.is_zero() || &scalar >= curve.order() {
            return Err(KeyOpsError::PreconditionViolated(format!(
                "private scalar must lie in [1, n - 1] for {}",
                curve.name()
            )));
        }
        let public = curve.mul_generator(&scalar)?;
        Ok(Self { scalar, public })
    }

    #[inline]
    pub fn private_scalar(&self) -> &BigUint {
        &self.scalar
    }

    #[inline]
    pub fn public(&self) -> &P {
        &self.public
    }

    #[inline]
    pub fn curve(&self) -> &P::Curve {
        self.public.curve()
    }
}
