use core::fmt::Debug;
use num_bigint::{BigInt, BigUint, Sign};

use crate::errors::Result;

/// Domain parameters shared by every point of one curve.
///
/// Implementors are cheap to clone handles onto immutable data, so points can
/// each hold their own copy of the domain.
pub trait Curve: Clone + Debug + PartialEq + Send + Sync {
    type Point: CurvePoint<Curve = Self>;

    fn name(&self) -> &str;

    /// Prime modulus of the base field.
    fn field_modulus(&self) -> &BigUint;

    /// Order of the base point.
    fn order(&self) -> &BigUint;

    fn identity(&self) -> Self::Point;

    fn generator(&self) -> Self::Point;

    /// Parse the canonical byte encoding of a point on this curve.
    fn decode_point(&self, bytes: &[u8]) -> Result<Self::Point>;

    #[inline]
    fn mul_generator(&self, scalar: &BigUint) -> Result<Self::Point> {
        self.generator().scalar_mul(scalar)
    }
}

/// The group law and encoding of one curve family.
pub trait CurvePoint: Clone + Debug + PartialEq + Send + Sync {
    type Curve: Curve<Point = Self>;

    fn curve(&self) -> &Self::Curve;
    fn is_identity(&self) -> bool;
    fn is_on_curve(&self) -> bool;
    fn negate(&self) -> Self;
    fn add(&self, other: &Self) -> Result<Self>;

    /// Canonical byte encoding, the inverse of [`Curve::decode_point`].
    fn encode(&self) -> Result<Vec<u8>>;

    #[inline]
    fn double(&self) -> Result<Self> {
        self.add(self)
    }

    #[inline]
    fn sub(&self, other: &Self) -> Result<Self> {
        self.add(&other.negate())
    }

    /// Double-and-add, most significant bit first.
    fn scalar_mul(&self, scalar: &BigUint) -> Result<Self> {
        let mut result = self.curve().identity();
        for i in (0..scalar.bits()).rev() {
            result = result.double()?;
            if scalar.bit(i) {
                result = result.add(self)?;
            }
        }
        Ok(result)
    }

    /// Negative scalars multiply by the magnitude and negate the result.
    fn scalar_mul_signed(&self, scalar: &BigInt) -> Result<Self> {
        let result = self.scalar_mul(scalar.magnitude())?;
        if scalar.sign() == Sign::Minus {
            Ok(result.negate())
        } else {
            Ok(result)
        }
    }

    #[inline]
    fn mul_u64(&self, n: u64) -> Result<Self> {
        self.scalar_mul(&BigUint::from(n))
    }
}
