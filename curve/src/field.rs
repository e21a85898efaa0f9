//! Exact arithmetic modulo an arbitrary prime.
//!
//! Elements carry their own modulus so that base-field coordinates and
//! scalars modulo the group order can share one type. Combining elements of
//! different moduli is an error rather than a silent reduction.

use core::fmt::{self, Display, Formatter};
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::errors::{CurveError, Result};

/// An integer modulo a fixed modulus, kept in canonical form `0 <= value < modulus`.
///
/// Ordering is by value first and modulus second, so elements can be kept in
/// ordered sets. Equality requires both the value and the modulus to match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldElement {
    value: BigUint,
    modulus: BigUint,
}

impl FieldElement {
    /// Create a new element, reducing `value` modulo `modulus`.
    ///
    /// Inversion and square roots additionally require the modulus to be prime.
    pub fn new(value: impl Into<BigUint>, modulus: impl Into<BigUint>) -> Result<Self> {
        let modulus = modulus.into();
        if modulus < BigUint::from(2u32) {
            return Err(CurveError::PreconditionViolated(format!(
                "modulus {modulus} is too small"
            )));
        }
        Ok(Self::reduced(value.into(), modulus))
    }

    /// Create a new element from a possibly negative integer.
    pub fn from_signed(value: impl Into<BigInt>, modulus: impl Into<BigUint>) -> Result<Self> {
        Ok(Self::new(0u32, modulus)?.lift(value))
    }

    /// The modulus must already be known to be at least 2.
    pub(crate) fn reduced(value: BigUint, modulus: BigUint) -> Self {
        let value = if value < modulus {
            value
        } else {
            value % &modulus
        };
        Self { value, modulus }
    }

    /// Interpret a plain integer as an element of the same field as `self`.
    pub fn lift(&self, value: impl Into<BigInt>) -> Self {
        let value: BigInt = value.into();
        let modulus = BigInt::from(self.modulus.clone());
        let (_, magnitude) = value.mod_floor(&modulus).into_parts();
        Self {
            value: magnitude,
            modulus: self.modulus.clone(),
        }
    }

    /// Like [`FieldElement::lift`] for unsigned values.
    pub fn sibling(&self, value: BigUint) -> Self {
        Self::reduced(value, self.modulus.clone())
    }

    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    #[inline]
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    #[inline]
    pub fn into_value(self) -> BigUint {
        self.value
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Parity of the canonical representative.
    #[inline]
    pub fn is_odd(&self) -> bool {
        self.value.is_odd()
    }

    fn check_modulus(&self, rhs: &Self) -> Result<()> {
        if self.modulus != rhs.modulus {
            return Err(CurveError::DomainMismatch);
        }
        Ok(())
    }

    pub fn add(&self, rhs: &Self) -> Result<Self> {
        self.check_modulus(rhs)?;
        let mut value = &self.value + &rhs.value;
        if value >= self.modulus {
            value -= &self.modulus;
        }
        Ok(Self {
            value,
            modulus: self.modulus.clone(),
        })
    }

    pub fn sub(&self, rhs: &Self) -> Result<Self> {
        self.check_modulus(rhs)?;
        let value = if self.value >= rhs.value {
            &self.value - &rhs.value
        } else {
            (&self.modulus - &rhs.value) + &self.value
        };
        Ok(Self {
            value,
            modulus: self.modulus.clone(),
        })
    }

    pub fn mul(&self, rhs: &Self) -> Result<Self> {
        self.check_modulus(rhs)?;
        Ok(self.product(rhs))
    }

    /// `self * rhs^-1`. Fails with [`CurveError::Arithmetic`] if `rhs` is zero.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        self.check_modulus(rhs)?;
        Ok(self.product(&rhs.inverse()?))
    }

    // Both operands share a modulus.
    #[inline]
    fn product(&self, rhs: &Self) -> Self {
        Self {
            value: (&self.value * &rhs.value) % &self.modulus,
            modulus: self.modulus.clone(),
        }
    }

    pub fn neg(&self) -> Self {
        if self.value.is_zero() {
            return self.clone();
        }
        Self {
            value: &self.modulus - &self.value,
            modulus: self.modulus.clone(),
        }
    }

    #[inline]
    pub fn square(&self) -> Self {
        self.product(self)
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    pub fn inverse(&self) -> Result<Self> {
        if self.value.is_zero() {
            return Err(CurveError::Arithmetic("zero has no multiplicative inverse"));
        }

        let value = BigInt::from(self.value.clone());
        let modulus = BigInt::from(self.modulus.clone());
        let egcd = value.extended_gcd(&modulus);
        if egcd.gcd != BigInt::one() {
            return Err(CurveError::Arithmetic(
                "element shares a factor with the modulus",
            ));
        }

        Ok(self.lift(egcd.x))
    }

    /// Raise to an arbitrary integer power. Negative exponents invert first.
    pub fn pow(&self, exponent: impl Into<BigInt>) -> Result<Self> {
        let exponent: BigInt = exponent.into();
        if exponent.sign() == Sign::Minus {
            return self.inverse()?.pow(-exponent);
        }
        Ok(self.pow_unsigned(exponent.magnitude()))
    }

    fn pow_unsigned(&self, exponent: &BigUint) -> Self {
        Self {
            value: self.value.modpow(exponent, &self.modulus),
            modulus: self.modulus.clone(),
        }
    }

    /// Euler's criterion. Zero counts as a residue.
    pub fn is_quadratic_residue(&self) -> bool {
        if self.value.is_zero() || self.modulus == BigUint::from(2u32) {
            return true;
        }
        let half = (&self.modulus - 1u32) >> 1u32;
        self.pow_unsigned(&half).is_one()
    }

    /// Both square roots `(s, modulus - s)`, smaller representative first, or
    /// `None` when `self` is not a quadratic residue.
    ///
    /// A missing root is an ordinary outcome, for example when recovering a
    /// point from an x-coordinate that is not on the curve.
    pub fn sqrt(&self) -> Option<(Self, Self)> {
        if self.value.is_zero() || self.modulus == BigUint::from(2u32) {
            return Some((self.clone(), self.clone()));
        }
        if !self.is_quadratic_residue() {
            return None;
        }

        let root = if (&self.modulus % 4u32) == BigUint::from(3u32) {
            let exponent = (&self.modulus + 1u32) >> 2u32;
            self.pow_unsigned(&exponent)
        } else {
            self.tonelli_shanks()?
        };

        // Guards against composite moduli, where Euler's criterion can lie.
        if root.square() != *self {
            return None;
        }

        let other = root.neg();
        if root.value <= other.value {
            Some((root, other))
        } else {
            Some((other, root))
        }
    }

    fn tonelli_shanks(&self) -> Option<Self> {
        let p_minus_one = &self.modulus - 1u32;
        let s = p_minus_one.trailing_zeros()?;
        let q = &p_minus_one >> s;

        let mut z = self.sibling(BigUint::from(2u32));
        while z.is_quadratic_residue() {
            z = z.sibling(z.value() + 1u32);
            if z.is_zero() {
                return None;
            }
        }

        let mut m = s;
        let mut c = z.pow_unsigned(&q);
        let mut t = self.pow_unsigned(&q);
        let mut r = self.pow_unsigned(&((&q + 1u32) >> 1u32));

        while !t.is_one() {
            let mut i = 0u64;
            let mut t2i = t.clone();
            while !t2i.is_one() {
                t2i = t2i.square();
                i += 1;
                if i == m {
                    return None;
                }
            }

            let b = c.pow_unsigned(&(BigUint::one() << (m - i - 1)));
            m = i;
            c = b.square();
            t = t.product(&c);
            r = r.product(&b);
        }

        Some(r)
    }
}

impl PartialEq<u64> for FieldElement {
    fn eq(&self, other: &u64) -> bool {
        self.lift(*other).value == self.value
    }
}

impl From<FieldElement> for BigUint {
    fn from(element: FieldElement) -> Self {
        element.value
    }
}

impl From<&FieldElement> for BigUint {
    fn from(element: &FieldElement) -> Self {
        element.value.clone()
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fe(value: u64, modulus: u64) -> FieldElement {
        FieldElement::new(value, modulus).expect("valid modulus")
    }

    fn big(s: &str) -> BigUint {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_basic_arithmetic() {
        let a = fe(15, 23);
        let b = fe(20, 23);

        assert_eq!(a.add(&b).unwrap(), fe(12, 23));
        assert_eq!(b.add(&a).unwrap(), fe(12, 23));
        assert_eq!(a.sub(&b).unwrap(), fe(18, 23));
        assert_eq!(a.mul(&b).unwrap(), fe(1, 23));
        assert_eq!(a.div(&b).unwrap(), fe(18, 23));

        assert_eq!(a.add(&b).unwrap().sub(&b).unwrap(), a);
        assert_eq!(a.mul(&b).unwrap().div(&b).unwrap(), a);
        assert_eq!(b.div(&a).unwrap().mul(&a).unwrap(), b);
    }

    #[test]
    fn test_small_field_vectors() {
        assert_eq!(fe(19, 23).pow(5).unwrap(), 11);
        assert_eq!(fe(14, 23).pow(20).unwrap(), 2);
        assert_eq!(fe(18, 23).pow(17).unwrap(), 8);
        assert_eq!(fe(22, 23).add(&fe(3, 23)).unwrap(), 2);
        assert_eq!(fe(1, 23).sub(&fe(3, 23)).unwrap(), 21);
        assert_eq!(fe(13, 23).div(&fe(16, 23)).unwrap(), 8);
        assert_eq!(fe(0, 23).div(&fe(5, 23)).unwrap(), 0);
        assert_eq!(fe(83, 101).pow(97).unwrap(), 35);
        assert_eq!(fe(73, 101).pow(0).unwrap(), 1);
        assert_eq!(fe(0, 101).sub(&fe(69, 101)).unwrap(), 32);
        assert_eq!(fe(70, 101).div(&fe(84, 101)).unwrap(), 85);
        assert_eq!(fe(10, 101).div(&fe(99, 101)).unwrap(), 96);
    }

    #[test]
    fn test_pow_huge_exponent() {
        let e = 473289743783748378u64;
        assert_eq!(fe(2, 101).pow(e).unwrap(), 21);
        assert_eq!(fe(3, 101).pow(e).unwrap(), 33);
        assert_eq!(fe(4, 101).pow(e).unwrap(), 37);
        assert_eq!(fe(5, 101).pow(e).unwrap(), 24);
    }

    #[test]
    fn test_large_modulus() {
        let p = big("170141183460469231731687303715884105727");
        let a = FieldElement::new(big("45329398547330232435475204068501392759"), p.clone()).unwrap();
        let e = BigInt::from(big("23973357120524123688767677450838423404"));
        assert_eq!(
            a.pow(e).unwrap().into_value(),
            big("110625867554914261405235347771839473528")
        );

        let x = FieldElement::new(big("169635720912393385456311228029418721549"), p.clone()).unwrap();
        let y = FieldElement::new(big("5125980552749438842852750418916796525"), p.clone()).unwrap();
        assert_eq!(
            x.div(&y).unwrap().into_value(),
            big("107646814503452217117283843436202007165")
        );

        let u = FieldElement::new(big("45687281695846974635956411826165480656"), p.clone()).unwrap();
        let v = FieldElement::new(big("162213007661054927807473821400626255209"), p).unwrap();
        assert_eq!(
            u.sub(&v).unwrap().into_value(),
            big("53615457495261278560169894141423331174")
        );
    }

    #[test]
    fn test_negative_exponent() {
        let a = fe(19, 23);
        let inv = a.inverse().unwrap();
        assert_eq!(a.pow(-1).unwrap(), inv);
        assert_eq!(a.pow(-5).unwrap(), a.pow(5).unwrap().inverse().unwrap());
        assert!(fe(0, 23).pow(-1).is_err());
    }

    #[test]
    fn test_zero_inverse_fails() {
        let zero = fe(0, 23);
        assert_eq!(
            zero.inverse(),
            Err(CurveError::Arithmetic("zero has no multiplicative inverse"))
        );
        assert!(matches!(fe(5, 23).div(&zero), Err(CurveError::Arithmetic(_))));
    }

    #[test]
    fn test_mixed_moduli_rejected() {
        let a = fe(3, 23);
        let b = fe(3, 29);
        assert_eq!(a.add(&b), Err(CurveError::DomainMismatch));
        assert_eq!(a.sub(&b), Err(CurveError::DomainMismatch));
        assert_eq!(a.mul(&b), Err(CurveError::DomainMismatch));
        assert_eq!(a.div(&b), Err(CurveError::DomainMismatch));
        assert_ne!(a, b);
    }

    #[test]
    fn test_tiny_modulus_rejected() {
        assert!(FieldElement::new(0u32, 1u32).is_err());
        assert!(FieldElement::new(0u32, 0u32).is_err());
    }

    #[test]
    fn test_lift_negative() {
        let a = fe(5, 23);
        assert_eq!(a.lift(-1), fe(22, 23));
        assert_eq!(a.lift(-24), fe(22, 23));
        assert_eq!(FieldElement::from_signed(-3, 23u32).unwrap(), fe(20, 23));
    }

    #[test]
    fn test_sqrt_both_roots() {
        let x = fe(1000, 2003);
        let (s1, s2) = x.sqrt().expect("1000 is a residue mod 2003");
        assert_eq!(s1.square(), x);
        assert_eq!(s2.square(), x);
        assert_eq!(s1.add(&s2).unwrap(), fe(0, 2003));
    }

    #[test]
    fn test_sqrt_tonelli_shanks_path() {
        // 17 = 1 mod 16, the generic path with s = 4.
        let mut residues = 0;
        for v in 1..17 {
            let x = fe(v, 17);
            match x.sqrt() {
                Some((s1, s2)) => {
                    residues += 1;
                    assert_eq!(s1.square(), x);
                    assert_eq!(s2.square(), x);
                }
                None => assert!(!x.is_quadratic_residue()),
            }
        }
        assert_eq!(residues, 8);
    }

    #[test]
    fn test_sqrt_non_residue() {
        // 5 is not a square modulo 23.
        assert!(fe(5, 23).sqrt().is_none());
        assert_eq!(fe(0, 23).sqrt(), Some((fe(0, 23), fe(0, 23))));
    }

    #[test]
    fn test_ordering() {
        let mut values = vec![fe(7, 23), fe(3, 29), fe(3, 23)];
        values.sort();
        assert_eq!(values, vec![fe(3, 23), fe(3, 29), fe(7, 23)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_ring_laws(a in 0u64..2003, b in 1u64..2003) {
            let a = fe(a, 2003);
            let b = fe(b, 2003);
            prop_assert_eq!(a.add(&b).unwrap().sub(&b).unwrap(), a.clone());
            prop_assert_eq!(a.mul(&b).unwrap().div(&b).unwrap(), a.clone());
            prop_assert_eq!(b.pow(2002).unwrap(), 1);
        }

        #[test]
        fn prop_sqrt_round_trip(a in 0u64..10007) {
            let a = fe(a, 10007);
            if let Some((s1, s2)) = a.sqrt() {
                prop_assert_eq!(s1.square(), a.clone());
                prop_assert_eq!(s2.square(), a);
            } else {
                prop_assert!(!a.is_quadratic_residue());
            }
        }
    }
}
