use num_bigint::BigUint;

use crate::errors::{CurveError, Result};
use crate::group::{Curve, CurvePoint};

/// Compute `a * p + b * q` with a single shared doubling chain (Shamir's trick).
pub fn double_scalar_mul<P: CurvePoint>(a: &BigUint, p: &P, b: &BigUint, q: &P) -> Result<P> {
    if p.curve() != q.curve() {
        return Err(CurveError::DomainMismatch);
    }
    let sum = p.add(q)?;
    let mut result = p.curve().identity();

    for i in (0..a.bits().max(b.bits())).rev() {
        result = result.double()?;
        match (a.bit(i), b.bit(i)) {
            (true, true) => result = result.add(&sum)?,
            (true, false) => result = result.add(p)?,
            (false, true) => result = result.add(q)?,
            (false, false) => {}
        }
    }

    Ok(result)
}

/// Sum of `scalar_i * point_i`.
pub fn multi_scalar_mul<P: CurvePoint>(points: &[P], scalars: &[BigUint]) -> Result<P> {
    let Some(first) = points.first() else {
        return Err(CurveError::PreconditionViolated(
            "multi-scalar multiplication needs at least one point".into(),
        ));
    };
    if points.len() != scalars.len() {
        return Err(CurveError::PreconditionViolated(format!(
            "{} points but {} scalars",
            points.len(),
            scalars.len()
        )));
    }

    let mut result = first.curve().identity();
    for (point, scalar) in points.iter().zip(scalars) {
        result = result.add(&point.scalar_mul(scalar)?)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn test_double_scalar_mul_matches_separate_products() {
        let curve = registry::weierstrass("secp112r1").unwrap();
        let g = curve.generator();
        let q = g.mul_u64(0x12345).unwrap();

        let a = BigUint::from(0xdead_beefu64);
        let b = BigUint::from(0x1234_5678_9abcu64);
        let expected = g
            .scalar_mul(&a)
            .unwrap()
            .add(&q.scalar_mul(&b).unwrap())
            .unwrap();
        assert_eq!(double_scalar_mul(&a, &g, &b, &q).unwrap(), expected);
        assert_eq!(
            multi_scalar_mul(&[g.clone(), q.clone()], &[a.clone(), b.clone()]).unwrap(),
            expected
        );
    }

    #[test]
    fn test_double_scalar_mul_inverse_points() {
        // p + q is infinity here, the (1, 1) bit pattern must still work.
        let curve = registry::weierstrass("secp112r1").unwrap();
        let g = curve.generator();
        let neg = g.negate();
        let a = BigUint::from(7u32);
        let b = BigUint::from(5u32);
        assert_eq!(double_scalar_mul(&a, &g, &b, &neg).unwrap(), g.mul_u64(2).unwrap());
    }

    #[test]
    fn test_multi_scalar_mul_length_mismatch() {
        let g = registry::ed25519().unwrap().generator();
        assert!(multi_scalar_mul(&[g], &[]).is_err());
    }
}
