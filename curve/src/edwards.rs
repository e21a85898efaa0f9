//! Twisted Edwards curves `a*x^2 + y^2 = 1 + d*x^2*y^2` in affine coordinates.
//!
//! With `a` a square and `d` a non-square the addition law below is complete,
//! so there is no case split and the identity is the ordinary point `(0, 1)`.

use core::cmp::Ordering;
use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::encoding::to_le_padded;
use crate::errors::{CurveError, Result};
use crate::field::FieldElement;
use crate::group::{Curve, CurvePoint};

/// Raw domain parameters of a twisted Edwards curve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdwardsParams {
    pub name: String,
    /// Prime modulus of the base field
    pub p: BigUint,
    pub a: BigUint,
    pub d: BigUint,
    /// Order of the base point
    pub l: BigUint,
    pub cofactor: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
    /// Width of a point encoding in bits. Must exceed the bit length of `p`
    /// so the sign of x fits in the top bit.
    pub encoding_bits: usize,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Domain {
    name: String,
    a: FieldElement,
    d: FieldElement,
    l: BigUint,
    cofactor: BigUint,
    gx: FieldElement,
    gy: FieldElement,
    encoding_bits: usize,
}

/// A validated twisted Edwards domain. Clones share the same parameters.
#[derive(Clone, Debug)]
pub struct EdwardsCurve {
    domain: Arc<Domain>,
}

/// Affine point on a twisted Edwards curve.
#[derive(Clone, Debug)]
pub struct EdwardsPoint {
    x: FieldElement,
    y: FieldElement,
    curve: EdwardsCurve,
}

impl EdwardsCurve {
    /// Validate `params` and build the domain.
    #[instrument(level = "debug", skip_all, fields(curve = %params.name))]
    pub fn new(params: EdwardsParams) -> Result<Self> {
        let p = params.p;
        if p < BigUint::from(3u32) || !BigUint::from(2u32).modpow(&(&p - 1u32), &p).is_one() {
            return Err(CurveError::Config(format!(
                "{}: field modulus is not an odd prime",
                params.name
            )));
        }
        if params.encoding_bits % 8 != 0 || params.encoding_bits as u64 <= p.bits() {
            return Err(CurveError::Config(format!(
                "{}: {} bit encodings cannot hold a field element and a sign bit",
                params.name, params.encoding_bits
            )));
        }
        if params.l.is_zero() || params.gx >= p || params.gy >= p {
            return Err(CurveError::Config(format!(
                "{}: malformed base point or order",
                params.name
            )));
        }

        let zero = FieldElement::reduced(BigUint::zero(), p);
        let a = zero.sibling(params.a);
        let d = zero.sibling(params.d);
        if a.is_zero() || d.is_zero() || a == d {
            return Err(CurveError::Config(format!(
                "{}: curve is singular",
                params.name
            )));
        }
        if !a.is_quadratic_residue() || d.is_quadratic_residue() {
            return Err(CurveError::Config(format!(
                "{}: the addition law is complete only for square a and non-square d",
                params.name
            )));
        }

        let curve = Self {
            domain: Arc::new(Domain {
                name: params.name,
                a,
                d,
                l: params.l,
                cofactor: params.cofactor,
                gx: zero.sibling(params.gx),
                gy: zero.sibling(params.gy),
                encoding_bits: params.encoding_bits,
            }),
        };

        let g = curve.generator();
        if !g.is_on_curve() {
            return Err(CurveError::Config(format!(
                "{}: base point is not on the curve",
                curve.name()
            )));
        }
        if !g.scalar_mul(&curve.domain.l)?.is_identity() {
            return Err(CurveError::Config(format!(
                "{}: base point order does not divide l",
                curve.name()
            )));
        }

        Ok(curve)
    }

    #[inline]
    pub fn a(&self) -> &FieldElement {
        &self.domain.a
    }

    #[inline]
    pub fn d(&self) -> &FieldElement {
        &self.domain.d
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        self.domain.a.modulus()
    }

    #[inline]
    pub fn l(&self) -> &BigUint {
        &self.domain.l
    }

    #[inline]
    pub fn cofactor(&self) -> &BigUint {
        &self.domain.cofactor
    }

    #[inline]
    pub fn encoding_bits(&self) -> usize {
        self.domain.encoding_bits
    }

    /// Width of a point encoding in bytes.
    #[inline]
    pub fn encoding_len(&self) -> usize {
        self.domain.encoding_bits / 8
    }

    pub fn params(&self) -> EdwardsParams {
        EdwardsParams {
            name: self.domain.name.clone(),
            p: self.p().clone(),
            a: self.domain.a.value().clone(),
            d: self.domain.d.value().clone(),
            l: self.domain.l.clone(),
            cofactor: self.domain.cofactor.clone(),
            gx: self.domain.gx.value().clone(),
            gy: self.domain.gy.value().clone(),
            encoding_bits: self.domain.encoding_bits,
        }
    }

    #[inline]
    fn element(&self, value: BigUint) -> FieldElement {
        self.domain.a.sibling(value)
    }

    /// Build a point, checking the curve equation.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<EdwardsPoint> {
        if &x >= self.p() || &y >= self.p() {
            return Err(CurveError::InvalidPoint(
                "coordinate is not a canonical field element".into(),
            ));
        }
        let point = EdwardsPoint {
            x: self.element(x),
            y: self.element(y),
            curve: self.clone(),
        };
        if !point.is_on_curve() {
            return Err(CurveError::InvalidPoint(format!(
                "{point} is not on {}",
                self.name()
            )));
        }
        Ok(point)
    }

    /// The even x with `(x, y)` on the curve, from `x^2 = (y^2 - 1) / (d*y^2 - a)`.
    pub fn recover_x(&self, y: &FieldElement) -> Result<FieldElement> {
        let y2 = y.square();
        let numerator = y2.sub(&y.lift(1))?;
        let denominator = self.domain.d.mul(&y2)?.sub(&self.domain.a)?;
        let x2 = numerator
            .div(&denominator)
            .map_err(|_| CurveError::InvalidPoint(format!("no x for y = {y}")))?;
        let (first, second) = x2
            .sqrt()
            .ok_or_else(|| CurveError::InvalidPoint(format!("no x for y = {y}")))?;
        Ok(if first.is_odd() { second } else { first })
    }
}

impl PartialEq for EdwardsCurve {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.domain, &other.domain) || self.domain == other.domain
    }
}

impl Eq for EdwardsCurve {}

impl PartialOrd for EdwardsCurve {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdwardsCurve {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain.cmp(&other.domain)
    }
}

impl Curve for EdwardsCurve {
    type Point = EdwardsPoint;

    fn name(&self) -> &str {
        &self.domain.name
    }

    fn field_modulus(&self) -> &BigUint {
        self.p()
    }

    fn order(&self) -> &BigUint {
        &self.domain.l
    }

    fn identity(&self) -> EdwardsPoint {
        EdwardsPoint {
            x: self.element(BigUint::zero()),
            y: self.element(BigUint::one()),
            curve: self.clone(),
        }
    }

    fn generator(&self) -> EdwardsPoint {
        EdwardsPoint {
            x: self.domain.gx.clone(),
            y: self.domain.gy.clone(),
            curve: self.clone(),
        }
    }

    /// Little-endian y with the parity of x in the most significant bit.
    fn decode_point(&self, bytes: &[u8]) -> Result<EdwardsPoint> {
        if bytes.len() != self.encoding_len() {
            return Err(CurveError::InvalidEncoding(format!(
                "expected {} bytes, got {}",
                self.encoding_len(),
                bytes.len()
            )));
        }

        let sign_bit = (self.domain.encoding_bits - 1) as u64;
        let mut y = BigUint::from_bytes_le(bytes);
        let x_odd = y.bit(sign_bit);
        y.set_bit(sign_bit, false);
        if &y >= self.p() {
            return Err(CurveError::InvalidEncoding(
                "y is not below the field modulus".into(),
            ));
        }

        let y = self.element(y);
        let x = self
            .recover_x(&y)
            .map_err(|e| CurveError::InvalidEncoding(e.to_string()))?;
        if x.is_zero() && x_odd {
            return Err(CurveError::InvalidEncoding(
                "sign bit set for x = 0".into(),
            ));
        }
        let x = if x.is_odd() == x_odd { x } else { x.neg() };

        Ok(EdwardsPoint {
            x,
            y,
            curve: self.clone(),
        })
    }
}

impl EdwardsPoint {
    #[inline]
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &FieldElement {
        &self.y
    }
}

impl CurvePoint for EdwardsPoint {
    type Curve = EdwardsCurve;

    #[inline]
    fn curve(&self) -> &EdwardsCurve {
        &self.curve
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y.is_one()
    }

    /// Check `a*x^2 + y^2 = 1 + d*x^2*y^2`.
    fn is_on_curve(&self) -> bool {
        let check = || -> Result<bool> {
            let x2 = self.x.square();
            let y2 = self.y.square();
            let lhs = self.curve.a().mul(&x2)?.add(&y2)?;
            let rhs = self.curve.d().mul(&x2)?.mul(&y2)?.add(&self.y.lift(1))?;
            Ok(lhs == rhs)
        };
        check().unwrap_or(false)
    }

    fn negate(&self) -> Self {
        Self {
            x: self.x.neg(),
            y: self.y.clone(),
            curve: self.curve.clone(),
        }
    }

    fn add(&self, other: &Self) -> Result<Self> {
        if self.curve != other.curve {
            return Err(CurveError::DomainMismatch);
        }
        let (x1, y1, x2, y2) = (&self.x, &self.y, &other.x, &other.y);
        let one = x1.lift(1);

        let x1x2 = x1.mul(x2)?;
        let y1y2 = y1.mul(y2)?;
        let dxy = self.curve.d().mul(&x1x2)?.mul(&y1y2)?;

        // x3 = (x1*y2 + x2*y1) / (1 + d*x1*x2*y1*y2)
        let x_num = x1.mul(y2)?.add(&x2.mul(y1)?)?;
        let x3 = x_num
            .div(&one.add(&dxy)?)
            .map_err(|_| CurveError::Internal("incomplete Edwards addition"))?;

        // y3 = (y1*y2 - a*x1*x2) / (1 - d*x1*x2*y1*y2)
        let y_num = y1y2.sub(&self.curve.a().mul(&x1x2)?)?;
        let y3 = y_num
            .div(&one.sub(&dxy)?)
            .map_err(|_| CurveError::Internal("incomplete Edwards addition"))?;

        Ok(Self {
            x: x3,
            y: y3,
            curve: self.curve.clone(),
        })
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = to_le_padded(self.y.value(), self.curve.encoding_len())?;
        if self.x.is_odd() {
            if let Some(last) = out.last_mut() {
                *last |= 0x80;
            }
        }
        Ok(out)
    }
}

impl PartialEq for EdwardsPoint {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.curve == other.curve
    }
}

impl Eq for EdwardsPoint {}

impl PartialOrd for EdwardsPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdwardsPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.x, &self.y)
            .cmp(&(&other.x, &other.y))
            .then_with(|| self.curve.cmp(&other.curve))
    }
}

impl Display for EdwardsPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Display for EdwardsCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}x^2 + y^2 = 1 + {}x^2y^2 mod 0x{:x}, l = 0x{:x}, h = {}, B = {}",
            self.name(),
            self.domain.a,
            self.domain.d,
            self.p(),
            self.domain.l,
            self.domain.cofactor,
            self.generator()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn ed25519() -> EdwardsCurve {
        registry::ed25519().expect("ed25519 parameters are valid")
    }

    fn hex(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).expect("hex literal")
    }

    #[test]
    fn test_domain_constants() {
        let curve = ed25519();
        let p = curve.p().clone();
        assert_eq!(p, (BigUint::one() << 255u32) - 19u32);

        let d = FieldElement::from_signed(-121665, p.clone())
            .unwrap()
            .div(&FieldElement::new(121666u32, p.clone()).unwrap())
            .unwrap();
        assert_eq!(&d, curve.d());

        let by = FieldElement::new(4u32, p.clone())
            .unwrap()
            .div(&FieldElement::new(5u32, p).unwrap())
            .unwrap();
        let bx = curve.recover_x(&by).unwrap();
        assert_eq!(curve.point(bx.into_value(), by.into_value()).unwrap(), curve.generator());
    }

    #[test]
    fn test_identity() {
        let curve = ed25519();
        let id = curve.identity();
        let g = curve.generator();
        assert!(id.is_identity());
        assert!(id.is_on_curve());
        assert_eq!(g.add(&id).unwrap(), g);
        assert_eq!(id.add(&g).unwrap(), g);
        assert!(g.add(&g.negate()).unwrap().is_identity());
    }

    #[test]
    fn test_scalar_mul_vectors() {
        let curve = ed25519();
        let g = curve.generator();
        let expected = [
            (0u64, "0", "1"),
            (
                1,
                "216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a",
                "6666666666666666666666666666666666666666666666666666666666666658",
            ),
            (
                2,
                "36ab384c9f5a046c3d043b7d1833e7ac080d8e4515d7a45f83c5a14e2843ce0e",
                "2260cdf3092329c21da25ee8c9a21f5697390f51643851560e5f46ae6af8a3c9",
            ),
            (
                3,
                "67ae9c4a22928f491ff4ae743edac83a6343981981624886ac62485fd3f8e25c",
                "1267b1d177ee69aba126a18e60269ef79f16ec176724030402c3684878f5b4d4",
            ),
            (
                10,
                "602c797e30ca6d754470b60ed2bc8677207e8e4ed836f81444951f224877f94f",
                "637ffcaa7a1b2477c8e44d54c898bfcf2576a6853de0e843ba8874b06ae87b2c",
            ),
            (
                1000,
                "7d729f34487672ba293b953eaf0c41221c762b90f195f8e13e0e76abef68ce7e",
                "ee1a16689ad85c7246c61a7192b28ba997c449bc5fe43aeaf943a3783aacae7",
            ),
            (
                4294967295,
                "2e768d4b624578616c2bf1694a975337fb8729c87e08957d284bbc79b401682",
                "4eb4a25a350c7c9a33282c700da2c187efb514fc056b92f6d249db423be1fb3c",
            ),
        ];

        for (scalar, x, y) in expected {
            let result = g.mul_u64(scalar).unwrap();
            assert!(result.is_on_curve());
            assert_eq!(result, curve.point(hex(x), hex(y)).unwrap(), "scalar {scalar}");
        }

        let big = BigUint::parse_bytes(b"309485009821345068724781055", 10).unwrap();
        assert_eq!(
            g.scalar_mul(&big).unwrap(),
            curve
                .point(
                    hex("674ad10bbd2df4ce13533bcfd25afebe1d55690377fff91b89f1c1bbf44e6f7"),
                    hex("5d78bffab87940cebd0ce34488e0d49d4dd1cc5820ca6780e6af721f6d389c04"),
                )
                .unwrap()
        );
    }

    #[test]
    fn test_encode_decode() {
        let curve = ed25519();
        let g = curve.generator();
        let encoded = g.encode().unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[0], 0x58);
        assert_eq!(encoded[31], 0x66);
        assert_eq!(curve.decode_point(&encoded).unwrap(), g);

        for k in [2u64, 3, 7, 1000] {
            let p = g.mul_u64(k).unwrap();
            assert_eq!(curve.decode_point(&p.encode().unwrap()).unwrap(), p);
            let neg = p.negate();
            assert_eq!(curve.decode_point(&neg.encode().unwrap()).unwrap(), neg);
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let curve = ed25519();
        assert!(matches!(curve.decode_point(&[0u8; 31]), Err(CurveError::InvalidEncoding(_))));

        // y = p is out of range.
        let p_bytes = to_le_padded(curve.p(), 32).unwrap();
        assert!(matches!(curve.decode_point(&p_bytes), Err(CurveError::InvalidEncoding(_))));

        // y = 1 gives x = 0, which has no odd representative.
        let mut one = vec![0u8; 32];
        one[0] = 1;
        assert!(curve.decode_point(&one).unwrap().is_identity());
        one[31] |= 0x80;
        assert!(matches!(curve.decode_point(&one), Err(CurveError::InvalidEncoding(_))));

        // y = 2 is not the y-coordinate of any point.
        let mut two = vec![0u8; 32];
        two[0] = 2;
        assert!(matches!(curve.decode_point(&two), Err(CurveError::InvalidEncoding(_))));
    }

    #[test]
    fn test_recover_x_missing_root() {
        let curve = ed25519();
        let y = FieldElement::new(2u32, curve.p().clone()).unwrap();
        assert!(matches!(curve.recover_x(&y), Err(CurveError::InvalidPoint(_))));
    }

    #[test]
    fn test_linearity() {
        let g = ed25519().generator();
        let left = g.mul_u64(12345 + 6789).unwrap();
        let right = g.mul_u64(12345).unwrap().add(&g.mul_u64(6789).unwrap()).unwrap();
        assert_eq!(left, right);
        assert!(g.scalar_mul(ed25519().l()).unwrap().is_identity());
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let mut params = ed25519().params();
        params.gy = 2u32.into();
        assert!(matches!(EdwardsCurve::new(params), Err(CurveError::Config(_))));

        let mut params = ed25519().params();
        params.d = 4u32.into();
        assert!(matches!(EdwardsCurve::new(params), Err(CurveError::Config(_))));

        // 2 is not a square modulo 2^255 - 19.
        let mut params = ed25519().params();
        params.a = 2u32.into();
        assert!(matches!(EdwardsCurve::new(params), Err(CurveError::Config(_))));

        let mut params = ed25519().params();
        params.encoding_bits = 255;
        assert!(matches!(EdwardsCurve::new(params), Err(CurveError::Config(_))));
    }
}
