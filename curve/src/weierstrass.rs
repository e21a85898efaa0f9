//! Short Weierstrass curves `y^2 = x^3 + a*x + b` over a prime field, in
//! affine coordinates with an explicit point at infinity.

use core::cmp::Ordering;
use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::encoding::{byte_len, to_be_padded};
use crate::errors::{CurveError, Result};
use crate::field::FieldElement;
use crate::group::{Curve, CurvePoint};

/// Raw domain parameters of a Weierstrass curve, as found in a curve registry
/// or a configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeierstrassParams {
    pub name: String,
    pub a: BigUint,
    pub b: BigUint,
    /// Prime modulus of the base field
    pub p: BigUint,
    /// Order of the base point
    pub n: BigUint,
    pub cofactor: BigUint,
    pub gx: BigUint,
    pub gy: BigUint,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Domain {
    name: String,
    a: FieldElement,
    b: FieldElement,
    n: BigUint,
    cofactor: BigUint,
    gx: FieldElement,
    gy: FieldElement,
}

/// A validated Weierstrass domain. Clones share the same parameters.
#[derive(Clone, Debug)]
pub struct WeierstrassCurve {
    domain: Arc<Domain>,
}

/// A point given by its x-coordinate and the parity of its y-coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressedPoint {
    pub x: BigUint,
    pub y_odd: bool,
}

/// Affine point on a Weierstrass curve, or the point at infinity.
#[derive(Clone, Debug)]
pub struct WeierstrassPoint {
    coords: Option<(FieldElement, FieldElement)>,
    curve: WeierstrassCurve,
}

const SEC1_INFINITY: u8 = 0x00;
const SEC1_COMPRESSED_EVEN: u8 = 0x02;
const SEC1_COMPRESSED_ODD: u8 = 0x03;
const SEC1_UNCOMPRESSED: u8 = 0x04;

impl WeierstrassCurve {
    /// Validate `params` and build the domain.
    ///
    /// Fails with [`CurveError::Config`] if the modulus is not prime, the curve
    /// is singular, or the base point is not on the curve or does not have an
    /// order dividing `n`.
    #[instrument(level = "debug", skip_all, fields(curve = %params.name))]
    pub fn new(params: WeierstrassParams) -> Result<Self> {
        let p = params.p;
        if p < BigUint::from(3u32) || !BigUint::from(2u32).modpow(&(&p - 1u32), &p).is_one() {
            return Err(CurveError::Config(format!(
                "{}: field modulus is not an odd prime",
                params.name
            )));
        }
        if params.n.is_zero() {
            return Err(CurveError::Config(format!("{}: zero group order", params.name)));
        }
        if params.gx >= p || params.gy >= p {
            return Err(CurveError::Config(format!(
                "{}: base point coordinates out of range",
                params.name
            )));
        }

        let zero = FieldElement::reduced(BigUint::zero(), p);
        let curve = Self {
            domain: Arc::new(Domain {
                name: params.name,
                a: zero.sibling(params.a),
                b: zero.sibling(params.b),
                n: params.n,
                cofactor: params.cofactor,
                gx: zero.sibling(params.gx),
                gy: zero.sibling(params.gy),
            }),
        };

        if curve.is_singular() {
            return Err(CurveError::Config(format!("{}: curve is singular", curve.name())));
        }
        let g = curve.generator();
        if !g.is_on_curve() {
            return Err(CurveError::Config(format!(
                "{}: base point is not on the curve",
                curve.name()
            )));
        }
        if !g.scalar_mul(&curve.domain.n)?.is_identity() {
            return Err(CurveError::Config(format!(
                "{}: base point order does not divide n",
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
    pub fn b(&self) -> &FieldElement {
        &self.domain.b
    }

    #[inline]
    pub fn p(&self) -> &BigUint {
        self.domain.a.modulus()
    }

    #[inline]
    pub fn n(&self) -> &BigUint {
        &self.domain.n
    }

    #[inline]
    pub fn cofactor(&self) -> &BigUint {
        &self.domain.cofactor
    }

    pub fn params(&self) -> WeierstrassParams {
        WeierstrassParams {
            name: self.domain.name.clone(),
            a: self.domain.a.value().clone(),
            b: self.domain.b.value().clone(),
            p: self.p().clone(),
            n: self.domain.n.clone(),
            cofactor: self.domain.cofactor.clone(),
            gx: self.domain.gx.value().clone(),
            gy: self.domain.gy.value().clone(),
        }
    }

    /// Size of a field element in bytes.
    #[inline]
    pub fn field_bytes(&self) -> usize {
        byte_len(self.p())
    }

    #[inline]
    fn element(&self, value: BigUint) -> FieldElement {
        self.domain.a.sibling(value)
    }

    /// `4a^3 + 27b^2`, zero exactly when the curve is singular.
    fn singularity(&self) -> Result<FieldElement> {
        let a = &self.domain.a;
        let b = &self.domain.b;
        let four_a3 = a.square().mul(a)?.mul(&a.lift(4))?;
        let twenty_seven_b2 = b.square().mul(&b.lift(27))?;
        four_a3.add(&twenty_seven_b2)
    }

    /// The discriminant `-16(4a^3 + 27b^2)`.
    pub fn discriminant(&self) -> Result<FieldElement> {
        self.singularity()?.mul(&self.domain.a.lift(-16))
    }

    pub fn is_singular(&self) -> bool {
        self.singularity().map(|s| s.is_zero()).unwrap_or(true)
    }

    /// Right hand side of the curve equation, `x^3 + a*x + b`.
    pub fn rhs(&self, x: &FieldElement) -> Result<FieldElement> {
        x.square().mul(x)?.add(&self.domain.a.mul(x)?)?.add(&self.domain.b)
    }

    pub fn infinity(&self) -> WeierstrassPoint {
        WeierstrassPoint {
            coords: None,
            curve: self.clone(),
        }
    }

    /// Build a finite point, checking the curve equation.
    pub fn point(&self, x: BigUint, y: BigUint) -> Result<WeierstrassPoint> {
        if &x >= self.p() || &y >= self.p() {
            return Err(CurveError::InvalidPoint(
                "coordinate is not a canonical field element".into(),
            ));
        }
        let point = WeierstrassPoint {
            coords: Some((self.element(x), self.element(y))),
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

    /// Both points with the given x-coordinate, or `None` if `x^3 + ax + b`
    /// has no square root.
    pub fn points_with_x(&self, x: &BigUint) -> Option<(WeierstrassPoint, WeierstrassPoint)> {
        let x = self.element(x.clone());
        let (y1, y2) = self.rhs(&x).ok()?.sqrt()?;
        let make = |y: FieldElement| WeierstrassPoint {
            coords: Some((x.clone(), y)),
            curve: self.clone(),
        };
        Some((make(y1), make(y2)))
    }

    /// Recover a point from its x-coordinate and y parity.
    pub fn decompress(&self, compressed: &CompressedPoint) -> Result<WeierstrassPoint> {
        if &compressed.x >= self.p() {
            return Err(CurveError::InvalidEncoding(
                "x-coordinate is not below the field modulus".into(),
            ));
        }
        let (first, second) = self.points_with_x(&compressed.x).ok_or_else(|| {
            CurveError::InvalidPoint(format!(
                "no point with x = 0x{:x} on {}",
                compressed.x,
                self.name()
            ))
        })?;
        let is_odd = |p: &WeierstrassPoint| p.y().map(FieldElement::is_odd).unwrap_or(false);
        let chosen = if is_odd(&first) == compressed.y_odd {
            first
        } else {
            second
        };
        // y = 0 has a single root, so only the even selector names it.
        if is_odd(&chosen) != compressed.y_odd {
            return Err(CurveError::InvalidEncoding(format!(
                "no root of parity {} for x = 0x{:x}",
                u8::from(compressed.y_odd),
                compressed.x
            )));
        }
        Ok(chosen)
    }

    /// Count the points of the curve, including infinity, by trying every x.
    ///
    /// Only feasible for toy curves; fields wider than 24 bits are rejected.
    pub fn count_points(&self) -> Result<BigUint> {
        if self.p().bits() > 24 {
            return Err(CurveError::PreconditionViolated(
                "naive point counting needs a field of at most 24 bits".into(),
            ));
        }
        let mut count = BigUint::one();
        let mut x = BigUint::zero();
        while &x < self.p() {
            let rhs = self.rhs(&self.element(x.clone()))?;
            if rhs.is_zero() {
                count += 1u32;
            } else if rhs.is_quadratic_residue() {
                count += 2u32;
            }
            x += 1u32;
        }
        Ok(count)
    }
}

impl PartialEq for WeierstrassCurve {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.domain, &other.domain) || self.domain == other.domain
    }
}

impl Eq for WeierstrassCurve {}

impl PartialOrd for WeierstrassCurve {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeierstrassCurve {
    fn cmp(&self, other: &Self) -> Ordering {
        self.domain.cmp(&other.domain)
    }
}

impl Curve for WeierstrassCurve {
    type Point = WeierstrassPoint;

    fn name(&self) -> &str {
        &self.domain.name
    }

    fn field_modulus(&self) -> &BigUint {
        self.p()
    }

    fn order(&self) -> &BigUint {
        &self.domain.n
    }

    fn identity(&self) -> WeierstrassPoint {
        self.infinity()
    }

    fn generator(&self) -> WeierstrassPoint {
        WeierstrassPoint {
            coords: Some((self.domain.gx.clone(), self.domain.gy.clone())),
            curve: self.clone(),
        }
    }

    /// SEC1 encoding: `00` for infinity, `02`/`03` followed by x for
    /// compressed points, `04` followed by x and y for uncompressed ones.
    fn decode_point(&self, bytes: &[u8]) -> Result<WeierstrassPoint> {
        let len = self.field_bytes();
        match bytes {
            [SEC1_INFINITY] => Ok(self.infinity()),
            [tag @ (SEC1_COMPRESSED_EVEN | SEC1_COMPRESSED_ODD), x @ ..] if x.len() == len => {
                self.decompress(&CompressedPoint {
                    x: BigUint::from_bytes_be(x),
                    y_odd: *tag == SEC1_COMPRESSED_ODD,
                })
            }
            [SEC1_UNCOMPRESSED, xy @ ..] if xy.len() == 2 * len => {
                let (x, y) = xy.split_at(len);
                let (x, y) = (BigUint::from_bytes_be(x), BigUint::from_bytes_be(y));
                if &x >= self.p() || &y >= self.p() {
                    return Err(CurveError::InvalidEncoding(
                        "coordinate is not below the field modulus".into(),
                    ));
                }
                self.point(x, y)
            }
            _ => Err(CurveError::InvalidEncoding(format!(
                "unrecognized SEC1 point encoding of {} bytes",
                bytes.len()
            ))),
        }
    }
}

impl WeierstrassPoint {
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    #[inline]
    pub fn x(&self) -> Option<&FieldElement> {
        self.coords.as_ref().map(|(x, _)| x)
    }

    #[inline]
    pub fn y(&self) -> Option<&FieldElement> {
        self.coords.as_ref().map(|(_, y)| y)
    }

    /// The x-coordinate plus the parity of y. The point at infinity has no
    /// compressed form.
    pub fn compress(&self) -> Result<CompressedPoint> {
        let (x, y) = self.coords.as_ref().ok_or_else(|| {
            CurveError::InvalidPoint("the point at infinity cannot be compressed".into())
        })?;
        Ok(CompressedPoint {
            x: x.value().clone(),
            y_odd: y.is_odd(),
        })
    }

    /// SEC1 `04 || x || y`.
    pub fn encode_uncompressed(&self) -> Result<Vec<u8>> {
        let Some((x, y)) = &self.coords else {
            return Ok(vec![SEC1_INFINITY]);
        };
        let len = self.curve.field_bytes();
        let mut out = Vec::with_capacity(1 + 2 * len);
        out.push(SEC1_UNCOMPRESSED);
        out.extend_from_slice(&to_be_padded(x.value(), len)?);
        out.extend_from_slice(&to_be_padded(y.value(), len)?);
        Ok(out)
    }

    /// Smallest `k > 0` with `k * self = infinity`, found by repeated addition.
    ///
    /// Only feasible for toy curves; fields wider than 24 bits are rejected.
    pub fn order(&self) -> Result<BigUint> {
        if self.curve.p().bits() > 24 {
            return Err(CurveError::PreconditionViolated(
                "naive order computation needs a field of at most 24 bits".into(),
            ));
        }
        let mut order = BigUint::one();
        let mut current = self.clone();
        while !current.is_infinity() {
            current = current.add(self)?;
            order += 1u32;
        }
        Ok(order)
    }
}

impl CurvePoint for WeierstrassPoint {
    type Curve = WeierstrassCurve;

    #[inline]
    fn curve(&self) -> &WeierstrassCurve {
        &self.curve
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity()
    }

    /// Check `y^2 = x^3 + a*x + b`. Infinity is always on the curve.
    fn is_on_curve(&self) -> bool {
        match &self.coords {
            None => true,
            Some((x, y)) => self.curve.rhs(x).map(|rhs| y.square() == rhs).unwrap_or(false),
        }
    }

    fn negate(&self) -> Self {
        Self {
            coords: self.coords.as_ref().map(|(x, y)| (x.clone(), y.neg())),
            curve: self.curve.clone(),
        }
    }

    fn add(&self, other: &Self) -> Result<Self> {
        if self.curve != other.curve {
            return Err(CurveError::DomainMismatch);
        }
        let Some((x1, y1)) = &self.coords else {
            return Ok(other.clone());
        };
        let Some((x2, y2)) = &other.coords else {
            return Ok(self.clone());
        };

        if x1 == x2 && *y1 == y2.neg() {
            return Ok(self.curve.infinity());
        }

        // With the inverse case excluded, equal x implies equal points.
        let (numerator, denominator) = if x1 == x2 {
            let three_x2 = x1.square().mul(&x1.lift(3))?;
            (three_x2.add(self.curve.a())?, y1.add(y1)?)
        } else {
            (y2.sub(y1)?, x2.sub(x1)?)
        };
        let lambda = numerator
            .div(&denominator)
            .map_err(|_| CurveError::Internal("zero denominator in the slope"))?;

        // x_r = λ^2 - x1 - x2
        let x_r = lambda.square().sub(x1)?.sub(x2)?;

        // y_r = λ(x1 - x_r) - y1
        let y_r = lambda.mul(&x1.sub(&x_r)?)?.sub(y1)?;

        Ok(Self {
            coords: Some((x_r, y_r)),
            curve: self.curve.clone(),
        })
    }

    /// SEC1 compressed encoding, or the single byte `00` for infinity.
    fn encode(&self) -> Result<Vec<u8>> {
        if self.is_infinity() {
            return Ok(vec![SEC1_INFINITY]);
        }
        let compressed = self.compress()?;
        let mut out = Vec::with_capacity(1 + self.curve.field_bytes());
        out.push(if compressed.y_odd {
            SEC1_COMPRESSED_ODD
        } else {
            SEC1_COMPRESSED_EVEN
        });
        out.extend_from_slice(&to_be_padded(&compressed.x, self.curve.field_bytes())?);
        Ok(out)
    }
}

impl PartialEq for WeierstrassPoint {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords && self.curve == other.curve
    }
}

impl Eq for WeierstrassPoint {}

impl PartialOrd for WeierstrassPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Infinity sorts first, then points compare by `(x, y)`.
impl Ord for WeierstrassPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coords
            .cmp(&other.coords)
            .then_with(|| self.curve.cmp(&other.curve))
    }
}

impl Display for WeierstrassPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.coords {
            None => write!(f, "(inf)"),
            Some((x, y)) => write!(f, "({x}, {y})"),
        }
    }
}

impl Display for WeierstrassCurve {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: y^2 = x^3 + {}x + {} mod 0x{:x}, n = 0x{:x}, h = {}, G = {}",
            self.name(),
            self.domain.a,
            self.domain.b,
            self.p(),
            self.domain.n,
            self.domain.cofactor,
            self.generator()
        )
    }
}
