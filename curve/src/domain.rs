use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;

use crate::edwards::EdwardsCurve;
use crate::errors::{CurveError, Result};
use crate::group::Curve;
use crate::weierstrass::WeierstrassCurve;

/// A curve domain of either supported family.
///
/// Protocols that only make sense for one family ask for it through
/// [`CurveDomain::as_weierstrass`] or [`CurveDomain::as_edwards`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurveDomain {
    Weierstrass(WeierstrassCurve),
    Edwards(EdwardsCurve),
}

impl CurveDomain {
    pub fn name(&self) -> &str {
        match self {
            Self::Weierstrass(curve) => curve.name(),
            Self::Edwards(curve) => curve.name(),
        }
    }

    pub fn order(&self) -> &BigUint {
        match self {
            Self::Weierstrass(curve) => curve.order(),
            Self::Edwards(curve) => curve.order(),
        }
    }

    pub fn field_modulus(&self) -> &BigUint {
        match self {
            Self::Weierstrass(curve) => curve.field_modulus(),
            Self::Edwards(curve) => curve.field_modulus(),
        }
    }

    pub fn as_weierstrass(&self) -> Result<&WeierstrassCurve> {
        match self {
            Self::Weierstrass(curve) => Ok(curve),
            Self::Edwards(curve) => Err(CurveError::Config(format!(
                "{} is not a short Weierstrass curve",
                curve.name()
            ))),
        }
    }

    pub fn as_edwards(&self) -> Result<&EdwardsCurve> {
        match self {
            Self::Edwards(curve) => Ok(curve),
            Self::Weierstrass(curve) => Err(CurveError::Config(format!(
                "{} is not a twisted Edwards curve",
                curve.name()
            ))),
        }
    }
}

impl From<WeierstrassCurve> for CurveDomain {
    fn from(curve: WeierstrassCurve) -> Self {
        Self::Weierstrass(curve)
    }
}

impl From<EdwardsCurve> for CurveDomain {
    fn from(curve: EdwardsCurve) -> Self {
        Self::Edwards(curve)
    }
}

impl Display for CurveDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weierstrass(curve) => Display::fmt(curve, f),
            Self::Edwards(curve) => Display::fmt(curve, f),
        }
    }
}
