//! Named curve parameters.
//!
//! The tables are static, read-only configuration. Each curve is parsed and
//! validated the first time it is looked up; later lookups hand out clones
//! of the same shared domain.

use num_bigint::BigUint;
use std::sync::OnceLock;
use tracing::instrument;

use crate::domain::CurveDomain;
use crate::edwards::{EdwardsCurve, EdwardsParams};
use crate::errors::{CurveError, Result};
use crate::weierstrass::{WeierstrassCurve, WeierstrassParams};

enum Table {
    Weierstrass {
        p: &'static str,
        a: &'static str,
        b: &'static str,
        n: &'static str,
        cofactor: &'static str,
        gx: &'static str,
        gy: &'static str,
    },
    Edwards {
        p: &'static str,
        a: &'static str,
        d: &'static str,
        l: &'static str,
        cofactor: &'static str,
        gx: &'static str,
        gy: &'static str,
        encoding_bits: usize,
    },
}

struct Entry {
    names: &'static [&'static str],
    table: Table,
    loaded: OnceLock<Result<CurveDomain>>,
}

static REGISTRY: [Entry; 5] = [
    Entry {
        names: &["secp112r1"],
        table: Table::Weierstrass {
            p: "db7c2abf62e35e668076bead208b",
            a: "db7c2abf62e35e668076bead2088",
            b: "659ef8ba043916eede8911702b22",
            n: "db7c2abf62e35e7628dfac6561c5",
            cofactor: "1",
            gx: "09487239995a5ee76b55f9c2f098",
            gy: "a89ce5af8724c0a23e0e0ff77500",
        },
        loaded: OnceLock::new(),
    },
    Entry {
        names: &["secp192k1"],
        table: Table::Weierstrass {
            p: "fffffffffffffffffffffffffffffffffffffffeffffee37",
            a: "0",
            b: "3",
            n: "fffffffffffffffffffffffe26f2fc170f69466a74defd8d",
            cofactor: "1",
            gx: "db4ff10ec057e9ae26b07d0280b7f4341da5d1b1eae06c7d",
            gy: "9b2f2f6d9c5628a7844163d015be86344082aa88d95e2f9d",
        },
        loaded: OnceLock::new(),
    },
    Entry {
        names: &["secp256k1"],
        table: Table::Weierstrass {
            p: "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
            a: "0",
            b: "7",
            n: "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            cofactor: "1",
            gx: "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
            gy: "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        },
        loaded: OnceLock::new(),
    },
    Entry {
        names: &["secp256r1", "prime256v1", "P-256"],
        table: Table::Weierstrass {
            p: "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
            a: "ffffffff00000001000000000000000000000000fffffffffffffffffffffffc",
            b: "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
            n: "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
            cofactor: "1",
            gx: "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
            gy: "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
        },
        loaded: OnceLock::new(),
    },
    Entry {
        names: &["ed25519"],
        table: Table::Edwards {
            p: "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed",
            a: "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffec",
            d: "52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3",
            l: "1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed",
            cofactor: "8",
            gx: "216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a",
            gy: "6666666666666666666666666666666666666666666666666666666666666658",
            encoding_bits: 256,
        },
        loaded: OnceLock::new(),
    },
];

fn parse(curve: &str, field: &str, hex: &str) -> Result<BigUint> {
    BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| CurveError::Config(format!("{curve}: malformed parameter {field}")))
}

impl Entry {
    fn load(&self) -> Result<CurveDomain> {
        let name = self.names[0];
        match &self.table {
            Table::Weierstrass { p, a, b, n, cofactor, gx, gy } => {
                let params = WeierstrassParams {
                    name: name.to_string(),
                    a: parse(name, "a", a)?,
                    b: parse(name, "b", b)?,
                    p: parse(name, "p", p)?,
                    n: parse(name, "n", n)?,
                    cofactor: parse(name, "cofactor", cofactor)?,
                    gx: parse(name, "gx", gx)?,
                    gy: parse(name, "gy", gy)?,
                };
                Ok(WeierstrassCurve::new(params)?.into())
            }
            Table::Edwards { p, a, d, l, cofactor, gx, gy, encoding_bits } => {
                let params = EdwardsParams {
                    name: name.to_string(),
                    p: parse(name, "p", p)?,
                    a: parse(name, "a", a)?,
                    d: parse(name, "d", d)?,
                    l: parse(name, "l", l)?,
                    cofactor: parse(name, "cofactor", cofactor)?,
                    gx: parse(name, "gx", gx)?,
                    gy: parse(name, "gy", gy)?,
                    encoding_bits: *encoding_bits,
                };
                Ok(EdwardsCurve::new(params)?.into())
            }
        }
    }
}

/// Names of every curve in the registry, aliases excluded.
pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|entry| entry.names[0])
}

/// Look up a curve by name or alias, ignoring ASCII case.
///
/// Fails with [`CurveError::Config`] for unknown names.
#[instrument(level = "debug")]
pub fn lookup(name: &str) -> Result<CurveDomain> {
    let entry = REGISTRY
        .iter()
        .find(|entry| entry.names.iter().any(|n| n.eq_ignore_ascii_case(name)))
        .ok_or_else(|| CurveError::Config(format!("unknown curve {name:?}")))?;
    entry.loaded.get_or_init(|| entry.load()).clone()
}

/// Look up a curve that must be a short Weierstrass curve.
pub fn weierstrass(name: &str) -> Result<WeierstrassCurve> {
    lookup(name)?.as_weierstrass().cloned()
}

pub fn ed25519() -> Result<EdwardsCurve> {
    lookup("ed25519")?.as_edwards().cloned()
}
