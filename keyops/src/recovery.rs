//! Private key recovery from two ECDSA signatures that share a nonce.
//!
//! With `s_i = k^-1 (e_i + r d)` for the same `k`, the nonce is
//! `k = (e1 - e2) / (s1 - s2)` and the key is `d = (k s1 - e1) / r`, all
//! modulo `n`. This is an attack, kept to demonstrate why ECDSA nonces must
//! never repeat.

use curve::{Curve, FieldElement, WeierstrassCurve};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{info, instrument};

use crate::ecdsa::{EcdsaSignature, digest_to_integer};
use crate::errors::{KeyOpsError, Result};

/// The nonce and private key behind two signatures with a repeated nonce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveredKey {
    pub nonce: BigUint,
    pub private_key: BigUint,
}

/// Recovers the signer's nonce and private key.
///
/// Each message is hashed with the algorithm recorded in its own signature.
///
/// # Errors
///
/// Returns [`KeyOpsError::PreconditionViolated`] if the messages are equal,
/// the `r` values differ (so the nonce was not reused), or the two signatures
/// do not determine a unique solution.
#[instrument(level = "debug", skip_all, fields(curve = curve.name()))]
pub fn recover_private_key(
    curve: &WeierstrassCurve,
    message1: &[u8],
    signature1: &EcdsaSignature,
    message2: &[u8],
    signature2: &EcdsaSignature,
) -> Result<RecoveredKey> {
    if message1 == message2 {
        return Err(KeyOpsError::PreconditionViolated(
            "messages must differ".into(),
        ));
    }
    if signature1.r != signature2.r {
        return Err(KeyOpsError::PreconditionViolated(
            "signatures have different r, the nonce was not reused".into(),
        ));
    }

    let n = curve.n();
    let zero = FieldElement::new(BigUint::zero(), n.clone())?;
    let reduced = |v: &BigUint| zero.sibling(v.clone());
    let e1 = reduced(&digest_to_integer(&signature1.hash.digest(message1), n));
    let e2 = reduced(&digest_to_integer(&signature2.hash.digest(message2), n));
    let s1 = reduced(&signature1.s);
    let s2 = reduced(&signature2.s);
    let r = reduced(&signature1.r);

    let nonce = e1.sub(&e2)?.div(&s1.sub(&s2)?).map_err(|_| {
        KeyOpsError::PreconditionViolated("s1 - s2 has no inverse modulo n".into())
    })?;
    if nonce.is_zero() {
        return Err(KeyOpsError::PreconditionViolated(
            "messages hash to the same value modulo n".into(),
        ));
    }
    let private_key = nonce.mul(&s1)?.sub(&e1)?.div(&r).map_err(|_| {
        KeyOpsError::PreconditionViolated("r has no inverse modulo n".into())
    })?;

    info!("recovered private key from a reused nonce");
    Ok(RecoveredKey {
        nonce: nonce.into_value(),
        private_key: private_key.into_value(),
    })
}
