use num_bigint::BigUint;
use rand::Rng;

use crate::encoding::byte_len;
use crate::errors::{CurveError, Result};

/// Draw a uniformly distributed integer from `[low, high]` by rejection sampling.
///
/// The quality of the result is that of `rng`; callers that derive keys or
/// nonces from it must pass a cryptographically secure generator.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, low: &BigUint, high: &BigUint) -> Result<BigUint> {
    if low > high {
        return Err(CurveError::PreconditionViolated(format!(
            "empty range [{low}, {high}]"
        )));
    }

    let span = high - low;
    let bits = span.bits();
    let mut buf = vec![0u8; byte_len(&span).max(1)];
    let excess = buf.len() as u64 * 8 - bits;

    loop {
        rng.fill_bytes(&mut buf);
        let mut candidate = BigUint::from_bytes_be(&buf);
        candidate >>= excess;
        if candidate <= span {
            return Ok(candidate + low);
        }
    }
}
