//! Fixed-width integer encodings shared by the point formats.

use num_bigint::BigUint;

use crate::errors::{CurveError, Result};

/// Number of bytes needed to hold any integer below `modulus`.
#[inline]
pub fn byte_len(modulus: &BigUint) -> usize {
    (modulus.bits() as usize).div_ceil(8)
}

/// Big-endian encoding left-padded with zeros to `len` bytes.
pub fn to_be_padded(value: &BigUint, len: usize) -> Result<Vec<u8>> {
    let bytes = value.to_bytes_be();
    if bytes.len() > len {
        return Err(CurveError::InvalidEncoding(format!(
            "value needs {} bytes, only {len} available",
            bytes.len()
        )));
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

/// Little-endian encoding right-padded with zeros to `len` bytes.
pub fn to_le_padded(value: &BigUint, len: usize) -> Result<Vec<u8>> {
    let mut out = value.to_bytes_le();
    if out.len() > len {
        return Err(CurveError::InvalidEncoding(format!(
            "value needs {} bytes, only {len} available",
            out.len()
        )));
    }
    out.resize(len, 0);
    Ok(out)
}
