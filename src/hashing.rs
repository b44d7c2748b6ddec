//! Hash primitives for Heliocoin
//!
//! Two distinct hashes are computed over the same 80 header bytes:
//! - the identity hash (double SHA-256), used for chain linkage and
//!   peer-to-peer referencing, cheap enough to compute everywhere;
//! - the proof-of-work hash (scrypt), memory-hard so that difficulty
//!   comparisons resist low-memory specialized hardware.
//!
//! Mixing the two up breaks either chain linkage or proof-of-work security,
//! so callers go through the named functions below rather than a generic
//! digest interface.

use scrypt::{scrypt, Params};
use sha2::{Digest, Sha256};

/// A 256-bit hash, stored as raw bytes in little-endian word order.
pub type Hash256 = [u8; 32];

/// The all-zero null/sentinel hash (parent of the genesis block).
pub const NULL_HASH: Hash256 = [0u8; 32];

/// True for the all-zero sentinel value.
pub fn is_null_hash(hash: &Hash256) -> bool {
    *hash == NULL_HASH
}

/// Double SHA-256: the identity hash over a byte sequence.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// scrypt cost factor: N = 2^10 = 1024.
const SCRYPT_LOG_N: u8 = 10;
const SCRYPT_R: u32 = 1;
const SCRYPT_P: u32 = 1;

/// Memory-hard proof-of-work hash with fixed parameters (1024, 1, 1, 256-bit
/// output). The input doubles as the salt, matching the consensus definition.
pub fn scrypt_pow_hash(data: &[u8]) -> Hash256 {
    let params =
        Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, 32).expect("fixed scrypt parameters are valid");
    let mut out = [0u8; 32];
    scrypt(data, data, &params, &mut out).expect("32-byte scrypt output is valid");
    out
}
