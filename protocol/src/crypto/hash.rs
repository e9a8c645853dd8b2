//! # Hashing
//!
//! The transaction hash is a 32-byte BLAKE3 digest of the canonical raw-data
//! encoding. The [`Hasher`] trait is the seam for callers that must match a
//! different digest; [`Blake3Hasher`] is what everything defaults to.
//!
//! BLAKE3 is an extendable-output function, so the `output_len` argument is
//! honored for any length, not only 32.

use crate::config::HASH_OUTPUT_LENGTH;

/// Produces a digest of `output_len` bytes.
pub trait Hasher: Send + Sync {
    fn digest(&self, data: &[u8], output_len: usize) -> Vec<u8>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn digest(&self, data: &[u8], output_len: usize) -> Vec<u8> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(data);
        let mut out = vec![0u8; output_len];
        hasher.finalize_xof().fill(&mut out);
        out
    }
}

/// 32-byte BLAKE3 digest as a fixed-size array.
pub fn blake3_hash(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    *blake3::hash(data).as_bytes()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
