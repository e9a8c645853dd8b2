//! # Cryptographic Collaborators
//!
//! Hashing and signing are consumed through traits so the transaction core
//! never has to know where keys live or which digest a deployment mandates.
//! The default implementations are thin wrappers around audited crates:
//!
//! - **BLAKE3** for the transaction hash.
//! - **Ed25519** (`ed25519-dalek`) for signatures; the raw address is the
//!   public key.
//!
//! Nothing here logs key bytes. Keep it that way.

pub mod hash;
pub mod keys;
pub mod signer;

pub use hash::{blake3_hash, Blake3Hasher, Hasher};
pub use keys::{verify, KdaKeypair, KeyError};
pub use signer::{Ed25519Signer, SignatureOutput, Signer};
