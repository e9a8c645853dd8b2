//! # Key Material
//!
//! Ed25519 keypairs for account holders. On this chain the raw address is
//! the public key itself, so a keypair knows its own address without any
//! extra derivation step.
//!
//! Key bytes are never logged. `Debug` prints the public half only.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::address::{AddressCodec, AddressError, RawAddress};
use crate::config::SIGNATURE_LENGTH;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key: expected 32-byte seed or 64-byte keypair, got {0} bytes")]
    InvalidSecretKey(usize),

    #[error("invalid secret key hex")]
    InvalidHex,

    #[error("keypair bytes are inconsistent: public half does not match the seed")]
    KeypairMismatch,
}

/// An account keypair.
pub struct KdaKeypair {
    signing_key: SigningKey,
}

impl KdaKeypair {
    /// Fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Accepts a 32-byte seed or a 64-byte `seed || public_key` keypair.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed))
            }
            64 => {
                let mut pair = [0u8; 64];
                pair.copy_from_slice(bytes);
                let signing_key =
                    SigningKey::from_keypair_bytes(&pair).map_err(|_| KeyError::KeypairMismatch)?;
                Ok(Self { signing_key })
            }
            other => Err(KeyError::InvalidSecretKey(other)),
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    /// The raw address of this keypair.
    pub fn public_key_bytes(&self) -> RawAddress {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The human-readable address under the given codec.
    pub fn address(&self, codec: &dyn AddressCodec) -> Result<String, AddressError> {
        codec.encode(&self.public_key_bytes())
    }

    /// Handle with care; this is the account.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl Clone for KdaKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for KdaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KdaKeypair(pub={})", hex::encode(self.public_key_bytes()))
    }
}

/// Verifies an Ed25519 signature against a raw address.
///
/// Returns `false` for anything malformed rather than erroring; callers only
/// need a yes or no.
pub fn verify(public_key: &RawAddress, message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(sig_bytes) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(&sig_bytes))
        .is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
