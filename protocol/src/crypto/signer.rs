//! # Signer Seam
//!
//! Key custody lives outside this crate. A [`Signer`] receives the 32-byte
//! transaction hash and whatever private-key handle the caller holds, and
//! returns the signature bytes. Wallet bridges, HSMs and remote signers all
//! implement the same trait; [`Ed25519Signer`] covers the in-process case.

use async_trait::async_trait;

use super::keys::KdaKeypair;

/// Signature bytes returned by a [`Signer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureOutput {
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign_message(
        &self,
        hash_bytes: &[u8],
        private_key: &[u8],
    ) -> anyhow::Result<SignatureOutput>;
}

/// Signs in process with a raw Ed25519 seed (32 bytes) or keypair (64 bytes).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

#[async_trait]
impl Signer for Ed25519Signer {
    async fn sign_message(
        &self,
        hash_bytes: &[u8],
        private_key: &[u8],
    ) -> anyhow::Result<SignatureOutput> {
        let keypair = KdaKeypair::from_bytes(private_key)?;
        Ok(SignatureOutput {
            bytes: keypair.sign(hash_bytes).to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::verify;

    #[tokio::test]
    async fn signs_with_seed() {
        let kp = KdaKeypair::from_seed(&[9u8; 32]);
        let out = Ed25519Signer
            .sign_message(b"0123456789abcdef0123456789abcdef", &kp.secret_key_bytes())
            .await
            .unwrap();
        assert_eq!(out.bytes.len(), 64);
        assert!(verify(
            &kp.public_key_bytes(),
            b"0123456789abcdef0123456789abcdef",
            &out.bytes
        ));
    }

    #[tokio::test]
    async fn rejects_malformed_key() {
        let err = Ed25519Signer
            .sign_message(b"hash", &[1, 2, 3])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("3 bytes"));
    }
}
