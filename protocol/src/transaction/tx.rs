//! The signable transaction.
//!
//! A [`Transaction`] wraps one immutable [`RawData`] and an ordered list of
//! signatures. Its hash covers the canonical raw-data encoding only, so
//! attaching signatures never changes it:
//!
//! ```text
//! hash = BLAKE3(RawData::encode_to_vec())[..32]
//! wire = SignedTransaction { raw_data = 1, signature = 2 (repeated) }
//! ```
//!
//! The hash is computed once at construction. No method here performs I/O;
//! [`Transaction::sign`] awaits only the supplied [`Signer`].

use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigInt;
use prost::Message;
use serde_json::Value;
use tracing::{debug, trace};

use super::loose;
use super::proto::{RawData, SignedTransaction, TxContract};
use crate::address::RawAddress;
use crate::amount;
use crate::config::HASH_OUTPUT_LENGTH;
use crate::crypto::hash::{Blake3Hasher, Hasher};
use crate::crypto::keys;
use crate::crypto::signer::Signer;
use crate::error::{Result, TxError};

#[derive(Clone)]
pub struct Transaction {
    raw: RawData,
    signatures: Vec<Vec<u8>>,
    hash: [u8; HASH_OUTPUT_LENGTH],
    hash_hex: OnceLock<String>,
}

impl Transaction {
    /// Wraps raw data and hashes it with BLAKE3.
    pub fn new(raw: RawData) -> Self {
        let hash = crate::crypto::blake3_hash(&raw.encode_to_vec());
        Self {
            raw,
            signatures: Vec::new(),
            hash,
            hash_hex: OnceLock::new(),
        }
    }

    /// Wraps raw data and hashes it with a caller-supplied [`Hasher`].
    pub fn with_hasher(raw: RawData, hasher: &dyn Hasher) -> Result<Self> {
        let hash = digest(hasher, &raw)?;
        Ok(Self {
            raw,
            signatures: Vec::new(),
            hash,
            hash_hex: OnceLock::new(),
        })
    }

    fn from_signed(signed: SignedTransaction, hasher: &dyn Hasher) -> Result<Self> {
        let raw = signed.raw_data.ok_or(TxError::MissingRawData)?;
        let mut tx = Self::with_hasher(raw, hasher)?;
        tx.signatures = signed.signature;
        Ok(tx)
    }

    pub fn raw_data(&self) -> &RawData {
        &self.raw
    }

    pub fn signatures(&self) -> &[Vec<u8>] {
        &self.signatures
    }

    pub fn contracts(&self) -> &[TxContract] {
        &self.raw.contract
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Lowercase hex of the hash, computed on first use.
    pub fn hash(&self) -> &str {
        self.hash_hex.get_or_init(|| hex::encode(self.hash))
    }

    pub fn hash_bytes(&self) -> [u8; HASH_OUTPUT_LENGTH] {
        self.hash
    }

    /// `k_app_fee + bandwidth_fee`, without overflow.
    pub fn total_fee(&self) -> BigInt {
        let k_app = BigInt::from(self.raw.k_app_fee);
        let bandwidth = BigInt::from(self.raw.bandwidth_fee);
        amount::sum([Some(&k_app), Some(&bandwidth)])
    }

    // -- Signing ------------------------------------------------------------

    /// Signs the hash through `signer` and appends the result. Earlier
    /// signatures are kept, so co-signers call this in turn.
    pub async fn sign(&mut self, signer: &dyn Signer, private_key: &[u8]) -> Result<&mut Self> {
        let output = signer
            .sign_message(&self.hash, private_key)
            .await
            .map_err(TxError::Signer)?;
        debug!(
            hash = %self.hash(),
            signatures = self.signatures.len() + 1,
            "transaction signed"
        );
        self.signatures.push(output.bytes);
        Ok(self)
    }

    /// Appends a signature produced elsewhere.
    pub fn add_signature(&mut self, signature: impl Into<Vec<u8>>) -> &mut Self {
        self.signatures.push(signature.into());
        self
    }

    /// Checks signature `index` as Ed25519 over the hash, with the sender's
    /// raw address as the public key.
    pub fn verify_signature(&self, index: usize) -> bool {
        let Some(signature) = self.signatures.get(index) else {
            return false;
        };
        let Ok(public_key) = RawAddress::try_from(self.raw.sender.as_slice()) else {
            return false;
        };
        keys::verify(&public_key, &self.hash, signature)
    }

    // -- Encoding -----------------------------------------------------------

    fn to_proto(&self) -> SignedTransaction {
        SignedTransaction {
            raw_data: Some(self.raw.clone()),
            signature: self.signatures.clone(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let bytes = self.to_proto().encode_to_vec();
        trace!(len = bytes.len(), "transaction encoded");
        bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_hasher(bytes, &Blake3Hasher)
    }

    pub fn from_bytes_with_hasher(bytes: &[u8], hasher: &dyn Hasher) -> Result<Self> {
        Self::from_signed(SignedTransaction::decode(bytes)?, hasher)
    }

    /// Accepts an optional `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(hex_str)?)
    }

    /// Decodes a loose JSON record: an envelope `{RawData, Signature}`, a
    /// bare raw-data object, or a hex string of the wire encoding.
    pub fn from_object(value: &Value) -> Result<Self> {
        Self::from_object_with_hasher(value, &Blake3Hasher)
    }

    pub fn from_object_with_hasher(value: &Value, hasher: &dyn Hasher) -> Result<Self> {
        match value {
            Value::String(hex_str) => Self::from_bytes_with_hasher(&decode_hex(hex_str)?, hasher),
            other => Self::from_signed(loose::decode(other)?, hasher),
        }
    }

    /// Loose record with PascalCase keys and base64 bytes. Reads back
    /// through [`from_object`](Self::from_object).
    pub fn to_object(&self) -> Value {
        loose::encode(&self.raw, &self.signatures)
    }
}

fn decode_hex(hex_str: &str) -> Result<Vec<u8>> {
    let trimmed = hex_str.trim();
    Ok(hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))?)
}

fn digest(hasher: &dyn Hasher, raw: &RawData) -> Result<[u8; HASH_OUTPUT_LENGTH]> {
    let out = hasher.digest(&raw.encode_to_vec(), HASH_OUTPUT_LENGTH);
    let len = out.len();
    out.try_into().map_err(|_| TxError::Encoding {
        reason: format!("hasher returned {len} bytes, expected {HASH_OUTPUT_LENGTH}"),
    })
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.signatures == other.signatures && self.hash == other.hash
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("hash", &self.hash())
            .field("nonce", &self.raw.nonce)
            .field("contracts", &self.raw.contract.len())
            .field("signatures", &self.signatures.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KdaKeypair;
    use crate::crypto::signer::Ed25519Signer;
    use crate::error::ErrorKind;

    fn sample_raw(sender: &[u8]) -> RawData {
        RawData {
            nonce: 123,
            sender: sender.to_vec(),
            k_app_fee: 500_000,
            bandwidth_fee: 100_000,
            version: 1,
            chain_id: b"108".to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn hash_is_blake3_of_raw_encoding() {
        let raw = sample_raw(&[1; 32]);
        let expected = crate::crypto::blake3_hash(&raw.encode_to_vec());
        let tx = Transaction::new(raw);
        assert_eq!(tx.hash_bytes(), expected);
        assert_eq!(tx.hash(), hex::encode(expected));
        assert_eq!(tx.hash().len(), 64);
    }

    #[test]
    fn total_fee_sums_both_fees() {
        let tx = Transaction::new(sample_raw(&[1; 32]));
        assert_eq!(tx.total_fee(), BigInt::from(600_000));
        assert!(!tx.is_signed());
    }

    #[test]
    fn total_fee_does_not_overflow() {
        let raw = RawData {
            k_app_fee: i64::MAX,
            bandwidth_fee: i64::MAX,
            ..Default::default()
        };
        let expected = BigInt::from(i64::MAX) * 2;
        assert_eq!(Transaction::new(raw).total_fee(), expected);
    }

    #[test]
    fn bytes_and_hex_round_trip() {
        let mut tx = Transaction::new(sample_raw(&[1; 32]));
        tx.add_signature(vec![7u8; 64]);

        let back = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        assert_eq!(back, tx);
        assert_eq!(back.hash(), tx.hash());

        let hex_str = tx.to_hex();
        assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(Transaction::from_hex(&format!("0x{hex_str}")).unwrap(), tx);
    }

    #[test]
    fn decoding_without_raw_data_fails() {
        let empty = SignedTransaction {
            raw_data: None,
            signature: vec![vec![1; 64]],
        };
        let err = Transaction::from_bytes(&empty.encode_to_vec()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRawData);

        let err = Transaction::from_object(&serde_json::json!({ "Signature": [] })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRawData);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = Transaction::from_bytes(&[0xff, 0xff, 0xff]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(Transaction::from_hex("zz").unwrap_err().kind(), ErrorKind::Decoding);
    }

    #[test]
    fn object_round_trip() {
        let mut tx = Transaction::new(sample_raw(&[1; 32]));
        tx.add_signature(vec![3u8; 64]);
        let back = Transaction::from_object(&tx.to_object()).unwrap();
        assert_eq!(back.raw_data(), tx.raw_data());
        assert_eq!(back.signatures(), tx.signatures());
        assert_eq!(back.hash(), tx.hash());
    }

    #[test]
    fn object_accepts_hex_string() {
        let tx = Transaction::new(sample_raw(&[1; 32]));
        let back = Transaction::from_object(&Value::String(tx.to_hex())).unwrap();
        assert_eq!(back, tx);
    }

    #[tokio::test]
    async fn signing_appends_and_keeps_hash() {
        let alice = KdaKeypair::from_seed(&[1u8; 32]);
        let bob = KdaKeypair::from_seed(&[2u8; 32]);
        let mut tx = Transaction::new(sample_raw(&alice.public_key_bytes()));
        let hash_before = tx.hash().to_string();

        tx.sign(&Ed25519Signer, &alice.secret_key_bytes()).await.unwrap();
        tx.sign(&Ed25519Signer, &bob.secret_key_bytes()).await.unwrap();

        assert!(tx.is_signed());
        assert_eq!(tx.signatures().len(), 2);
        assert_eq!(tx.hash(), hash_before);
        assert!(tx.verify_signature(0));
        assert!(!tx.verify_signature(1), "bob is not the sender");
        assert!(!tx.verify_signature(2));
    }

    #[tokio::test]
    async fn signer_failure_is_wrapped() {
        let mut tx = Transaction::new(sample_raw(&[1; 32]));
        let err = tx.sign(&Ed25519Signer, &[0u8; 5]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Signer);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!tx.is_signed());
    }

    struct ShortHasher;

    impl Hasher for ShortHasher {
        fn digest(&self, _data: &[u8], _output_len: usize) -> Vec<u8> {
            vec![0; 4]
        }
    }

    #[test]
    fn hasher_with_wrong_length_is_rejected() {
        let err = Transaction::with_hasher(RawData::default(), &ShortHasher).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }
}
