//! # Address Codec
//!
//! Human-readable addresses are Bech32 strings over the raw 32-byte address,
//! which is the account's Ed25519 public key:
//!
//! ```text
//! public_key (32 bytes) -> Bech32("klv", public_key) -> klv1...
//! ```
//!
//! Raw transaction data never stores the human-readable form. The builder
//! decodes every address it accepts through an [`AddressCodec`], so a
//! malformed address is rejected at the call that supplied it.

use bech32::{Bech32, Hrp};
use thiserror::Error;

use crate::config::{NetworkConfig, ADDRESS_HRP, ADDRESS_LENGTH};

/// Raw address bytes.
pub type RawAddress = [u8; ADDRESS_LENGTH];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    #[error("bech32 encode error: {0}")]
    Bech32Encode(String),

    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// DecodedAddress
// ---------------------------------------------------------------------------

/// An address that has already passed through a codec: the text the caller
/// supplied plus the raw bytes that go on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    pub text: String,
    pub raw: RawAddress,
}

impl DecodedAddress {
    pub fn parse(codec: &dyn AddressCodec, text: &str) -> Result<Self, AddressError> {
        let text = text.trim();
        let raw = codec.decode(text)?;
        Ok(Self {
            text: text.to_string(),
            raw,
        })
    }
}

// ---------------------------------------------------------------------------
// AddressCodec
// ---------------------------------------------------------------------------

/// Converts between human-readable and raw addresses.
pub trait AddressCodec: Send + Sync {
    /// Decodes to exactly [`ADDRESS_LENGTH`] bytes or fails.
    fn decode(&self, address: &str) -> Result<RawAddress, AddressError>;

    fn encode(&self, raw: &RawAddress) -> Result<String, AddressError>;

    fn is_valid(&self, address: &str) -> bool {
        self.decode(address).is_ok()
    }
}

/// Bech32 codec bound to one human-readable prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32AddressCodec {
    hrp: Hrp,
}

impl Bech32AddressCodec {
    pub fn new(hrp: &str) -> Result<Self, AddressError> {
        let hrp = Hrp::parse(hrp).map_err(|e| AddressError::Bech32Encode(e.to_string()))?;
        Ok(Self { hrp })
    }

    /// Codec for the public networks (`klv1...`).
    pub fn mainnet() -> Self {
        Self {
            hrp: Hrp::parse_unchecked(ADDRESS_HRP),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, AddressError> {
        Self::new(&config.address_hrp)
    }

    pub fn hrp(&self) -> &str {
        self.hrp.as_str()
    }
}

impl Default for Bech32AddressCodec {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl AddressCodec for Bech32AddressCodec {
    fn decode(&self, address: &str) -> Result<RawAddress, AddressError> {
        let (hrp, data) =
            bech32::decode(address).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        if hrp != self.hrp {
            return Err(AddressError::InvalidHrp {
                expected: self.hrp.to_string(),
                got: hrp.to_string(),
            });
        }

        let raw: RawAddress =
            data.as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidDataLength {
                    expected: ADDRESS_LENGTH,
                    got: data.len(),
                })?;
        Ok(raw)
    }

    fn encode(&self, raw: &RawAddress) -> Result<String, AddressError> {
        bech32::encode::<Bech32>(self.hrp, raw).map_err(|e| AddressError::Bech32Encode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
