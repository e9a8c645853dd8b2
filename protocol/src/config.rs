//! # Chain Configuration & Constants
//!
//! Every constant that ends up inside a signed transaction lives here. If one
//! of these changes, every hash computed with the old value is invalid, so
//! treat edits to this file like a consensus change.
//!
//! Runtime-selectable parameters (which network, which chain id, which address
//! prefix) live in [`NetworkConfig`], which can be built from a named preset,
//! a JSON document, or the process environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Mainnet chain id. Stored on the wire as its ASCII bytes.
pub const CHAIN_ID_MAINNET: &str = "108";

/// Testnet chain id.
pub const CHAIN_ID_TESTNET: &str = "109";

/// Devnet chain id. Reset without notice; never reuse devnet signatures.
pub const CHAIN_ID_DEVNET: &str = "420";

/// Bech32 human-readable prefix shared by all public networks.
pub const ADDRESS_HRP: &str = "klv";

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// The chain's base currency. Fees are paid in it unless a secondary-asset
/// (KDA) fee is attached.
pub const NATIVE_ASSET: &str = "KLV";

// ---------------------------------------------------------------------------
// Wire Parameters
// ---------------------------------------------------------------------------

/// Raw address length in bytes. An address *is* an Ed25519 public key.
pub const ADDRESS_LENGTH: usize = 32;

/// Transaction hash length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Envelope version written into every raw transaction.
pub const TX_VERSION: u32 = 1;

/// Prefix of the `type_url` carried by every encoded operation payload.
pub const CONTRACT_TYPE_URL_PREFIX: &str = "type.googleapis.com/proto.";

// ---------------------------------------------------------------------------
// Environment Keys
// ---------------------------------------------------------------------------

/// Selects a named network preset (`mainnet`, `testnet`, `devnet`).
pub const ENV_NETWORK: &str = "KDA_NETWORK";

/// Overrides the chain id of the selected preset.
pub const ENV_CHAIN_ID: &str = "KDA_CHAIN_ID";

/// Overrides the address prefix of the selected preset.
pub const ENV_ADDRESS_HRP: &str = "KDA_ADDRESS_HRP";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading a [`NetworkConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown network name: {0}")]
    UnknownNetwork(String),

    #[error("chain id must not be empty")]
    EmptyChainId,

    #[error("address prefix must not be empty")]
    EmptyHrp,

    #[error("invalid network config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Named network presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    /// The chain id this preset signs for.
    pub fn chain_id(self) -> &'static str {
        match self {
            Self::Mainnet => CHAIN_ID_MAINNET,
            Self::Testnet => CHAIN_ID_TESTNET,
            Self::Devnet => CHAIN_ID_DEVNET,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "devnet" | "dev" => Ok(Self::Devnet),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

fn default_hrp() -> String {
    ADDRESS_HRP.to_string()
}

/// The network a builder targets.
///
/// The chain id here is the last fallback when neither a build override nor
/// an explicit `set_chain_id` call supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network: Network,
    pub chain_id: String,
    #[serde(default = "default_hrp")]
    pub address_hrp: String,
}

impl NetworkConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            chain_id: network.chain_id().to_string(),
            address_hrp: default_hrp(),
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::for_network(Network::Testnet)
    }

    pub fn devnet() -> Self {
        Self::for_network(Network::Devnet)
    }

    /// Parses a JSON document such as
    /// `{"network": "testnet", "chainId": "109", "addressHrp": "klv"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from `KDA_NETWORK`, `KDA_CHAIN_ID` and
    /// `KDA_ADDRESS_HRP`. Unset variables fall back to the mainnet preset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = match lookup(ENV_NETWORK) {
            Some(name) => name.parse()?,
            None => Network::Mainnet,
        };
        let mut config = Self::for_network(network);
        if let Some(chain_id) = lookup(ENV_CHAIN_ID) {
            config.chain_id = chain_id.trim().to_string();
        }
        if let Some(hrp) = lookup(ENV_ADDRESS_HRP) {
            config.address_hrp = hrp.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::EmptyChainId);
        }
        if self.address_hrp.trim().is_empty() {
            return Err(ConfigError::EmptyHrp);
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
