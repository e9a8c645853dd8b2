//! # Error Taxonomy
//!
//! One error type for the whole assembly pipeline. Every variant maps to a
//! stable [`ErrorKind`] so callers branch on the kind, never on message text,
//! and every variant can describe itself as structured JSON via
//! [`TxError::detail`].
//!
//! Collaborator failures (signer, network client) are carried unmodified:
//! the original `anyhow::Error` is the `source()` of the wrapper.

use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TxError>;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Machine-checkable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or missing input: non-positive amount, missing field,
    /// negative fee or nonce.
    Validation,
    /// An address did not decode to a raw 32-byte address.
    InvalidAddress,
    /// No chain id from overrides, builder state, or network config.
    MissingChainId,
    /// Node-assisted building was requested without a network client.
    ClientRequired,
    /// An encoded envelope carried no raw transaction data.
    MissingRawData,
    /// The operation has no offline wire encoding.
    UnsupportedOperation,
    /// A value does not fit the fixed-width wire integer.
    AmountOutOfRange,
    /// A collaborator produced output the encoder cannot use.
    Encoding,
    /// Bytes, hex, or a loose record could not be decoded.
    Decoding,
    /// The signer collaborator failed.
    Signer,
    /// The network client collaborator failed.
    Network,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::MissingChainId => "MISSING_CHAIN_ID",
            Self::ClientRequired => "CLIENT_REQUIRED",
            Self::MissingRawData => "MISSING_RAW_DATA",
            Self::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            Self::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
            Self::Encoding => "ENCODING",
            Self::Decoding => "DECODING",
            Self::Signer => "SIGNER",
            Self::Network => "NETWORK",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// TxError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TxError {
    #[error("invalid `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("invalid address in `{field}`: {address:?} ({reason})")]
    InvalidAddress {
        field: String,
        address: String,
        reason: String,
    },

    #[error("chain id is not set and no network is configured")]
    MissingChainId,

    #[error("a network client is required for node-assisted building")]
    ClientRequired,

    #[error("transaction carries no raw data")]
    MissingRawData,

    #[error("operation `{kind}` has no offline wire encoding")]
    UnsupportedOperation { kind: String },

    #[error("`{field}` value {value} does not fit in {target}")]
    AmountOutOfRange {
        field: String,
        value: String,
        target: &'static str,
    },

    #[error("encoding failed: {reason}")]
    Encoding { reason: String },

    #[error("decoding failed: {reason}")]
    Decoding { reason: String },

    #[error("signer failed: {0}")]
    Signer(#[source] anyhow::Error),

    #[error("network client failed: {0}")]
    Network(#[source] anyhow::Error),
}

impl TxError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_address(
        field: impl Into<String>,
        address: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::InvalidAddress {
            field: field.into(),
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decoding(reason: impl fmt::Display) -> Self {
        Self::Decoding {
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            Self::MissingChainId => ErrorKind::MissingChainId,
            Self::ClientRequired => ErrorKind::ClientRequired,
            Self::MissingRawData => ErrorKind::MissingRawData,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::AmountOutOfRange { .. } => ErrorKind::AmountOutOfRange,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Decoding { .. } => ErrorKind::Decoding,
            Self::Signer(_) => ErrorKind::Signer,
            Self::Network(_) => ErrorKind::Network,
        }
    }

    /// The field an error is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. }
            | Self::InvalidAddress { field, .. }
            | Self::AmountOutOfRange { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Structured description: `{"kind", "message", ...variant fields}`.
    pub fn detail(&self) -> serde_json::Value {
        let mut detail = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        let extra = match self {
            Self::Validation { field, reason } => json!({ "field": field, "reason": reason }),
            Self::InvalidAddress {
                field,
                address,
                reason,
            } => json!({ "field": field, "address": address, "reason": reason }),
            Self::UnsupportedOperation { kind } => json!({ "operation": kind }),
            Self::AmountOutOfRange {
                field,
                value,
                target,
            } => json!({ "field": field, "value": value, "target": target }),
            Self::Encoding { reason } | Self::Decoding { reason } => json!({ "reason": reason }),
            Self::Signer(source) | Self::Network(source) => {
                json!({ "source": format!("{source:#}") })
            }
            Self::MissingChainId | Self::ClientRequired | Self::MissingRawData => json!({}),
        };
        if let (Some(target), Some(extra)) = (detail.as_object_mut(), extra.as_object()) {
            target.extend(extra.clone());
        }
        detail
    }
}

impl From<prost::DecodeError> for TxError {
    fn from(err: prost::DecodeError) -> Self {
        Self::decoding(err)
    }
}

impl From<hex::FromHexError> for TxError {
    fn from(err: hex::FromHexError) -> Self {
        Self::decoding(format!("hex: {err}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
