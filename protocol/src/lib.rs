// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # KDA Transaction Kit
//!
//! Client-side assembly of transactions for a KLV-based chain: validate
//! operations as they are added, encode raw data to the protobuf wire format,
//! hash it, collect signatures, and move the result between binary, hex and
//! the loose JSON records nodes speak.
//!
//! ## Architecture
//!
//! - **config**: chain constants and [`NetworkConfig`] presets.
//! - **error**: [`TxError`] and its stable [`ErrorKind`] codes.
//! - **address**: Bech32 address decoding behind [`AddressCodec`].
//! - **amount**: arbitrary-precision amounts and checked narrowing.
//! - **crypto**: BLAKE3 hashing and Ed25519 signing behind traits.
//! - **transaction**: operations, wire schema, builder and [`Transaction`].
//! - **logging**: optional `tracing` subscriber setup.
//!
//! ## Example
//!
//! ```no_run
//! use kda_txkit::{BuildOverrides, NetworkConfig, TransactionBuilder, TransferParams};
//!
//! # fn main() -> kda_txkit::Result<()> {
//! let mut builder = TransactionBuilder::for_network(NetworkConfig::mainnet())?;
//! builder
//!     .set_sender("klv1...")?
//!     .set_nonce(42)?
//!     .add_transfer(TransferParams {
//!         receiver: "klv1...".into(),
//!         amount: 1_000_000.into(),
//!         ..Default::default()
//!     })?;
//! let tx = builder.build_proto(BuildOverrides::default())?;
//! println!("{}", tx.hash());
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod amount;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod transaction;

pub use address::{AddressCodec, Bech32AddressCodec, DecodedAddress, RawAddress};
pub use amount::AmountInput;
pub use config::{Network, NetworkConfig};
pub use crypto::{Blake3Hasher, Ed25519Signer, Hasher, KdaKeypair, SignatureOutput, Signer};
pub use error::{ErrorKind, Result, TxError};
pub use transaction::{
    BuildOverrides, BuildTransactionResponse, Fees, KdaFeeInput, NetworkClient, NetworkInfo,
    Operation, OperationKind, OperationParams, Transaction, TransactionBuilder, TransferParams,
};
