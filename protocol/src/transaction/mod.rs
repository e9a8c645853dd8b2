//! # Transaction Module
//!
//! Assembly, encoding and signing of chain transactions. A transaction is
//! one [`RawData`](proto::RawData) record (the operations plus metadata) and
//! an ordered list of signatures over its hash.
//!
//! ## Architecture
//!
//! ```text
//! operation.rs  Operation kinds, per-kind params and validation
//! proto.rs      Protobuf wire schema (prost)
//! builder.rs    TransactionBuilder: pending state, request/offline/node builds
//! tx.rs         Transaction: hash, signatures, binary and loose encodings
//! loose.rs      Tolerant JSON records exchanged with nodes and wallets
//! client.rs     NetworkClient seam for node-assisted builds
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Assemble**: add operations and metadata to a [`TransactionBuilder`].
//! 2. **Build**: offline with `build_proto`, or through a node with `build`.
//! 3. **Sign**: [`Transaction::sign`] once per required signer.
//! 4. **Submit**: `to_hex` / `to_bytes` produce the broadcast payload.
//!
//! ## Design Decisions
//!
//! - Amounts are `BigInt` until serialization; values that do not fit the
//!   wire integer are rejected, never truncated.
//! - The hash covers raw data only, so signing does not change it.
//! - Map fields are `BTreeMap`, so equal inputs encode to equal bytes.

pub mod builder;
pub mod client;
mod loose;
pub mod operation;
pub mod proto;
pub mod tx;

pub use builder::{BuildOverrides, Fees, KdaFeeInput, TransactionBuilder};
pub use client::{BuildTransactionResponse, NetworkClient, NetworkInfo};
pub use operation::{
    AssetType, ClaimParams, ClaimType, CreateAssetParams, CreateValidatorParams, DelegateParams,
    FreezeParams, OpaqueOperation, Operation, OperationKind, OperationParams, ScType,
    SmartContractParams, TransferParams, UndelegateParams, UnfreezeParams, VoteParams, VoteType,
    WithdrawParams, WithdrawType,
};
pub use tx::Transaction;
