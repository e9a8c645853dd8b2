//! Wire schema.
//!
//! Protobuf messages with stable field numbers. The signed hash is computed
//! over `RawData::encode_to_vec()`, so a field number or scalar width
//! changing here invalidates every signature ever produced. Map fields use
//! `BTreeMap` so their entries are always emitted in key order.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Raw transaction data: everything that is hashed and signed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RawData {
    #[prost(uint64, tag = "1")]
    pub nonce: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub sender: Vec<u8>,
    #[prost(message, repeated, tag = "6")]
    pub contract: Vec<TxContract>,
    #[prost(int32, tag = "7")]
    pub permission_id: i32,
    #[prost(bytes = "vec", repeated, tag = "8")]
    pub data: Vec<Vec<u8>>,
    #[prost(int64, tag = "13")]
    pub k_app_fee: i64,
    #[prost(int64, tag = "14")]
    pub bandwidth_fee: i64,
    #[prost(uint32, tag = "15")]
    pub version: u32,
    #[prost(bytes = "vec", tag = "16")]
    pub chain_id: Vec<u8>,
    #[prost(message, optional, tag = "17")]
    pub kda_fee: Option<KdaFee>,
}

/// Raw data plus its ordered signatures.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedTransaction {
    #[prost(message, optional, tag = "1")]
    pub raw_data: Option<RawData>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signature: Vec<Vec<u8>>,
}

/// Fee paid in a secondary asset instead of the native one.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KdaFee {
    #[prost(bytes = "vec", tag = "1")]
    pub kda: Vec<u8>,
    #[prost(int64, tag = "2")]
    pub amount: i64,
}

/// One encoded operation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxContract {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub parameter: Option<Any>,
}

/// Wire-compatible with `google.protobuf.Any`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Any {
    #[prost(string, tag = "1")]
    pub type_url: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Operation payloads
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferContract {
    #[prost(bytes = "vec", tag = "1")]
    pub to_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub asset_id: Vec<u8>,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(int64, tag = "4")]
    pub kda_royalties: i64,
    #[prost(int64, tag = "5")]
    pub klv_royalties: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateAssetContract {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub name: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub ticker: Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub owner_address: Vec<u8>,
    #[prost(string, tag = "5")]
    pub logo: String,
    #[prost(btree_map = "string, string", tag = "6")]
    pub uris: BTreeMap<String, String>,
    #[prost(uint32, tag = "7")]
    pub precision: u32,
    #[prost(int64, tag = "8")]
    pub initial_supply: i64,
    #[prost(int64, tag = "9")]
    pub max_supply: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidatorConfig {
    #[prost(bytes = "vec", tag = "1")]
    pub bls_public_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub reward_address: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub can_delegate: bool,
    #[prost(uint32, tag = "4")]
    pub commission: u32,
    #[prost(int64, tag = "5")]
    pub max_delegation_amount: i64,
    #[prost(string, tag = "6")]
    pub logo: String,
    #[prost(btree_map = "string, string", tag = "7")]
    pub uris: BTreeMap<String, String>,
    #[prost(string, tag = "8")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateValidatorContract {
    #[prost(bytes = "vec", tag = "1")]
    pub owner_address: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub config: Option<ValidatorConfig>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FreezeContract {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(int64, tag = "2")]
    pub amount: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UnfreezeContract {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub bucket_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DelegateContract {
    #[prost(bytes = "vec", tag = "1")]
    pub to_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub bucket_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UndelegateContract {
    #[prost(bytes = "vec", tag = "1")]
    pub bucket_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WithdrawContract {
    #[prost(bytes = "vec", tag = "1")]
    pub asset_id: Vec<u8>,
    #[prost(int32, tag = "2")]
    pub withdraw_type: i32,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub currency_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ClaimContract {
    #[prost(int32, tag = "1")]
    pub claim_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoteContract {
    #[prost(uint64, tag = "1")]
    pub proposal_id: u64,
    #[prost(int64, tag = "2")]
    pub amount: i64,
    #[prost(int32, tag = "3")]
    pub r#type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SmartContract {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub address: Vec<u8>,
    #[prost(btree_map = "string, int64", tag = "3")]
    pub call_value: BTreeMap<String, i64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
