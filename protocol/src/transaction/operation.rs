//! Operation assembly.
//!
//! Callers describe an action with a loosely typed `*Params` struct (amounts
//! as [`AmountInput`], addresses as text). `validate` checks exactly what
//! that kind needs, normalizes numbers to `BigInt`, decodes addresses, and
//! returns the strict record stored in [`Operation`]. Nothing reaches the
//! builder's operation list without passing through `validate`.
//!
//! Each [`Operation`] projects two ways:
//!
//! - [`Operation::to_request`]: JSON for the node's build endpoint, with every
//!   `BigInt` narrowed to a plain number.
//! - [`Operation::to_contract`]: the protobuf contract embedded in raw data.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use prost::Message;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::proto;
use crate::address::{AddressCodec, DecodedAddress};
use crate::amount::{self, AmountInput};
use crate::config::{CONTRACT_TYPE_URL_PREFIX, NATIVE_ASSET};
use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// OperationKind
// ---------------------------------------------------------------------------

/// The closed set of operation kinds with a wire encoding.
///
/// Discriminants index [`KIND_TABLE`]; keep the two in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Transfer = 0,
    CreateAsset = 1,
    CreateValidator = 2,
    Freeze = 3,
    Unfreeze = 4,
    Delegate = 5,
    Undelegate = 6,
    Withdraw = 7,
    Claim = 8,
    Vote = 9,
    SmartContract = 10,
}

struct KindEntry {
    kind: OperationKind,
    code: i32,
    label: &'static str,
    message: &'static str,
}

/// Kind → wire contract type and payload message name.
static KIND_TABLE: [KindEntry; 11] = [
    KindEntry { kind: OperationKind::Transfer, code: 0, label: "Transfer", message: "TransferContract" },
    KindEntry { kind: OperationKind::CreateAsset, code: 1, label: "CreateAsset", message: "CreateAssetContract" },
    KindEntry { kind: OperationKind::CreateValidator, code: 2, label: "CreateValidator", message: "CreateValidatorContract" },
    KindEntry { kind: OperationKind::Freeze, code: 4, label: "Freeze", message: "FreezeContract" },
    KindEntry { kind: OperationKind::Unfreeze, code: 5, label: "Unfreeze", message: "UnfreezeContract" },
    KindEntry { kind: OperationKind::Delegate, code: 6, label: "Delegate", message: "DelegateContract" },
    KindEntry { kind: OperationKind::Undelegate, code: 7, label: "Undelegate", message: "UndelegateContract" },
    KindEntry { kind: OperationKind::Withdraw, code: 8, label: "Withdraw", message: "WithdrawContract" },
    KindEntry { kind: OperationKind::Claim, code: 9, label: "Claim", message: "ClaimContract" },
    KindEntry { kind: OperationKind::Vote, code: 14, label: "Vote", message: "VoteContract" },
    KindEntry { kind: OperationKind::SmartContract, code: 63, label: "SmartContract", message: "SmartContract" },
];

impl OperationKind {
    fn entry(self) -> &'static KindEntry {
        &KIND_TABLE[self as usize]
    }

    /// Contract type number on the wire.
    pub fn code(self) -> i32 {
        self.entry().code
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn type_url(self) -> String {
        format!("{CONTRACT_TYPE_URL_PREFIX}{}", self.entry().message)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        KIND_TABLE.iter().find(|e| e.code == code).map(|e| e.kind)
    }

    /// Matches `Transfer`, `transfer`, `TransferContract`,
    /// `TransferContractType` and `create_asset`-style spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let find = |k: &str| {
            KIND_TABLE
                .iter()
                .find(|e| e.label.eq_ignore_ascii_case(k))
                .map(|e| e.kind)
        };
        find(&key).or_else(|| {
            ["contracttype", "contract", "type"]
                .iter()
                .filter_map(|suffix| key.strip_suffix(*suffix))
                .find_map(find)
        })
    }

    pub fn all() -> impl Iterator<Item = Self> {
        KIND_TABLE.iter().map(|e| e.kind)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Payload enums
// ---------------------------------------------------------------------------

/// Implements code/label lookup and a loose `Deserialize` for a payload
/// enum. Records may carry either the wire code (`1`) or the variant name in
/// any spelling (`"KdaPool"`, `"kda_pool"`), since `Operation::to_request`
/// writes codes and callers tend to write names.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl $name {
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let key: String = label
                    .chars()
                    .filter(|c| !matches!(c, '_' | '-' | ' '))
                    .collect();
                $(
                    if key.eq_ignore_ascii_case(stringify!($variant)) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }

            /// A decimal string is read as a code, anything else as a label.
            fn from_code_or_label(text: &str) -> Option<Self> {
                match text.trim().parse::<i64>() {
                    Ok(code) => Self::from_code(code),
                    Err(_) => Self::from_label(text),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Loose {
                    Code(i64),
                    Label(String),
                }

                match Loose::deserialize(deserializer)? {
                    Loose::Code(code) => Self::from_code(code).ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "unknown {} code {code}",
                            stringify!($name)
                        ))
                    }),
                    Loose::Label(label) => Self::from_code_or_label(&label).ok_or_else(|| {
                        serde::de::Error::custom(format!(
                            "unknown {} {label:?}",
                            stringify!($name)
                        ))
                    }),
                }
            }
        }
    };
}

/// Kind of asset created by `CreateAsset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetType {
    #[default]
    Fungible = 0,
    NonFungible = 1,
    SemiFungible = 2,
}

/// Source of a withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WithdrawType {
    #[default]
    Staking = 0,
    KdaPool = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimType {
    #[default]
    Staking = 0,
    Allowance = 1,
    Market = 2,
}

/// Governance vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteType {
    #[default]
    Yes = 0,
    No = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScType {
    #[default]
    Invoke = 0,
    Deploy = 1,
}

wire_enum!(AssetType { Fungible = 0, NonFungible = 1, SemiFungible = 2 });
wire_enum!(WithdrawType { Staking = 0, KdaPool = 1 });
wire_enum!(ClaimType { Staking = 0, Allowance = 1, Market = 2 });
wire_enum!(VoteType { Yes = 0, No = 1 });
wire_enum!(ScType { Invoke = 0, Deploy = 1 });

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

pub(crate) fn decode_address(
    codec: &dyn AddressCodec,
    field: &str,
    text: &str,
) -> Result<DecodedAddress> {
    DecodedAddress::parse(codec, text).map_err(|e| TxError::invalid_address(field, text, e))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    clean(value).ok_or_else(|| TxError::validation(field, "is required"))
}

fn normalize_opt(field: &str, value: Option<AmountInput>) -> Result<Option<BigInt>> {
    value.map(|v| v.normalize(field)).transpose()
}

fn normalize_required(field: &str, value: Option<AmountInput>) -> Result<BigInt> {
    value
        .ok_or_else(|| TxError::validation(field, "is required"))?
        .normalize(field)
}

fn non_negative_opt(field: &str, value: &Option<BigInt>) -> Result<()> {
    match value {
        Some(v) => amount::require_non_negative(field, v),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Params (caller input)
// ---------------------------------------------------------------------------

/// Moves `amount` of `asset` (native `KLV` when absent) to `receiver`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferParams {
    pub receiver: String,
    pub amount: AmountInput,
    #[serde(alias = "kda")]
    pub asset: Option<String>,
    pub kda_royalties: Option<AmountInput>,
    pub klv_royalties: Option<AmountInput>,
}

/// Locks `amount` of `asset` into a new bucket.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreezeParams {
    pub amount: AmountInput,
    #[serde(alias = "kda")]
    pub asset: Option<String>,
}

/// Releases a frozen bucket of `asset`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnfreezeParams {
    #[serde(alias = "kda")]
    pub asset: Option<String>,
    pub bucket_id: Option<String>,
}

/// Delegates a bucket to the validator at `receiver`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DelegateParams {
    pub receiver: String,
    pub bucket_id: Option<String>,
}

/// Returns a delegated bucket to its owner.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UndelegateParams {
    pub bucket_id: String,
}

/// Withdraws unfrozen stake or, for `KdaPool`, from a KDA fee pool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawParams {
    pub withdraw_type: Option<WithdrawType>,
    #[serde(alias = "kda")]
    pub asset: Option<String>,
    pub amount: Option<AmountInput>,
    pub currency: Option<String>,
}

/// Claims staking rewards, an allowance, or market proceeds. `id` names
/// the asset or order the claim is for.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimParams {
    pub claim_type: Option<ClaimType>,
    pub id: Option<String>,
}

/// Issues a new asset. `precision` is the number of decimal places.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAssetParams {
    #[serde(alias = "type")]
    pub asset_type: AssetType,
    pub name: Option<String>,
    pub ticker: Option<String>,
    #[serde(alias = "ownerAddress")]
    pub owner: Option<String>,
    pub logo: Option<String>,
    pub uris: BTreeMap<String, String>,
    pub precision: u32,
    pub initial_supply: Option<AmountInput>,
    pub max_supply: Option<AmountInput>,
}

/// Registers a validator. `commission` is in basis points.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateValidatorParams {
    #[serde(alias = "ownerAddress")]
    pub owner: Option<String>,
    /// Hex-encoded BLS public key.
    pub bls_public_key: Option<String>,
    pub reward_address: Option<String>,
    pub can_delegate: bool,
    pub commission: u32,
    pub max_delegation_amount: Option<AmountInput>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub uris: BTreeMap<String, String>,
}

/// Votes on a governance proposal with `amount` of voting power.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteParams {
    pub proposal_id: Option<AmountInput>,
    pub amount: Option<AmountInput>,
    #[serde(alias = "type")]
    pub vote_type: VoteType,
}

/// Invokes or deploys the contract at `address`. `call_value` maps asset id
/// to the amount sent with the call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmartContractParams {
    pub address: String,
    pub sc_type: ScType,
    pub call_value: BTreeMap<String, AmountInput>,
}

// ---------------------------------------------------------------------------
// Validated records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub receiver: DecodedAddress,
    pub amount: BigInt,
    pub asset: Option<String>,
    pub kda_royalties: Option<BigInt>,
    pub klv_royalties: Option<BigInt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Freeze {
    pub amount: BigInt,
    pub asset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unfreeze {
    pub asset: String,
    pub bucket_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegate {
    pub receiver: DecodedAddress,
    pub bucket_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undelegate {
    pub bucket_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdraw {
    pub withdraw_type: WithdrawType,
    pub asset: Option<String>,
    pub amount: Option<BigInt>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: ClaimType,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAsset {
    pub asset_type: AssetType,
    pub name: String,
    pub ticker: String,
    pub owner: DecodedAddress,
    pub logo: Option<String>,
    pub uris: BTreeMap<String, String>,
    pub precision: u32,
    pub initial_supply: Option<BigInt>,
    pub max_supply: Option<BigInt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateValidator {
    pub owner: DecodedAddress,
    pub bls_public_key: Vec<u8>,
    pub reward_address: Option<DecodedAddress>,
    pub can_delegate: bool,
    pub commission: u32,
    pub max_delegation_amount: Option<BigInt>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub uris: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub proposal_id: BigInt,
    pub amount: BigInt,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartContractCall {
    pub address: DecodedAddress,
    pub sc_type: ScType,
    pub call_value: BTreeMap<String, BigInt>,
}

/// An operation of a kind this crate does not model, carried verbatim.
/// It can travel through `build_request` but has no offline encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueOperation {
    pub kind: String,
    pub data: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl TransferParams {
    /// Fails with `InvalidAddress` for the receiver, or `Validation` for a
    /// non-positive amount or negative royalties.
    pub fn validate(self, codec: &dyn AddressCodec) -> Result<Transfer> {
        let receiver = decode_address(codec, "receiver", &self.receiver)?;
        let amount = self.amount.normalize("amount")?;
        amount::require_positive("amount", &amount)?;
        let kda_royalties = normalize_opt("kdaRoyalties", self.kda_royalties)?;
        non_negative_opt("kdaRoyalties", &kda_royalties)?;
        let klv_royalties = normalize_opt("klvRoyalties", self.klv_royalties)?;
        non_negative_opt("klvRoyalties", &klv_royalties)?;
        Ok(Transfer {
            receiver,
            amount,
            asset: clean(self.asset),
            kda_royalties,
            klv_royalties,
        })
    }
}

impl FreezeParams {
    /// Fails with `Validation` unless the amount is positive.
    pub fn validate(self) -> Result<Freeze> {
        let amount = self.amount.normalize("amount")?;
        amount::require_positive("amount", &amount)?;
        Ok(Freeze {
            amount,
            asset: clean(self.asset),
        })
    }
}

impl UnfreezeParams {
    pub fn validate(self) -> Result<Unfreeze> {
        Ok(Unfreeze {
            asset: required("asset", self.asset)?,
            bucket_id: clean(self.bucket_id),
        })
    }
}

impl DelegateParams {
    pub fn validate(self, codec: &dyn AddressCodec) -> Result<Delegate> {
        Ok(Delegate {
            receiver: decode_address(codec, "receiver", &self.receiver)?,
            bucket_id: clean(self.bucket_id),
        })
    }
}

impl UndelegateParams {
    pub fn validate(self) -> Result<Undelegate> {
        Ok(Undelegate {
            bucket_id: required("bucketId", Some(self.bucket_id))?,
        })
    }
}

impl WithdrawParams {
    /// Needs an asset or an explicit withdraw type; a pool withdrawal also
    /// needs an amount.
    pub fn validate(self) -> Result<Withdraw> {
        let asset = clean(self.asset);
        if asset.is_none() && self.withdraw_type.is_none() {
            return Err(TxError::validation("asset", "asset or withdrawType is required"));
        }
        let withdraw_type = self.withdraw_type.unwrap_or_default();
        let amount = match withdraw_type {
            WithdrawType::KdaPool => Some(normalize_required("amount", self.amount)?),
            WithdrawType::Staking => normalize_opt("amount", self.amount)?,
        };
        Ok(Withdraw {
            withdraw_type,
            asset,
            amount,
            currency: clean(self.currency),
        })
    }
}

impl ClaimParams {
    pub fn validate(self) -> Result<Claim> {
        Ok(Claim {
            claim_type: self
                .claim_type
                .ok_or_else(|| TxError::validation("claimType", "is required"))?,
            id: clean(self.id),
        })
    }
}

impl CreateAssetParams {
    pub fn validate(self, codec: &dyn AddressCodec) -> Result<CreateAsset> {
        let name = required("name", self.name)?;
        let ticker = required("ticker", self.ticker)?;
        let owner = required("owner", self.owner)?;
        Ok(CreateAsset {
            asset_type: self.asset_type,
            name,
            ticker,
            owner: decode_address(codec, "owner", &owner)?,
            logo: clean(self.logo),
            uris: self.uris,
            precision: self.precision,
            initial_supply: normalize_opt("initialSupply", self.initial_supply)?,
            max_supply: normalize_opt("maxSupply", self.max_supply)?,
        })
    }
}

impl CreateValidatorParams {
    pub fn validate(self, codec: &dyn AddressCodec) -> Result<CreateValidator> {
        let owner = required("owner", self.owner)?;
        let bls_hex = required("blsPublicKey", self.bls_public_key)?;
        let bls_public_key = hex::decode(bls_hex.trim_start_matches("0x"))
            .map_err(|e| TxError::validation("blsPublicKey", format!("not hex: {e}")))?;
        let reward_address = clean(self.reward_address)
            .map(|addr| decode_address(codec, "rewardAddress", &addr))
            .transpose()?;
        Ok(CreateValidator {
            owner: decode_address(codec, "owner", &owner)?,
            bls_public_key,
            reward_address,
            can_delegate: self.can_delegate,
            commission: self.commission,
            max_delegation_amount: normalize_opt(
                "maxDelegationAmount",
                self.max_delegation_amount,
            )?,
            name: clean(self.name),
            logo: clean(self.logo),
            uris: self.uris,
        })
    }
}

impl VoteParams {
    pub fn validate(self) -> Result<Vote> {
        Ok(Vote {
            proposal_id: normalize_required("proposalId", self.proposal_id)?,
            amount: normalize_required("amount", self.amount)?,
            vote_type: self.vote_type,
        })
    }
}

impl SmartContractParams {
    pub fn validate(self, codec: &dyn AddressCodec) -> Result<SmartContractCall> {
        let address = decode_address(codec, "address", &self.address)?;
        let call_value = self
            .call_value
            .into_iter()
            .map(|(asset, value)| {
                let value = value.normalize(&format!("callValue.{asset}"))?;
                Ok((asset, value))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(SmartContractCall {
            address,
            sc_type: self.sc_type,
            call_value,
        })
    }
}

// ---------------------------------------------------------------------------
// OperationParams: generic dispatch
// ---------------------------------------------------------------------------

/// Tagged union over every kind's params, plus the opaque passthrough.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationParams {
    Transfer(TransferParams),
    CreateAsset(CreateAssetParams),
    CreateValidator(CreateValidatorParams),
    Freeze(FreezeParams),
    Unfreeze(UnfreezeParams),
    Delegate(DelegateParams),
    Undelegate(UndelegateParams),
    Withdraw(WithdrawParams),
    Claim(ClaimParams),
    Vote(VoteParams),
    SmartContract(SmartContractParams),
    Opaque { kind: String, data: Map<String, Value> },
}

macro_rules! params_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for OperationParams {
                fn from(params: $ty) -> Self {
                    Self::$variant(params)
                }
            }
        )*
    };
}

params_from!(
    Transfer(TransferParams),
    CreateAsset(CreateAssetParams),
    CreateValidator(CreateValidatorParams),
    Freeze(FreezeParams),
    Unfreeze(UnfreezeParams),
    Delegate(DelegateParams),
    Undelegate(UndelegateParams),
    Withdraw(WithdrawParams),
    Claim(ClaimParams),
    Vote(VoteParams),
    SmartContract(SmartContractParams),
);

fn parse_params<T: for<'de> Deserialize<'de>>(kind: OperationKind, params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| TxError::validation(kind.label(), format!("malformed params: {e}")))
}

impl OperationParams {
    /// Parses a kind label plus a JSON parameter record. Labels outside the
    /// closed set become [`OperationParams::Opaque`].
    pub fn from_value(kind: &str, params: Value) -> Result<Self> {
        let Some(known) = OperationKind::from_label(kind) else {
            let Value::Object(data) = params else {
                return Err(TxError::validation(kind, "opaque params must be an object"));
            };
            return Ok(Self::Opaque {
                kind: kind.to_string(),
                data,
            });
        };

        Ok(match known {
            OperationKind::Transfer => Self::Transfer(parse_params(known, params)?),
            OperationKind::CreateAsset => Self::CreateAsset(parse_params(known, params)?),
            OperationKind::CreateValidator => Self::CreateValidator(parse_params(known, params)?),
            OperationKind::Freeze => Self::Freeze(parse_params(known, params)?),
            OperationKind::Unfreeze => Self::Unfreeze(parse_params(known, params)?),
            OperationKind::Delegate => Self::Delegate(parse_params(known, params)?),
            OperationKind::Undelegate => Self::Undelegate(parse_params(known, params)?),
            OperationKind::Withdraw => Self::Withdraw(parse_params(known, params)?),
            OperationKind::Claim => Self::Claim(parse_params(known, params)?),
            OperationKind::Vote => Self::Vote(parse_params(known, params)?),
            OperationKind::SmartContract => Self::SmartContract(parse_params(known, params)?),
        })
    }

    pub fn validate(self, codec: &dyn AddressCodec) -> Result<Operation> {
        Ok(match self {
            Self::Transfer(p) => Operation::Transfer(p.validate(codec)?),
            Self::CreateAsset(p) => Operation::CreateAsset(p.validate(codec)?),
            Self::CreateValidator(p) => Operation::CreateValidator(p.validate(codec)?),
            Self::Freeze(p) => Operation::Freeze(p.validate()?),
            Self::Unfreeze(p) => Operation::Unfreeze(p.validate()?),
            Self::Delegate(p) => Operation::Delegate(p.validate(codec)?),
            Self::Undelegate(p) => Operation::Undelegate(p.validate()?),
            Self::Withdraw(p) => Operation::Withdraw(p.validate()?),
            Self::Claim(p) => Operation::Claim(p.validate()?),
            Self::Vote(p) => Operation::Vote(p.validate()?),
            Self::SmartContract(p) => Operation::SmartContract(p.validate(codec)?),
            Self::Opaque { kind, data } => Operation::Opaque(OpaqueOperation { kind, data }),
        })
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A validated, normalized operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Transfer(Transfer),
    CreateAsset(CreateAsset),
    CreateValidator(CreateValidator),
    Freeze(Freeze),
    Unfreeze(Unfreeze),
    Delegate(Delegate),
    Undelegate(Undelegate),
    Withdraw(Withdraw),
    Claim(Claim),
    Vote(Vote),
    SmartContract(SmartContractCall),
    Opaque(OpaqueOperation),
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

fn json_opt(field: &str, value: &Option<BigInt>) -> Result<Option<Value>> {
    value
        .as_ref()
        .map(|v| amount::to_json_number(field, v))
        .transpose()
}

fn text_opt(value: &Option<String>) -> Option<Value> {
    value.as_ref().map(|v| Value::String(v.clone()))
}

fn any<M: Message>(kind: OperationKind, message: &M) -> proto::TxContract {
    proto::TxContract {
        r#type: kind.code(),
        parameter: Some(proto::Any {
            type_url: kind.type_url(),
            value: message.encode_to_vec(),
        }),
    }
}

fn asset_bytes(asset: &Option<String>) -> Vec<u8> {
    asset.as_deref().unwrap_or(NATIVE_ASSET).as_bytes().to_vec()
}

fn opt_bytes(value: &Option<String>) -> Vec<u8> {
    value.as_deref().unwrap_or_default().as_bytes().to_vec()
}

impl Operation {
    /// `None` for opaque operations.
    pub fn kind(&self) -> Option<OperationKind> {
        Some(match self {
            Self::Transfer(_) => OperationKind::Transfer,
            Self::CreateAsset(_) => OperationKind::CreateAsset,
            Self::CreateValidator(_) => OperationKind::CreateValidator,
            Self::Freeze(_) => OperationKind::Freeze,
            Self::Unfreeze(_) => OperationKind::Unfreeze,
            Self::Delegate(_) => OperationKind::Delegate,
            Self::Undelegate(_) => OperationKind::Undelegate,
            Self::Withdraw(_) => OperationKind::Withdraw,
            Self::Claim(_) => OperationKind::Claim,
            Self::Vote(_) => OperationKind::Vote,
            Self::SmartContract(_) => OperationKind::SmartContract,
            Self::Opaque(_) => return None,
        })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Opaque(op) => &op.kind,
            other => other.kind().map_or("", OperationKind::label),
        }
    }

    /// Request record for the node's build endpoint.
    pub fn to_request(&self) -> Result<Value> {
        let mut payload = Map::new();
        match self {
            Self::Transfer(op) => {
                payload.insert("receiver".into(), json!(op.receiver.text));
                payload.insert("amount".into(), amount::to_json_number("amount", &op.amount)?);
                insert_opt(&mut payload, "kda", text_opt(&op.asset));
                insert_opt(&mut payload, "kdaRoyalties", json_opt("kdaRoyalties", &op.kda_royalties)?);
                insert_opt(&mut payload, "klvRoyalties", json_opt("klvRoyalties", &op.klv_royalties)?);
            }
            Self::Freeze(op) => {
                payload.insert("amount".into(), amount::to_json_number("amount", &op.amount)?);
                insert_opt(&mut payload, "kda", text_opt(&op.asset));
            }
            Self::Unfreeze(op) => {
                payload.insert("kda".into(), json!(op.asset));
                insert_opt(&mut payload, "bucketId", text_opt(&op.bucket_id));
            }
            Self::Delegate(op) => {
                payload.insert("receiver".into(), json!(op.receiver.text));
                insert_opt(&mut payload, "bucketId", text_opt(&op.bucket_id));
            }
            Self::Undelegate(op) => {
                payload.insert("bucketId".into(), json!(op.bucket_id));
            }
            Self::Withdraw(op) => {
                payload.insert("withdrawType".into(), json!(op.withdraw_type as i32));
                insert_opt(&mut payload, "kda", text_opt(&op.asset));
                insert_opt(&mut payload, "amount", json_opt("amount", &op.amount)?);
                insert_opt(&mut payload, "currencyId", text_opt(&op.currency));
            }
            Self::Claim(op) => {
                payload.insert("claimType".into(), json!(op.claim_type as i32));
                insert_opt(&mut payload, "id", text_opt(&op.id));
            }
            Self::CreateAsset(op) => {
                payload.insert("type".into(), json!(op.asset_type as i32));
                payload.insert("name".into(), json!(op.name));
                payload.insert("ticker".into(), json!(op.ticker));
                payload.insert("ownerAddress".into(), json!(op.owner.text));
                insert_opt(&mut payload, "logo", text_opt(&op.logo));
                if !op.uris.is_empty() {
                    payload.insert("uris".into(), json!(op.uris));
                }
                payload.insert("precision".into(), json!(op.precision));
                insert_opt(&mut payload, "initialSupply", json_opt("initialSupply", &op.initial_supply)?);
                insert_opt(&mut payload, "maxSupply", json_opt("maxSupply", &op.max_supply)?);
            }
            Self::CreateValidator(op) => {
                payload.insert("ownerAddress".into(), json!(op.owner.text));
                payload.insert("blsPublicKey".into(), json!(hex::encode(&op.bls_public_key)));
                insert_opt(
                    &mut payload,
                    "rewardAddress",
                    op.reward_address.as_ref().map(|a| json!(a.text)),
                );
                payload.insert("canDelegate".into(), json!(op.can_delegate));
                payload.insert("commission".into(), json!(op.commission));
                insert_opt(
                    &mut payload,
                    "maxDelegationAmount",
                    json_opt("maxDelegationAmount", &op.max_delegation_amount)?,
                );
                insert_opt(&mut payload, "name", text_opt(&op.name));
                insert_opt(&mut payload, "logo", text_opt(&op.logo));
                if !op.uris.is_empty() {
                    payload.insert("uris".into(), json!(op.uris));
                }
            }
            Self::Vote(op) => {
                payload.insert("proposalId".into(), amount::to_json_number("proposalId", &op.proposal_id)?);
                payload.insert("amount".into(), amount::to_json_number("amount", &op.amount)?);
                payload.insert("type".into(), json!(op.vote_type as i32));
            }
            Self::SmartContract(op) => {
                payload.insert("address".into(), json!(op.address.text));
                payload.insert("scType".into(), json!(op.sc_type as i32));
                let mut call_value = Map::new();
                for (asset, value) in &op.call_value {
                    call_value.insert(asset.clone(), amount::to_json_number("callValue", value)?);
                }
                payload.insert("callValue".into(), Value::Object(call_value));
            }
            Self::Opaque(op) => {
                return Ok(json!({ "kind": op.kind, "payload": op.data }));
            }
        }

        let kind = self.kind().ok_or_else(|| TxError::UnsupportedOperation {
            kind: self.label().to_string(),
        })?;
        Ok(json!({
            "type": kind.code(),
            "kind": kind.label(),
            "payload": payload,
        }))
    }

    /// Wire contract for the raw data's operation list.
    pub fn to_contract(&self) -> Result<proto::TxContract> {
        let contract = match self {
            Self::Transfer(op) => any(
                OperationKind::Transfer,
                &proto::TransferContract {
                    to_address: op.receiver.raw.to_vec(),
                    asset_id: asset_bytes(&op.asset),
                    amount: amount::to_i64("amount", &op.amount)?,
                    kda_royalties: amount::opt_to_i64("kdaRoyalties", op.kda_royalties.as_ref())?,
                    klv_royalties: amount::opt_to_i64("klvRoyalties", op.klv_royalties.as_ref())?,
                },
            ),
            Self::Freeze(op) => any(
                OperationKind::Freeze,
                &proto::FreezeContract {
                    asset_id: asset_bytes(&op.asset),
                    amount: amount::to_i64("amount", &op.amount)?,
                },
            ),
            Self::Unfreeze(op) => any(
                OperationKind::Unfreeze,
                &proto::UnfreezeContract {
                    asset_id: op.asset.as_bytes().to_vec(),
                    bucket_id: opt_bytes(&op.bucket_id),
                },
            ),
            Self::Delegate(op) => any(
                OperationKind::Delegate,
                &proto::DelegateContract {
                    to_address: op.receiver.raw.to_vec(),
                    bucket_id: opt_bytes(&op.bucket_id),
                },
            ),
            Self::Undelegate(op) => any(
                OperationKind::Undelegate,
                &proto::UndelegateContract {
                    bucket_id: op.bucket_id.as_bytes().to_vec(),
                },
            ),
            Self::Withdraw(op) => any(
                OperationKind::Withdraw,
                &proto::WithdrawContract {
                    asset_id: asset_bytes(&op.asset),
                    withdraw_type: op.withdraw_type as i32,
                    amount: amount::opt_to_i64("amount", op.amount.as_ref())?,
                    currency_id: opt_bytes(&op.currency),
                },
            ),
            Self::Claim(op) => any(
                OperationKind::Claim,
                &proto::ClaimContract {
                    claim_type: op.claim_type as i32,
                    id: opt_bytes(&op.id),
                },
            ),
            Self::CreateAsset(op) => any(
                OperationKind::CreateAsset,
                &proto::CreateAssetContract {
                    r#type: op.asset_type as i32,
                    name: op.name.as_bytes().to_vec(),
                    ticker: op.ticker.as_bytes().to_vec(),
                    owner_address: op.owner.raw.to_vec(),
                    logo: op.logo.clone().unwrap_or_default(),
                    uris: op.uris.clone(),
                    precision: op.precision,
                    initial_supply: amount::opt_to_i64("initialSupply", op.initial_supply.as_ref())?,
                    max_supply: amount::opt_to_i64("maxSupply", op.max_supply.as_ref())?,
                },
            ),
            Self::CreateValidator(op) => any(
                OperationKind::CreateValidator,
                &proto::CreateValidatorContract {
                    owner_address: op.owner.raw.to_vec(),
                    config: Some(proto::ValidatorConfig {
                        bls_public_key: op.bls_public_key.clone(),
                        reward_address: op
                            .reward_address
                            .as_ref()
                            .map(|a| a.raw.to_vec())
                            .unwrap_or_default(),
                        can_delegate: op.can_delegate,
                        commission: op.commission,
                        max_delegation_amount: amount::opt_to_i64(
                            "maxDelegationAmount",
                            op.max_delegation_amount.as_ref(),
                        )?,
                        logo: op.logo.clone().unwrap_or_default(),
                        uris: op.uris.clone(),
                        name: op.name.clone().unwrap_or_default(),
                    }),
                },
            ),
            Self::Vote(op) => any(
                OperationKind::Vote,
                &proto::VoteContract {
                    proposal_id: amount::to_u64("proposalId", &op.proposal_id)?,
                    amount: amount::to_i64("amount", &op.amount)?,
                    r#type: op.vote_type as i32,
                },
            ),
            Self::SmartContract(op) => {
                let call_value = op
                    .call_value
                    .iter()
                    .map(|(asset, value)| Ok((asset.clone(), amount::to_i64("callValue", value)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?;
                any(
                    OperationKind::SmartContract,
                    &proto::SmartContract {
                        r#type: op.sc_type as i32,
                        address: op.address.raw.to_vec(),
                        call_value,
                    },
                )
            }
            Self::Opaque(op) => {
                return Err(TxError::UnsupportedOperation {
                    kind: op.kind.clone(),
                })
            }
        };
        Ok(contract)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
