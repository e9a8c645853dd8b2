//! Transaction construction.
//!
//! The [`TransactionBuilder`] accumulates operations and metadata, checking
//! each value at the call that supplies it. It then produces a transaction
//! in one of three ways:
//!
//! - [`build_request`](TransactionBuilder::build_request): a JSON request for
//!   a node's build endpoint.
//! - [`build_proto`](TransactionBuilder::build_proto): raw data assembled
//!   locally, with no network access.
//! - [`build`](TransactionBuilder::build): the request sent through an
//!   attached [`NetworkClient`], with the node's answer decoded.
//!
//! Build calls borrow the builder, so one pending state can be built more
//! than once. [`reset`](TransactionBuilder::reset) clears it for the next
//! transaction while keeping the attached client, codec and network.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use num_bigint::BigInt;
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use super::client::NetworkClient;
use super::operation::{
    decode_address, ClaimParams, CreateAssetParams, CreateValidatorParams, DelegateParams,
    FreezeParams, Operation, OperationParams, SmartContractParams, TransferParams,
    UndelegateParams, UnfreezeParams, VoteParams, WithdrawParams,
};
use super::proto::{KdaFee, RawData};
use super::tx::Transaction;
use crate::address::{AddressCodec, Bech32AddressCodec, DecodedAddress};
use crate::amount::{self, AmountInput};
use crate::config::{NetworkConfig, NATIVE_ASSET, TX_VERSION};
use crate::crypto::hash::{Blake3Hasher, Hasher};
use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Network fees for offline construction. Both default to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fees {
    pub k_app_fee: AmountInput,
    pub bandwidth_fee: AmountInput,
}

/// A fee paid in a secondary asset, as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct KdaFeeInput {
    pub asset: String,
    pub amount: AmountInput,
}

/// Per-call values for [`TransactionBuilder::build_proto`]. Each one that is
/// set wins over the builder's stored state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOverrides {
    pub chain_id: Option<String>,
    pub sender: Option<String>,
    pub nonce: Option<AmountInput>,
    pub fees: Option<Fees>,
    pub kda_fee: Option<KdaFeeInput>,
    pub permission_id: Option<i32>,
    pub data: Option<Vec<Vec<u8>>>,
}

// ---------------------------------------------------------------------------
// Pending state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidKdaFee {
    asset: String,
    amount: BigInt,
}

impl ValidKdaFee {
    fn parse(asset: &str, amount: &AmountInput) -> Result<Self> {
        let asset = asset.trim();
        if asset.is_empty() {
            return Err(TxError::validation("kdaFee.kda", "asset is required"));
        }
        if asset.eq_ignore_ascii_case(NATIVE_ASSET) {
            return Err(TxError::validation(
                "kdaFee.kda",
                format!("{NATIVE_ASSET} is the native asset; omit kdaFee instead"),
            ));
        }
        let amount = amount.normalize("kdaFee.amount")?;
        amount::require_non_negative("kdaFee.amount", &amount)?;
        Ok(Self {
            asset: asset.to_string(),
            amount,
        })
    }

    fn to_proto(&self) -> Result<KdaFee> {
        Ok(KdaFee {
            kda: self.asset.as_bytes().to_vec(),
            amount: amount::to_i64("kdaFee.amount", &self.amount)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PendingTransaction {
    operations: Vec<Operation>,
    sender: Option<DecodedAddress>,
    nonce: Option<BigInt>,
    kda_fee: Option<ValidKdaFee>,
    permission_id: Option<i32>,
    data: Option<Vec<Vec<u8>>>,
    chain_id: Option<String>,
}

fn parse_nonce(value: &AmountInput) -> Result<BigInt> {
    let nonce = value.normalize("nonce")?;
    amount::require_non_negative("nonce", &nonce)?;
    Ok(nonce)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

pub struct TransactionBuilder {
    pending: PendingTransaction,
    network: Option<NetworkConfig>,
    codec: Arc<dyn AddressCodec>,
    hasher: Arc<dyn Hasher>,
    client: Option<Arc<dyn NetworkClient>>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// A builder for the default network (mainnet): its chain id is the
    /// fallback and its address prefix drives the codec.
    pub fn new() -> Self {
        Self {
            network: Some(NetworkConfig::default()),
            ..Self::without_network()
        }
    }

    /// A builder with the mainnet address codec and no network fallback.
    /// The chain id must come from [`set_chain_id`](Self::set_chain_id), an
    /// override, or [`load_chain_id`](Self::load_chain_id); otherwise
    /// `build_proto` fails with `MissingChainId`.
    pub fn without_network() -> Self {
        Self {
            pending: PendingTransaction::default(),
            network: None,
            codec: Arc::new(Bech32AddressCodec::mainnet()),
            hasher: Arc::new(Blake3Hasher),
            client: None,
        }
    }

    /// A builder whose chain id and address prefix come from `config`.
    pub fn for_network(config: NetworkConfig) -> Result<Self> {
        let codec = Bech32AddressCodec::from_config(&config)
            .map_err(|e| TxError::validation("addressHrp", e.to_string()))?;
        Ok(Self {
            network: Some(config),
            codec: Arc::new(codec),
            ..Self::without_network()
        })
    }

    /// Attaches the node used by [`build`](Self::build) and
    /// [`load_chain_id`](Self::load_chain_id).
    pub fn with_client(mut self, client: Arc<dyn NetworkClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Replaces the address codec. Addresses already stored stay decoded
    /// with the previous one.
    pub fn with_codec(mut self, codec: Arc<dyn AddressCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replaces the transaction hasher used by every build.
    pub fn with_hasher(mut self, hasher: Arc<dyn Hasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// In-place form of [`with_client`](Self::with_client).
    pub fn attach_client(&mut self, client: Arc<dyn NetworkClient>) -> &mut Self {
        self.client = Some(client);
        self
    }

    // -- Metadata -----------------------------------------------------------

    /// Stored chain id. Wins over the network config; loses to an override.
    pub fn set_chain_id(&mut self, chain_id: impl Into<String>) -> &mut Self {
        self.pending.chain_id = Some(chain_id.into());
        self
    }

    /// Fails with `InvalidAddress` unless `address` decodes to a raw address.
    pub fn set_sender(&mut self, address: &str) -> Result<&mut Self> {
        let sender = decode_address(self.codec.as_ref(), "sender", address)?;
        self.pending.sender = Some(sender);
        Ok(self)
    }

    /// Zero is a valid nonce; negative values are rejected.
    pub fn set_nonce(&mut self, nonce: impl Into<AmountInput>) -> Result<&mut Self> {
        self.pending.nonce = Some(parse_nonce(&nonce.into())?);
        Ok(self)
    }

    /// Pays fees in `asset` instead of the native asset. Fails with
    /// `Validation` for an empty asset, for `KLV` in any case, or for a
    /// negative amount.
    pub fn set_kda_fee(&mut self, asset: &str, amount: impl Into<AmountInput>) -> Result<&mut Self> {
        self.pending.kda_fee = Some(ValidKdaFee::parse(asset, &amount.into())?);
        Ok(self)
    }

    /// Selects the multi-signature permission that authorizes the
    /// transaction. Unset means permission 0.
    pub fn set_permission_id(&mut self, permission_id: i32) -> &mut Self {
        self.pending.permission_id = Some(permission_id);
        self
    }

    /// Arbitrary data blobs carried in raw data, in order. Replaces any
    /// previously set blobs.
    pub fn set_data<I, D>(&mut self, data: I) -> &mut Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Vec<u8>>,
    {
        self.pending.data = Some(data.into_iter().map(Into::into).collect());
        self
    }

    // -- Operations ---------------------------------------------------------

    /// Validates `params` for its kind and appends the result. Opaque
    /// operations are appended as given.
    pub fn add_operation(&mut self, params: impl Into<OperationParams>) -> Result<&mut Self> {
        let op = params.into().validate(self.codec.as_ref())?;
        trace!(kind = op.label(), index = self.pending.operations.len(), "operation added");
        self.pending.operations.push(op);
        Ok(self)
    }

    /// Same as [`add_operation`](Self::add_operation) for a kind label and a
    /// JSON parameter record.
    pub fn add_operation_value(&mut self, kind: &str, params: Value) -> Result<&mut Self> {
        self.add_operation(OperationParams::from_value(kind, params)?)
    }

    /// Receiver must decode and the amount must be positive.
    pub fn add_transfer(&mut self, params: TransferParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Positive amount; the asset defaults to `KLV`.
    pub fn add_freeze(&mut self, params: FreezeParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires the asset being unfrozen.
    pub fn add_unfreeze(&mut self, params: UnfreezeParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Receiver (the validator) must decode.
    pub fn add_delegate(&mut self, params: DelegateParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires a non-empty bucket id.
    pub fn add_undelegate(&mut self, params: UndelegateParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires an asset or a withdraw type; a `KdaPool` withdrawal also
    /// requires an amount.
    pub fn add_withdraw(&mut self, params: WithdrawParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires a claim type.
    pub fn add_claim(&mut self, params: ClaimParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires name, ticker and a decodable owner.
    pub fn add_create_asset(&mut self, params: CreateAssetParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires a decodable owner and a hex BLS public key.
    pub fn add_create_validator(&mut self, params: CreateValidatorParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Requires a proposal id and an amount.
    pub fn add_vote(&mut self, params: VoteParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    /// Contract address must decode; call values may be any integer.
    pub fn add_smart_contract(&mut self, params: SmartContractParams) -> Result<&mut Self> {
        self.add_operation(params)
    }

    // -- Inspection ---------------------------------------------------------

    /// Validated operations in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.pending.operations
    }

    /// The chain id a build would use without overrides.
    pub fn chain_id(&self) -> Option<&str> {
        non_empty(self.pending.chain_id.as_deref())
            .or_else(|| non_empty(self.network.as_ref().map(|n| n.chain_id.as_str())))
    }

    pub fn sender(&self) -> Option<&str> {
        self.pending.sender.as_ref().map(|s| s.text.as_str())
    }

    pub fn nonce(&self) -> Option<&BigInt> {
        self.pending.nonce.as_ref()
    }

    /// Clears operations and metadata.
    pub fn reset(&mut self) -> &mut Self {
        self.pending = PendingTransaction::default();
        self
    }

    fn require_operations(&self) -> Result<()> {
        if self.pending.operations.is_empty() {
            return Err(TxError::validation(
                "operations",
                "at least one operation required",
            ));
        }
        Ok(())
    }

    // -- Building -----------------------------------------------------------

    /// JSON request for a node's build endpoint. Only metadata that was set
    /// on the builder appears; numbers must fit a JSON integer.
    ///
    /// `chainId` is included only when set through
    /// [`set_chain_id`](Self::set_chain_id) or
    /// [`load_chain_id`](Self::load_chain_id). The network config's chain id
    /// is an offline fallback and is never sent; the node uses its own.
    pub fn build_request(&self) -> Result<Value> {
        self.require_operations()?;

        let operations = self
            .pending
            .operations
            .iter()
            .map(Operation::to_request)
            .collect::<Result<Vec<_>>>()?;

        let mut request = Map::new();
        request.insert("operations".into(), Value::Array(operations));
        if let Some(sender) = &self.pending.sender {
            request.insert("sender".into(), json!(sender.text));
        }
        if let Some(nonce) = &self.pending.nonce {
            request.insert("nonce".into(), amount::to_json_number("nonce", nonce)?);
        }
        if let Some(fee) = &self.pending.kda_fee {
            request.insert(
                "kdaFee".into(),
                json!({
                    "kda": fee.asset,
                    "amount": amount::to_json_number("kdaFee.amount", &fee.amount)?,
                }),
            );
        }
        if let Some(permission_id) = self.pending.permission_id {
            request.insert("permissionId".into(), json!(permission_id));
        }
        if let Some(data) = &self.pending.data {
            let encoded: Vec<String> = data.iter().map(|d| BASE64.encode(d)).collect();
            request.insert("data".into(), json!(encoded));
        }
        if let Some(chain_id) = non_empty(self.pending.chain_id.as_deref()) {
            request.insert("chainId".into(), json!(chain_id));
        }

        debug!(
            operations = self.pending.operations.len(),
            "build request assembled"
        );
        Ok(Value::Object(request))
    }

    /// Assembles raw data locally. Overrides win over stored state; the
    /// network config is the last resort for the chain id.
    ///
    /// Checks run in order: chain id, operations, sender, nonce.
    pub fn build_proto(&self, overrides: BuildOverrides) -> Result<Transaction> {
        let chain_id = non_empty(overrides.chain_id.as_deref())
            .or_else(|| self.chain_id())
            .ok_or(TxError::MissingChainId)?
            .to_string();

        self.require_operations()?;

        let sender = match overrides.sender.as_deref() {
            Some(text) => decode_address(self.codec.as_ref(), "sender", text)?,
            None => self
                .pending
                .sender
                .clone()
                .ok_or_else(|| TxError::validation("sender", "sender is required"))?,
        };

        let nonce = match &overrides.nonce {
            Some(value) => parse_nonce(value)?,
            None => self
                .pending
                .nonce
                .clone()
                .ok_or_else(|| TxError::validation("nonce", "nonce is required"))?,
        };

        let fees = overrides.fees.unwrap_or_default();
        let k_app_fee = fees.k_app_fee.normalize("kAppFee")?;
        amount::require_non_negative("kAppFee", &k_app_fee)?;
        let bandwidth_fee = fees.bandwidth_fee.normalize("bandwidthFee")?;
        amount::require_non_negative("bandwidthFee", &bandwidth_fee)?;

        let kda_fee = match &overrides.kda_fee {
            Some(input) => Some(ValidKdaFee::parse(&input.asset, &input.amount)?),
            None => self.pending.kda_fee.clone(),
        };

        let contract = self
            .pending
            .operations
            .iter()
            .map(Operation::to_contract)
            .collect::<Result<Vec<_>>>()?;

        let raw = RawData {
            nonce: amount::to_u64("nonce", &nonce)?,
            sender: sender.raw.to_vec(),
            contract,
            permission_id: overrides
                .permission_id
                .or(self.pending.permission_id)
                .unwrap_or_default(),
            data: overrides
                .data
                .or_else(|| self.pending.data.clone())
                .unwrap_or_default(),
            k_app_fee: amount::to_i64("kAppFee", &k_app_fee)?,
            bandwidth_fee: amount::to_i64("bandwidthFee", &bandwidth_fee)?,
            version: TX_VERSION,
            chain_id: chain_id.into_bytes(),
            kda_fee: kda_fee.as_ref().map(ValidKdaFee::to_proto).transpose()?,
        };

        let tx = Transaction::with_hasher(raw, self.hasher.as_ref())?;
        debug!(
            hash = %tx.hash(),
            operations = tx.contracts().len(),
            "transaction built offline"
        );
        Ok(tx)
    }

    /// Sends [`build_request`](Self::build_request) to the attached client
    /// and decodes the node's answer.
    pub async fn build(&self) -> Result<Transaction> {
        let client = self.client.as_ref().ok_or(TxError::ClientRequired)?;
        let request = self.build_request()?;

        let response = client
            .build_transaction(request)
            .await
            .map_err(TxError::Network)?;
        let tx = Transaction::from_object_with_hasher(&response.result, self.hasher.as_ref())?;
        debug!(hash = %tx.hash(), "transaction built by node");
        Ok(tx)
    }

    /// Asks the attached client for the chain id and stores it.
    pub async fn load_chain_id(&mut self) -> Result<&mut Self> {
        let client = self.client.as_ref().ok_or(TxError::ClientRequired)?;
        let info = client.get_network().await.map_err(TxError::Network)?;
        debug!(chain_id = %info.chain_id, "chain id loaded from node");
        self.pending.chain_id = Some(info.chain_id);
        Ok(self)
    }
}

impl fmt::Debug for TransactionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("pending", &self.pending)
            .field("network", &self.network)
            .field("client", &self.client.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
