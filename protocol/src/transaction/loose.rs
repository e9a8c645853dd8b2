//! Loose transaction records.
//!
//! Nodes and wallets exchange transactions as JSON whose shape drifts between
//! producers: `ChainID` vs `chainId`, bytes as base64 or `0x` hex, integers as
//! numbers or decimal strings, with or without a `{RawData, Signature}`
//! envelope. [`decode`] accepts all of these. [`encode`] writes a single
//! canonical form (PascalCase keys, base64 bytes) that [`decode`] reads back.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use num_bigint::BigInt;
use serde_json::{json, Map, Value};
use tracing::{trace, warn};

use super::operation::OperationKind;
use super::proto::{Any, KdaFee, RawData, SignedTransaction, TxContract};
use crate::amount::{self, AmountInput};
use crate::error::{Result, TxError};

// ---------------------------------------------------------------------------
// Field lookup
// ---------------------------------------------------------------------------

/// Lowercase with separators removed, so `ChainID`, `chainId` and `chain_id`
/// compare equal.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// An object viewed through normalized keys. Null values count as absent.
struct Record<'a> {
    fields: Vec<(String, &'a str, &'a Value)>,
}

impl<'a> Record<'a> {
    fn new(context: &str, value: &'a Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| TxError::decoding(format!("{context} must be an object")))?;
        Ok(Self::from_map(object))
    }

    fn from_map(object: &'a Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (normalize_key(k), k.as_str(), v))
            .collect();
        Self { fields }
    }

    fn get(&self, names: &[&str]) -> Option<&'a Value> {
        self.fields
            .iter()
            .find(|(key, _, _)| names.contains(&key.as_str()))
            .map(|(_, _, v)| *v)
    }

    fn warn_unknown(&self, context: &str, known: &[&str]) {
        for (key, original, _) in &self.fields {
            if !known.contains(&key.as_str()) {
                warn!(field = %original, context, "ignoring unrecognized field");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn bytes(field: &str, value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(text) => {
            if let Some(hex_text) = text.strip_prefix("0x") {
                hex::decode(hex_text)
                    .map_err(|e| TxError::decoding(format!("{field}: invalid hex: {e}")))
            } else {
                BASE64
                    .decode(text)
                    .map_err(|e| TxError::decoding(format!("{field}: invalid base64: {e}")))
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| TxError::decoding(format!("{field}: byte array entry out of range")))
            })
            .collect(),
        other => Err(TxError::decoding(format!(
            "{field}: expected bytes, got {other}"
        ))),
    }
}

fn integer(field: &str, value: &Value) -> Result<BigInt> {
    let input = match value {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                AmountInput::from(v)
            } else if let Some(v) = n.as_u64() {
                AmountInput::from(v)
            } else {
                return Err(TxError::decoding(format!("{field}: {n} is not an integer")));
            }
        }
        Value::String(text) => AmountInput::from(text.as_str()),
        other => {
            return Err(TxError::decoding(format!(
                "{field}: expected an integer, got {other}"
            )))
        }
    };
    input
        .normalize(field)
        .map_err(|e| TxError::decoding(format!("{field}: {e}")))
}

fn opt_bytes(record: &Record<'_>, field: &str, names: &[&str]) -> Result<Vec<u8>> {
    record
        .get(names)
        .map_or(Ok(Vec::new()), |v| bytes(field, v))
}

fn opt_integer(record: &Record<'_>, field: &str, names: &[&str]) -> Result<Option<BigInt>> {
    record.get(names).map(|v| integer(field, v)).transpose()
}

fn list<'a>(field: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| TxError::decoding(format!("{field} must be an array")))
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

const ENVELOPE_KEYS: &[&str] = &["rawdata", "signature", "signatures"];

const RAW_KEYS: &[&str] = &[
    "nonce",
    "sender",
    "contract",
    "contracts",
    "permissionid",
    "data",
    "kappfee",
    "bandwidthfee",
    "version",
    "chainid",
    "kdafee",
];

/// Decodes either an envelope `{RawData, Signature}` or a bare raw-data
/// record. The envelope's raw data may be absent; the caller decides whether
/// that is an error.
pub(crate) fn decode(value: &Value) -> Result<SignedTransaction> {
    let record = Record::new("transaction", value)?;

    if record.get(&["rawdata"]).is_none() && record.get(RAW_KEYS).is_some() {
        trace!("decoding bare raw data record");
        return Ok(SignedTransaction {
            raw_data: Some(decode_raw(&record)?),
            signature: Vec::new(),
        });
    }

    record.warn_unknown("transaction", ENVELOPE_KEYS);
    let raw_data = record
        .get(&["rawdata"])
        .map(|raw| Record::new("RawData", raw).and_then(|r| decode_raw(&r)))
        .transpose()?;
    let signature = match record.get(&["signature", "signatures"]) {
        Some(sigs) => list("Signature", sigs)?
            .iter()
            .map(|s| bytes("Signature", s))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    Ok(SignedTransaction {
        raw_data,
        signature,
    })
}

fn decode_raw(record: &Record<'_>) -> Result<RawData> {
    record.warn_unknown("RawData", RAW_KEYS);

    let mut raw = RawData {
        sender: opt_bytes(record, "Sender", &["sender"])?,
        chain_id: opt_bytes(record, "ChainID", &["chainid"])?,
        ..Default::default()
    };

    if let Some(nonce) = opt_integer(record, "Nonce", &["nonce"])? {
        raw.nonce = amount::to_u64("Nonce", &nonce)?;
    }
    if let Some(id) = opt_integer(record, "PermissionID", &["permissionid"])? {
        raw.permission_id = amount::to_i32("PermissionID", &id)?;
    }
    if let Some(fee) = opt_integer(record, "KAppFee", &["kappfee"])? {
        raw.k_app_fee = amount::to_i64("KAppFee", &fee)?;
    }
    if let Some(fee) = opt_integer(record, "BandwidthFee", &["bandwidthfee"])? {
        raw.bandwidth_fee = amount::to_i64("BandwidthFee", &fee)?;
    }
    if let Some(version) = opt_integer(record, "Version", &["version"])? {
        raw.version = amount::to_u32("Version", &version)?;
    }
    if let Some(data) = record.get(&["data"]) {
        raw.data = list("Data", data)?
            .iter()
            .map(|d| bytes("Data", d))
            .collect::<Result<_>>()?;
    }
    if let Some(contracts) = record.get(&["contract", "contracts"]) {
        raw.contract = list("Contract", contracts)?
            .iter()
            .map(decode_contract)
            .collect::<Result<_>>()?;
    }
    if let Some(fee) = record.get(&["kdafee"]) {
        let fee = Record::new("KDAFee", fee)?;
        let amount = opt_integer(&fee, "KDAFee.Amount", &["amount"])?.unwrap_or_default();
        raw.kda_fee = Some(KdaFee {
            kda: opt_bytes(&fee, "KDAFee.KDA", &["kda", "asset"])?,
            amount: amount::to_i64("KDAFee.Amount", &amount)?,
        });
    }
    Ok(raw)
}

fn contract_type(value: &Value) -> Result<i32> {
    if let Some(label) = value.as_str() {
        if let Some(kind) = OperationKind::from_label(label) {
            return Ok(kind.code());
        }
    }
    let code = integer("Contract.Type", value)?;
    amount::to_i32("Contract.Type", &code)
}

fn decode_contract(value: &Value) -> Result<TxContract> {
    let record = Record::new("Contract", value)?;
    let r#type = match record.get(&["type"]) {
        Some(t) => contract_type(t)?,
        None => 0,
    };
    let parameter = match record.get(&["parameter"]) {
        Some(param) => {
            let param = Record::new("Contract.Parameter", param)?;
            let type_url = param
                .get(&["typeurl", "@type"])
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(Any {
                type_url,
                value: opt_bytes(&param, "Contract.Parameter.value", &["value"])?,
            })
        }
        None => None,
    };
    Ok(TxContract { r#type, parameter })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn b64(bytes: &[u8]) -> Value {
    Value::String(BASE64.encode(bytes))
}

fn encode_contract(contract: &TxContract) -> Value {
    let mut out = Map::new();
    out.insert("Type".into(), json!(contract.r#type));
    if let Some(param) = &contract.parameter {
        out.insert(
            "Parameter".into(),
            json!({ "typeUrl": param.type_url, "value": b64(&param.value) }),
        );
    }
    Value::Object(out)
}

/// Canonical loose form of a transaction.
pub(crate) fn encode(raw: &RawData, signatures: &[Vec<u8>]) -> Value {
    let mut raw_out = Map::new();
    raw_out.insert("Nonce".into(), json!(raw.nonce));
    raw_out.insert("Sender".into(), b64(&raw.sender));
    raw_out.insert(
        "Contract".into(),
        Value::Array(raw.contract.iter().map(encode_contract).collect()),
    );
    raw_out.insert("PermissionID".into(), json!(raw.permission_id));
    raw_out.insert(
        "Data".into(),
        Value::Array(raw.data.iter().map(|d| b64(d)).collect()),
    );
    raw_out.insert("KAppFee".into(), json!(raw.k_app_fee));
    raw_out.insert("BandwidthFee".into(), json!(raw.bandwidth_fee));
    raw_out.insert("Version".into(), json!(raw.version));
    raw_out.insert("ChainID".into(), b64(&raw.chain_id));
    if let Some(fee) = &raw.kda_fee {
        raw_out.insert(
            "KDAFee".into(),
            json!({ "KDA": b64(&fee.kda), "Amount": fee.amount }),
        );
    }

    json!({
        "RawData": raw_out,
        "Signature": signatures.iter().map(|s| b64(s)).collect::<Vec<_>>(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
