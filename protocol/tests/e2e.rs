//! End-to-end tests for the transaction kit.
//!
//! These exercise the public API the way a wallet would: assemble with the
//! builder, build offline or through a node, sign with one or more keys, and
//! move the result through hex, bytes and loose JSON. Each test builds its
//! own keys and builder; nothing is shared.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use num_bigint::BigInt;
use serde_json::{json, Value};

use kda_txkit::transaction::{
    DelegateParams, FreezeParams, UndelegateParams, UnfreezeParams, VoteParams,
};
use kda_txkit::{
    AddressCodec, Bech32AddressCodec, BuildOverrides, BuildTransactionResponse, Ed25519Signer,
    ErrorKind, Fees, KdaKeypair, NetworkClient, NetworkConfig, NetworkInfo, Transaction,
    TransactionBuilder, TransferParams,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn codec() -> Bech32AddressCodec {
    Bech32AddressCodec::mainnet()
}

fn address_of(keypair: &KdaKeypair) -> String {
    keypair.address(&codec()).expect("encode address")
}

fn receiver() -> String {
    codec().encode(&[0x42; 32]).expect("encode receiver")
}

fn transfer(amount: impl Into<kda_txkit::AmountInput>) -> TransferParams {
    TransferParams {
        receiver: receiver(),
        amount: amount.into(),
        ..Default::default()
    }
}

/// Builder with sender, nonce 123 and a 1 KLV transfer on mainnet.
fn funded_builder(sender: &KdaKeypair) -> TransactionBuilder {
    let mut builder = TransactionBuilder::for_network(NetworkConfig::mainnet()).expect("builder");
    builder
        .set_sender(&address_of(sender))
        .expect("sender")
        .set_nonce(123)
        .expect("nonce")
        .add_transfer(transfer(1_000_000))
        .expect("transfer");
    builder
}

fn standard_fees() -> BuildOverrides {
    BuildOverrides {
        fees: Some(Fees {
            k_app_fee: 500_000.into(),
            bandwidth_fee: 100_000.into(),
        }),
        ..Default::default()
    }
}

/// Stand-in node that answers build requests by assembling the same raw data
/// locally and recording every request it saw.
struct LocalNode {
    requests: Mutex<Vec<Value>>,
    answer: Value,
}

#[async_trait]
impl NetworkClient for LocalNode {
    async fn get_network(&self) -> anyhow::Result<NetworkInfo> {
        Ok(NetworkInfo {
            chain_id: "108".into(),
        })
    }

    async fn build_transaction(&self, request: Value) -> anyhow::Result<BuildTransactionResponse> {
        self.requests.lock().expect("lock").push(request);
        Ok(BuildTransactionResponse {
            result: self.answer.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn offline_transfer_totals_fees_and_is_unsigned() {
    let alice = KdaKeypair::generate();
    let tx = funded_builder(&alice)
        .build_proto(standard_fees())
        .expect("build");

    assert_eq!(tx.total_fee(), BigInt::from(600_000));
    assert!(!tx.is_signed());
    assert_eq!(tx.raw_data().nonce, 123);
    assert_eq!(tx.contracts().len(), 1);
}

#[test]
fn identical_builders_produce_identical_bytes() {
    let alice = KdaKeypair::from_seed(&[7u8; 32]);
    let a = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    let b = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    assert_eq!(a.to_hex(), b.to_hex());
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn hex_round_trip_preserves_hash_and_signatures() {
    let alice = KdaKeypair::generate();
    let mut tx = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    tx.add_signature(alice.sign(&tx.hash_bytes()).to_vec());

    let back = Transaction::from_hex(&tx.to_hex()).unwrap();
    assert_eq!(back.hash(), tx.hash());
    assert_eq!(back.signatures(), tx.signatures());
    assert_eq!(back.raw_data(), tx.raw_data());
}

#[test]
fn loose_object_round_trip() {
    let alice = KdaKeypair::generate();
    let tx = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    let back = Transaction::from_object(&tx.to_object()).unwrap();
    assert_eq!(back.raw_data(), tx.raw_data());
    assert_eq!(back.hash(), tx.hash());
}

#[tokio::test]
async fn co_signers_append_in_order() {
    let alice = KdaKeypair::generate();
    let bob = KdaKeypair::generate();
    let mut tx = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    let hash = tx.hash().to_string();

    tx.sign(&Ed25519Signer, &alice.secret_key_bytes())
        .await
        .unwrap()
        .sign(&Ed25519Signer, &bob.secret_key_bytes())
        .await
        .unwrap();

    assert_eq!(tx.signatures().len(), 2);
    assert_eq!(tx.hash(), hash, "signing must not change the hash");
    assert_eq!(tx.signatures()[0], alice.sign(&tx.hash_bytes()).to_vec());
    assert!(tx.verify_signature(0));
    assert!(!tx.verify_signature(1));
}

#[test]
fn zero_transfer_rejected_one_accepted() {
    let mut builder = TransactionBuilder::new();
    let err = builder.add_transfer(transfer(0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(builder.operations().is_empty());

    builder.add_transfer(transfer(1)).unwrap();
    assert_eq!(builder.operations().len(), 1);
}

#[test]
fn invalid_addresses_rejected_everywhere() {
    let mut builder = TransactionBuilder::new();
    assert_eq!(
        builder.set_sender("invalid-address").unwrap_err().kind(),
        ErrorKind::InvalidAddress
    );
    let bad_transfer = TransferParams {
        receiver: "invalid-address".into(),
        amount: 10.into(),
        ..Default::default()
    };
    assert_eq!(
        builder.add_transfer(bad_transfer).unwrap_err().kind(),
        ErrorKind::InvalidAddress
    );
    assert_eq!(
        builder
            .add_delegate(DelegateParams {
                receiver: "klv1xyz".into(),
                bucket_id: None,
            })
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidAddress
    );
}

#[test]
fn missing_nonce_is_a_validation_error() {
    let alice = KdaKeypair::generate();
    let mut builder = TransactionBuilder::new();
    builder
        .set_chain_id("108")
        .set_sender(&address_of(&alice))
        .unwrap()
        .add_transfer(transfer(5))
        .unwrap();

    let err = builder.build_proto(BuildOverrides::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("nonce"));
    assert_eq!(err.detail()["field"], "nonce");
}

#[test]
fn empty_builder_fails_before_resolving_fields() {
    let err = TransactionBuilder::new()
        .build_proto(BuildOverrides::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("operations"));
}

#[test]
fn missing_chain_id_comes_first_without_a_network() {
    let err = TransactionBuilder::without_network()
        .build_proto(BuildOverrides::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingChainId);
}

#[test]
fn staking_lifecycle_encodes_every_step() {
    let alice = KdaKeypair::generate();
    let mut builder = funded_builder(&alice);
    builder
        .add_freeze(FreezeParams {
            amount: "5000000".into(),
            asset: None,
        })
        .unwrap()
        .add_delegate(DelegateParams {
            receiver: receiver(),
            bucket_id: Some("bucket-1".into()),
        })
        .unwrap()
        .add_undelegate(UndelegateParams {
            bucket_id: "bucket-1".into(),
        })
        .unwrap()
        .add_unfreeze(UnfreezeParams {
            asset: Some("KLV".into()),
            bucket_id: Some("bucket-1".into()),
        })
        .unwrap()
        .add_vote(VoteParams {
            proposal_id: Some(1.into()),
            amount: Some(100.into()),
            ..Default::default()
        })
        .unwrap();

    let tx = builder.build_proto(BuildOverrides::default()).unwrap();
    let types: Vec<i32> = tx.contracts().iter().map(|c| c.r#type).collect();
    assert_eq!(types, vec![0, 4, 6, 7, 5, 14]);
    assert!(tx
        .contracts()
        .iter()
        .all(|c| c.parameter.as_ref().is_some_and(|p| p.type_url.starts_with("type.googleapis.com/proto."))));
}

#[test]
fn generic_json_operations_match_typed_ones() {
    let alice = KdaKeypair::from_seed(&[3u8; 32]);
    let typed = funded_builder(&alice).build_proto(BuildOverrides::default()).unwrap();

    let mut generic = TransactionBuilder::for_network(NetworkConfig::mainnet()).unwrap();
    generic
        .set_sender(&address_of(&alice))
        .unwrap()
        .set_nonce("123")
        .unwrap()
        .add_operation_value(
            "TransferContract",
            json!({ "receiver": receiver(), "amount": 1_000_000 }),
        )
        .unwrap();
    let generic = generic.build_proto(BuildOverrides::default()).unwrap();

    assert_eq!(typed.hash(), generic.hash());
}

#[tokio::test]
async fn node_assisted_build_round_trips() {
    let alice = KdaKeypair::generate();
    let offline = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    let node = Arc::new(LocalNode {
        requests: Mutex::new(Vec::new()),
        answer: offline.to_object(),
    });

    let mut builder = funded_builder(&alice).with_client(node.clone());
    builder.load_chain_id().await.unwrap();
    let tx = builder.build().await.unwrap();

    assert_eq!(tx.hash(), offline.hash());
    assert_eq!(tx.total_fee(), BigInt::from(600_000));

    let requests = node.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request["chainId"], "108");
    assert_eq!(request["sender"], address_of(&alice));
    assert_eq!(request["operations"][0]["kind"], "Transfer");
    assert_eq!(request["operations"][0]["payload"]["amount"], 1_000_000);
}

#[tokio::test]
async fn build_without_client_fails() {
    let alice = KdaKeypair::generate();
    let err = funded_builder(&alice).build().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientRequired);
}

#[test]
fn reset_allows_reuse() {
    let alice = KdaKeypair::generate();
    let mut builder = funded_builder(&alice);
    let first = builder.build_proto(BuildOverrides::default()).unwrap();

    builder.reset();
    assert!(builder.build_request().is_err());

    builder
        .set_sender(&address_of(&alice))
        .unwrap()
        .set_nonce(124)
        .unwrap()
        .add_transfer(transfer(1_000_000))
        .unwrap();
    let second = builder.build_proto(BuildOverrides::default()).unwrap();
    assert_ne!(first.hash(), second.hash());
}

#[test]
fn request_operations_keep_length_and_order() {
    let mut builder = TransactionBuilder::new();
    for amount in [3, 1, 2] {
        builder.add_transfer(transfer(amount)).unwrap();
    }
    builder
        .add_freeze(FreezeParams {
            amount: 9.into(),
            asset: Some("KFI".into()),
        })
        .unwrap();

    let request = builder.build_request().unwrap();
    let ops = request["operations"].as_array().unwrap();
    assert_eq!(ops.len(), 4);
    let amounts: Vec<i64> = ops
        .iter()
        .map(|op| op["payload"]["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![3, 1, 2, 9]);
    assert_eq!(ops[3]["kind"], "Freeze");
}

#[test]
fn hash_is_stable_and_sensitive_to_raw_data() {
    let alice = KdaKeypair::from_seed(&[5u8; 32]);
    let tx = funded_builder(&alice).build_proto(BuildOverrides::default()).unwrap();
    assert_eq!(tx.hash(), tx.hash());

    let bumped = funded_builder(&alice)
        .build_proto(BuildOverrides {
            nonce: Some(124.into()),
            ..Default::default()
        })
        .unwrap();
    assert_ne!(tx.hash(), bumped.hash());

    let with_fee = funded_builder(&alice).build_proto(standard_fees()).unwrap();
    assert_ne!(tx.hash(), with_fee.hash());
}

#[test]
fn bytes_round_trip_with_data_blobs_and_no_fees() {
    let alice = KdaKeypair::generate();
    let mut builder = funded_builder(&alice);
    builder
        .set_data([b"invoice-17".to_vec(), Vec::new()])
        .set_permission_id(1)
        .set_kda_fee("KFI", 250)
        .unwrap();
    let tx = builder.build_proto(BuildOverrides::default()).unwrap();

    let back = Transaction::from_bytes(&tx.to_bytes()).unwrap();
    assert_eq!(back.raw_data(), tx.raw_data());
    assert_eq!(back.raw_data().data.len(), 2);
    assert_eq!(back.raw_data().k_app_fee, 0);
    assert_eq!(back.raw_data().permission_id, 1);
    assert_eq!(back.total_fee(), BigInt::from(0));
    assert_eq!(Transaction::from_hex(&tx.to_hex()).unwrap(), back);
}
