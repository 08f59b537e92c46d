//! Signing regression vectors.
//!
//! The reference values were computed outside this crate from the documented
//! construction: base64(SHA1(secret || base64(json) || secret)).

use std::collections::HashSet;

use liqpay::signing::{compute_signature, encode_payload};
use liqpay::{
    sign, verify_signature, ApiRequest, Amount, PayOptions, PublicKey, RefundRequest,
    RequestOptions, StatusRequest, Timestamp,
};

const SECRET: &[u8] = b"sandbox_secret_key";
const PUBLIC_KEY: &str = "AAECAwQFBgcICQoLDA0ODw";
const GOLDEN_DATA: &str = "eyJ2ZXJzaW9uIjozLCJhY3Rpb24iOiJzdGF0dXMiLCJwdWJsaWNfa2V5IjoiQUFFQ0F3UUZCZ2NJQ1FvTERBME9EdyIsIm9yZGVyX2lkIjoiWCJ9";
const GOLDEN_SIGNATURE: &str = "C/1xUul7vSq6bGp3jLvWTUjuNsE=";

fn key() -> PublicKey {
    PUBLIC_KEY.parse().unwrap()
}

#[test]
fn test_golden_status_request() {
    let params = StatusRequest::OrderId("X".into());
    let envelope = sign(SECRET, &ApiRequest::new(key(), &params)).unwrap();
    assert_eq!(envelope.data, GOLDEN_DATA);
    assert_eq!(envelope.signature, GOLDEN_SIGNATURE);
}

#[test]
fn test_golden_signature_over_known_data() {
    assert_eq!(compute_signature(SECRET, GOLDEN_DATA), GOLDEN_SIGNATURE);
    assert!(verify_signature(SECRET, GOLDEN_DATA, GOLDEN_SIGNATURE));
    assert!(!verify_signature(b"other_secret", GOLDEN_DATA, GOLDEN_SIGNATURE));
}

#[test]
fn test_golden_data_is_the_compact_payload() {
    let params = StatusRequest::OrderId("X".into());
    let data = encode_payload(&ApiRequest::new(key(), &params)).unwrap();
    let json = liqpay::signing::decode_payload::<serde_json::Value>(&data).unwrap();
    assert_eq!(json["version"], 3);
    assert_eq!(json["public_key"], PUBLIC_KEY);
    assert_eq!(data, GOLDEN_DATA);
}

#[test]
fn test_signing_is_deterministic() {
    let params = RefundRequest {
        amount: "12.34".parse().unwrap(),
        order_id: "A-1".into(),
        options: PayOptions::default(),
    };
    let a = sign(SECRET, &ApiRequest::new(key(), &params)).unwrap();
    let b = sign(SECRET, &ApiRequest::new(key(), &params)).unwrap();
    assert_eq!(a, b);
}

fn mutated_payloads() -> Vec<RefundRequest> {
    let mut out = Vec::new();
    for i in 0..1200i64 {
        let mut options = PayOptions::default();
        if i % 3 == 0 {
            options.common.description = format!("item {}", i % 11);
        }
        if i % 5 == 0 {
            options.common.language = "uk".into();
        }
        if i % 7 == 0 {
            options.common.date = Timestamp::from_millis(1_700_000_000_000 + i).ok();
        }
        out.push(RefundRequest {
            amount: Amount::new(i + 1, 2),
            order_id: format!("order-{}", i % 13),
            options,
        });
    }

    // Single-field mutations of one base payload.
    let base = RefundRequest {
        amount: "10.00".parse().unwrap(),
        order_id: "base".into(),
        options: PayOptions::default(),
    };
    for c in ['a', 'b', 'c', 'x', 'y', 'z'] {
        let mut p = base.clone();
        p.order_id.push(c);
        out.push(p);
    }
    let mut p = base.clone();
    p.options.common.info = "extra".into();
    out.push(p);
    let mut p = base.clone();
    p.options.common.balance_key = Some(key());
    out.push(p);
    out.push(base);
    out
}

#[test]
fn test_mutated_payloads_never_collide() {
    let payloads = mutated_payloads();
    assert!(payloads.len() >= 1000);

    let mut data = HashSet::new();
    let mut signatures = HashSet::new();
    for params in &payloads {
        let envelope = sign(SECRET, &ApiRequest::new(key(), params)).unwrap();
        assert!(verify_signature(SECRET, &envelope.data, &envelope.signature));
        data.insert(envelope.data);
        signatures.insert(envelope.signature);
    }
    assert_eq!(data.len(), payloads.len(), "payload corpus has duplicates");
    assert_eq!(signatures.len(), payloads.len());
}

#[test]
fn test_empty_options_are_not_signed() {
    let bare = RefundRequest {
        amount: "1.00".parse().unwrap(),
        order_id: "A".into(),
        options: PayOptions::default(),
    };
    let with_empty = RefundRequest {
        options: PayOptions {
            common: RequestOptions {
                description: String::new(),
                language: "x".into(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..bare.clone()
    };
    let a = sign(SECRET, &ApiRequest::new(key(), &bare)).unwrap();
    let b = sign(SECRET, &ApiRequest::new(key(), &with_empty)).unwrap();
    assert_eq!(a, b);
}
