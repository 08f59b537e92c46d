//! Request signing and callback verification.
//!
//! A request travels as two form fields: `data`, the base64 of the compact
//! JSON payload, and `signature`, the base64 of
//! `SHA1(secret || data || secret)`. The digest covers the base64 text exactly
//! as transmitted, never the raw JSON, so the payload must be complete before
//! it is signed. The gateway signs the callbacks it posts to `server_url` the
//! same way.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::LiqPayError;

/// SHA-1 digest length in bytes.
const DIGEST_LEN: usize = 20;

/// The signed wire unit posted to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub data: String,
    pub signature: String,
}

impl SignedEnvelope {
    /// Form fields in the order they are posted.
    pub fn form(&self) -> [(&'static str, &str); 2] {
        [("data", &self.data), ("signature", &self.signature)]
    }
}

/// Serialize a payload to compact JSON and base64-encode it.
pub fn encode_payload<T: Serialize + ?Sized>(payload: &T) -> Result<String, LiqPayError> {
    let json = serde_json::to_vec(payload)?;
    Ok(STANDARD.encode(json))
}

/// Decode a base64 JSON payload.
pub fn decode_payload<T: DeserializeOwned>(data: &str) -> Result<T, LiqPayError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| LiqPayError::InvalidPayload(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| LiqPayError::InvalidPayload(format!("invalid JSON: {e}")))
}

fn digest(secret: &[u8], data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha1::new();
    hasher.update(secret);
    hasher.update(data);
    hasher.update(secret);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compute the base64 signature of already-encoded `data`.
pub fn compute_signature(secret: &[u8], data: &str) -> String {
    STANDARD.encode(digest(secret, data.as_bytes()))
}

/// Encode and sign a payload.
pub fn sign<T: Serialize + ?Sized>(
    secret: &[u8],
    payload: &T,
) -> Result<SignedEnvelope, LiqPayError> {
    let data = encode_payload(payload)?;
    let signature = compute_signature(secret, &data);
    Ok(SignedEnvelope { data, signature })
}

/// Check a signature against `data` in constant time.
///
/// A signature that is not valid base64 is compared as all zeros so the
/// failure path takes the same time as a mismatch.
pub fn verify_signature(secret: &[u8], data: &str, signature: &str) -> bool {
    let expected = digest(secret, data.as_bytes());
    let provided = STANDARD
        .decode(signature.trim())
        .unwrap_or_else(|_| vec![0u8; DIGEST_LEN]);
    expected.as_slice().ct_eq(provided.as_slice()).into()
}

/// Verify and decode a callback the gateway posted to `server_url`.
pub fn decode_callback<T: DeserializeOwned>(
    secret: &[u8],
    data: &str,
    signature: &str,
) -> Result<T, LiqPayError> {
    if !verify_signature(secret, data, signature) {
        return Err(LiqPayError::InvalidSignature);
    }
    decode_payload(data)
}
