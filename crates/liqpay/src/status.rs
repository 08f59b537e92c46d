//! Typed results decoded from successful gateway responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::money::{Amount, Currency};
use crate::public_key::PublicKey;
use crate::time::Timestamp;

/// Some identifiers arrive as numbers in one response and strings in another.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Fields common to every operation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonStatus {
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<PublicKey>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(
        default,
        with = "crate::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_date: Option<Timestamp>,
    #[serde(
        default,
        with = "crate::time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Timestamp>,
}

impl CommonStatus {
    /// Whether the gateway reports the money as moved (`sandbox` counts in
    /// test mode).
    pub fn is_paid(&self) -> bool {
        matches!(self.status.as_str(), "success" | "sandbox")
    }
}

/// Result of `pay`, `refund`, `payqr` and order `status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    #[serde(flatten)]
    pub common: CommonStatus,
    #[serde(rename = "paytype", default, skip_serializing_if = "String::is_empty")]
    pub pay_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_data: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub liqpay_order_id: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub payment_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sender_card_mask2: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qr_code: Vec<String>,
    #[serde(
        rename = "checkout_short_url",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub pay_short_url: String,
}

/// Result of `offset`, offset `status` and `agent_info_merchant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffsetStatus {
    #[serde(flatten)]
    pub common: CommonStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub offset_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offset_data: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "String::is_empty"
    )]
    pub liqpay_order_id: String,
}
