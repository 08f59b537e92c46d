//! Typed request payloads.
//!
//! Every request is an [`ApiRequest`]: the `version`/`action`/`public_key`
//! header followed by one operation's fields. Optional fields carry their own
//! omission rule (`skip_serializing_if`) because the signature covers exactly
//! the serialized bytes. Nothing may be added after signing.

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

use crate::constants::{action, API_VERSION};
use crate::error::LiqPayError;
use crate::money::{Amount, CartItems, CreditCard, Currency};
use crate::public_key::PublicKey;
use crate::time::Timestamp;

/// A gateway operation payload.
pub trait Operation: Serialize {
    /// Value of the `action` field.
    const ACTION: &'static str;

    /// Checked before the payload is serialized and signed.
    fn validate(&self) -> Result<(), LiqPayError> {
        Ok(())
    }
}

/// Full request payload: common header plus operation fields.
#[derive(Debug, Serialize)]
pub struct ApiRequest<'a, P: Operation> {
    pub version: u32,
    pub action: &'static str,
    pub public_key: PublicKey,
    #[serde(flatten)]
    pub params: &'a P,
}

impl<'a, P: Operation> ApiRequest<'a, P> {
    pub fn new(public_key: PublicKey, params: &'a P) -> Self {
        Self {
            version: API_VERSION,
            action: P::ACTION,
            public_key,
            params,
        }
    }
}

fn is_not_language_code(language: &str) -> bool {
    language.len() != 2
}

/// Optional fields shared by every money-moving operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_key: Option<PublicKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    /// Sent only when it is a two-letter code.
    #[serde(skip_serializing_if = "is_not_language_code")]
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<Url>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub info: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub order_data: String,
}

/// Where the payer is sent after checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRedirect {
    pub result_url: Url,
    /// Seconds to wait before redirecting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url_delay: Option<u32>,
}

/// Options for payment and refund operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayOptions {
    #[serde(flatten)]
    pub common: RequestOptions,
    #[serde(flatten)]
    pub redirect: Option<ResultRedirect>,
    #[serde(skip_serializing_if = "CartItems::is_empty")]
    pub cart_items: CartItems,
}

impl PayOptions {
    pub fn validate(&self) -> Result<(), LiqPayError> {
        self.cart_items.validate()
    }
}

/// Part of an offset amount routed to another balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitRule {
    pub amount: Amount,
    pub balance_key: PublicKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Split rules travel as a JSON string nested in the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitRules(pub Vec<SplitRule>);

impl SplitRules {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SplitRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = serde_json::to_string(&self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

fn require_positive(amount: &Amount) -> Result<(), LiqPayError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(LiqPayError::InvalidRequest(format!(
            "amount ({amount}) must be greater than 0"
        )))
    }
}

fn require_order_id(order_id: &str) -> Result<(), LiqPayError> {
    if order_id.trim().is_empty() {
        Err(LiqPayError::InvalidRequest("order_id is required".into()))
    } else {
        Ok(())
    }
}

/// `pay`: charge a card directly.
#[derive(Clone, Serialize)]
pub struct CardPaymentRequest {
    pub amount: Amount,
    pub order_id: String,
    pub card: String,
    pub card_exp_month: String,
    pub card_exp_year: String,
    pub card_cvv: String,
    #[serde(flatten)]
    pub options: PayOptions,
}

impl fmt::Debug for CardPaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self.card.get(self.card.len().saturating_sub(4)..).unwrap_or("");
        f.debug_struct("CardPaymentRequest")
            .field("amount", &self.amount)
            .field("order_id", &self.order_id)
            .field("card", &format_args!("****{last4}"))
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CardPaymentRequest {
    pub fn new(
        order_id: impl Into<String>,
        amount: Amount,
        card: &CreditCard,
        options: PayOptions,
    ) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            card: card.number_string(),
            card_exp_month: card.expiry_month.to_string(),
            card_exp_year: card.expiry_year.to_string(),
            card_cvv: card.security_code.clone(),
            options,
        }
    }
}

impl Operation for CardPaymentRequest {
    const ACTION: &'static str = action::PAY;

    fn validate(&self) -> Result<(), LiqPayError> {
        require_positive(&self.amount)?;
        require_order_id(&self.order_id)?;
        self.options.validate()
    }
}

/// `refund`: return money for a completed order.
#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    pub amount: Amount,
    pub order_id: String,
    #[serde(flatten)]
    pub options: PayOptions,
}

impl Operation for RefundRequest {
    const ACTION: &'static str = action::REFUND;

    fn validate(&self) -> Result<(), LiqPayError> {
        require_positive(&self.amount)?;
        require_order_id(&self.order_id)?;
        self.options.validate()
    }
}

/// `payqr`: create a QR-code checkout.
#[derive(Debug, Clone, Serialize)]
pub struct QrPaymentRequest {
    pub amount: Amount,
    pub currency: Currency,
    pub order_id: String,
    #[serde(flatten)]
    pub options: PayOptions,
}

impl Operation for QrPaymentRequest {
    const ACTION: &'static str = action::PAY_QR;

    fn validate(&self) -> Result<(), LiqPayError> {
        require_positive(&self.amount)?;
        require_order_id(&self.order_id)?;
        self.options.validate()
    }
}

/// `offset`: move funds between balances, optionally split.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetRequest {
    pub amount: Amount,
    pub currency: Currency,
    #[serde(flatten)]
    pub options: RequestOptions,
    #[serde(skip_serializing_if = "SplitRules::is_empty")]
    pub split_rules: SplitRules,
}

impl Operation for OffsetRequest {
    const ACTION: &'static str = action::OFFSET;

    fn validate(&self) -> Result<(), LiqPayError> {
        require_positive(&self.amount)?;
        for rule in &self.split_rules.0 {
            require_positive(&rule.amount)?;
        }
        Ok(())
    }
}

/// `status`: look up an order or an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusRequest {
    OrderId(String),
    OffsetId(String),
}

impl Operation for StatusRequest {
    const ACTION: &'static str = action::STATUS;

    fn validate(&self) -> Result<(), LiqPayError> {
        match self {
            Self::OrderId(id) => require_order_id(id),
            Self::OffsetId(id) if id.trim().is_empty() => {
                Err(LiqPayError::InvalidRequest("offset_id is required".into()))
            }
            Self::OffsetId(_) => Ok(()),
        }
    }
}

/// `agent_info_merchant`: merchant balance information.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InfoMerchantRequest {}

impl Operation for InfoMerchantRequest {
    const ACTION: &'static str = action::INFO_MERCHANT;
}
