//! Amounts, currencies, cards and cart items.
//!
//! Amounts are `rust_decimal::Decimal` values and are never routed through
//! floating point. On the wire they are decimal strings; responses may carry
//! them as JSON numbers or strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LiqPayError;

pub use rust_decimal::Decimal as Amount;

/// Settlement currencies accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    UAH,
    USD,
    EUR,
    GBP,
    PLN,
    KZT,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UAH => "UAH",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::PLN => "PLN",
            Self::KZT => "KZT",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = LiqPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UAH" => Ok(Self::UAH),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "PLN" => Ok(Self::PLN),
            "KZT" => Ok(Self::KZT),
            other => Err(LiqPayError::InvalidRequest(format!(
                "unsupported currency {other:?}"
            ))),
        }
    }
}

/// Payment card details for direct card payments.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    pub number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub security_code: String,
}

// Card data must never reach logs.
impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.number_string();
        let last4 = digits.get(digits.len().saturating_sub(4)..).unwrap_or("");
        f.debug_struct("CreditCard")
            .field("number", &format_args!("****{last4}"))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("security_code", &"***")
            .finish()
    }
}

impl CreditCard {
    pub fn new(
        number: impl Into<String>,
        expiry_month: u8,
        expiry_year: u16,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            expiry_month,
            expiry_year,
            security_code: security_code.into(),
        }
    }

    /// Card number with separators removed.
    pub fn number_string(&self) -> String {
        self.number.chars().filter(char::is_ascii_digit).collect()
    }

    pub fn validate(&self) -> Result<(), LiqPayError> {
        if !self
            .number
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
        {
            return Err(LiqPayError::InvalidRequest(
                "card number contains invalid characters".into(),
            ));
        }
        let digits = self.number_string();
        if !(12..=19).contains(&digits.len()) {
            return Err(LiqPayError::InvalidRequest(format!(
                "card number must have 12-19 digits, got {}",
                digits.len()
            )));
        }
        if !luhn_valid(&digits) {
            return Err(LiqPayError::InvalidRequest(
                "card number fails checksum".into(),
            ));
        }
        if !(1..=12).contains(&self.expiry_month) {
            return Err(LiqPayError::InvalidRequest(format!(
                "expiry month {} out of range",
                self.expiry_month
            )));
        }
        if self.expiry_year == 0 {
            return Err(LiqPayError::InvalidRequest("expiry year missing".into()));
        }
        let cvv = self.security_code.as_str();
        if !(3..=4).contains(&cvv.len()) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(LiqPayError::InvalidRequest(
                "security code must be 3 or 4 digits".into(),
            ));
        }
        Ok(())
    }
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// One line of a checkout cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub label: String,
    pub amount: Amount,
}

/// Cart contents. The gateway expects the list as a JSON string nested inside
/// the payload, not as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartItems(Vec<CartItem>);

impl CartItems {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self(items)
    }

    pub fn has_items(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.0
    }

    pub fn sum(&self) -> Amount {
        self.0
            .iter()
            .fold(Amount::ZERO, |total, item| total + item.amount)
    }

    pub fn validate(&self) -> Result<(), LiqPayError> {
        match self.0.iter().find(|item| item.amount.is_sign_negative()) {
            Some(item) => Err(LiqPayError::InvalidRequest(format!(
                "cart item {} is negative",
                item.label
            ))),
            None => Ok(()),
        }
    }
}

impl Serialize for CartItems {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = serde_json::to_string(&self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for CartItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if text.is_empty() {
            return Ok(Self::default());
        }
        let items: Vec<CartItem> = serde_json::from_str(&text).map_err(D::Error::custom)?;
        let cart = Self(items);
        cart.validate().map_err(D::Error::custom)?;
        Ok(cart)
    }
}
