//! Client library for the LiqPay checkout API.
//!
//! Requests are typed payloads ([`request`]) that are serialized to compact
//! JSON, base64-encoded and signed with `SHA1(private_key || data ||
//! private_key)` ([`signing`]). They are posted as the `data`/`signature` form
//! pair through an injected [`Transport`]. Response bodies are classified
//! ([`response`]) before they are decoded into typed results ([`status`]).
//!
//! Field codecs handle the gateway's wire quirks: 22-char unpadded base64 keys
//! ([`public_key`]) and timestamps that arrive in half a dozen shapes
//! ([`time`]).
//!
//! # Quick example
//!
//! ```no_run
//! use liqpay::{ClientConfig, LiqPayClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), liqpay::LiqPayError> {
//! let config = ClientConfig::new("AAECAwQFBgcICQoLDA0ODw", b"private-key".to_vec())?;
//! let client = LiqPayClient::new(config)?;
//!
//! match client.order_status("order-42").await? {
//!     Some(status) => println!("order is {}", status.common.status),
//!     None => println!("no such order"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod money;
pub mod public_key;
pub mod request;
pub mod response;
pub mod signing;
pub mod status;
pub mod time;
pub mod transport;

pub use client::LiqPayClient;
pub use config::ClientConfig;
pub use constants::*;
pub use error::LiqPayError;
pub use money::{Amount, CartItem, CartItems, CreditCard, Currency};
pub use public_key::PublicKey;
pub use request::{
    ApiRequest, CardPaymentRequest, InfoMerchantRequest, OffsetRequest, Operation, PayOptions,
    QrPaymentRequest, RefundRequest, RequestOptions, ResultRedirect, SplitRule, SplitRules,
    StatusRequest,
};
pub use response::{classify, Classification, ResponseEnvelope};
pub use signing::{sign, verify_signature, SignedEnvelope};
pub use status::{CommonStatus, OffsetStatus, OrderStatus};
pub use time::Timestamp;
pub use transport::{Transport, TransportResponse};

#[cfg(feature = "full")]
pub use transport::HttpTransport;
