use std::time::Duration;

/// Protocol version sent in every request payload.
pub const API_VERSION: u32 = 3;

/// Default checkout API endpoint.
pub const CHECKOUT_API_URL: &str = "https://www.liqpay.ua/api/request";

/// Request timeout used when the configuration does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Gateway message for a status lookup on an order it does not know.
pub const UNKNOWN_ORDER_ID: &str = "unknown order id";

/// Message used when the gateway flags an error without describing it.
pub const MISSING_ERROR_DESCRIPTION: &str =
    "response indicates error but no description was provided";

/// Message used when there is no response envelope at all.
pub const NO_RESPONSE: &str = "no response from gateway";

/// Operation names for the `action` field.
pub mod action {
    pub const PAY: &str = "pay";
    pub const REFUND: &str = "refund";
    pub const PAY_QR: &str = "payqr";
    pub const OFFSET: &str = "offset";
    pub const STATUS: &str = "status";
    pub const INFO_MERCHANT: &str = "agent_info_merchant";
}
