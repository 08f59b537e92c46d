use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::LiqPayError;
use crate::money::{Amount, CreditCard, Currency};
use crate::public_key::PublicKey;
use crate::request::{
    ApiRequest, CardPaymentRequest, InfoMerchantRequest, OffsetRequest, Operation, PayOptions,
    QrPaymentRequest, RefundRequest, RequestOptions, SplitRules, StatusRequest,
};
use crate::response::{classify, Classification, ErrorBody};
use crate::signing::{self, SignedEnvelope};
use crate::status::{OffsetStatus, OrderStatus};
use crate::transport::{Transport, TransportResponse};

/// Client for the LiqPay checkout API.
///
/// Each call validates the typed request, signs it with the merchant's
/// private key, posts `data`/`signature` through the injected [`Transport`]
/// and classifies the response before decoding the typed result.
pub struct LiqPayClient<T: Transport> {
    transport: T,
    api_url: Url,
    public_key: PublicKey,
    secret: Vec<u8>,
}

#[cfg(feature = "full")]
impl LiqPayClient<crate::transport::HttpTransport> {
    /// Build a client with an HTTP transport using the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, LiqPayError> {
        let transport = crate::transport::HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> LiqPayClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            api_url: config.api_url,
            public_key: config.public_key,
            secret: config.secret,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Validate and sign an operation without sending it.
    pub fn sign_request<P: Operation>(&self, params: &P) -> Result<SignedEnvelope, LiqPayError> {
        params.validate()?;
        signing::sign(&self.secret, &ApiRequest::new(self.public_key, params))
    }

    /// Verify and decode a callback posted by the gateway to `server_url`.
    pub fn decode_callback<R: DeserializeOwned>(
        &self,
        data: &str,
        signature: &str,
    ) -> Result<R, LiqPayError> {
        signing::decode_callback(&self.secret, data, signature)
    }

    /// Sign, send and decode one operation.
    pub async fn call<P: Operation, R: DeserializeOwned>(
        &self,
        params: &P,
    ) -> Result<R, LiqPayError> {
        let envelope = self.sign_request(params)?;
        tracing::debug!(action = P::ACTION, url = %self.api_url, "dispatching gateway request");

        let resp = self
            .transport
            .post_form(&self.api_url, &envelope.form())
            .await?;
        decode_response(P::ACTION, resp)
    }

    /// Charge a card. The card is validated before anything is signed.
    pub async fn pay_with_card(
        &self,
        order_id: &str,
        amount: Amount,
        card: &CreditCard,
        options: PayOptions,
    ) -> Result<OrderStatus, LiqPayError> {
        card.validate()?;
        let params = CardPaymentRequest::new(order_id, amount, card, options);
        self.call(&params).await
    }

    pub async fn refund(
        &self,
        order_id: &str,
        amount: Amount,
        options: PayOptions,
    ) -> Result<OrderStatus, LiqPayError> {
        let params = RefundRequest {
            amount,
            order_id: order_id.to_string(),
            options,
        };
        self.call(&params).await
    }

    pub async fn pay_qr(
        &self,
        order_id: &str,
        amount: Amount,
        currency: Currency,
        options: PayOptions,
    ) -> Result<OrderStatus, LiqPayError> {
        let params = QrPaymentRequest {
            amount,
            currency,
            order_id: order_id.to_string(),
            options,
        };
        self.call(&params).await
    }

    pub async fn offset(
        &self,
        amount: Amount,
        currency: Currency,
        options: RequestOptions,
        split_rules: SplitRules,
    ) -> Result<OffsetStatus, LiqPayError> {
        let params = OffsetRequest {
            amount,
            currency,
            options,
            split_rules,
        };
        self.call(&params).await
    }

    /// Look up an order. Returns `Ok(None)` when the gateway does not know the
    /// order.
    pub async fn order_status(&self, order_id: &str) -> Result<Option<OrderStatus>, LiqPayError> {
        match self
            .call(&StatusRequest::OrderId(order_id.to_string()))
            .await
        {
            Ok(status) => Ok(Some(status)),
            // Intentional: "unknown order id" means "no such order" for this
            // lookup only. Every other operation surfaces it as an error.
            Err(e) if e.is_unknown_order() => {
                tracing::debug!(order_id = %order_id, "gateway does not know this order");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn offset_status(&self, offset_id: &str) -> Result<OffsetStatus, LiqPayError> {
        self.call(&StatusRequest::OffsetId(offset_id.to_string()))
            .await
    }

    pub async fn info_merchant(&self) -> Result<OffsetStatus, LiqPayError> {
        self.call(&InfoMerchantRequest {}).await
    }
}

/// Turn a raw HTTP response into a typed result.
///
/// Below 300 the body is classified as an envelope first; at 300 and above it
/// is read as an error body.
pub fn decode_response<R: DeserializeOwned>(
    action: &str,
    resp: TransportResponse,
) -> Result<R, LiqPayError> {
    if resp.status >= 300 {
        tracing::warn!(action = %action, status = resp.status, "gateway returned HTTP error");
        let body: ErrorBody = serde_json::from_slice(&resp.body).map_err(|_| {
            LiqPayError::Transport(format!(
                "gateway returned HTTP {} with an undecodable body",
                resp.status
            ))
        })?;
        return Err(body.into_error());
    }

    let value: Value = if resp.body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&resp.body)?
    };
    let envelope = match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            return Err(LiqPayError::InvalidPayload(format!(
                "expected a JSON object, got {other}"
            )))
        }
    };

    if let Classification::Failure { message } = classify(envelope.as_ref()) {
        tracing::warn!(action = %action, error = %message, "gateway reported failure");
        return Err(LiqPayError::Gateway { message });
    }

    let envelope = envelope.unwrap_or_default();
    Ok(serde_json::from_value(Value::Object(envelope))?)
}
