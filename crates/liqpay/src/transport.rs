//! HTTP transport seam.
//!
//! The client never builds its own HTTP stack: a [`Transport`] is constructed
//! once by the caller and handed in, so connection pooling, TLS and the
//! request timeout are configured in one place.

use std::future::Future;
use std::sync::Arc;
use url::Url;

use crate::error::LiqPayError;

/// Raw HTTP response: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Posts `application/x-www-form-urlencoded` requests.
pub trait Transport: Send + Sync {
    fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<TransportResponse, LiqPayError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<TransportResponse, LiqPayError>> + Send {
        (**self).post_form(url, form)
    }
}

/// Default transport over a pooled `reqwest::Client`.
#[cfg(feature = "full")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

#[cfg(feature = "full")]
impl HttpTransport {
    /// Build a client with a fixed per-request timeout.
    pub fn new(timeout: std::time::Duration) -> Result<Self, LiqPayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| LiqPayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[cfg(feature = "full")]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<TransportResponse, LiqPayError> {
        let resp = self
            .http
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| LiqPayError::Transport(format!("request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| LiqPayError::Transport(format!("failed to read response body: {e}")))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
