use std::fmt;
use std::time::Duration;
use url::Url;

use crate::constants::{CHECKOUT_API_URL, DEFAULT_TIMEOUT};
use crate::error::LiqPayError;
use crate::public_key::PublicKey;

/// Connection settings for a [`LiqPayClient`](crate::LiqPayClient).
#[derive(Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub public_key: PublicKey,
    pub secret: Vec<u8>,
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("public_key", &self.public_key.to_string())
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Config for the default endpoint. `public_key` is the canonical key text.
    pub fn new(public_key: &str, secret: impl Into<Vec<u8>>) -> Result<Self, LiqPayError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(LiqPayError::Config("private key must not be empty".into()));
        }
        Ok(Self {
            api_url: parse_url(CHECKOUT_API_URL)?,
            public_key: public_key.parse()?,
            secret,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, LiqPayError> {
        self.api_url = parse_url(api_url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `LIQPAY_PUBLIC_KEY`, `LIQPAY_PRIVATE_KEY` and the optional
    /// `LIQPAY_API_URL` and `LIQPAY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, LiqPayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LiqPayError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let public_key = var("LIQPAY_PUBLIC_KEY")
            .ok_or_else(|| LiqPayError::Config("LIQPAY_PUBLIC_KEY is required".into()))?;
        let secret = var("LIQPAY_PRIVATE_KEY")
            .ok_or_else(|| LiqPayError::Config("LIQPAY_PRIVATE_KEY is required".into()))?;

        let mut config = Self::new(&public_key, secret.into_bytes())?;

        if let Some(url) = var("LIQPAY_API_URL") {
            config = config.with_api_url(&url)?;
        }
        if let Some(secs) = var("LIQPAY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                LiqPayError::Config(format!("LIQPAY_TIMEOUT_SECS must be whole seconds, got {secs:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn parse_url(url: &str) -> Result<Url, LiqPayError> {
    Url::parse(url).map_err(|e| LiqPayError::Config(format!("invalid API URL {url:?}: {e}")))
}
