//! Client configuration

use crate::error::{BookalopeError, Result};
use crate::token::Token;
use std::time::Duration;

/// Production Bookalope server
pub const PRODUCTION_HOST: &str = "https://bookflow.bookalope.net";

/// Beta Bookalope server
pub const BETA_HOST: &str = "https://beta.bookalope.net";

/// API version this client speaks, checked against `X-Bookalope-Api-Version`
pub const API_VERSION: &str = "1.1.0";

/// Connection settings for one Bookalope session.
///
/// The credential lives here and is fixed once the client is built; every
/// request made through that client reads it, none changes it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without trailing slash
    pub host: String,

    /// User's auth token
    pub token: Token,

    /// Expected value of the API version response header
    pub api_version: String,

    /// Per-request timeout
    pub timeout: Duration,

    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for the production server
    pub fn new(token: Token) -> Self {
        Self {
            host: PRODUCTION_HOST.to_string(),
            token,
            api_version: API_VERSION.to_string(),
            timeout: Duration::from_secs(60),
            user_agent: format!("bookalope-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Use Bookalope's beta server instead of production
    pub fn beta(mut self) -> Self {
        self.host = BETA_HOST.to_string();
        self
    }

    /// Use an explicit server base URL
    pub fn with_host(mut self, host: impl Into<String>) -> Result<Self> {
        self.host = normalize_host(&host.into())?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a configuration from `BOOKALOPE_TOKEN`, `BOOKALOPE_HOST` and
    /// `BOOKALOPE_BETA`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("BOOKALOPE_TOKEN")
            .map_err(|_| BookalopeError::Config("BOOKALOPE_TOKEN is not set".to_string()))?;
        let mut config = Self::new(Token::parse(token.trim())?);

        if let Ok(host) = std::env::var("BOOKALOPE_HOST") {
            config = config.with_host(host)?;
        } else if std::env::var("BOOKALOPE_BETA")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
        {
            config = config.beta();
        }

        Ok(config)
    }
}

fn normalize_host(host: &str) -> Result<String> {
    if host.is_empty() {
        return Err(BookalopeError::InvalidUrl("URL cannot be empty".into()));
    }
    let host = host.trim_end_matches('/');
    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(BookalopeError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Ok(host.to_string())
}
