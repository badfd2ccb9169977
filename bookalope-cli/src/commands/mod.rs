//! CLI command implementations

mod books;
mod convert;
mod formats;
mod profile;
mod styles;

use anyhow::{Context, Result};
use bookalope_core::{BookalopeClient, ClientConfig, Token};

pub use books::books;
pub use convert::{convert, ConvertArgs};
pub use formats::formats;
pub use profile::profile;
pub use styles::styles;

/// Server connection settings shared by all commands
pub struct Server {
    pub token: Option<String>,
    pub host: Option<String>,
    pub beta: bool,
}

impl Server {
    /// Build a client; the token is validated here, before any request
    pub fn client(&self) -> Result<BookalopeClient> {
        let token = self
            .token
            .as_deref()
            .context("No API token given, use --token or set BOOKALOPE_TOKEN")?;
        let token = Token::parse(token).context("Invalid API token")?;

        let mut config = ClientConfig::new(token);
        if let Some(host) = &self.host {
            config = config
                .with_host(host.as_str())
                .with_context(|| format!("Invalid server URL: {}", host))?;
        } else if self.beta {
            config = config.beta();
        }

        tracing::debug!("Using Bookalope server {}", config.host);
        BookalopeClient::new(config).context("Failed to create Bookalope client")
    }
}
