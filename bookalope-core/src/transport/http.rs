//! reqwest-backed transport

use super::{Payload, Transport, API_VERSION_HEADER};
use crate::config::ClientConfig;
use crate::error::{BookalopeError, ProtocolError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

/// Transport talking to a real Bookalope server over HTTP(S)
pub struct HttpTransport {
    http: Client,
    host: String,
    token: String,
    api_version: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            host: config.host.clone(),
            token: config.token.to_string(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    /// Reject anything but the accepted statuses, then check the API version
    async fn check(&self, response: Response, accepted: &[StatusCode]) -> Result<Response> {
        let status = response.status();
        if !accepted.contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(BookalopeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let found = response
            .headers()
            .get(API_VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if found.as_deref() != Some(self.api_version.as_str()) {
            return Err(ProtocolError::VersionMismatch {
                expected: self.api_version.clone(),
                found,
            }
            .into());
        }

        Ok(response)
    }
}

fn header_starts_with(response: &Response, name: HeaderName, prefix: &str) -> bool {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with(prefix))
        .unwrap_or(false)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Payload> {
        debug!(method = "GET", path = %path, "Bookalope request");

        let response = self
            .http
            .get(self.url(path))
            .basic_auth(&self.token, Some(""))
            .query(query)
            .send()
            .await?;
        let response = self.check(response, &[StatusCode::OK]).await?;

        if header_starts_with(&response, CONTENT_TYPE, "application/json") {
            let bytes = response.bytes().await?;
            return Ok(Payload::Json(serde_json::from_slice(&bytes)?));
        }
        if header_starts_with(&response, CONTENT_DISPOSITION, "attachment") {
            let bytes = response.bytes().await?;
            debug!(path = %path, size = bytes.len(), "Received attachment");
            return Ok(Payload::Attachment(bytes.to_vec()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("<none>")
            .to_string();
        Err(ProtocolError::UnexpectedResponse(format!(
            "GET {path} returned content type {content_type} without an attachment"
        ))
        .into())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        debug!(method = "POST", path = %path, "Bookalope request");

        let response = self
            .http
            .post(self.url(path))
            .basic_auth(&self.token, Some(""))
            .json(body)
            .send()
            .await?;
        let response = self
            .check(response, &[StatusCode::OK, StatusCode::CREATED])
            .await?;

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        debug!(method = "DELETE", path = %path, "Bookalope request");

        let response = self
            .http
            .delete(self.url(path))
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;
        self.check(response, &[StatusCode::NO_CONTENT]).await?;
        Ok(())
    }
}
