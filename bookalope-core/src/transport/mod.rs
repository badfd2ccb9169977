//! Transport layer: the three HTTP verbs the Bookalope API uses

mod http;
mod memory;

pub use http::HttpTransport;
pub use memory::{MemoryTransport, RecordedRequest, Reply};

use crate::error::{ProtocolError, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Response header carrying the server's API version
pub const API_VERSION_HEADER: &str = "X-Bookalope-Api-Version";

/// Body of a successful GET
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `application/json` response
    Json(Value),

    /// `Content-Disposition: attachment` response
    Attachment(Vec<u8>),
}

impl Payload {
    /// Expect a JSON body
    pub fn into_json(self) -> Result<Value> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Attachment(bytes) => Err(ProtocolError::UnexpectedResponse(format!(
                "expected JSON, got an attachment of {} bytes",
                bytes.len()
            ))
            .into()),
        }
    }

    /// Expect an attachment body
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Payload::Attachment(bytes) => Ok(bytes),
            Payload::Json(_) => Err(ProtocolError::UnexpectedResponse(
                "expected an attachment, got JSON".to_string(),
            )
            .into()),
        }
    }
}

/// A way to reach a Bookalope server.
///
/// Implementations never retry: conversions cost money and create jobs
/// on the server, so retry policy belongs to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path`; success is exactly 200
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Payload>;

    /// POST a JSON body; success is 200 or 201, an empty reply is `None`
    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>>;

    /// DELETE `path`; success is exactly 204
    async fn delete(&self, path: &str) -> Result<()>;
}
