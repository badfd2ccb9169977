//! The Bookalope client: entry point to profiles, books, bookshelves,
//! formats and styles.

use crate::config::ClientConfig;
use crate::error::{ProtocolError, Result};
use crate::resources::{Book, Bookshelf, Profile};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Format, FormatList, Style, StylePayload};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Handle to one Bookalope session.
///
/// Cloning is cheap; clones share the transport and its credential.
///
/// # Example
///
/// ```ignore
/// use bookalope_core::{BookalopeClient, ClientConfig, Token};
///
/// let token: Token = "0123456789abcdef0123456789abcdef".parse()?;
/// let client = BookalopeClient::new(ClientConfig::new(token))?;
///
/// let mut book = client.create_book(Some("Alice"), None).await?;
/// let bookflow = book.create_bookflow(None, Some("Alice in Wonderland")).await?;
/// println!("Bookflow {} is in step {}", bookflow.id(), bookflow.step());
/// ```
#[derive(Clone)]
pub struct BookalopeClient {
    transport: Arc<dyn Transport>,
}

impl BookalopeClient {
    /// Create a client that talks HTTP to the configured server
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        debug!(host = %transport.host(), "Created Bookalope client");
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub(crate) async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.transport.get(path, query).await?.into_json()
    }

    pub(crate) async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.transport.get(path, query).await?.into_bytes()
    }

    pub(crate) async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.transport.post(path, body).await
    }

    /// POST where the server must answer with a JSON body
    pub(crate) async fn post_for_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.transport.post(path, body).await?.ok_or_else(|| {
            ProtocolError::UnexpectedResponse(format!("POST {path} returned an empty body")).into()
        })
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.transport.delete(path).await
    }

    /// Fetch the profile of the token's user
    pub async fn profile(&self) -> Result<Profile> {
        Profile::fetch(self).await
    }

    /// All design styles available for a target format
    pub async fn styles(&self, format: &str) -> Result<Vec<Style>> {
        let response = self.get_json("/api/styles", &[("format", format)]).await?;
        let styles: Vec<StylePayload> = extract(response, "styles")?;
        Ok(styles
            .into_iter()
            .map(|payload| Style::from_payload(format, payload))
            .collect())
    }

    /// Look up a style for a format by short name
    pub async fn style(&self, format: &str, short_name: &str) -> Result<Option<Style>> {
        Ok(self
            .styles(format)
            .await?
            .into_iter()
            .find(|style| style.short_name == short_name))
    }

    /// Import and export formats supported by the server
    pub async fn formats(&self) -> Result<FormatList> {
        let response = self.get_json("/api/formats", &[]).await?;
        extract(response, "formats")
    }

    pub async fn export_formats(&self) -> Result<Vec<Format>> {
        Ok(self.formats().await?.export)
    }

    pub async fn import_formats(&self) -> Result<Vec<Format>> {
        Ok(self.formats().await?.import)
    }

    /// All bookshelves of the user
    pub async fn bookshelves(&self) -> Result<Vec<Bookshelf>> {
        let response = self.get_json("/api/bookshelves", &[]).await?;
        extract::<Vec<_>>(response, "bookshelves")?
            .into_iter()
            .map(|payload| Bookshelf::from_payload(self, payload))
            .collect()
    }

    /// All books of the user
    pub async fn books(&self) -> Result<Vec<Book>> {
        let response = self.get_json("/api/books", &[]).await?;
        extract::<Vec<_>>(response, "books")?
            .into_iter()
            .map(|payload| Book::from_payload(self, payload))
            .collect()
    }

    /// Fetch a book by id
    pub async fn book(&self, id: &str) -> Result<Book> {
        Book::fetch(self, id).await
    }

    /// Fetch a bookshelf by id
    pub async fn bookshelf(&self, id: &str) -> Result<Bookshelf> {
        Bookshelf::fetch(self, id).await
    }

    /// Create a new book on the server, optionally on a bookshelf
    pub async fn create_book(
        &self,
        name: Option<&str>,
        bookshelf: Option<&Bookshelf>,
    ) -> Result<Book> {
        Book::create(self, name, bookshelf).await
    }

    /// Create a new bookshelf on the server
    pub async fn create_bookshelf(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Bookshelf> {
        Bookshelf::create(self, name, description).await
    }
}

impl std::fmt::Debug for BookalopeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookalopeClient").finish_non_exhaustive()
    }
}

/// Take `key` out of a response envelope such as `{"book": {...}}`
pub(crate) fn extract<T: DeserializeOwned>(mut response: Value, key: &str) -> Result<T> {
    let inner = response
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ProtocolError::UnexpectedResponse(format!("response has no '{key}' field")))?;
    Ok(serde_json::from_value(inner)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_styles_for_format() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_get_json(
            "/api/styles",
            json!({"styles": [
                {"name": "default", "info": {"name": "Default", "description": "", "price-api": 0.0}},
                {"name": "serif", "info": {"name": "Serif", "description": "Bookish", "price-api": 4.0}}
            ]}),
        );
        let client = BookalopeClient::with_transport(transport.clone());

        let styles = client.styles("pdf").await.unwrap();
        assert_eq!(styles.len(), 2);
        assert!(styles.iter().all(|s| s.format == "pdf"));

        let serif = client.style("pdf", "serif").await.unwrap().unwrap();
        assert_eq!(serif.description, "Bookish");

        let request = transport.last_request().unwrap();
        assert_eq!(request.query, vec![("format".into(), "pdf".into())]);
    }

    #[tokio::test]
    async fn test_formats() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_get_json(
            "/api/formats",
            json!({"formats": {
                "import": [{"name": "docx", "mime": "application/docx", "exts": ["docx"]}],
                "export": [
                    {"name": "epub", "mime": "application/epub+zip", "exts": ["epub"]},
                    {"name": "pdf", "mime": "application/pdf", "exts": ["pdf"]}
                ]
            }}),
        );
        let client = BookalopeClient::with_transport(transport);

        let export: Vec<_> = client
            .export_formats()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(export, vec!["epub", "pdf"]);
        assert_eq!(client.import_formats().await.unwrap()[0].name, "docx");
    }

    #[test]
    fn test_extract_missing_key() {
        let err = extract::<Vec<String>>(json!({"other": []}), "books").unwrap_err();
        assert!(err.to_string().contains("'books'"));
    }
}
