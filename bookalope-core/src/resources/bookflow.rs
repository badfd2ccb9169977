//! Bookflows: one conversion session for a book's manuscript.
//!
//! The server owns the bookflow's lifecycle. A new bookflow waits in the
//! `files` step for a document; uploading one moves it to `processing`
//! while the server analyses the manuscript, and from there to `convert`
//! (or `processing_failed`). Conversions are requested per target format
//! in the `convert` step, each with its own status that the caller polls
//! until the converted file is `available`.
//!
//! A [`Bookflow`] mirrors the last step it saw and refuses operations the
//! server would reject in that step, before sending anything. It never
//! waits or polls on its own; callers decide how often to call
//! [`Bookflow::update`] and [`Bookflow::convert_status`] and when to give up.

use super::metadata::BookflowMetadata;
use crate::client::{extract, BookalopeClient};
use crate::error::{LifecycleError, Result};
use crate::locale::Locale;
use crate::token::Token;
use crate::types::{ConversionStatus, CreditType, DocumentType, Field, Step, Style, DEFAULT_STYLE};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Image name the server uses for the cover
pub const COVER_IMAGE: &str = "cover-image";

/// Credit attached to a bookflow, as sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPayload {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reference from a bookflow to its book: either a bare id or an object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookRef {
    Id(Token),
    Object { id: Token },
}

impl BookRef {
    pub fn id(&self) -> &Token {
        match self {
            BookRef::Id(id) | BookRef::Object { id } => id,
        }
    }
}

/// Wire shape of a bookflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookflowPayload {
    pub id: Token,
    pub name: String,
    pub step: Step,
    #[serde(default)]
    pub credit: Option<CreditPayload>,
    #[serde(default)]
    pub book: Option<BookRef>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    /// Free-form on the wire; other clients may store any string here
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pubdate: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

fn credit_from_payload(credit: Option<&CreditPayload>) -> Result<Option<CreditType>> {
    match credit.map(|c| c.kind.as_str()) {
        None | Some("none") | Some("") => Ok(None),
        Some(kind) => Ok(Some(kind.parse()?)),
    }
}

/// Move the metadata fields out of a full bookflow payload
fn metadata_from(payload: &mut BookflowPayload) -> BookflowMetadata {
    BookflowMetadata {
        title: Field::from_server(payload.title.take()),
        author: Field::from_server(payload.author.take()),
        copyright: Field::from_server(payload.copyright.take()),
        isbn: Field::from_server(payload.isbn.take()),
        language: Field::from_server(payload.language.take().filter(|l| !l.is_empty())),
        pubdate: Field::from_server(payload.pubdate.take()),
        publisher: Field::from_server(payload.publisher.take()),
    }
}

/// Client-side mirror of one bookflow
#[derive(Debug, Clone)]
pub struct Bookflow {
    client: BookalopeClient,
    id: Token,
    book_id: Token,
    url: String,
    name: String,
    step: Step,
    credit: Option<CreditType>,
    metadata: BookflowMetadata,
}

impl Bookflow {
    /// Create a new bookflow for a book on the server
    pub async fn create(
        client: &BookalopeClient,
        book_id: &Token,
        name: Option<&str>,
        title: Option<&str>,
    ) -> Result<Self> {
        let body = json!({
            "name": name.unwrap_or("Bookflow"),
            "title": title.unwrap_or("<no-title>"),
        });
        let url = format!("/api/books/{book_id}/bookflows");
        let response = client.post_for_json(&url, &body).await?;
        let mut bookflow = Self::from_payload(client, book_id.clone(), extract(response, "bookflow")?)?;
        if let Some(title) = title {
            bookflow.metadata.title = Field::Set(title.to_string());
        }

        info!(bookflow = %bookflow.id, book = %book_id, "Created bookflow");
        Ok(bookflow)
    }

    /// Fetch an existing bookflow of the given book, metadata included
    pub async fn fetch(client: &BookalopeClient, book_id: &Token, id: &str) -> Result<Self> {
        let id = Token::parse(id)?;
        let response = client.get_json(&format!("/api/bookflows/{id}"), &[]).await?;
        let mut payload: BookflowPayload = extract(response, "bookflow")?;

        if let Some(book) = &payload.book {
            if book.id() != book_id {
                return Err(LifecycleError::BookMismatch {
                    expected: book_id.to_string(),
                    actual: book.id().to_string(),
                }
                .into());
            }
        }

        let metadata = metadata_from(&mut payload);
        let mut bookflow = Self::from_payload(client, book_id.clone(), payload)?;
        bookflow.metadata = metadata;
        Ok(bookflow)
    }

    /// Wrap an already fetched payload; sends nothing.
    ///
    /// Metadata stays unset even if the payload carries some, since book
    /// listings only embed partial bookflows; call [`Bookflow::update`] to
    /// load it.
    pub fn from_payload(
        client: &BookalopeClient,
        book_id: Token,
        payload: BookflowPayload,
    ) -> Result<Self> {
        let credit = credit_from_payload(payload.credit.as_ref())?;
        Ok(Self {
            client: client.clone(),
            url: format!("/api/bookflows/{}", payload.id),
            id: payload.id,
            book_id,
            name: payload.name,
            step: payload.step,
            credit,
            metadata: BookflowMetadata::default(),
        })
    }

    /// Re-read name, step, credit and all metadata from the server
    pub async fn update(&mut self) -> Result<()> {
        let response = self.client.get_json(&self.url, &[]).await?;
        let mut payload: BookflowPayload = extract(response, "bookflow")?;
        let credit = credit_from_payload(payload.credit.as_ref())?;

        if payload.step != self.step {
            debug!(bookflow = %self.id, from = %self.step, to = %payload.step, "Step changed");
        }
        self.metadata = metadata_from(&mut payload);
        self.name = payload.name;
        self.step = payload.step;
        self.credit = credit;
        Ok(())
    }

    /// Body of a save request: the name plus every metadata field that is set
    pub fn save_body(&self) -> Result<Value> {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(self.name.clone()));
        self.metadata.write_into(&mut body)?;
        Ok(Value::Object(body))
    }

    /// Store name and metadata on the server
    pub async fn save(&self) -> Result<()> {
        let body = self.save_body()?;
        self.client.post(&self.url, &body).await?;
        Ok(())
    }

    /// Delete this bookflow on the server.
    ///
    /// Refused while the server is analysing the document, which would
    /// otherwise orphan the running job.
    pub async fn delete(&self) -> Result<()> {
        if self.step == Step::Processing {
            return Err(LifecycleError::BookflowBusy(self.id.to_string()).into());
        }
        self.client.delete(&self.url).await?;
        info!(bookflow = %self.id, "Deleted bookflow");
        Ok(())
    }

    fn ensure_step(&self, operation: &'static str, required: Step) -> Result<()> {
        if self.step == required {
            Ok(())
        } else {
            Err(LifecycleError::IllegalStep {
                operation,
                required,
                actual: self.step,
            }
            .into())
        }
    }

    pub fn id(&self) -> &Token {
        &self.id
    }

    /// Id of the book this bookflow belongs to
    pub fn book_id(&self) -> &Token {
        &self.book_id
    }

    /// API path of this bookflow
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Last step seen from the server (or set optimistically after an upload)
    pub fn step(&self) -> Step {
        self.step
    }

    /// Whether the server is analysing the document
    pub fn is_processing(&self) -> bool {
        self.step == Step::Processing
    }

    pub fn credit(&self) -> Option<CreditType> {
        self.credit
    }

    pub fn metadata(&self) -> &BookflowMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut BookflowMetadata {
        &mut self.metadata
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title.get().map(String::as_str)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = Field::Set(title.into());
    }

    pub fn author(&self) -> Option<&str> {
        self.metadata.author.get().map(String::as_str)
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.metadata.author = Field::Set(author.into());
    }

    /// Book language as stored, possibly not a valid [`Locale`]
    pub fn language(&self) -> Option<&str> {
        self.metadata.language()
    }

    pub fn locale(&self) -> Option<Locale> {
        self.metadata.locale()
    }

    /// Set the book language from a locale string such as `en_US` or `en-US`.
    ///
    /// An invalid locale leaves the current value untouched.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        self.metadata.set_language(language)?;
        Ok(())
    }

    /// Attach a purchased credit to this bookflow
    pub async fn set_credit(&mut self, credit: CreditType) -> Result<()> {
        let body = json!({ "type": credit });
        self.client.post(&format!("{}/credit", self.url), &body).await?;
        self.credit = Some(credit);
        info!(bookflow = %self.id, credit = %credit, "Credit assigned");
        Ok(())
    }

    /// Upload the manuscript and start the server's analysis.
    ///
    /// Only allowed in the `files` step. On success the mirrored step moves
    /// to `processing`, as it does on the server.
    pub async fn set_document(
        &mut self,
        filename: &str,
        bytes: &[u8],
        document_type: Option<DocumentType>,
        skip_analysis: bool,
    ) -> Result<()> {
        self.ensure_step("set document", Step::Files)?;

        let mut body = json!({
            "filename": filename,
            "file": BASE64.encode(bytes),
            "skip_analysis": skip_analysis,
        });
        if let Some(document_type) = document_type {
            body["filetype"] = json!(document_type);
        }

        self.client
            .post(&format!("{}/files/document", self.url), &body)
            .await?;
        self.step = Step::Processing;

        info!(
            bookflow = %self.id,
            file = %filename,
            size = bytes.len(),
            "Document uploaded, analysis started"
        );
        Ok(())
    }

    /// Download the manuscript document
    pub async fn document(&self) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("{}/files/document", self.url), &[])
            .await
    }

    /// Upload an image under the given name; only allowed in the `convert` step
    pub async fn add_image(&self, name: &str, filename: &str, bytes: &[u8]) -> Result<()> {
        self.ensure_step("add image", Step::Convert)?;

        let body = json!({
            "name": name,
            "filename": filename,
            "file": BASE64.encode(bytes),
        });
        self.client
            .post(&format!("{}/files/image", self.url), &body)
            .await?;
        debug!(bookflow = %self.id, image = %name, size = bytes.len(), "Image uploaded");
        Ok(())
    }

    pub async fn set_cover_image(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.add_image(COVER_IMAGE, filename, bytes).await
    }

    /// Download the image stored under the given name
    pub async fn image(&self, name: &str) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("{}/files/image", self.url), &[("name", name)])
            .await
    }

    pub async fn cover_image(&self) -> Result<Vec<u8>> {
        self.image(COVER_IMAGE).await
    }

    /// Request a conversion to `format`, with the server's default style
    /// unless one is given. Returns as soon as the server accepted the
    /// request; poll [`Bookflow::convert_status`] for the outcome.
    ///
    /// Without a credit the server produces a test version with scrambled
    /// words.
    pub async fn convert(&self, format: &str, style: Option<&Style>) -> Result<()> {
        self.ensure_step("convert document", Step::Convert)?;

        let styling = style.map_or(DEFAULT_STYLE, |s| s.short_name.as_str());
        let body = json!({
            "format": format,
            "styling": styling,
        });
        self.client
            .post(&format!("{}/convert", self.url), &body)
            .await?;

        info!(bookflow = %self.id, format = %format, style = %styling, "Conversion requested");
        Ok(())
    }

    /// Current conversion status for one format, in any step
    pub async fn convert_status(&self, format: &str) -> Result<ConversionStatus> {
        let response = self
            .client
            .get_json(&format!("{}/download/{format}/status", self.url), &[])
            .await?;
        extract(response, "status")
    }

    /// Download a converted file.
    ///
    /// Only meaningful once [`Bookflow::convert_status`] reported
    /// `available`; the server answers other states with an HTTP error.
    pub async fn convert_download(&self, format: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get_bytes(&format!("{}/download/{format}", self.url), &[])
            .await?;
        debug!(bookflow = %self.id, format = %format, size = bytes.len(), "Downloaded conversion");
        Ok(bytes)
    }

    /// Wire form of the identity fields
    pub fn pack(&self) -> Value {
        json!({
            "book": self.book_id,
            "id": self.id,
            "name": self.name,
            "step": self.step,
            "credit": self.credit,
        })
    }
}
