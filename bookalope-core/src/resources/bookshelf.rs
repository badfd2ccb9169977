//! Bookshelves: named collections of books

use super::book::{Book, BookPayload};
use crate::client::{extract, BookalopeClient};
use crate::error::Result;
use crate::token::Token;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Bookshelf as embedded in a book payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookshelfRef {
    pub id: Token,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<NaiveDateTime>,
}

/// Wire shape of a bookshelf
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookshelfPayload {
    pub id: Token,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created: NaiveDateTime,
    #[serde(default)]
    pub books: Vec<BookPayload>,
}

/// Client-side mirror of one bookshelf
#[derive(Debug, Clone)]
pub struct Bookshelf {
    client: BookalopeClient,
    id: Token,
    url: String,
    name: String,
    description: Option<String>,
    created: NaiveDateTime,
    books: Vec<Book>,
}

impl Bookshelf {
    /// Create a new bookshelf on the server
    pub async fn create(
        client: &BookalopeClient,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self> {
        let mut body = json!({ "name": name.unwrap_or("Bookshelf") });
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body["description"] = json!(description);
        }

        let response = client.post_for_json("/api/bookshelves", &body).await?;
        let bookshelf = Self::from_payload(client, extract(response, "bookshelf")?)?;
        info!(bookshelf = %bookshelf.id, name = %bookshelf.name, "Created bookshelf");
        Ok(bookshelf)
    }

    /// Fetch an existing bookshelf
    pub async fn fetch(client: &BookalopeClient, id: &str) -> Result<Self> {
        let id = Token::parse(id)?;
        let response = client
            .get_json(&format!("/api/bookshelves/{id}"), &[])
            .await?;
        Self::from_payload(client, extract(response, "bookshelf")?)
    }

    /// Wrap an already fetched payload; sends nothing
    pub fn from_payload(client: &BookalopeClient, payload: BookshelfPayload) -> Result<Self> {
        let mut bookshelf = Self {
            client: client.clone(),
            url: format!("/api/bookshelves/{}", payload.id),
            id: payload.id,
            name: payload.name,
            description: payload.description,
            created: payload.created,
            books: Vec::new(),
        };
        bookshelf.books = bookshelf.books_from(payload.books)?;
        Ok(bookshelf)
    }

    fn books_from(&self, books: Vec<BookPayload>) -> Result<Vec<Book>> {
        let summary = self.summary();
        books
            .into_iter()
            .map(|book| Book::from_shelf_payload(&self.client, book, &summary))
            .collect()
    }

    /// Re-read this bookshelf from the server.
    ///
    /// The book list is rebuilt from scratch; previously borrowed books
    /// are gone.
    pub async fn update(&mut self) -> Result<()> {
        let response = self.client.get_json(&self.url, &[]).await?;
        let payload: BookshelfPayload = extract(response, "bookshelf")?;

        self.name = payload.name;
        self.description = payload.description;
        self.books = self.books_from(payload.books)?;
        Ok(())
    }

    /// Store name and description on the server
    pub async fn save(&self) -> Result<()> {
        let body = json!({
            "name": self.name,
            "description": self.description,
        });
        self.client.post(&self.url, &body).await?;
        Ok(())
    }

    /// Delete this bookshelf, its books and their bookflows on the server
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(&self.url).await?;
        info!(bookshelf = %self.id, "Deleted bookshelf");
        Ok(())
    }

    /// Put a book on this bookshelf
    pub async fn add_book(&self, book: &mut Book) -> Result<()> {
        book.move_to_bookshelf(self).await
    }

    /// Take a book off its bookshelf
    pub async fn remove_book(&self, book: &mut Book) -> Result<()> {
        book.remove_from_bookshelf().await
    }

    /// Summary as embedded in book payloads
    pub fn summary(&self) -> BookshelfRef {
        BookshelfRef {
            id: self.id.clone(),
            name: Some(self.name.clone()),
            description: self.description.clone(),
            created: Some(self.created),
        }
    }

    pub fn id(&self) -> &Token {
        &self.id
    }

    /// API path of this bookshelf
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn created(&self) -> NaiveDateTime {
        self.created
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Wire form of this bookshelf
    pub fn pack(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "created": self.created,
            "books": self.books.iter().map(Book::pack).collect::<Vec<_>>(),
        })
    }
}
