//! Books: a named manuscript with its conversion history

use super::bookflow::{Bookflow, BookflowPayload};
use super::bookshelf::{Bookshelf, BookshelfRef};
use crate::client::{extract, BookalopeClient};
use crate::error::{LifecycleError, Result};
use crate::token::Token;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Wire shape of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    pub id: Token,
    pub name: String,
    pub created: NaiveDateTime,
    #[serde(default)]
    pub bookshelf: Option<BookshelfRef>,
    #[serde(default)]
    pub bookflows: Vec<BookflowPayload>,
}

/// Client-side mirror of one book.
///
/// Title, author and the other book information live on the bookflows,
/// not on the book.
#[derive(Debug, Clone)]
pub struct Book {
    client: BookalopeClient,
    id: Token,
    url: String,
    name: String,
    created: NaiveDateTime,
    bookshelf: Option<BookshelfRef>,
    bookflows: Vec<Bookflow>,
}

impl Book {
    /// Create a new book on the server, optionally on a bookshelf
    pub async fn create(
        client: &BookalopeClient,
        name: Option<&str>,
        bookshelf: Option<&Bookshelf>,
    ) -> Result<Self> {
        let mut body = json!({ "name": name.unwrap_or("<none>") });
        if let Some(bookshelf) = bookshelf {
            body["bookshelf_id"] = json!(bookshelf.id());
        }

        let response = client.post_for_json("/api/books", &body).await?;
        let mut book = Self::from_payload(client, extract(response, "book")?)?;
        if let Some(bookshelf) = bookshelf {
            book.bookshelf = Some(bookshelf.summary());
        }

        info!(book = %book.id, name = %book.name, "Created book");
        Ok(book)
    }

    /// Fetch an existing book
    pub async fn fetch(client: &BookalopeClient, id: &str) -> Result<Self> {
        let payload = Self::fetch_payload(client, id).await?;
        Self::from_payload(client, payload)
    }

    /// Fetch a book that is expected to sit on the given bookshelf
    pub async fn fetch_on_shelf(
        client: &BookalopeClient,
        id: &str,
        bookshelf: &Bookshelf,
    ) -> Result<Self> {
        let payload = Self::fetch_payload(client, id).await?;
        Self::from_shelf_payload(client, payload, &bookshelf.summary())
    }

    async fn fetch_payload(client: &BookalopeClient, id: &str) -> Result<BookPayload> {
        let id = Token::parse(id)?;
        let response = client.get_json(&format!("/api/books/{id}"), &[]).await?;
        extract(response, "book")
    }

    /// Wrap an already fetched payload; sends nothing
    pub fn from_payload(client: &BookalopeClient, payload: BookPayload) -> Result<Self> {
        let bookflows = payload
            .bookflows
            .into_iter()
            .map(|bookflow| Bookflow::from_payload(client, payload.id.clone(), bookflow))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            client: client.clone(),
            url: format!("/api/books/{}", payload.id),
            id: payload.id,
            name: payload.name,
            created: payload.created,
            bookshelf: payload.bookshelf,
            bookflows,
        })
    }

    /// Wrap a payload listed on a bookshelf, checking that both agree
    pub(crate) fn from_shelf_payload(
        client: &BookalopeClient,
        mut payload: BookPayload,
        shelf: &BookshelfRef,
    ) -> Result<Self> {
        match &payload.bookshelf {
            Some(own) if own.id != shelf.id => {
                return Err(LifecycleError::BookshelfMismatch {
                    expected: shelf.id.to_string(),
                    actual: own.id.to_string(),
                }
                .into());
            }
            Some(_) => {}
            None => payload.bookshelf = Some(shelf.clone()),
        }
        Self::from_payload(client, payload)
    }

    /// Re-read this book from the server.
    ///
    /// The bookflow list is rebuilt from scratch; previously borrowed
    /// bookflows are gone.
    pub async fn update(&mut self) -> Result<()> {
        let response = self.client.get_json(&self.url, &[]).await?;
        let payload: BookPayload = extract(response, "book")?;
        let fresh = Self::from_payload(&self.client, payload)?;

        self.name = fresh.name;
        self.bookshelf = fresh.bookshelf;
        self.bookflows = fresh.bookflows;
        Ok(())
    }

    /// Store name and bookshelf association on the server
    pub async fn save(&self) -> Result<()> {
        let body = json!({
            "name": self.name,
            "bookshelf_id": self.bookshelf.as_ref().map(|shelf| &shelf.id),
        });
        self.client.post(&self.url, &body).await?;
        Ok(())
    }

    /// Delete this book and all of its bookflows on the server
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(&self.url).await?;
        info!(book = %self.id, "Deleted book");
        Ok(())
    }

    /// Move this book onto a bookshelf, leaving any previous one
    pub async fn move_to_bookshelf(&mut self, bookshelf: &Bookshelf) -> Result<()> {
        let body = json!({ "bookshelf_id": bookshelf.id() });
        self.client.post(&self.url, &body).await?;
        self.bookshelf = Some(bookshelf.summary());
        Ok(())
    }

    pub async fn remove_from_bookshelf(&mut self) -> Result<()> {
        let body = json!({ "bookshelf_id": Value::Null });
        self.client.post(&self.url, &body).await?;
        self.bookshelf = None;
        Ok(())
    }

    /// Create a new bookflow for this book and append it to the list
    pub async fn create_bookflow(
        &mut self,
        name: Option<&str>,
        title: Option<&str>,
    ) -> Result<&mut Bookflow> {
        let bookflow = Bookflow::create(&self.client, &self.id, name, title).await?;
        self.bookflows.push(bookflow);
        let last = self.bookflows.len() - 1;
        Ok(&mut self.bookflows[last])
    }

    /// Delete one of this book's bookflows and drop it from the list
    pub async fn delete_bookflow(&mut self, id: &Token) -> Result<()> {
        let index = self
            .bookflows
            .iter()
            .position(|bookflow| bookflow.id() == id)
            .ok_or_else(|| LifecycleError::UnknownBookflow {
                book: self.id.to_string(),
                bookflow: id.to_string(),
            })?;

        self.bookflows[index].delete().await?;
        self.bookflows.remove(index);
        Ok(())
    }

    pub fn id(&self) -> &Token {
        &self.id
    }

    /// API path of this book
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn created(&self) -> NaiveDateTime {
        self.created
    }

    pub fn bookshelf(&self) -> Option<&BookshelfRef> {
        self.bookshelf.as_ref()
    }

    /// Bookflows in creation order
    pub fn bookflows(&self) -> &[Bookflow] {
        &self.bookflows
    }

    pub fn bookflow(&self, id: &Token) -> Option<&Bookflow> {
        self.bookflows.iter().find(|bookflow| bookflow.id() == id)
    }

    pub fn bookflow_mut(&mut self, id: &Token) -> Option<&mut Bookflow> {
        self.bookflows.iter_mut().find(|bookflow| bookflow.id() == id)
    }

    /// Fetch one of this book's bookflows by id from the server
    pub async fn fetch_bookflow(&self, id: &str) -> Result<Bookflow> {
        Bookflow::fetch(&self.client, &self.id, id).await
    }

    /// Wire form of this book
    pub fn pack(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "created": self.created,
            "bookshelf": self.bookshelf,
            "bookflows": self.bookflows.iter().map(Bookflow::pack).collect::<Vec<_>>(),
        })
    }
}
