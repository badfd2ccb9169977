//! Bookalope Core Library
//!
//! This crate maps the Bookalope document conversion REST API onto Rust
//! objects: a client, user profiles, bookshelves, books, bookflows, formats
//! and styles. Each object mirrors server state: it is fetched with GET,
//! edited locally and stored with POST or DELETE.
//!
//! The interesting part is the [`Bookflow`], which gates its operations on
//! the lifecycle step the server last reported.

pub mod client;
pub mod config;
pub mod error;
pub mod locale;
pub mod resources;
pub mod token;
pub mod transport;
pub mod types;

pub use client::BookalopeClient;
pub use config::{ClientConfig, API_VERSION, BETA_HOST, PRODUCTION_HOST};
pub use error::{BookalopeError, LifecycleError, ProtocolError, Result, ValidationError};
pub use locale::Locale;
pub use resources::{Book, Bookflow, BookflowMetadata, Bookshelf, BookshelfRef, Profile};
pub use token::Token;
pub use transport::{HttpTransport, MemoryTransport, Payload, Transport};
pub use types::{
    ConversionStatus, CreditType, DocumentType, Field, Format, FormatList, Step, Style,
    DEFAULT_STYLE,
};
