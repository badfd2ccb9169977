//! Proxies for the server-side Bookalope resources

mod book;
mod bookflow;
mod bookshelf;
mod metadata;
mod profile;

pub use book::{Book, BookPayload};
pub use bookflow::{BookRef, Bookflow, BookflowPayload, CreditPayload, COVER_IMAGE};
pub use bookshelf::{Bookshelf, BookshelfPayload, BookshelfRef};
pub use metadata::BookflowMetadata;
pub use profile::{Profile, ProfilePayload};
