//! Bibliographic metadata carried by a bookflow

use crate::error::ValidationError;
use crate::locale::Locale;
use crate::types::Field;
use serde_json::{Map, Value};

/// Editable book information of a bookflow.
///
/// Every field starts out [`Field::Unset`]; only fields that were fetched
/// or set locally end up in a save request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookflowMetadata {
    pub title: Field<String>,
    pub author: Field<String>,
    pub copyright: Field<String>,
    pub isbn: Field<String>,
    /// As stored on the server; only [`Self::set_language`] writes it locally
    pub(crate) language: Field<String>,
    /// Publication date, in the server's string form
    pub pubdate: Field<String>,
    pub publisher: Field<String>,
}

impl BookflowMetadata {
    /// Write all non-unset fields into a request body
    pub(crate) fn write_into(&self, body: &mut Map<String, Value>) -> Result<(), serde_json::Error> {
        self.title.write_into("title", body)?;
        self.author.write_into("author", body)?;
        self.copyright.write_into("copyright", body)?;
        self.isbn.write_into("isbn", body)?;
        self.language.write_into("language", body)?;
        self.pubdate.write_into("pubdate", body)?;
        self.publisher.write_into("publisher", body)?;
        Ok(())
    }

    /// The language as last seen on the server or set locally.
    ///
    /// Values written by other clients are kept verbatim, even when they
    /// are not a valid [`Locale`].
    pub fn language(&self) -> Option<&str> {
        self.language.get().map(String::as_str)
    }

    /// The language parsed as a [`Locale`], if it is a valid one
    pub fn locale(&self) -> Option<Locale> {
        self.language().and_then(|language| Locale::parse(language).ok())
    }

    /// Set the language from a locale string such as `en_US` or `en-US`.
    ///
    /// An invalid locale leaves the current value untouched.
    pub fn set_language(&mut self, language: &str) -> Result<(), ValidationError> {
        let locale = Locale::parse(language)?;
        self.language = Field::Set(locale.into());
        Ok(())
    }

    /// Remove the language on the next save
    pub fn clear_language(&mut self) {
        self.language = Field::Cleared;
    }

    /// Whether no field would be sent on save
    pub fn is_empty(&self) -> bool {
        self.title.is_unset()
            && self.author.is_unset()
            && self.copyright.is_unset()
            && self.isbn.is_unset()
            && self.language.is_unset()
            && self.pubdate.is_unset()
            && self.publisher.is_unset()
    }
}
