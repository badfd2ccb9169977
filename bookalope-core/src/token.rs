//! Bookalope tokens: auth credentials and resource ids

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of every Bookalope token
pub const TOKEN_LEN: usize = 32;

/// A Bookalope token: exactly 32 lowercase hex characters.
///
/// Used both as the user's auth credential and as the id of books,
/// bookflows and bookshelves. A `Token` can only be built from a valid
/// string, so malformed ids are rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Token(String);

impl Token {
    /// Validate and wrap the given string
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if is_token(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ValidationError::InvalidToken(if s.is_empty() {
                "<not set>".to_string()
            } else {
                s.to_string()
            }))
        }
    }

    /// Mint a fresh random token, e.g. an id for a scripted test server
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check whether a string is a well-formed Bookalope token
pub fn is_token(s: &str) -> bool {
    s.len() == TOKEN_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl FromStr for Token {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Token {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_token(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidToken(s))
        }
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_tokens() {
        assert!(Token::parse("0123456789abcdef0123456789abcdef").is_ok());
        assert!(Token::parse("0123456789ABCDEF0123456789ABCDEF").is_err());
        assert!(Token::parse("0123456789abcdef0123456789abcde").is_err());
        assert!(Token::parse("0123456789abcdef0123456789abcdef0").is_err());
        assert!(Token::parse("0123456789abcdeg0123456789abcdef").is_err());

        assert_eq!(
            Token::parse(""),
            Err(ValidationError::InvalidToken("<not set>".into()))
        );
    }

    #[test]
    fn test_generated_tokens_are_valid() {
        for _ in 0..16 {
            let token = Token::generate();
            assert!(is_token(token.as_str()), "{token}");
        }
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        let ok: Token = serde_json::from_str("\"ffffffffffffffffffffffffffffffff\"").unwrap();
        assert_eq!(ok.as_str(), "ffffffffffffffffffffffffffffffff");

        assert!(serde_json::from_str::<Token>("\"not-a-token\"").is_err());
    }

    proptest! {
        #[test]
        fn accepts_lowercase_hex(s in "[0-9a-f]{32}") {
            prop_assert!(Token::parse(&s).is_ok());
        }

        #[test]
        fn rejects_wrong_length(s in "[0-9a-f]{0,31}|[0-9a-f]{33,48}") {
            prop_assert!(Token::parse(&s).is_err());
        }

        #[test]
        fn rejects_foreign_characters(
            prefix in "[0-9a-f]{0,31}",
            bad in "[^0-9a-f]",
            suffix in "[0-9a-f]{0,31}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(Token::parse(&s).is_err());
        }
    }
}
