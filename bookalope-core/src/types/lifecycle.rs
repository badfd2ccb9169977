//! Server-reported lifecycle states and the closed value sets of the bookflow API

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The lifecycle phase of a bookflow, as reported by the server.
///
/// The server owns the transitions; the client only mirrors them and gates
/// its own operations on the mirrored value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// No document uploaded yet
    Files,

    /// Document uploaded, the server is analysing it
    Processing,

    /// Analysis finished, conversions can be requested
    Convert,

    /// Analysis failed; terminal
    ProcessingFailed,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Files => "files",
            Step::Processing => "processing",
            Step::Convert => "convert",
            Step::ProcessingFailed => "processing_failed",
        }
    }

    /// Whether the server will never move the bookflow out of this step
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::ProcessingFailed)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one target format's conversion, independent of the bookflow step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStatus {
    /// No conversion requested yet
    #[default]
    None,

    Processing,

    /// Converted file is ready for download
    Available,

    Failed,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::None => "none",
            ConversionStatus::Processing => "processing",
            ConversionStatus::Available => "available",
            ConversionStatus::Failed => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ConversionStatus::Available | ConversionStatus::Failed)
    }

    /// Whether `self` may be reported after `previous` for the same format.
    ///
    /// `processing` never follows a finished state, and a finished state
    /// never changes into the other one.
    pub fn can_follow(&self, previous: ConversionStatus) -> bool {
        match (previous, self) {
            (a, b) if a == *b => true,
            (ConversionStatus::None, _) => true,
            (ConversionStatus::Processing, ConversionStatus::None) => false,
            (ConversionStatus::Processing, _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchased credit tier that unlocks full-quality output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CreditType {
    Basic,
    Pro,
}

impl CreditType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditType::Basic => "basic",
            CreditType::Pro => "pro",
        }
    }
}

impl FromStr for CreditType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(CreditType::Basic),
            "pro" => Ok(CreditType::Pro),
            other => Err(ValidationError::InvalidCredit(other.to_string())),
        }
    }
}

impl fmt::Display for CreditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint telling the server how to interpret an uploaded document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// Word processor document
    Doc,
    Epub,
    /// Project Gutenberg plain text
    Gutenberg,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Doc => "doc",
            DocumentType::Epub => "epub",
            DocumentType::Gutenberg => "gutenberg",
        }
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doc" => Ok(DocumentType::Doc),
            "epub" => Ok(DocumentType::Epub),
            "gutenberg" => Ok(DocumentType::Gutenberg),
            _ => Err(ValidationError::InvalidDocumentType(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_wire_names() {
        let step: Step = serde_json::from_str("\"processing_failed\"").unwrap();
        assert_eq!(step, Step::ProcessingFailed);
        assert!(step.is_terminal());
        assert_eq!(serde_json::to_string(&Step::Convert).unwrap(), "\"convert\"");
        assert!(serde_json::from_str::<Step>("\"uploading\"").is_err());
    }

    #[test]
    fn test_credit_parsing() {
        assert_eq!("pro".parse::<CreditType>(), Ok(CreditType::Pro));
        assert_eq!("basic".parse::<CreditType>(), Ok(CreditType::Basic));
        assert_eq!(
            "anything-else".parse::<CreditType>(),
            Err(ValidationError::InvalidCredit("anything-else".into()))
        );
        // tiers are case-sensitive on the wire
        assert!("Pro".parse::<CreditType>().is_err());
    }

    #[test]
    fn test_status_ordering() {
        use ConversionStatus::*;
        assert!(Processing.can_follow(None));
        assert!(Available.can_follow(Processing));
        assert!(Failed.can_follow(Processing));
        assert!(Available.can_follow(Available));
        assert!(!Processing.can_follow(Available));
        assert!(!Processing.can_follow(Failed));
        assert!(!Failed.can_follow(Available));
        assert!(!None.can_follow(Processing));
    }

    #[test]
    fn test_document_type() {
        assert_eq!("EPUB".parse::<DocumentType>(), Ok(DocumentType::Epub));
        assert!("pdf".parse::<DocumentType>().is_err());
    }
}
