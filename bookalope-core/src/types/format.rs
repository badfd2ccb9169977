//! File formats supported by the Bookalope server

use serde::{Deserialize, Serialize};

/// A file format that the server imports or exports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Format {
    /// Short name, e.g. `epub3`
    pub name: String,

    /// MIME type
    #[serde(rename = "mime")]
    pub mimetype: String,

    /// File name extensions, without the leading dot
    #[serde(rename = "exts", default)]
    pub file_exts: Vec<String>,
}

impl Format {
    /// Whether a file with this extension belongs to the format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.file_exts.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Import and export format lists, as returned by `/api/formats`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatList {
    #[serde(default)]
    pub import: Vec<Format>,

    #[serde(default)]
    pub export: Vec<Format>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_wire() {
        let format: Format = serde_json::from_value(serde_json::json!({
            "name": "docx",
            "mime": "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "exts": ["docx"]
        }))
        .unwrap();
        assert_eq!(format.name, "docx");
        assert!(format.matches_extension(".DOCX"));
        assert!(!format.matches_extension("doc"));
    }
}
