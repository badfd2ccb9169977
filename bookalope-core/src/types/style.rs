//! Design styles available for a target format

use serde::{Deserialize, Serialize};

/// Short name of the style the server applies when none is chosen
pub const DEFAULT_STYLE: &str = "default";

/// A named visual template applied when converting to one target format
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Target format this style applies to
    pub format: String,

    /// Short name passed to the convert call
    pub short_name: String,

    /// Human readable name
    pub name: String,

    pub description: String,

    /// Price in US$ charged by the API for this style
    pub api_price: f64,
}

/// Wire shape of a style entry in `/api/styles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StylePayload {
    pub name: String,
    pub info: StyleInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StyleInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "price-api", default)]
    pub price_api: f64,
}

impl Style {
    pub(crate) fn from_payload(format: &str, payload: StylePayload) -> Self {
        Self {
            format: format.to_string(),
            short_name: payload.name,
            name: payload.info.name,
            description: payload.info.description,
            api_price: payload.info.price_api,
        }
    }

    pub fn is_default(&self) -> bool {
        self.short_name == DEFAULT_STYLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_wire() {
        let payload: StylePayload = serde_json::from_value(serde_json::json!({
            "name": "default",
            "info": {
                "name": "Default",
                "description": "Clean, readable layout",
                "price-api": 2.5
            }
        }))
        .unwrap();

        let style = Style::from_payload("epub", payload);
        assert_eq!(style.format, "epub");
        assert_eq!(style.short_name, "default");
        assert_eq!(style.name, "Default");
        assert_eq!(style.api_price, 2.5);
        assert!(style.is_default());
    }
}
