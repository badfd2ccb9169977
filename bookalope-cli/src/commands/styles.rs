//! Styles command implementation

use super::Server;
use anyhow::{Context, Result};
use serde::Serialize;

/// Style listing output
#[derive(Serialize)]
struct StyleInfo {
    short_name: String,
    name: String,
    description: String,
    api_price: f64,
}

/// List the design styles available for a format
pub async fn styles(server: &Server, format: &str, json: bool) -> Result<()> {
    let client = server.client()?;
    let styles: Vec<StyleInfo> = client
        .styles(format)
        .await
        .with_context(|| format!("Failed to fetch styles for {}", format))?
        .into_iter()
        .map(|style| StyleInfo {
            short_name: style.short_name,
            name: style.name,
            description: style.description,
            api_price: style.api_price,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&styles)?);
    } else if styles.is_empty() {
        println!("No styles available for {}", format);
    } else {
        for style in &styles {
            println!("{:<20} {} (${:.2})", style.short_name, style.name, style.api_price);
            if !style.description.is_empty() {
                println!("{:<20} {}", "", style.description);
            }
        }
    }

    Ok(())
}
