//! Formats command implementation

use super::Server;
use anyhow::{Context, Result};
use bookalope_core::Format;

/// List the import and export formats of the server
pub async fn formats(server: &Server, json: bool) -> Result<()> {
    let client = server.client()?;
    let formats = client
        .formats()
        .await
        .context("Failed to fetch formats")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
    } else {
        print_section("Import", &formats.import);
        print_section("Export", &formats.export);
    }

    Ok(())
}

fn print_section(title: &str, formats: &[Format]) {
    println!("{} formats:", title);
    for format in formats {
        println!(
            "  {:<10} {:<40} .{}",
            format.name,
            format.mimetype,
            format.file_exts.join(", .")
        );
    }
}
