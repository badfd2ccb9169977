//! Books command implementation

use super::Server;
use anyhow::{Context, Result};
use serde_json::Value;

/// List books and their bookflows
pub async fn books(server: &Server, json: bool) -> Result<()> {
    let client = server.client()?;
    let books = client.books().await.context("Failed to fetch books")?;

    if json {
        let packed: Vec<Value> = books.iter().map(|book| book.pack()).collect();
        println!("{}", serde_json::to_string_pretty(&packed)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books");
        return Ok(());
    }

    for book in &books {
        println!("{}  {}  (created {})", book.id(), book.name(), book.created());
        if let Some(shelf) = book.bookshelf() {
            println!("  on bookshelf {}", shelf.name.as_deref().unwrap_or(shelf.id.as_str()));
        }
        for bookflow in book.bookflows() {
            let credit = bookflow
                .credit()
                .map(|credit| credit.to_string())
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  {}  {:<20} step: {:<18} credit: {}",
                bookflow.id(),
                bookflow.name(),
                bookflow.step().as_str(),
                credit
            );
        }
    }

    Ok(())
}
