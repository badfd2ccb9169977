//! Profile command implementation

use super::Server;
use anyhow::{Context, Result};

/// Show the profile of the token's user
pub async fn profile(server: &Server, json: bool) -> Result<()> {
    let client = server.client()?;
    let profile = client
        .profile()
        .await
        .context("Failed to fetch profile")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile.to_payload())?);
    } else {
        println!("First name: {}", profile.firstname());
        println!("Last name:  {}", profile.lastname());
    }

    Ok(())
}
