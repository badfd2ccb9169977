//! The user profile behind an auth token

use crate::client::{extract, BookalopeClient};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

const PROFILE_PATH: &str = "/api/profile";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

/// A Bookalope user profile (first and last name)
#[derive(Debug, Clone)]
pub struct Profile {
    client: BookalopeClient,
    firstname: String,
    lastname: String,
}

impl Profile {
    pub async fn fetch(client: &BookalopeClient) -> Result<Self> {
        let mut profile = Self {
            client: client.clone(),
            firstname: String::new(),
            lastname: String::new(),
        };
        profile.update().await?;
        Ok(profile)
    }

    /// Re-read first and last name from the server
    pub async fn update(&mut self) -> Result<()> {
        let response = self.client.get_json(PROFILE_PATH, &[]).await?;
        let user: ProfilePayload = extract(response, "user")?;
        self.firstname = user.firstname.unwrap_or_default();
        self.lastname = user.lastname.unwrap_or_default();
        Ok(())
    }

    /// Store first and last name on the server
    pub async fn save(&self) -> Result<()> {
        let body = json!({
            "firstname": self.firstname,
            "lastname": self.lastname,
        });
        self.client.post(PROFILE_PATH, &body).await?;
        Ok(())
    }

    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    pub fn set_firstname(&mut self, name: impl Into<String>) {
        self.firstname = name.into();
    }

    pub fn lastname(&self) -> &str {
        &self.lastname
    }

    pub fn set_lastname(&mut self, name: impl Into<String>) {
        self.lastname = name.into();
    }

    /// Snapshot of the local fields
    pub fn to_payload(&self) -> ProfilePayload {
        ProfilePayload {
            firstname: Some(self.firstname.clone()),
            lastname: Some(self.lastname.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_edit_save() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .on_get_json(
                PROFILE_PATH,
                json!({"user": {"firstname": "Ada", "lastname": "Lovelace"}}),
            )
            .on_post_empty(PROFILE_PATH);
        let client = BookalopeClient::with_transport(transport.clone());

        let mut profile = client.profile().await.unwrap();
        assert_eq!(profile.firstname(), "Ada");
        assert_eq!(profile.lastname(), "Lovelace");

        profile.set_lastname("King");
        profile.save().await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.body,
            Some(json!({"firstname": "Ada", "lastname": "King"}))
        );
    }
}
