use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{SeedError, SeedSource, User, users_from_value};

pub const DEFAULT_SEED_URL: &str = "http://jsonplaceholder.typicode.com/users";

/// Fetches the user list over HTTP on every call.
#[derive(Clone, Debug)]
pub struct RemoteSeed {
    client: Client,
    url: String,
}

impl RemoteSeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RemoteSeed {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_URL)
    }
}

#[async_trait]
impl SeedSource for RemoteSeed {
    async fn fetch_users(&self) -> Result<Vec<User>, SeedError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SeedError::Decode(e.to_string()))?;
        let users = users_from_value(body)?;

        debug!("Fetched {} users from {}", users.len(), self.url);

        Ok(users)
    }
}
