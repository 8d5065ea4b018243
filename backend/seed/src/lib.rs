//! # Seed
//!
//! Source of the initial user list.
//!
//! The server falls back to this list whenever its store file is missing, and
//! `take` requests read it directly without ever touching the store.
//!
//! ## Notes
//! - No retry and no timeout, a hung endpoint hangs the caller
//! - Records are opaque JSON objects, only `id` means anything to the server
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod remote;

pub use remote::{DEFAULT_SEED_URL, RemoteSeed};

/// A user record: field order is kept as received.
pub type User = Map<String, Value>;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Seed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Seed source answered with {0}")]
    Status(StatusCode),

    #[error("Seed payload is not a list of users: {0}")]
    Decode(String),
}

#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<User>, SeedError>;
}

pub fn users_from_value(value: Value) -> Result<Vec<User>, SeedError> {
    let Value::Array(items) = value else {
        return Err(SeedError::Decode("expected a JSON array".to_string()));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(user) => Ok(user),
            other => Err(SeedError::Decode(format!(
                "entry {index} is not an object: {other}"
            ))),
        })
        .collect()
}
