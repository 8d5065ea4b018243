//! # Store
//!
//! Flat JSON file holding the whole user collection.
//!
//! ## Requirements
//!
//! - Tens of records, no indexing
//! - Whole collection read on every request, nothing cached
//! - Whole collection rewritten on every mutation
//!
//! ## Implementation
//!
//! - One JSON array in one file, path fixed at startup
//! - Replace is delete then write. No atomic rename, so a crash in between leaves no file
//! - A missing file means "not seeded yet", listing users seeds it from the remote source
//! - Handlers serialize their whole load/replace cycle through [`UserStore::lock`], so
//!   concurrent mutations cannot lose each other's updates
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use seed::User;
use thiserror::Error;
use tokio::{
    fs,
    sync::{Mutex, MutexGuard},
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User file not found: {0}")]
    NotFound(String),

    #[error("User file is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("User file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct UserStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Held across a whole read-modify-write cycle.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.guard.lock().await
    }

    pub async fn load(&self) -> Result<Vec<User>, StoreError> {
        let data = fs::read(&self.path)
            .await
            .map_err(|e| StoreError::NotFound(format!("{}: {e}", self.path.display())))?;

        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn replace(&self, users: &[User]) -> Result<(), StoreError> {
        let data = serde_json::to_vec(users)?;

        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        fs::write(&self.path, data).await?;

        Ok(())
    }

    pub async fn remove(&self) -> Result<(), StoreError> {
        fs::remove_file(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(format!("{}: {e}", self.path.display())),
            _ => StoreError::Io(e),
        })
    }
}
