//! Exchanging stored service account descriptors for live app handles.
//!
//! Uploaded service account keys live as JSON objects in the admin
//! project's default bucket. A run downloads each key it needs,
//! materializes it under a run-scoped temp directory, and builds a
//! [`FirebaseApp`] from it. Dropping the returned [`CredentialsFile`]
//! removes the directory again, so credentials never outlive the run.

use crate::actions::models::ServiceAccountDescriptor;
use crate::storage::{FirebaseStorage, StorageError};
use crate::FirebaseApp;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ServiceAccountError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to read service account key: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid service account descriptor: {0}")]
    Invalid(String),
}

/// A service account key materialized on local disk. Removing is tied to
/// drop; deletion failures are ignored.
#[derive(Debug)]
pub struct CredentialsFile {
    path: PathBuf,
    _dir: TempDir,
}

impl CredentialsFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Downloads the key named by `descriptor` from the admin project's default
/// bucket and builds an authenticated app around it.
pub async fn app_from_descriptor(
    storage: &FirebaseStorage,
    descriptor: &ServiceAccountDescriptor,
) -> Result<(FirebaseApp, CredentialsFile), ServiceAccountError> {
    let account_path = descriptor.service_account_path.as_deref().ok_or_else(|| {
        ServiceAccountError::Invalid("serviceAccountPath is missing".to_string())
    })?;
    let database_url = descriptor
        .database_url
        .as_deref()
        .ok_or_else(|| ServiceAccountError::Invalid("databaseURL is missing".to_string()))?;

    let contents = storage.bucket(None).file(account_path).download().await?;

    let dir = tempfile::tempdir()?;
    let key_path = dir.path().join("serviceAccount.json");
    std::fs::write(&key_path, &contents)?;
    debug!(path = %key_path.display(), "materialized service account key");

    let app = app_from_key_file(&key_path, database_url).await?;
    Ok((
        app,
        CredentialsFile {
            path: key_path,
            _dir: dir,
        },
    ))
}

/// Builds an app from a service account key file already on disk.
pub async fn app_from_key_file(
    key_path: &Path,
    database_url: &str,
) -> Result<FirebaseApp, ServiceAccountError> {
    let key = yup_oauth2::read_service_account_key(key_path).await?;
    Ok(FirebaseApp::with_database_url(key, database_url))
}
