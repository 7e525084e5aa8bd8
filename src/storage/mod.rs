//! Cloud Storage module.
//!
//! Supports downloading, uploading, and deleting bucket objects plus
//! metadata reads. The action runner uses it to fetch stored service
//! account keys and JSON data files.

pub mod bucket;
pub mod file;

#[cfg(test)]
mod tests;

use crate::core::middleware::AuthMiddleware;
use bucket::Bucket;
use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;

const STORAGE_V1_API: &str = "https://storage.googleapis.com/storage/v1";

/// Errors that can occur during Storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Wrapper for `reqwest::Error`.
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Wrapper for `reqwest_middleware::Error`.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    /// Errors returned by the Cloud Storage API.
    #[error("API error: {0}")]
    ApiError(String),
    /// Wrapper for `serde_json::Error`.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Client for interacting with Cloud Storage.
#[derive(Clone)]
pub struct FirebaseStorage {
    client: ClientWithMiddleware,
    base_url: String,
    project_id: String,
}

impl FirebaseStorage {
    /// Creates a new `FirebaseStorage` instance.
    ///
    /// This is typically called via `FirebaseApp::storage()`.
    pub fn new(middleware: AuthMiddleware) -> Self {
        let project_id = middleware.key.project_id.clone().unwrap_or_default();

        Self {
            client: crate::core::build_client(middleware),
            base_url: STORAGE_V1_API.to_string(),
            project_id,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self {
            client,
            base_url,
            project_id: "test-project".to_string(),
        }
    }

    /// Gets a `Bucket` instance that refers to the specific bucket.
    ///
    /// Without a name the default bucket derived from the project id
    /// ("{project_id}.appspot.com") is used.
    pub fn bucket(&self, name: Option<&str>) -> Bucket {
        let bucket_name = match name {
            Some(n) => n.to_string(),
            None => format!("{}.appspot.com", self.project_id),
        };

        Bucket::new(self.client.clone(), self.base_url.clone(), bucket_name)
    }
}
