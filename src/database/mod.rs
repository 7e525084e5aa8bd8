//! Firebase Realtime Database module.
//!
//! Thin client over the RTDB REST API: every node in the tree is addressable
//! as `{database_url}/{path}.json`, reads return the subtree as JSON (`null`
//! when the path has no data), `PATCH` merges children at a path and `PUT`
//! replaces them.

#[cfg(test)]
mod tests;

use crate::core::middleware::AuthMiddleware;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// Unlike the other Google APIs, RTDB reports errors as `{"error": "<text>"}`.
async fn parse_rtdb_error(response: reqwest::Response, default_msg: &str) -> String {
    #[derive(Deserialize)]
    struct RtdbErrorResponse {
        error: String,
    }

    let status = response.status();
    match response.json::<RtdbErrorResponse>().await {
        Ok(resp) => format!("{} (status: {})", resp.error, status),
        Err(_) => format!("{}: {}", default_msg, status),
    }
}

/// Errors that can occur during Realtime Database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Wrapper for `reqwest::Error`.
    #[error("HTTP Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    /// Wrapper for `reqwest_middleware::Error`.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    /// Errors returned by the Realtime Database REST API.
    #[error("API error: {0}")]
    ApiError(String),
    /// Wrapper for `serde_json::Error`.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// The app was created without a database URL.
    #[error("Database URL is missing; create the app with a database URL")]
    DatabaseUrlMissing,
}

/// Client for interacting with one Realtime Database instance.
pub struct FirebaseDatabase {
    client: ClientWithMiddleware,
    base_url: String,
}

impl FirebaseDatabase {
    /// Creates a new `FirebaseDatabase` instance rooted at `database_url`.
    ///
    /// This is typically called via `FirebaseApp::database()`.
    pub fn new(middleware: AuthMiddleware, database_url: &str) -> Self {
        Self {
            client: crate::core::build_client(middleware),
            base_url: database_url.trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_client(client: ClientWithMiddleware, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gets a `Reference` to the node at the specified slash-separated path
    /// (e.g. "responses/actionRunner/abc123").
    pub fn reference(&self, path: &str) -> Reference<'_> {
        Reference {
            client: &self.client,
            url: format!("{}/{}.json", self.base_url, path.trim_matches('/')),
            path: path.trim_matches('/').to_string(),
        }
    }
}

/// A reference to a node in the Realtime Database tree.
#[derive(Clone)]
pub struct Reference<'a> {
    client: &'a ClientWithMiddleware,
    url: String,
    path: String,
}

impl<'a> Reference<'a> {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the subtree at this reference. A path with no data yields
    /// `Value::Null` (the REST API returns the literal `null`).
    pub async fn get(&self) -> Result<Value, DatabaseError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(DatabaseError::ApiError(
                parse_rtdb_error(response, "Get value failed").await,
            ));
        }

        Ok(response.json().await?)
    }

    /// Replaces the subtree at this reference.
    pub async fn set<T: Serialize>(&self, value: &T) -> Result<(), DatabaseError> {
        let response = self
            .client
            .put(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(value)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DatabaseError::ApiError(
                parse_rtdb_error(response, "Set value failed").await,
            ));
        }

        Ok(())
    }

    /// Merges the named children of `value` into the node at this reference,
    /// leaving other children untouched.
    pub async fn update<T: Serialize>(&self, value: &T) -> Result<(), DatabaseError> {
        let response = self
            .client
            .patch(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(value)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DatabaseError::ApiError(
                parse_rtdb_error(response, "Update value failed").await,
            ));
        }

        Ok(())
    }

    /// Deletes the subtree at this reference.
    pub async fn remove(&self) -> Result<(), DatabaseError> {
        let response = self.client.delete(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(DatabaseError::ApiError(
                parse_rtdb_error(response, "Remove value failed").await,
            ));
        }

        Ok(())
    }
}
