use crate::core::parse_error_response;
use crate::storage::StorageError;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

/// Represents an object within a Cloud Storage bucket.
pub struct File {
    client: ClientWithMiddleware,
    base_url: String,
    bucket_name: String,
    name: String,
}

/// Metadata for a Cloud Storage object.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: Option<String>,
    pub bucket: Option<String>,
    pub generation: Option<String>,
    pub content_type: Option<String>,
    pub time_created: Option<String>,
    pub updated: Option<String>,
    pub size: Option<String>,
    pub md5_hash: Option<String>,
    pub media_link: Option<String>,
    pub metadata: Option<std::collections::HashMap<String, String>>,
    pub etag: Option<String>,
}

impl File {
    pub(crate) fn new(
        client: ClientWithMiddleware,
        base_url: String,
        bucket_name: String,
        name: String,
    ) -> Self {
        Self {
            client,
            base_url,
            bucket_name,
            name,
        }
    }

    /// Returns the name of the file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the bucket containing the file.
    pub fn bucket(&self) -> &str {
        &self.bucket_name
    }

    // Object endpoint: {base}/b/{bucket}/o/{url-encoded object name}
    fn object_url(&self) -> String {
        let encoded_name =
            url::form_urlencoded::byte_serialize(self.name.as_bytes()).collect::<String>();
        format!("{}/b/{}/o/{}", self.base_url, self.bucket_name, encoded_name)
    }

    /// Uploads data to the file using the simple (media) upload API.
    pub async fn save(
        &self,
        body: impl Into<reqwest::Body>,
        mime_type: &str,
    ) -> Result<(), StorageError> {
        // The upload API lives under /upload/storage/v1 rather than
        // /storage/v1, for the emulator as well as production.
        let upload_base = if self.base_url.ends_with("/storage/v1") {
            self.base_url.replace("/storage/v1", "/upload/storage/v1")
        } else {
            format!("{}/upload/storage/v1", self.base_url)
        };
        let url = format!("{}/b/{}/o", upload_base, self.bucket_name);

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", &self.name)])
            .header(header::CONTENT_TYPE, mime_type)
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Upload failed").await,
            ));
        }

        Ok(())
    }

    /// Downloads the file's content.
    pub async fn download(&self) -> Result<bytes::Bytes, StorageError> {
        let response = self
            .client
            .get(&self.object_url())
            .query(&[("alt", "media")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Download failed").await,
            ));
        }

        Ok(response.bytes().await?)
    }

    /// Downloads the file and decodes it as JSON.
    pub async fn download_json(&self) -> Result<serde_json::Value, StorageError> {
        let bytes = self.download().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Deletes the file.
    pub async fn delete(&self) -> Result<(), StorageError> {
        let response = self.client.delete(&self.object_url()).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Delete failed").await,
            ));
        }

        Ok(())
    }

    /// Gets the file's metadata.
    pub async fn get_metadata(&self) -> Result<ObjectMetadata, StorageError> {
        let response = self.client.get(&self.object_url()).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::ApiError(
                parse_error_response(response, "Get metadata failed").await,
            ));
        }

        Ok(response.json().await?)
    }
}
