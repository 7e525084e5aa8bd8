//! Action runner for Fireadmin-style data migrations between Firebase
//! projects.
//!
//! A [`FirebaseApp`] wraps a service account key and vends authenticated
//! clients for Cloud Firestore, the Realtime Database, and Cloud Storage.
//! The [`actions`] module executes stored action templates against those
//! clients: each template is an ordered list of steps (data copies between
//! resources, or restricted expressions) run strictly in sequence, with
//! progress persisted to a well-known Realtime Database location after
//! every step.

pub mod actions;
pub mod core;
pub mod database;
pub mod firestore;
pub mod storage;

use crate::core::middleware::AuthMiddleware;
use database::{DatabaseError, FirebaseDatabase};
use firestore::FirebaseFirestore;
use storage::FirebaseStorage;
use yup_oauth2::ServiceAccountKey;

/// An authenticated handle to one Firebase project.
///
/// Cheap to clone; the underlying token cache is shared between clones and
/// between the clients it vends.
#[derive(Clone)]
pub struct FirebaseApp {
    middleware: AuthMiddleware,
    database_url: Option<String>,
}

impl std::fmt::Debug for FirebaseApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseApp")
            .field("database_url", &self.database_url)
            .finish_non_exhaustive()
    }
}

impl FirebaseApp {
    pub fn new(service_account_key: ServiceAccountKey) -> Self {
        Self {
            middleware: AuthMiddleware::new(service_account_key),
            database_url: None,
        }
    }

    /// Creates an app that can also vend Realtime Database clients rooted at
    /// `database_url` (e.g. `https://my-project.firebaseio.com`).
    pub fn with_database_url(
        service_account_key: ServiceAccountKey,
        database_url: impl Into<String>,
    ) -> Self {
        Self {
            middleware: AuthMiddleware::new(service_account_key),
            database_url: Some(database_url.into()),
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        self.middleware.key.project_id.as_deref()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn firestore(&self) -> FirebaseFirestore {
        FirebaseFirestore::new(self.middleware.clone())
    }

    /// Fails with [`DatabaseError::DatabaseUrlMissing`] when the app was
    /// built without a database URL.
    pub fn database(&self) -> Result<FirebaseDatabase, DatabaseError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(DatabaseError::DatabaseUrlMissing)?;
        Ok(FirebaseDatabase::new(self.middleware.clone(), url))
    }

    pub fn storage(&self) -> FirebaseStorage {
        FirebaseStorage::new(self.middleware.clone())
    }
}
