//! Copy operations and the resource-pair registry.
//!
//! Every operation reads the full value at the source path and merges it at
//! the destination path. Whole documents, subtrees, and files are held in
//! memory; there is no chunking and no size limit.

use crate::actions::models::{ResourceType, StepEndpoint};
use crate::actions::{ActionError, StepError};
use crate::database::FirebaseDatabase;
use crate::firestore::FirebaseFirestore;
use crate::storage::FirebaseStorage;
use crate::FirebaseApp;
use serde_json::Value;
use tracing::info;

/// The supported copy operations, one per resource pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CopyKind {
    FirestoreToFirestore,
    FirestoreToRtdb,
    RtdbToFirestore,
    RtdbToRtdb,
    StorageToRtdb,
}

impl CopyKind {
    /// Routes a resource pair to its copy operation, or fails before any
    /// client is touched.
    pub(crate) fn for_pair(
        src: ResourceType,
        dest: ResourceType,
    ) -> Result<CopyKind, ActionError> {
        match (src, dest) {
            (ResourceType::Firestore, ResourceType::Firestore) => {
                Ok(CopyKind::FirestoreToFirestore)
            }
            (ResourceType::Firestore, ResourceType::Rtdb) => Ok(CopyKind::FirestoreToRtdb),
            (ResourceType::Rtdb, ResourceType::Firestore) => Ok(CopyKind::RtdbToFirestore),
            (ResourceType::Rtdb, ResourceType::Rtdb) => Ok(CopyKind::RtdbToRtdb),
            (ResourceType::Storage, ResourceType::Rtdb) => Ok(CopyKind::StorageToRtdb),
            (src, dest) => Err(ActionError::UnsupportedResource { src, dest }),
        }
    }
}

/// Runs one copy operation between two resolved apps. Returns the copied
/// value, which becomes the step's result.
pub(crate) async fn run_copy(
    kind: CopyKind,
    src_app: &FirebaseApp,
    dest_app: &FirebaseApp,
    src: &StepEndpoint,
    dest: &StepEndpoint,
) -> Result<Value, StepError> {
    info!(src = %src.path, dest = %dest.path, ?kind, "copying");
    match kind {
        CopyKind::FirestoreToFirestore => {
            copy_between_firestore_instances(
                &src_app.firestore(),
                &dest_app.firestore(),
                &src.path,
                &dest.path,
            )
            .await
        }
        CopyKind::FirestoreToRtdb => {
            copy_from_firestore_to_rtdb(
                &src_app.firestore(),
                &dest_app.database()?,
                &src.path,
                &dest.path,
            )
            .await
        }
        CopyKind::RtdbToFirestore => {
            copy_from_rtdb_to_firestore(
                &src_app.database()?,
                &dest_app.firestore(),
                &src.path,
                &dest.path,
            )
            .await
        }
        CopyKind::RtdbToRtdb => {
            copy_between_rtdb_instances(
                &src_app.database()?,
                &dest_app.database()?,
                &src.path,
                &dest.path,
            )
            .await
        }
        CopyKind::StorageToRtdb => {
            copy_from_storage_to_rtdb(
                &src_app.storage(),
                &dest_app.database()?,
                &src.path,
                &dest.path,
            )
            .await
        }
    }
}

/// Document to document between two Firestore instances.
pub(crate) async fn copy_between_firestore_instances(
    src_store: &FirebaseFirestore,
    dest_store: &FirebaseFirestore,
    src_path: &str,
    dest_path: &str,
) -> Result<Value, StepError> {
    let data: Option<Value> = src_store.doc(src_path).get().await?;
    let data = data.ok_or_else(|| StepError::NoSourceData(src_path.to_string()))?;
    dest_store.doc(dest_path).update(&data, None).await?;
    Ok(data)
}

/// Document to subtree: the document's fields become children at the
/// destination path.
pub(crate) async fn copy_from_firestore_to_rtdb(
    src_store: &FirebaseFirestore,
    dest_db: &FirebaseDatabase,
    src_path: &str,
    dest_path: &str,
) -> Result<Value, StepError> {
    let data: Option<Value> = src_store.doc(src_path).get().await?;
    let data = data.ok_or_else(|| StepError::NoSourceData(src_path.to_string()))?;
    dest_db.reference(dest_path).update(&data).await?;
    Ok(data)
}

/// Subtree to document. Only object subtrees can become documents.
pub(crate) async fn copy_from_rtdb_to_firestore(
    src_db: &FirebaseDatabase,
    dest_store: &FirebaseFirestore,
    src_path: &str,
    dest_path: &str,
) -> Result<Value, StepError> {
    let data = src_db.reference(src_path).get().await?;
    if data.is_null() {
        return Err(StepError::NoSourceData(src_path.to_string()));
    }
    if !data.is_object() {
        return Err(StepError::Invalid(format!(
            "Subtree at {} is not an object and cannot be written as a document",
            src_path
        )));
    }
    dest_store.doc(dest_path).update(&data, None).await?;
    Ok(data)
}

/// Subtree to subtree between two Realtime Database instances.
pub(crate) async fn copy_between_rtdb_instances(
    src_db: &FirebaseDatabase,
    dest_db: &FirebaseDatabase,
    src_path: &str,
    dest_path: &str,
) -> Result<Value, StepError> {
    let data = src_db.reference(src_path).get().await?;
    if data.is_null() {
        return Err(StepError::NoSourceData(src_path.to_string()));
    }
    dest_db.reference(dest_path).update(&data).await?;
    Ok(data)
}

/// JSON file in a bucket to subtree.
pub(crate) async fn copy_from_storage_to_rtdb(
    src_storage: &FirebaseStorage,
    dest_db: &FirebaseDatabase,
    src_path: &str,
    dest_path: &str,
) -> Result<Value, StepError> {
    let data = src_storage.bucket(None).file(src_path).download_json().await?;
    dest_db.reference(dest_path).update(&data).await?;
    Ok(data)
}
