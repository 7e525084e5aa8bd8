//! Action runner module.
//!
//! An action template is an ordered list of steps; each step either copies
//! data between two resources (Firestore documents, Realtime Database
//! subtrees, Cloud Storage objects) or evaluates a restricted expression
//! against the run context. The [`runner::ActionRunner`] executes templates
//! strictly in sequence, threading each step's result into the next and
//! persisting progress to the responses location after every step, so a
//! watching client can observe long-running migrations.
//!
//! Pipeline state is a straight line: `Pending -> Running(step) ->
//! Complete | Failed(step)`. There is no retry, no rollback, and no
//! resumption from a failed step; re-running a template starts over from
//! step zero.

pub mod custom;
pub mod inputs;
pub mod models;
pub mod response;
pub mod runner;
pub mod service_accounts;
pub mod steps;
pub mod templates;

mod code_buffer;

#[cfg(test)]
mod tests;

use crate::database::DatabaseError;
use crate::firestore::FirestoreError;
use crate::storage::StorageError;
use custom::ExprError;
use models::ResourceType;
use thiserror::Error;

/// Realtime Database location where run status records are written.
pub const ACTION_RUNNER_RESPONSES_PATH: &str = "responses/actionRunner";
/// Realtime Database location of collaboratively edited custom step sources.
pub const CUSTOM_STEPS_PATH: &str = "actionTemplates/customSteps";
/// Firestore collection holding action templates.
pub const ACTION_TEMPLATES_COLLECTION: &str = "actionTemplates";

/// Errors that can occur while running an action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Malformed template or inputs; raised before any step runs.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The copy step's resource pair is not in the supported set.
    #[error("Unsupported resource pair: {src} -> {dest}")]
    UnsupportedResource {
        src: ResourceType,
        dest: ResourceType,
    },
    /// A step failed; the remaining pipeline is aborted.
    #[error("Step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: StepError,
    },
}

/// Failure of a single step.
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Firestore(#[from] FirestoreError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Expression error: {0}")]
    Expression(#[from] ExprError),
    /// The source path yielded no data.
    #[error("Path does not exist in source: {0}")]
    NoSourceData(String),
    #[error("{0}")]
    Invalid(String),
}
