//! Run status persistence.
//!
//! Each run owns one record under the responses location, keyed by the
//! request's push id. The record is merged (never replaced) on every state
//! transition so a watching client sees progress accumulate. Recording
//! failures are logged and swallowed; losing a progress write must not fail
//! the run itself.

use crate::actions::models::{RunResponse, RunStatus};
use crate::actions::ACTION_RUNNER_RESPONSES_PATH;
use crate::database::FirebaseDatabase;
use tracing::warn;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub struct ResponseRecorder<'a> {
    database: &'a FirebaseDatabase,
    path: String,
}

impl<'a> ResponseRecorder<'a> {
    pub fn new(database: &'a FirebaseDatabase, push_id: &str) -> Self {
        Self {
            database,
            path: format!("{}/{}", ACTION_RUNNER_RESPONSES_PATH, push_id),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn write(&self, response: &RunResponse) {
        if let Err(err) = self.database.reference(&self.path).update(response).await {
            warn!(path = %self.path, error = %err, "failed to record run status");
        }
    }

    pub async fn record_started(&self, total_steps: usize) {
        self.write(&RunResponse {
            total_steps: Some(total_steps),
            started_at: Some(now()),
            ..RunResponse::new(RunStatus::Running)
        })
        .await;
    }

    /// Marks the step at `step_idx` complete.
    pub async fn record_progress(&self, step_idx: usize) {
        self.write(&RunResponse {
            current_step: Some(step_idx),
            ..RunResponse::new(RunStatus::Running)
        })
        .await;
    }

    pub async fn record_step_error(&self, step_idx: usize, message: &str) {
        self.write(&RunResponse {
            current_step: Some(step_idx),
            error: Some(message.to_string()),
            completed_at: Some(now()),
            ..RunResponse::new(RunStatus::Error)
        })
        .await;
    }

    /// Records a failure that happened before any step ran.
    pub async fn record_error(&self, message: &str) {
        self.write(&RunResponse {
            error: Some(message.to_string()),
            completed_at: Some(now()),
            ..RunResponse::new(RunStatus::Error)
        })
        .await;
    }

    pub async fn record_complete(&self) {
        self.write(&RunResponse {
            completed_at: Some(now()),
            ..RunResponse::new(RunStatus::Complete)
        })
        .await;
    }
}
