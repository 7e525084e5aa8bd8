//! Sequential step pipeline execution.
//!
//! A run is a linear fold over the template's steps with early exit: each
//! step receives the previous step's result, and the first failure aborts
//! everything after it. The runner owns the admin project's database and
//! storage handles (status records, custom step sources, stored service
//! account keys); the data the steps move flows through the apps resolved
//! from the request's inputs.

use crate::actions::code_buffer::fetch_custom_step_source;
use crate::actions::custom::{evaluate, StepContext};
use crate::actions::inputs::{resolve_inputs, ResolvedInput};
use crate::actions::models::{ActionRequest, ActionStep, StepType};
use crate::actions::response::ResponseRecorder;
use crate::actions::steps::{run_copy, CopyKind};
use crate::actions::{ActionError, StepError};
use crate::database::{DatabaseError, FirebaseDatabase};
use crate::storage::FirebaseStorage;
use crate::FirebaseApp;
use serde_json::Value;
use tracing::{error, info};

/// Where a run currently stands. `persist_state` is the single choke point
/// through which every transition is written to the responses location.
///
/// `Running { step: None }` is a run that has started but completed no step
/// yet; `Failed { step: None }` is a failure before the pipeline began.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Running {
        step: Option<usize>,
        total_steps: usize,
    },
    Complete,
    Failed {
        step: Option<usize>,
        error: String,
    },
}

async fn persist_state(recorder: &ResponseRecorder<'_>, state: &RunState) {
    match state {
        RunState::Running {
            step: None,
            total_steps,
        } => recorder.record_started(*total_steps).await,
        RunState::Running {
            step: Some(idx), ..
        } => recorder.record_progress(*idx).await,
        RunState::Complete => recorder.record_complete().await,
        RunState::Failed {
            step: Some(idx),
            error,
        } => recorder.record_step_error(*idx, error).await,
        RunState::Failed { step: None, error } => recorder.record_error(error).await,
    }
}

/// Executes action run requests against one admin project.
pub struct ActionRunner {
    database: FirebaseDatabase,
    storage: FirebaseStorage,
}

impl ActionRunner {
    /// Builds a runner from the admin project's app. The app must carry a
    /// database URL; responses and custom step sources live in its tree.
    pub fn new(app: &FirebaseApp) -> Result<Self, DatabaseError> {
        Ok(Self {
            database: app.database()?,
            storage: app.storage(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_clients(database: FirebaseDatabase, storage: FirebaseStorage) -> Self {
        Self { database, storage }
    }

    /// Runs the action described by a trigger event payload and returns the
    /// final step's result.
    ///
    /// The event must carry `params.pushId` (the response record's key) and
    /// a `data` object holding the template and input values. Every outcome
    /// other than a missing push id is also persisted to the responses
    /// location.
    pub async fn run_from_event(&self, event: &Value) -> Result<Value, ActionError> {
        let push_id = event
            .pointer("/params/pushId")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ActionError::Validation("Event does not contain a push id".to_string())
            })?;
        let recorder = ResponseRecorder::new(&self.database, push_id);
        info!(push_id, response_path = recorder.path(), "action run requested");

        match self.run_pipeline(event, &recorder).await {
            Ok(value) => {
                persist_state(&recorder, &RunState::Complete).await;
                info!(push_id, "action run complete");
                Ok(value)
            }
            Err(err) => {
                error!(push_id, error = %err, "action run failed");
                let state = match &err {
                    ActionError::Step { step, source } => RunState::Failed {
                        step: Some(*step),
                        error: source.to_string(),
                    },
                    other => RunState::Failed {
                        step: None,
                        error: other.to_string(),
                    },
                };
                persist_state(&recorder, &state).await;
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        event: &Value,
        recorder: &ResponseRecorder<'_>,
    ) -> Result<Value, ActionError> {
        let request = parse_request(event)?;
        let total_steps = request.template.steps.len();

        let resolved = resolve_inputs(
            &self.storage,
            &request.input_values,
            &request.template.inputs,
        )
        .await?;

        persist_state(
            recorder,
            &RunState::Running {
                step: None,
                total_steps,
            },
        )
        .await;
        info!(total_steps, "running steps");

        let mut previous = Value::Null;
        for (idx, step) in request.template.steps.iter().enumerate() {
            info!(step = idx, name = ?step.name, "starting step");
            previous = self
                .run_step(&request, step, idx, &resolved, &previous)
                .await?;
            persist_state(
                recorder,
                &RunState::Running {
                    step: Some(idx),
                    total_steps,
                },
            )
            .await;
        }
        Ok(previous)
    }

    async fn run_step(
        &self,
        request: &ActionRequest,
        step: &ActionStep,
        idx: usize,
        resolved: &[ResolvedInput],
        previous: &Value,
    ) -> Result<Value, ActionError> {
        match step.step_type {
            StepType::Custom => {
                let template_id = request.template_id.as_deref().ok_or_else(|| {
                    ActionError::Validation(
                        "Custom steps require a template id on the request".to_string(),
                    )
                })?;
                let source = fetch_custom_step_source(&self.database, template_id, idx)
                    .await
                    .map_err(|source| ActionError::Step { step: idx, source })?;

                let step_json = serde_json::to_value(step).unwrap_or(Value::Null);
                let inputs_json = Value::Array(request.input_values.clone());
                let context = StepContext {
                    step: &step_json,
                    inputs: &inputs_json,
                    previous,
                };
                evaluate(&source, &context).map_err(|e| ActionError::Step {
                    step: idx,
                    source: StepError::Expression(e),
                })
            }
            StepType::Copy => {
                let (src, dest) = match (&step.src, &step.dest) {
                    (Some(src), Some(dest)) => (src, dest),
                    _ => {
                        return Err(ActionError::Validation(format!(
                            "Step {}: copy steps require src and dest endpoints",
                            idx
                        )));
                    }
                };
                let kind = CopyKind::for_pair(src.resource, dest.resource)?;

                let src_app = resolved
                    .first()
                    .and_then(ResolvedInput::as_app)
                    .ok_or_else(|| {
                        ActionError::Validation(
                            "Copy steps require a service account as the first input".to_string(),
                        )
                    })?;
                let dest_app = resolved
                    .get(1)
                    .and_then(ResolvedInput::as_app)
                    .ok_or_else(|| {
                        ActionError::Validation(
                            "Copy steps require a service account as the second input".to_string(),
                        )
                    })?;

                run_copy(kind, src_app, dest_app, src, dest)
                    .await
                    .map_err(|source| ActionError::Step { step: idx, source })
            }
        }
    }
}

/// Shape-validates the raw event payload before deserializing it. These
/// checks run before any store is touched so malformed requests never start
/// a pipeline.
fn parse_request(event: &Value) -> Result<ActionRequest, ActionError> {
    let data = event
        .get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| {
            ActionError::Validation("Event object does not contain a value".to_string())
        })?;

    let template = data.get("template").filter(|t| t.is_object()).ok_or_else(|| {
        ActionError::Validation("Action template is required to run steps".to_string())
    })?;

    if !template.get("steps").map(Value::is_array).unwrap_or(false) {
        return Err(ActionError::Validation(
            "Steps array was not provided to action request".to_string(),
        ));
    }
    if !template.get("inputs").map(Value::is_array).unwrap_or(false) {
        return Err(ActionError::Validation(
            "Inputs array was not provided to action request".to_string(),
        ));
    }
    if !data
        .get("inputValues")
        .map(Value::is_array)
        .unwrap_or(false)
    {
        return Err(ActionError::Validation(
            "Input values array was not provided to action request".to_string(),
        ));
    }

    let request: ActionRequest = serde_json::from_value(data.clone())
        .map_err(|e| ActionError::Validation(format!("Malformed action request: {}", e)))?;

    if request.input_values.len() != request.template.inputs.len() {
        return Err(ActionError::Validation(format!(
            "Expected {} input values, got {}",
            request.template.inputs.len(),
            request.input_values.len()
        )));
    }

    Ok(request)
}
