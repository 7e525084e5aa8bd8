//! Input resolution: raw request values paired with declared input
//! metadata become usable objects before any step runs.

use crate::actions::models::{ActionInput, InputType, ServiceAccountDescriptor};
use crate::actions::service_accounts::{app_from_descriptor, CredentialsFile};
use crate::actions::ActionError;
use crate::storage::FirebaseStorage;
use crate::FirebaseApp;
use serde_json::Value;
use tracing::info;

/// An input value converted to its usable form.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Plain value passed through unchanged.
    Value(Value),
    /// A `serviceAccount` input exchanged for a live app; the materialized
    /// key is removed when the resolved input is dropped.
    App {
        app: FirebaseApp,
        _credentials: CredentialsFile,
    },
}

impl ResolvedInput {
    pub fn as_app(&self) -> Option<&FirebaseApp> {
        match self {
            ResolvedInput::App { app, .. } => Some(app),
            ResolvedInput::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResolvedInput::Value(value) => Some(value),
            ResolvedInput::App { .. } => None,
        }
    }
}

// lodash-size notion of emptiness the original applied to required inputs.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Validates and converts the request's input values against the template's
/// declared inputs, in order. All failures abort the run before any step.
pub(crate) async fn resolve_inputs(
    storage: &FirebaseStorage,
    input_values: &[Value],
    inputs: &[ActionInput],
) -> Result<Vec<ResolvedInput>, ActionError> {
    let mut resolved = Vec::with_capacity(input_values.len());
    for (idx, value) in input_values.iter().enumerate() {
        let meta = inputs.get(idx);
        resolved.push(resolve_input(storage, value, meta, idx).await?);
    }
    Ok(resolved)
}

async fn resolve_input(
    storage: &FirebaseStorage,
    value: &Value,
    meta: Option<&ActionInput>,
    idx: usize,
) -> Result<ResolvedInput, ActionError> {
    let input_type = meta.map(|m| m.input_type).unwrap_or_default();
    let required = meta.map(|m| m.required).unwrap_or_default();

    if input_type == InputType::ServiceAccount {
        let descriptor: ServiceAccountDescriptor = serde_json::from_value(value.clone())
            .map_err(|e| {
                ActionError::Validation(format!("Input {} is not a service account: {}", idx, e))
            })?;
        let complete =
            descriptor.service_account_path.is_some() && descriptor.database_url.is_some();
        if required && !complete {
            return Err(ActionError::Validation(format!(
                "Input {} is required and does not contain serviceAccountPath and databaseURL",
                idx
            )));
        }
        if !complete {
            // Optional service account left blank.
            return Ok(ResolvedInput::Value(Value::Null));
        }
        let (app, credentials) = app_from_descriptor(storage, &descriptor)
            .await
            .map_err(|e| {
                ActionError::Validation(format!("Input {}: {}", idx, e))
            })?;
        info!(input = idx, project = ?app.project_id(), "resolved service account input");
        return Ok(ResolvedInput::App {
            app,
            _credentials: credentials,
        });
    }

    if required && is_empty_value(value) {
        return Err(ActionError::Validation(format!(
            "Input {} is required and does not contain a value",
            idx
        )));
    }
    Ok(ResolvedInput::Value(value.clone()))
}
