//! Fetching custom step sources from the collaborative editor location.
//!
//! Sources are keyed by template id and step index under
//! [`CUSTOM_STEPS_PATH`](crate::actions::CUSTOM_STEPS_PATH). The node holds
//! either the text itself or an editor checkpoint object with a `text`
//! field; either way only the current text matters here.

use crate::actions::{StepError, CUSTOM_STEPS_PATH};
use crate::database::FirebaseDatabase;
use serde_json::Value;

pub(crate) fn custom_step_path(template_id: &str, step_idx: usize) -> String {
    format!("{}/{}/steps/{}", CUSTOM_STEPS_PATH, template_id, step_idx)
}

pub(crate) async fn fetch_custom_step_source(
    database: &FirebaseDatabase,
    template_id: &str,
    step_idx: usize,
) -> Result<String, StepError> {
    let path = custom_step_path(template_id, step_idx);
    let value = database.reference(&path).get().await?;

    let text = match &value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(text)) => Some(text.clone()),
            _ => None,
        },
        _ => None,
    };

    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(StepError::Invalid(format!(
            "No custom step code found at {}",
            path
        ))),
    }
}
