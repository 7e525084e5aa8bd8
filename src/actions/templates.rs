//! Action template storage.
//!
//! Templates live as documents in the `actionTemplates` Firestore
//! collection. Writes are validated first so a stored template is always
//! runnable in shape (steps present, copy steps carrying both endpoints).

use crate::actions::models::{ActionTemplate, StepType};
use crate::actions::ACTION_TEMPLATES_COLLECTION;
use crate::firestore::values::fields_to_json;
use crate::firestore::{FirebaseFirestore, FirestoreError};
use crate::FirebaseApp;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Firestore error: {0}")]
    Firestore(#[from] FirestoreError),
    #[error("ActionTemplate not found at path: {0}")]
    NotFound(String),
    #[error("Invalid action template: {0}")]
    Invalid(String),
}

/// Handle to the action template collection of one admin project.
pub struct ActionTemplates {
    firestore: FirebaseFirestore,
}

impl ActionTemplates {
    pub fn new(app: &FirebaseApp) -> Self {
        Self {
            firestore: app.firestore(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_client(firestore: FirebaseFirestore) -> Self {
        Self { firestore }
    }

    fn doc_path(template_id: &str) -> String {
        format!("{}/{}", ACTION_TEMPLATES_COLLECTION, template_id)
    }

    /// Fetches a template, failing when it does not exist.
    pub async fn get(&self, template_id: &str) -> Result<ActionTemplate, TemplateError> {
        let path = Self::doc_path(template_id);
        let template: Option<ActionTemplate> = self.firestore.doc(&path).get().await?;
        template.ok_or(TemplateError::NotFound(path))
    }

    /// Stores a new template with a server-assigned id and returns the id.
    pub async fn create(&self, template: &ActionTemplate) -> Result<String, TemplateError> {
        validate_template(template)?;
        let doc = self
            .firestore
            .collection(ACTION_TEMPLATES_COLLECTION)
            .add(template)
            .await?;
        Ok(doc.id().to_string())
    }

    pub async fn update(
        &self,
        template_id: &str,
        template: &ActionTemplate,
    ) -> Result<(), TemplateError> {
        validate_template(template)?;
        self.firestore
            .doc(&Self::doc_path(template_id))
            .update(template, None)
            .await?;
        Ok(())
    }

    /// Deletes exactly the one named template document.
    pub async fn delete(&self, template_id: &str) -> Result<(), TemplateError> {
        self.firestore
            .doc(&Self::doc_path(template_id))
            .delete()
            .await?;
        Ok(())
    }

    /// Lists stored templates as `(id, template)` pairs. Documents that do
    /// not decode as templates are skipped.
    pub async fn list(&self) -> Result<Vec<(String, ActionTemplate)>, TemplateError> {
        let response = self
            .firestore
            .collection(ACTION_TEMPLATES_COLLECTION)
            .list_documents()
            .await?;

        let mut templates = Vec::with_capacity(response.documents.len());
        for doc in response.documents {
            let id = doc.id().to_string();
            let json = fields_to_json(doc.fields)?;
            if let Ok(template) = serde_json::from_value::<ActionTemplate>(json) {
                templates.push((id, template));
            }
        }
        Ok(templates)
    }
}

fn validate_template(template: &ActionTemplate) -> Result<(), TemplateError> {
    let mut errors = Vec::new();

    if template
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .is_empty()
    {
        errors.push("Template name must not be empty".to_string());
    }

    if template.steps.is_empty() {
        errors.push("Template must define at least one step".to_string());
    }

    for (i, step) in template.steps.iter().enumerate() {
        if step.step_type == StepType::Copy && (step.src.is_none() || step.dest.is_none()) {
            errors.push(format!("Step {} is a copy but is missing src or dest", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::Invalid(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::models::{ActionStep, StepEndpoint, ResourceType};

    fn named_template(name: &str) -> ActionTemplate {
        ActionTemplate {
            name: Some(name.to_string()),
            description: None,
            public: false,
            steps: vec![ActionStep {
                name: Some("copy".to_string()),
                step_type: StepType::Copy,
                file_path: None,
                src: Some(StepEndpoint {
                    resource: ResourceType::Rtdb,
                    path: "users".to_string(),
                }),
                dest: Some(StepEndpoint {
                    resource: ResourceType::Rtdb,
                    path: "users".to_string(),
                }),
            }],
            inputs: Vec::new(),
            environments: Vec::new(),
            when: None,
            idempotent: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn valid_template_passes() {
        assert!(validate_template(&named_template("migrate")).is_ok());
    }

    #[test]
    fn empty_name_fails() {
        let err = validate_template(&named_template("  ")).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn template_without_steps_fails() {
        let mut template = named_template("migrate");
        template.steps.clear();
        let err = validate_template(&template).unwrap_err();
        assert!(err.to_string().contains("at least one step"));
    }

    #[test]
    fn copy_step_without_endpoints_fails() {
        let mut template = named_template("migrate");
        template.steps[0].src = None;
        let err = validate_template(&template).unwrap_err();
        assert!(err.to_string().contains("missing src or dest"));
    }
}
