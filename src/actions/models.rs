use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Backing store a copy step can read from or write to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Firestore,
    Rtdb,
    Storage,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Firestore => write!(f, "firestore"),
            ResourceType::Rtdb => write!(f, "rtdb"),
            ResourceType::Storage => write!(f, "storage"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Copy,
    Custom,
}

/// One endpoint of a copy step: a resource type plus a path within it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StepEndpoint {
    pub resource: ResourceType,
    pub path: String,
}

/// One unit of work in a template.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<StepEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<StepEndpoint>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    ServiceAccount,
    #[default]
    UserInput,
}

/// Declared input of a template; values arrive separately with each run
/// request, in the same order.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub input_type: InputType,
    #[serde(default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionEnvironment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WhenSetting {
    pub before_merge: Option<bool>,
    pub after_merge: Option<bool>,
    pub not_during_business_hours: Option<bool>,
}

/// Stored definition of an ordered list of steps plus declared inputs and
/// environments.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub steps: Vec<ActionStep>,
    #[serde(default)]
    pub inputs: Vec<ActionInput>,
    #[serde(default)]
    pub environments: Vec<ActionEnvironment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<WhenSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Raw value supplied for a `serviceAccount`-typed input. Both fields are
/// required before the descriptor can be exchanged for a live app.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
}

/// The run request carried in a trigger event's `data` field.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub template: ActionTemplate,
    #[serde(default)]
    pub input_values: Vec<Value>,
    pub template_id: Option<String>,
    #[serde(default)]
    pub environments: Vec<Value>,
    pub created_by: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Written by the requesting client when it enqueues a run; the runner
    /// replaces it with `Running` as soon as it picks the request up.
    Pending,
    Running,
    Complete,
    Error,
}

/// Mutable record describing one run, persisted to the responses location
/// after every state transition. Transitions are written as merges, so
/// absent fields keep their previously recorded values.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl RunResponse {
    pub fn new(status: RunStatus) -> Self {
        Self {
            status,
            current_step: None,
            total_steps: None,
            error: None,
            started_at: None,
            completed_at: None,
        }
    }
}
