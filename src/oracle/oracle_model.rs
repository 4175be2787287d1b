use serde::{Deserialize, Serialize};

// ============================================================================
// Plan schema — the structured result the oracle must produce
// ============================================================================

/// Distillation mode the oracle is told about: `Initial` sees the whole
/// form, `Spotlight` sees already-filled fields collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    Initial,
    Spotlight,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Initial => "initial",
            PlanMode::Spotlight => "spotlight",
        }
    }
}

/// Closed action vocabulary. Plans carrying any other type tag fail to
/// deserialize, which is fatal for the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Fill,
    SmartSelect,
    FileUpload,
    Radio,
    Checkbox,
    Click,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Fill => "fill",
            ActionType::SmartSelect => "smart_select",
            ActionType::FileUpload => "file_upload",
            ActionType::Radio => "radio",
            ActionType::Checkbox => "checkbox",
            ActionType::Click => "click",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Must be a stable identifier present in the supplied snapshot.
    pub id: String,
    /// The field's question or label, for logs.
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub value: String,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub page_analysis: String,
    pub actions: Vec<Action>,
}
