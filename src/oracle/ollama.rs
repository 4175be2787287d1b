use serde::{Deserialize, Serialize};

use crate::error::AutopilotError;
use crate::oracle::oracle_model::{Plan, PlanMode};
use crate::oracle::prompts::PLANNER_SYSTEM_PROMPT;
use crate::oracle::PlanOracle;
use crate::profile::UserProfile;

// ============================================================================
// Ollama backend
// ============================================================================

pub struct OllamaOracle {
    pub endpoint: String,
    pub model: String,
}

impl Default for OllamaOracle {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "qwen2.5:1.5b".to_string(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaOracle {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    fn build_prompt(
        &self,
        serialized_tree: &str,
        profile: &UserProfile,
        mode: PlanMode,
    ) -> Result<String, AutopilotError> {
        let profile_json =
            serde_json::to_string_pretty(profile).map_err(|e| AutopilotError::JsonSerialize {
                context: "user profile".into(),
                source: e,
            })?;

        let mode_note = match mode {
            PlanMode::Initial => "This is the first pass; the full form is shown.",
            PlanMode::Spotlight => {
                "This is a follow-up pass; <filled-field> markers are fields already \
                 handled. Only propose actions for the remaining visible fields."
            }
        };

        Ok(format!(
            "{}\n\nMode: {} — {}\n\nUser Profile:\n{}\n\nDistilled form HTML:\n{}",
            PLANNER_SYSTEM_PROMPT,
            mode.as_str(),
            mode_note,
            profile_json,
            serialized_tree
        ))
    }
}

impl PlanOracle for OllamaOracle {
    fn propose(
        &self,
        serialized_tree: &str,
        profile: &UserProfile,
        mode: PlanMode,
    ) -> Result<Plan, AutopilotError> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(serialized_tree, profile, mode)?,
            stream: false,
            format: "json",
        };

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AutopilotError::OracleTransport {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        let body: OllamaResponse =
            response
                .json()
                .map_err(|e| AutopilotError::OracleTransport {
                    endpoint: self.endpoint.clone(),
                    source: e,
                })?;

        serde_json::from_str(&body.response).map_err(|e| AutopilotError::OraclePlan {
            context: format!("model {}", self.model),
            source: e,
        })
    }
}
