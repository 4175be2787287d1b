use serde::{Deserialize, Serialize};

use crate::error::AutopilotError;

// ============================================================================
// User profile — the data source the oracle maps onto form fields
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub basics: Basics,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    pub legal: Legal,
    pub resume_path: String,
    #[serde(default)]
    pub cover_letter_path: Option<String>,
    #[serde(default)]
    pub cover_letter_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub major: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Answers for the compliance/EEO sections most application forms carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legal {
    pub authorized_to_work: bool,
    pub sponsorship_needed: bool,
    pub veteran_status: String,
    pub disability_status: String,
    pub gender: String,
    pub race: String,
    #[serde(default)]
    pub export_controls: Option<String>,
}

/// Load a profile from a JSON file.
pub fn load_profile(path: &str) -> Result<UserProfile, AutopilotError> {
    let content = std::fs::read_to_string(path).map_err(|e| AutopilotError::ProfileIo {
        path: path.to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AutopilotError::ProfileParse {
        path: path.to_string(),
        source: e,
    })
}
