pub mod ollama;
pub mod oracle_model;
pub mod prompts;

use crate::error::AutopilotError;
use crate::oracle::oracle_model::{Plan, PlanMode};
use crate::profile::UserProfile;

/// The external reasoning collaborator. Turns a serialized snapshot plus
/// profile context into a proposed plan of field actions. Injected into the
/// reconciliation loop so control flow is testable without a live model.
pub trait PlanOracle {
    fn propose(
        &self,
        serialized_tree: &str,
        profile: &UserProfile,
        mode: PlanMode,
    ) -> Result<Plan, AutopilotError>;
}

/// Offline stand-in: proposes nothing, so the loop terminates after one pass.
pub struct MockOracle;

impl PlanOracle for MockOracle {
    fn propose(
        &self,
        _serialized_tree: &str,
        _profile: &UserProfile,
        _mode: PlanMode,
    ) -> Result<Plan, AutopilotError> {
        Ok(Plan {
            page_analysis: "mock oracle: no actions proposed".to_string(),
            actions: Vec::new(),
        })
    }
}
