use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::oracle::oracle_model::Action;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub pass: u32,

    pub phase: String,

    pub fold: Option<bool>,
    pub field_count: Option<usize>,
    pub new_fields: Option<usize>,

    pub planned: Option<usize>,
    pub filtered: Option<usize>,

    pub action: Option<String>,
    pub outcome: Option<String>,
}

impl TraceEvent {
    pub fn now(pass: u32, phase: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            pass,
            phase: phase.to_string(),
            fold: None,
            field_count: None,
            new_fields: None,
            planned: None,
            filtered: None,
            action: None,
            outcome: None,
        }
    }

    pub fn with_fold(mut self, fold: bool) -> Self {
        self.fold = Some(fold);
        self
    }

    pub fn with_field_count(mut self, count: usize) -> Self {
        self.field_count = Some(count);
        self
    }

    pub fn with_new_fields(mut self, count: usize) -> Self {
        self.new_fields = Some(count);
        self
    }

    pub fn with_plan_sizes(mut self, planned: usize, filtered: usize) -> Self {
        self.planned = Some(planned);
        self.filtered = Some(filtered);
        self
    }

    pub fn with_action(mut self, action: &Action) -> Self {
        self.action = Some(format!(
            "{} {} = {}",
            action.action_type.as_str(),
            action.id,
            action.value
        ));
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }
}
