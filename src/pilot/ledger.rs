use std::collections::HashSet;

use crate::dom::distill::FieldDescriptor;
use crate::oracle::oracle_model::Action;

// ============================================================================
// Cross-pass bookkeeping — what has been handled, what has been seen
// ============================================================================

/// Grow-only record of field identifiers already handled in earlier passes.
/// A handled field is never acted on again, even if the oracle proposes it,
/// so repeated passes converge instead of thrashing the same controls.
#[derive(Debug, Default)]
pub struct ExecutionLedger {
    handled: HashSet<String>,
}

impl ExecutionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, field_id: &str) {
        self.handled.insert(field_id.to_string());
    }

    pub fn record_all<'a>(&mut self, field_ids: impl IntoIterator<Item = &'a String>) {
        for id in field_ids {
            self.handled.insert(id.clone());
        }
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.handled.contains(field_id)
    }

    pub fn len(&self) -> usize {
        self.handled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    /// Drop plan actions that target already-handled fields.
    pub fn retain_unhandled(&self, actions: Vec<Action>) -> Vec<Action> {
        actions
            .into_iter()
            .filter(|a| !self.handled.contains(&a.id))
            .collect()
    }
}

/// Identifiers observed in any snapshot so far. Each pass reports only the
/// delta, which is how newly revealed conditional fields surface.
#[derive(Debug, Default)]
pub struct SeenFields {
    ids: HashSet<String>,
}

impl SeenFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this snapshot's fields; return only the ones never seen in an
    /// earlier pass. Every returned field is absorbed, so a field is "new"
    /// exactly once across the whole run.
    pub fn observe_new(&mut self, fields: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
        let mut fresh = Vec::new();
        for field in fields {
            if self.ids.insert(field.id.clone()) {
                fresh.push(field.clone());
            }
        }
        fresh
    }

    pub fn total_seen(&self) -> usize {
        self.ids.len()
    }
}
