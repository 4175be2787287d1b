#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

use form_autopilot::browser::driver::PageDriver;
use form_autopilot::dom::distill::{Annotation, ID_ATTR, LABEL_ATTR};
use form_autopilot::dom::node::{DomNode, ElementNode};
use form_autopilot::error::AutopilotError;
use form_autopilot::oracle::oracle_model::{Plan, PlanMode};
use form_autopilot::oracle::PlanOracle;
use form_autopilot::profile::UserProfile;

// ============================================================================
// In-memory page driver
// ============================================================================

/// Drives an in-memory `DomNode` tree instead of a browser. Mutating calls
/// edit the tree, so a later `extract_tree` observes the effects exactly like
/// a live page would.
pub struct FakeDriver {
    pub page: DomNode,
    /// Side-effect log, one entry per mutating call.
    pub log: Vec<String>,
    /// selector -> matched elements as (text, visible) pairs, document order.
    pub option_sets: HashMap<String, Vec<(String, bool)>>,
    /// Field ids whose mutations fail, for error-isolation scenarios.
    pub failing_fields: HashSet<String>,
    /// When a listed field is filled, the paired subtree is appended to its
    /// parent form, simulating a conditionally revealed section.
    pub reveal_on_fill: Vec<(String, DomNode)>,
}

impl FakeDriver {
    pub fn new(page: DomNode) -> Self {
        Self {
            page,
            log: Vec::new(),
            option_sets: HashMap::new(),
            failing_fields: HashSet::new(),
            reveal_on_fill: Vec::new(),
        }
    }

    pub fn with_options(mut self, selector: &str, texts: &[&str], visible: bool) -> Self {
        self.option_sets.insert(
            selector.to_string(),
            texts.iter().map(|t| (t.to_string(), visible)).collect(),
        );
        self
    }

    /// Like `with_options`, but with per-element visibility.
    pub fn with_option_items(mut self, selector: &str, items: &[(&str, bool)]) -> Self {
        self.option_sets.insert(
            selector.to_string(),
            items.iter().map(|(t, v)| (t.to_string(), *v)).collect(),
        );
        self
    }

    /// First element carrying the given stable identifier.
    pub fn find_by_field_id(&self, field_id: &str) -> Option<&ElementNode> {
        find(&self.page, &|el| el.attr(ID_ATTR) == Some(field_id))
    }

    fn fail_if_marked(&self, field_id: &str) -> Result<(), AutopilotError> {
        if self.failing_fields.contains(field_id) {
            return Err(AutopilotError::BrowserAction(format!(
                "injected failure for {}",
                field_id
            )));
        }
        Ok(())
    }

    fn mutate_field(
        &mut self,
        field_id: &str,
        op: &str,
        apply: impl FnOnce(&mut ElementNode),
    ) -> Result<(), AutopilotError> {
        self.fail_if_marked(field_id)?;
        let el = find_mut(&mut self.page, &|el| el.attr(ID_ATTR) == Some(field_id))
            .ok_or_else(|| {
                AutopilotError::BrowserAction(format!("no element with id {}", field_id))
            })?;
        apply(el);
        self.log.push(format!("{} {}", op, field_id));
        Ok(())
    }

    fn trigger_reveals(&mut self, field_id: &str) {
        let mut revealed = Vec::new();
        self.reveal_on_fill.retain_mut(|(trigger, subtree)| {
            if trigger == field_id {
                revealed.push(std::mem::replace(
                    subtree,
                    DomNode::Text { text: String::new() },
                ));
                false
            } else {
                true
            }
        });
        for subtree in revealed {
            if let Some(form) = find_mut(&mut self.page, &|el| el.tag == "form") {
                form.children.push(subtree);
            }
        }
    }
}

impl PageDriver for FakeDriver {
    fn navigate(&mut self, url: &str) -> Result<(), AutopilotError> {
        self.log.push(format!("navigate {}", url));
        Ok(())
    }

    fn settle(&mut self, ms: u64) -> Result<(), AutopilotError> {
        self.log.push(format!("settle {}", ms));
        Ok(())
    }

    fn extract_tree(&mut self) -> Result<DomNode, AutopilotError> {
        Ok(self.page.clone())
    }

    fn annotate(&mut self, annotation: &Annotation) -> Result<(), AutopilotError> {
        let backend_id = annotation.backend_id;
        let el = find_mut(&mut self.page, &|el| el.backend_id == backend_id)
            .ok_or_else(|| {
                AutopilotError::BrowserAction(format!("no element with backend id {}", backend_id))
            })?;
        el.set_attr(ID_ATTR, &annotation.field_id);
        if let Some(label) = &annotation.label {
            el.set_attr(LABEL_ATTR, label);
        }
        Ok(())
    }

    fn count_fields(&mut self, field_id: &str) -> Result<u32, AutopilotError> {
        let mut count = 0u32;
        visit(&self.page, &mut |el| {
            if el.attr(ID_ATTR) == Some(field_id) {
                count += 1;
            }
        });
        Ok(count)
    }

    fn fill_field(&mut self, field_id: &str, value: &str) -> Result<(), AutopilotError> {
        let value = value.to_string();
        self.mutate_field(field_id, "fill", move |el| {
            el.value = Some(value);
        })?;
        self.trigger_reveals(field_id);
        Ok(())
    }

    fn upload_file(&mut self, field_id: &str, _path: &str) -> Result<(), AutopilotError> {
        self.mutate_field(field_id, "upload", |el| {
            el.selected_files = 1;
        })
    }

    fn check_field(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.mutate_field(field_id, "check", |el| {
            el.checked = true;
        })?;
        self.trigger_reveals(field_id);
        Ok(())
    }

    fn click_field(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.fail_if_marked(field_id)?;
        self.log.push(format!("click {}", field_id));
        Ok(())
    }

    fn open_control(&mut self, field_id: &str) -> Result<(), AutopilotError> {
        self.fail_if_marked(field_id)?;
        self.log.push(format!("open {}", field_id));
        Ok(())
    }

    fn option_texts(&mut self, selector: &str) -> Result<Vec<String>, AutopilotError> {
        Ok(self
            .option_sets
            .get(selector)
            .map(|items| items.iter().map(|(t, _)| t.clone()).collect())
            .unwrap_or_default())
    }

    fn first_visible_with_text(&mut self, selector: &str) -> Result<bool, AutopilotError> {
        Ok(self
            .option_sets
            .get(selector)
            .and_then(|items| items.iter().find(|(t, _)| !t.trim().is_empty()))
            .map(|(_, visible)| *visible)
            .unwrap_or(false))
    }

    fn click_option(&mut self, selector: &str, index: usize) -> Result<(), AutopilotError> {
        self.log.push(format!("pick {} #{}", selector, index));
        Ok(())
    }

    fn press_escape(&mut self) -> Result<(), AutopilotError> {
        self.log.push("escape".to_string());
        Ok(())
    }
}

fn find<'a>(
    node: &'a DomNode,
    pred: &dyn Fn(&ElementNode) -> bool,
) -> Option<&'a ElementNode> {
    if let DomNode::Element(el) = node {
        if pred(el) {
            return Some(el);
        }
        for child in el.children.iter().chain(el.shadow_children.iter()) {
            if let Some(found) = find(child, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn find_mut<'a>(
    node: &'a mut DomNode,
    pred: &dyn Fn(&ElementNode) -> bool,
) -> Option<&'a mut ElementNode> {
    if let DomNode::Element(el) = node {
        if pred(el) {
            return Some(el);
        }
        for child in el.children.iter_mut().chain(el.shadow_children.iter_mut()) {
            if let Some(found) = find_mut(child, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn visit(node: &DomNode, f: &mut dyn FnMut(&ElementNode)) {
    if let DomNode::Element(el) = node {
        f(el);
        for child in el.children.iter().chain(el.shadow_children.iter()) {
            visit(child, f);
        }
    }
}

// ============================================================================
// Scripted oracle
// ============================================================================

/// Replays a fixed sequence of plans and records the mode of every call.
/// Once the script runs out it proposes nothing, which ends the loop.
pub struct ScriptedOracle {
    plans: RefCell<VecDeque<Plan>>,
    pub modes: RefCell<Vec<PlanMode>>,
}

impl ScriptedOracle {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans: RefCell::new(plans.into()),
            modes: RefCell::new(Vec::new()),
        }
    }
}

impl PlanOracle for ScriptedOracle {
    fn propose(
        &self,
        _serialized_tree: &str,
        _profile: &UserProfile,
        mode: PlanMode,
    ) -> Result<Plan, AutopilotError> {
        self.modes.borrow_mut().push(mode);
        Ok(self.plans.borrow_mut().pop_front().unwrap_or(Plan {
            page_analysis: String::new(),
            actions: Vec::new(),
        }))
    }
}

/// A minimal but complete profile for control-flow tests.
pub fn sample_profile() -> UserProfile {
    serde_json::from_str(
        r#"{
            "basics": {
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "phone": "555-0100"
            },
            "legal": {
                "authorized_to_work": true,
                "sponsorship_needed": false,
                "veteran_status": "I am not a veteran",
                "disability_status": "No",
                "gender": "Female",
                "race": "Prefer not to say"
            },
            "resume_path": "/tmp/resume.pdf"
        }"#,
    )
    .expect("sample profile should deserialize")
}
