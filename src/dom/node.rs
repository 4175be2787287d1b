use std::collections::HashMap;

use serde::Deserialize;

/// Tags whose subtrees carry no form semantics and are dropped outright.
pub const PRUNED_TAGS: &[&str] = &["script", "style", "svg", "noscript", "iframe", "link", "meta"];

/// Non-interactive tags that still survive distillation as structure.
pub const STRUCTURAL_TAGS: &[&str] =
    &["form", "label", "h1", "h2", "legend", "p", "fieldset", "div"];

/// ARIA roles that make an element a form field even without a native tag.
pub const INTERACTIVE_ROLES: &[&str] =
    &["listbox", "combobox", "checkbox", "radio", "textbox", "searchbox"];

const NATIVE_CONTROL_TAGS: &[&str] = &["input", "select", "textarea", "button"];

/// One node of the tree the driver extracts from the live page.
///
/// Elements carry both their attribute bag (as written in markup) and the
/// live control state (current value, checked, attached files) which can
/// diverge from the attributes after user or script mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomNode {
    Text { text: String },
    Element(ElementNode),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementNode {
    /// Driver-side handle, used to write annotations back to the live page.
    pub backend_id: u64,
    /// Lowercase tag name.
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub value: Option<String>,
    pub checked: bool,
    pub selected_files: u32,
    /// Native select only; -1 means nothing chosen.
    pub selected_index: Option<i32>,
    pub width: f64,
    pub height: f64,
    /// display:none or visibility:hidden in computed style.
    pub hidden_style: bool,
    pub children: Vec<DomNode>,
    pub shadow_children: Vec<DomNode>,
}

impl ElementNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    /// Visibility test: explicit hidden styling, or zero rendered area.
    pub fn is_visible(&self) -> bool {
        !self.hidden_style && self.width > 0.0 && self.height > 0.0
    }

    /// Interactive = native form control (hidden inputs excluded) or an
    /// interactive ARIA role.
    pub fn is_interactive(&self) -> bool {
        if self.tag == "input" && self.attr("type") == Some("hidden") {
            return false;
        }
        if NATIVE_CONTROL_TAGS.contains(&self.tag.as_str()) {
            return true;
        }
        matches!(self.attr("role"), Some(role) if INTERACTIVE_ROLES.contains(&role))
    }

    /// Fill-state predicate used by folded (spotlight) distillation.
    pub fn is_filled(&self) -> bool {
        match self.tag.as_str() {
            "input" => match self.attr("type") {
                Some("checkbox") | Some("radio") => self.checked,
                Some("file") => self.selected_files > 0,
                _ => non_blank(self.value.as_deref()),
            },
            "textarea" => non_blank(self.value.as_deref()),
            "select" => {
                non_blank(self.value.as_deref()) && self.selected_index.unwrap_or(-1) != -1
            }
            // Custom ARIA controls report fill through aria-checked
            _ => self.attr("aria-checked") == Some("true"),
        }
    }

    /// Semantic field type used in descriptors and console tables.
    pub fn field_type(&self) -> String {
        let mut t = self.tag.clone();
        if self.tag == "input" {
            t = self.attr("type").unwrap_or("text").to_string();
        }
        match self.attr("role") {
            Some("combobox") => t = "combobox".into(),
            Some("checkbox") => t = "checkbox".into(),
            _ => {}
        }
        if t == "file" {
            t = "file_upload".into();
        }
        t
    }

    /// Concatenated text of the subtree, whitespace-normalized.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        gather_text(&self.children, &mut parts);
        gather_text(&self.shadow_children, &mut parts);
        parts.join(" ")
    }

    /// Count of element (non-text) children.
    pub fn element_child_count(&self) -> usize {
        self.children
            .iter()
            .filter(|c| matches!(c, DomNode::Element(_)))
            .count()
    }
}

fn gather_text(nodes: &[DomNode], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            DomNode::Text { text } => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
            DomNode::Element(el) => {
                gather_text(&el.children, out);
                gather_text(&el.shadow_children, out);
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.trim().is_empty())
}
