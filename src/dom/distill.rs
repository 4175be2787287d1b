use std::collections::HashMap;

use serde::Serialize;

use crate::dom::node::{DomNode, ElementNode, PRUNED_TAGS, STRUCTURAL_TAGS};
use crate::dom::serialize::SerNode;

/// Stable-identifier attribute persisted into the live page.
pub const ID_ATTR: &str = "data-autofill-id";
/// Inferred-label attribute persisted into the live page.
pub const LABEL_ATTR: &str = "data-autofill-label";
/// Text body of the marker that replaces a folded field's subtree.
pub const FILLED_PLACEHOLDER: &str = "[FILLED]";
/// Tag of the synthetic marker element for folded fields.
pub const FILLED_TAG: &str = "filled-field";

/// Labels too generic to stand alone; they trigger group-heading prefixing.
pub const WEAK_LABELS: &[&str] = &["", "attach", "select", "select...", "toggle flyout"];

/// Attributes copied onto the serialized tree. Everything else stays behind.
const ALLOWED_ATTRS: &[&str] = &[
    "type",
    "name",
    "placeholder",
    "aria-label",
    "aria-labelledby",
    "role",
    "value",
    "for",
    "checked",
    "disabled",
    "required",
    "aria-expanded",
    "aria-haspopup",
];

const TEXT_OMIT_THRESHOLD: usize = 150;
const TEXT_KEEP_PREFIX: usize = 50;
const LABEL_MAX_CHARS: usize = 60;
const CONTENT_MAX_CHARS: usize = 30;

// ============================================================================
// Session-scoped identifier minting
// ============================================================================

/// Sequential identifier source. One per filling session: an element keeps
/// its first identifier for as long as the annotation survives in the page.
#[derive(Debug, Default)]
pub struct IdMint {
    next: u64,
}

impl IdMint {
    pub fn new() -> Self {
        IdMint::default()
    }

    pub fn mint(&mut self) -> String {
        let id = format!("af-{}", self.next);
        self.next += 1;
        id
    }
}

/// An identifier/label pair the caller must write back to the live page so
/// the next extraction sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub backend_id: u64,
    pub field_id: String,
    pub label: Option<String>,
}

// ============================================================================
// Snapshot output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub field_type: String,
    pub label: String,
    pub content: String,
    pub option_status: String,
}

#[derive(Debug)]
pub struct SemanticSnapshot {
    pub serialized_tree: String,
    pub fields: Vec<FieldDescriptor>,
}

// ============================================================================
// Document-wide lookups (label[for] association, aria-controls resolution)
// ============================================================================

struct DocumentIndex {
    /// `label[for="x"]` text, keyed by the referenced element id.
    label_for: HashMap<String, String>,
    /// Element child count per DOM id, for combobox option-status checks.
    child_counts: HashMap<String, usize>,
}

impl DocumentIndex {
    fn build(root: &DomNode) -> DocumentIndex {
        let mut index = DocumentIndex {
            label_for: HashMap::new(),
            child_counts: HashMap::new(),
        };
        index.scan(root);
        index
    }

    fn scan(&mut self, node: &DomNode) {
        if let DomNode::Element(el) = node {
            if el.tag == "label" {
                if let Some(target) = el.attr("for") {
                    let text = el.text_content();
                    if !text.is_empty() {
                        self.label_for.insert(target.to_string(), text);
                    }
                }
            }
            if let Some(id) = el.attr("id") {
                self.child_counts.insert(id.to_string(), el.element_child_count());
            }
            for child in el.children.iter().chain(el.shadow_children.iter()) {
                self.scan(child);
            }
        }
    }
}

// ============================================================================
// Label inference cascade
// ============================================================================

/// Enclosing containers relevant to weak-label rescue, innermost last.
enum GroupScope {
    Fieldset { legend: Option<String> },
    Group { heading: Option<String> },
}

struct LabelContext<'a> {
    groups: &'a [GroupScope],
    index: &'a DocumentIndex,
}

fn is_weak(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    WEAK_LABELS.contains(&normalized.as_str())
}

/// The raw association result before any group rescue: own text for a
/// `<label>`, else `label[for]` text, else `aria-label`.
fn base_label(el: &ElementNode, ctx: &LabelContext) -> String {
    if el.tag == "label" {
        return el.text_content();
    }
    if let Some(id) = el.attr("id") {
        if let Some(text) = ctx.index.label_for.get(id) {
            return text.clone();
        }
    }
    el.attr("aria-label").unwrap_or("").trim().to_string()
}

type LabelRule = fn(&ElementNode, &LabelContext) -> Option<String>;

fn own_label_text(el: &ElementNode, _ctx: &LabelContext) -> Option<String> {
    (el.tag == "label").then(|| el.text_content())
}

fn associated_label(el: &ElementNode, ctx: &LabelContext) -> Option<String> {
    let label = base_label(el, ctx);
    (!label.is_empty()).then_some(label)
}

/// Rescue a weak label by prefixing the nearest enclosing fieldset legend,
/// or failing that the nearest generic group heading.
fn group_prefixed_label(el: &ElementNode, ctx: &LabelContext) -> Option<String> {
    let base = base_label(el, ctx);
    if !is_weak(&base) {
        return None;
    }
    let legend = ctx.groups.iter().rev().find_map(|g| match g {
        GroupScope::Fieldset { legend: Some(text) } => Some(text.clone()),
        _ => None,
    });
    let heading = legend.or_else(|| {
        ctx.groups.iter().rev().find_map(|g| match g {
            GroupScope::Group { heading: Some(text) } => Some(text.clone()),
            _ => None,
        })
    })?;
    Some(format!("{} > {}", heading, base))
}

fn button_own_text(el: &ElementNode, ctx: &LabelContext) -> Option<String> {
    if el.tag == "button" && base_label(el, ctx).is_empty() {
        let text = el.text_content();
        return (!text.is_empty()).then_some(text);
    }
    None
}

/// Ordered cascade; the first non-weak result wins. If every rule comes up
/// weak or empty, the weak association result is kept as-is.
const LABEL_RULES: &[LabelRule] = &[
    own_label_text,
    associated_label,
    group_prefixed_label,
    button_own_text,
];

fn infer_label(el: &ElementNode, ctx: &LabelContext) -> String {
    for rule in LABEL_RULES {
        if let Some(label) = rule(el, ctx) {
            if !is_weak(&label) {
                return label;
            }
        }
    }
    base_label(el, ctx)
}

// ============================================================================
// Distillation
// ============================================================================

/// Transform the extracted tree into a semantic snapshot.
///
/// Mutates the in-memory tree: newly minted identifiers and inferred labels
/// are written into the attribute bags, and returned as annotations for the
/// caller to persist through the driver. Identifiers already present from a
/// previous pass are reused, never replaced.
pub fn distill(
    root: &mut DomNode,
    fold_filled: bool,
    ids: &mut IdMint,
) -> (SemanticSnapshot, Vec<Annotation>) {
    let index = DocumentIndex::build(root);
    let mut annotations = Vec::new();
    let mut groups = Vec::new();

    let tree = distill_node(root, fold_filled, ids, &index, &mut groups, &mut annotations);
    let serialized_tree = tree.map(|n| n.to_html()).unwrap_or_default();

    let mut fields = Vec::new();
    collect_fields(root, fold_filled, &index, &mut fields);

    (SemanticSnapshot { serialized_tree, fields }, annotations)
}

fn distill_node(
    node: &mut DomNode,
    fold_filled: bool,
    ids: &mut IdMint,
    index: &DocumentIndex,
    groups: &mut Vec<GroupScope>,
    annotations: &mut Vec<Annotation>,
) -> Option<SerNode> {
    match node {
        DomNode::Text { text } => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.chars().count() > TEXT_OMIT_THRESHOLD {
                let prefix: String = trimmed.chars().take(TEXT_KEEP_PREFIX).collect();
                return Some(SerNode::Text(format!("{}...[omitted]", prefix)));
            }
            Some(SerNode::Text(trimmed.to_string()))
        }

        DomNode::Element(el) => {
            if PRUNED_TAGS.contains(&el.tag.as_str()) {
                return None;
            }
            if !el.is_visible() {
                return None;
            }

            let interactive = el.is_interactive();
            let mut field_id = None;

            if interactive {
                let existing_id = el.attr(ID_ATTR).map(str::to_string);
                let minted = existing_id.is_none();
                let id = existing_id.unwrap_or_else(|| ids.mint());
                el.set_attr(ID_ATTR, &id);

                // Labels are inferred once and then reused from the attribute.
                let mut fresh_label = None;
                if el.attr(LABEL_ATTR).is_none() {
                    let ctx = LabelContext { groups: groups.as_slice(), index };
                    let label = infer_label(el, &ctx);
                    if !label.is_empty() {
                        el.set_attr(LABEL_ATTR, &label);
                        fresh_label = Some(label);
                    }
                }

                if minted || fresh_label.is_some() {
                    annotations.push(Annotation {
                        backend_id: el.backend_id,
                        field_id: id.clone(),
                        label: fresh_label,
                    });
                }
                field_id = Some(id);
            }

            // Collapse already-filled fields: identifier and label survive,
            // the real content never reaches the snapshot.
            if fold_filled && interactive && el.is_filled() {
                let mut marker = SerNode::element(FILLED_TAG);
                if let Some(id) = &field_id {
                    marker.push_attr(ID_ATTR, id);
                }
                if let Some(label) = el.attr(LABEL_ATTR) {
                    marker.push_attr(LABEL_ATTR, label);
                }
                marker.push_child(SerNode::Text(FILLED_PLACEHOLDER.to_string()));
                return Some(marker);
            }

            let mut out = SerNode::element(&el.tag);
            if let Some(id) = &field_id {
                out.push_attr(ID_ATTR, id);
                if let Some(label) = el.attr(LABEL_ATTR) {
                    out.push_attr(LABEL_ATTR, label);
                }
            }
            for name in ALLOWED_ATTRS {
                if let Some(value) = el.attr(name) {
                    out.push_attr(name, value);
                }
            }

            let scope = enclosing_scope(el);
            let scoped = scope.is_some();
            if let Some(scope) = scope {
                groups.push(scope);
            }

            let mut has_content = false;

            if !el.shadow_children.is_empty() {
                let mut shadow = SerNode::element("shadow-root");
                for child in el.shadow_children.iter_mut() {
                    if let Some(c) =
                        distill_node(child, fold_filled, ids, index, groups, annotations)
                    {
                        shadow.push_child(c);
                    }
                }
                if shadow.child_count() > 0 {
                    out.push_child(shadow);
                    has_content = true;
                }
            }

            for child in el.children.iter_mut() {
                if let Some(c) = distill_node(child, fold_filled, ids, index, groups, annotations)
                {
                    out.push_child(c);
                    has_content = true;
                }
            }

            if scoped {
                groups.pop();
            }

            if interactive {
                return Some(out);
            }
            if has_content || STRUCTURAL_TAGS.contains(&el.tag.as_str()) {
                return Some(out);
            }
            None
        }
    }
}

/// Group-scope entry for label rescue, computed before descending.
fn enclosing_scope(el: &ElementNode) -> Option<GroupScope> {
    if el.tag == "fieldset" {
        let legend = el.children.iter().find_map(|c| match c {
            DomNode::Element(child) if child.tag == "legend" => {
                let text = child.text_content();
                (!text.is_empty()).then_some(text)
            }
            _ => None,
        });
        return Some(GroupScope::Fieldset { legend });
    }
    if el.attr("role") == Some("group") {
        let heading = el
            .attr("aria-label")
            .map(str::to_string)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                el.children.iter().find_map(|c| match c {
                    DomNode::Element(child) => {
                        let text = child.text_content();
                        (!text.is_empty()).then_some(text)
                    }
                    _ => None,
                })
            });
        return Some(GroupScope::Group { heading });
    }
    None
}

// ============================================================================
// Descriptor extraction — second scan over the annotated tree
// ============================================================================

/// One descriptor per tagged element, read from current (live) state. When
/// folding, the content of filled fields is deliberately blanked so later
/// oracle calls cannot see previously entered values.
fn collect_fields(
    node: &DomNode,
    fold_filled: bool,
    index: &DocumentIndex,
    out: &mut Vec<FieldDescriptor>,
) {
    if let DomNode::Element(el) = node {
        if let Some(id) = el.attr(ID_ATTR) {
            let field_type = el.field_type();

            let label = el.attr(LABEL_ATTR).unwrap_or("(no label)");

            let content = if fold_filled && el.is_filled() {
                String::new()
            } else if el.tag == "button" {
                el.text_content()
            } else {
                el.value.clone().unwrap_or_default()
            };

            let option_status = if field_type == "combobox" {
                match el.attr("aria-controls").and_then(|c| index.child_counts.get(c)) {
                    Some(n) if *n > 0 => format!("[Visible: {}]", n),
                    _ => "[Runtime Fetch Required]".to_string(),
                }
            } else {
                "Ready".to_string()
            };

            out.push(FieldDescriptor {
                id: id.to_string(),
                field_type,
                label: truncate_chars(label, LABEL_MAX_CHARS),
                content: truncate_chars(&content, CONTENT_MAX_CHARS),
                option_status,
            });
        }

        for child in el.children.iter().chain(el.shadow_children.iter()) {
            collect_fields(child, fold_filled, index, out);
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
