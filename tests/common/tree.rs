#![allow(dead_code)]

use form_autopilot::dom::node::{DomNode, ElementNode};

/// A visible element with sensible defaults for tree-building in tests.
pub fn elem(tag: &str, backend_id: u64) -> ElementNode {
    ElementNode {
        backend_id,
        tag: tag.to_string(),
        width: 200.0,
        height: 24.0,
        ..ElementNode::default()
    }
}

pub fn with_attr(mut el: ElementNode, name: &str, value: &str) -> ElementNode {
    el.set_attr(name, value);
    el
}

pub fn with_value(mut el: ElementNode, value: &str) -> ElementNode {
    el.value = Some(value.to_string());
    el
}

pub fn with_children(mut el: ElementNode, children: Vec<DomNode>) -> ElementNode {
    el.children = children;
    el
}

pub fn node(el: ElementNode) -> DomNode {
    DomNode::Element(el)
}

pub fn text(s: &str) -> DomNode {
    DomNode::Text { text: s.to_string() }
}

/// `<input type=...>` wrapped up in one call.
pub fn input(backend_id: u64, input_type: &str) -> ElementNode {
    with_attr(elem("input", backend_id), "type", input_type)
}

/// `<label for=target>text</label>`.
pub fn label_for(backend_id: u64, target: &str, label_text: &str) -> DomNode {
    node(with_children(
        with_attr(elem("label", backend_id), "for", target),
        vec![text(label_text)],
    ))
}

/// A form wrapping the given children, rooted in a body element.
pub fn form_page(children: Vec<DomNode>) -> DomNode {
    node(with_children(
        elem("body", 1),
        vec![node(with_children(elem("form", 2), children))],
    ))
}
