// ============================================================================
// Serialized snapshot tree — the compact markup string sent to the oracle
// ============================================================================

/// A node of the distilled output tree. Built by the distiller, rendered
/// once per pass into the snapshot string.
#[derive(Debug, Clone)]
pub enum SerNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<SerNode>,
    },
    Text(String),
}

impl SerNode {
    pub fn element(tag: &str) -> SerNode {
        SerNode::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_attr(&mut self, name: &str, value: &str) {
        if let SerNode::Element { attrs, .. } = self {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn push_child(&mut self, child: SerNode) {
        if let SerNode::Element { children, .. } = self {
            children.push(child);
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            SerNode::Element { children, .. } => children.len(),
            SerNode::Text(_) => 0,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            SerNode::Text(text) => out.push_str(&escape_text(text)),
            SerNode::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.write(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
