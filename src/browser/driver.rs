use crate::dom::distill::Annotation;
use crate::dom::node::DomNode;
use crate::error::AutopilotError;

/// The narrow capability boundary to the live page.
///
/// The engine never owns the UI tree; it only asks for an extraction,
/// persists annotations, and requests mutations that become observable in
/// the next extraction. Production impl is the Node.js sidecar session;
/// tests supply an in-memory fake.
pub trait PageDriver {
    fn navigate(&mut self, url: &str) -> Result<(), AutopilotError>;

    /// Fixed delay followed by a network/visual quiescence wait.
    fn settle(&mut self, ms: u64) -> Result<(), AutopilotError>;

    /// Extract the current DOM as a tree, annotation attributes included.
    fn extract_tree(&mut self) -> Result<DomNode, AutopilotError>;

    /// Persist a stable identifier (and optionally a label) onto a live
    /// element, so later extractions can reuse it.
    fn annotate(&mut self, annotation: &Annotation) -> Result<(), AutopilotError>;

    /// Number of live elements carrying the given identifier.
    fn count_fields(&mut self, field_id: &str) -> Result<u32, AutopilotError>;

    /// Set text content, then blur to trigger page-side validation.
    fn fill_field(&mut self, field_id: &str, value: &str) -> Result<(), AutopilotError>;

    fn upload_file(&mut self, field_id: &str, path: &str) -> Result<(), AutopilotError>;

    fn check_field(&mut self, field_id: &str) -> Result<(), AutopilotError>;

    fn click_field(&mut self, field_id: &str) -> Result<(), AutopilotError>;

    /// Trigger a dropdown-type control to open (clicking an internal toggle
    /// where the framework requires it).
    fn open_control(&mut self, field_id: &str) -> Result<(), AutopilotError>;

    /// Texts of all elements matching a CSS selector, document order.
    fn option_texts(&mut self, selector: &str) -> Result<Vec<String>, AutopilotError>;

    /// Whether the first element matching the selector that carries
    /// non-whitespace text is currently visible. Blank matches are skipped:
    /// frameworks leave empty hidden list items around that say nothing
    /// about the option list being probed.
    fn first_visible_with_text(&mut self, selector: &str) -> Result<bool, AutopilotError>;

    /// Click the nth element matching the selector.
    fn click_option(&mut self, selector: &str, index: usize) -> Result<(), AutopilotError>;

    /// Escape gesture, used to dismiss an opened control.
    fn press_escape(&mut self) -> Result<(), AutopilotError>;
}
