use crate::dom::distill::FieldDescriptor;
use crate::oracle::oracle_model::Action;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

const LABEL_COL: usize = 40;
const VALUE_COL: usize = 30;
const REASON_COL: usize = 50;

/// Format the distilled field inventory as a table.
///
/// Produces output like:
/// ```text
/// ID     | Label                      | Value          | Status
/// -------+----------------------------+----------------+-----------
/// af-0   | First Name                 | Jane           | Ready
/// af-3   | Country                    |                | [Visible: 12]
/// ```
pub fn format_field_table(fields: &[FieldDescriptor]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<6} | {:<w$} | {:<v$} | Status\n",
        "ID",
        "Label",
        "Value",
        w = LABEL_COL,
        v = VALUE_COL
    ));
    out.push_str(&format!(
        "{:-<6}-+-{:-<w$}-+-{:-<v$}-+-----------\n",
        "",
        "",
        "",
        w = LABEL_COL,
        v = VALUE_COL
    ));

    for field in fields {
        out.push_str(&format!(
            "{:<6} | {:<w$} | {:<v$} | {}\n",
            field.id,
            truncate(&field.label, LABEL_COL),
            truncate(&field.content, VALUE_COL),
            field.option_status,
            w = LABEL_COL,
            v = VALUE_COL
        ));
    }

    if fields.is_empty() {
        out.push_str("(no interactive fields)\n");
    }

    out
}

/// Format a proposed plan as a table of actions with the oracle's reasoning.
pub fn format_plan_table(actions: &[Action]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<12} | {:<w$} | {:<v$} | Reasoning\n",
        "Action",
        "Label",
        "Value",
        w = LABEL_COL,
        v = VALUE_COL
    ));
    out.push_str(&format!(
        "{:-<12}-+-{:-<w$}-+-{:-<v$}-+-----------\n",
        "",
        "",
        "",
        w = LABEL_COL,
        v = VALUE_COL
    ));

    for action in actions {
        out.push_str(&format!(
            "{:<12} | {:<w$} | {:<v$} | {}\n",
            action.action_type.as_str(),
            truncate(&action.label, LABEL_COL),
            truncate(&action.value, VALUE_COL),
            truncate(&action.reasoning, REASON_COL),
            w = LABEL_COL,
            v = VALUE_COL
        ));
    }

    if actions.is_empty() {
        out.push_str("(empty plan)\n");
    }

    out
}

/// Banner separating passes in the console narration.
pub fn pass_banner(pass: u32, max_passes: u32, fold: bool) -> String {
    let mode = if fold { "spotlight" } else { "initial" };
    format!(
        "\n=== Pass {}/{} ({}) ===================================",
        pass, max_passes, mode
    )
}

fn truncate(text: &str, max: usize) -> String {
    let cleaned: String = text.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();
    if cleaned.chars().count() <= max {
        return cleaned;
    }
    let kept: String = cleaned.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_preserves_short_text() {
        assert_eq!(truncate("Name", 10), "Name");
    }

    #[test]
    fn truncate_shortens_long_text_with_ellipsis() {
        let long = "a".repeat(60);
        let result = truncate(&long, 20);
        assert_eq!(result.chars().count(), 20);
        assert!(result.ends_with("..."), "expected ellipsis, got {}", result);
    }

    #[test]
    fn field_table_handles_empty_inventory() {
        let table = format_field_table(&[]);
        assert!(
            table.contains("(no interactive fields)"),
            "empty inventory should be called out"
        );
    }
}
