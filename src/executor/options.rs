use crate::browser::driver::PageDriver;
use crate::error::AutopilotError;

// ============================================================================
// Option resolution — locating the visible option list of an open dropdown
// ============================================================================

/// One selector strategy for locating rendered dropdown options.
#[derive(Debug, Clone, Copy)]
pub struct OptionStrategy {
    pub name: &'static str,
    pub selector: &'static str,
}

/// Tried in order, most framework-specific first. Short-circuit: the first
/// strategy with a non-empty, visible result wins outright — results are
/// never merged across strategies, or closed lists from other controls on
/// the page would bleed in.
pub const OPTION_STRATEGIES: &[OptionStrategy] = &[
    // React-select style portals render the menu at the document root
    OptionStrategy { name: "framework menu", selector: "[class*=\"select__menu\"] div" },
    OptionStrategy { name: "aria option", selector: "[role=\"option\"]" },
    OptionStrategy { name: "option class", selector: "[class*=\"option\"]" },
    OptionStrategy { name: "list item", selector: "li" },
];

#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub strategy: &'static str,
    pub selector: &'static str,
    /// Texts in match order. Whitespace-only entries are kept so indices
    /// stay aligned with `click_option`; they can never win a match.
    pub texts: Vec<String>,
}

impl ResolvedOptions {
    pub fn has_content(&self) -> bool {
        self.texts.iter().any(|t| !t.trim().is_empty())
    }
}

/// Locate the currently visible, non-empty option list of an opened control.
/// Returns `None` when every strategy comes up empty or hidden; the caller
/// should then dismiss the control.
pub fn resolve_visible_options(
    driver: &mut dyn PageDriver,
) -> Result<Option<ResolvedOptions>, AutopilotError> {
    for strategy in OPTION_STRATEGIES {
        let texts = driver.option_texts(strategy.selector)?;

        let candidate = ResolvedOptions {
            strategy: strategy.name,
            selector: strategy.selector,
            texts,
        };
        if !candidate.has_content() {
            continue;
        }
        // Visibility is probed on the first non-blank match: a stray empty
        // hidden item at position 0 must not disqualify the whole strategy.
        if !driver.first_visible_with_text(strategy.selector)? {
            continue;
        }

        return Ok(Some(candidate));
    }
    Ok(None)
}
