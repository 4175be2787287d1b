use crate::browser::driver::PageDriver;
use crate::error::AutopilotError;
use crate::executor::options::resolve_visible_options;
use crate::matcher::intent::find_best_match;
use crate::oracle::oracle_model::{Action, ActionType};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

// ============================================================================
// Plan execution — applying oracle actions to the live page
// ============================================================================

/// Sentinel value: the oracle could not answer this field from the profile.
/// The field is left untouched and surfaced for manual review.
pub const HUMAN_CHECK: &str = "human_check";

/// Minimum match score before a dropdown option is clicked. Below this we
/// dismiss the control rather than select a wrong answer.
const SELECT_ACCEPT_FLOOR: f64 = 0.4;

/// Delay after opening a dropdown, so framework menus can render.
const OPEN_SETTLE_MS: u64 = 800;

/// Delay after clicking an option, so the selection can commit.
const PICK_SETTLE_MS: u64 = 500;

/// Delay after a plain click, so triggered DOM mutations can land before
/// the next action targets the page.
const CLICK_SETTLE_MS: u64 = 1000;

/// Outcome of running one plan against the page.
#[derive(Debug, Default)]
pub struct ExecutionSummary {
    /// Identifiers of fields an action was actually applied to.
    pub executed: Vec<String>,
    /// Identifiers the oracle flagged with the human-review sentinel.
    pub flagged_for_human: Vec<String>,
    pub skipped: u32,
    pub failed: u32,
}

enum ActionOutcome {
    Applied,
    Skipped(String),
}

/// Apply a plan's actions in order. Each action is isolated: a failure is
/// reported and counted, never propagated, so one broken field cannot stall
/// the rest of the pass.
pub fn execute_plan(
    driver: &mut dyn PageDriver,
    actions: &[Action],
    pass: u32,
    pace_ms: u64,
    tracer: &TraceLogger,
) -> ExecutionSummary {
    let mut summary = ExecutionSummary::default();

    for action in actions {
        if action.value == HUMAN_CHECK {
            println!(
                "  [human] {} ({}) needs manual review: {}",
                action.id, action.label, action.reasoning
            );
            summary.flagged_for_human.push(action.id.clone());
            tracer.log(
                &TraceEvent::now(pass, "action")
                    .with_action(action)
                    .with_outcome("human_check"),
            );
            continue;
        }

        match apply_action(driver, action) {
            Ok(ActionOutcome::Applied) => {
                println!(
                    "  [{}] {} <- \"{}\"",
                    action.action_type.as_str(),
                    action.id,
                    action.value
                );
                summary.executed.push(action.id.clone());
                tracer.log(
                    &TraceEvent::now(pass, "action")
                        .with_action(action)
                        .with_outcome("applied"),
                );
            }
            Ok(ActionOutcome::Skipped(reason)) => {
                eprintln!("  [skip] {}: {}", action.id, reason);
                summary.skipped += 1;
                tracer.log(
                    &TraceEvent::now(pass, "action")
                        .with_action(action)
                        .with_outcome(format!("skipped: {}", reason)),
                );
            }
            Err(e) => {
                eprintln!("  [fail] {}: {}", action.id, e);
                summary.failed += 1;
                tracer.log(
                    &TraceEvent::now(pass, "action")
                        .with_action(action)
                        .with_outcome(format!("failed: {}", e)),
                );
            }
        }

        if pace_ms > 0 {
            // Pages debounce validation; pacing keeps reactions observable
            if let Err(e) = driver.settle(pace_ms) {
                eprintln!("  [warn] pacing delay failed: {}", e);
            }
        }
    }

    summary
}

fn apply_action(
    driver: &mut dyn PageDriver,
    action: &Action,
) -> Result<ActionOutcome, AutopilotError> {
    // The identifier must resolve to exactly one live element. Zero means
    // the page moved on since the snapshot; more than one means the
    // annotation leaked. Either way the action is unsafe to apply.
    let count = driver.count_fields(&action.id)?;
    if count != 1 {
        return Ok(ActionOutcome::Skipped(format!(
            "expected exactly one element for {}, found {}",
            action.id, count
        )));
    }

    match action.action_type {
        ActionType::Fill => {
            driver.fill_field(&action.id, &action.value)?;
            Ok(ActionOutcome::Applied)
        }
        ActionType::FileUpload => {
            driver.upload_file(&action.id, &action.value)?;
            Ok(ActionOutcome::Applied)
        }
        ActionType::Radio | ActionType::Checkbox => {
            driver.check_field(&action.id)?;
            Ok(ActionOutcome::Applied)
        }
        ActionType::Click => {
            driver.click_field(&action.id)?;
            driver.settle(CLICK_SETTLE_MS)?;
            Ok(ActionOutcome::Applied)
        }
        ActionType::SmartSelect => smart_select(driver, action),
    }
}

/// Open a dropdown-type control, locate whatever option list the framework
/// rendered, and click the option that best matches the intended value.
fn smart_select(
    driver: &mut dyn PageDriver,
    action: &Action,
) -> Result<ActionOutcome, AutopilotError> {
    driver.open_control(&action.id)?;
    driver.settle(OPEN_SETTLE_MS)?;

    let resolved = match resolve_visible_options(driver)? {
        Some(r) => r,
        None => {
            driver.press_escape()?;
            return Ok(ActionOutcome::Skipped(
                "no visible options after opening control".to_string(),
            ));
        }
    };

    match find_best_match(&action.value, &resolved.texts) {
        Some(m) if m.score > SELECT_ACCEPT_FLOOR => {
            driver.click_option(resolved.selector, m.index)?;
            driver.settle(PICK_SETTLE_MS)?;
            Ok(ActionOutcome::Applied)
        }
        Some(m) => {
            driver.press_escape()?;
            Ok(ActionOutcome::Skipped(format!(
                "best option \"{}\" via {} scored {:.2}, below acceptance",
                m.matched, resolved.strategy, m.score
            )))
        }
        None => {
            driver.press_escape()?;
            Ok(ActionOutcome::Skipped(format!(
                "no option resembling \"{}\" via {}",
                action.value, resolved.strategy
            )))
        }
    }
}
