use std::fs;
use std::path::Path;

use crate::browser::driver::PageDriver;
use crate::dom::distill::{distill, IdMint};
use crate::error::AutopilotError;
use crate::executor::executor::execute_plan;
use crate::oracle::oracle_model::PlanMode;
use crate::oracle::PlanOracle;
use crate::pilot::ledger::{ExecutionLedger, SeenFields};
use crate::profile::UserProfile;
use crate::report::console::{format_field_table, format_plan_table, pass_banner};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

// ============================================================================
// Reconciliation loop — snapshot, plan, execute, repeat until stable
// ============================================================================

/// Knobs for the pass loop. Defaults match typical application forms: three
/// passes, with filled-field folding switched on from the second pass so the
/// oracle's attention narrows to what is still open.
#[derive(Debug, Clone, Copy)]
pub struct PassPolicy {
    pub max_passes: u32,
    /// First pass (1-based) that folds already-filled fields.
    pub fold_from_pass: u32,
    /// Quiescence wait before each extraction.
    pub settle_ms: u64,
    /// Delay between consecutive actions.
    pub pace_ms: u64,
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            max_passes: 3,
            fold_from_pass: 2,
            settle_ms: 2000,
            pace_ms: 500,
        }
    }
}

/// What a full run accomplished.
#[derive(Debug, Default)]
pub struct FillOutcome {
    pub passes_run: u32,
    /// Distinct fields observed across all passes.
    pub fields_seen: usize,
    pub executed: Vec<String>,
    pub flagged_for_human: Vec<String>,
    pub skipped: u32,
    pub failed: u32,
    /// True when the loop stopped because there was nothing left to do,
    /// false when it ran out of pass budget.
    pub converged: bool,
}

/// Drive the full reconciliation loop against an already-navigated page.
///
/// Each pass: wait for quiescence, extract, distill (folding from the
/// configured pass on), persist fresh annotations, diff against earlier
/// passes, ask the oracle for a plan, drop already-handled fields, execute.
/// Stops early when the filtered plan is empty.
pub fn run_fill(
    driver: &mut dyn PageDriver,
    oracle: &dyn PlanOracle,
    profile: &UserProfile,
    policy: &PassPolicy,
    tracer: &TraceLogger,
    logs_dir: Option<&Path>,
) -> Result<FillOutcome, AutopilotError> {
    let mut ids = IdMint::new();
    let mut ledger = ExecutionLedger::new();
    let mut seen = SeenFields::new();
    let mut outcome = FillOutcome::default();

    for pass in 1..=policy.max_passes {
        outcome.passes_run = pass;
        let fold = pass >= policy.fold_from_pass;
        println!("{}", pass_banner(pass, policy.max_passes, fold));

        driver.settle(policy.settle_ms)?;
        let mut tree = driver.extract_tree()?;
        let (snapshot, annotations) = distill(&mut tree, fold, &mut ids);

        // Write identifiers back so the next extraction returns them and
        // matched elements stay addressable across passes.
        for annotation in &annotations {
            driver.annotate(annotation)?;
        }

        if let Some(dir) = logs_dir {
            log_distilled_tree(dir, pass, &snapshot.serialized_tree);
        }

        let new_fields = seen.observe_new(&snapshot.fields);
        tracer.log(
            &TraceEvent::now(pass, "snapshot")
                .with_fold(fold)
                .with_field_count(snapshot.fields.len())
                .with_new_fields(new_fields.len()),
        );

        if pass == 1 {
            println!("\nField inventory:");
            println!("{}", format_field_table(&snapshot.fields));
        } else if new_fields.is_empty() {
            println!("\nNo new fields since the last pass.");
        } else {
            println!("\nNewly revealed fields:");
            println!("{}", format_field_table(&new_fields));
        }

        let mode = if fold {
            PlanMode::Spotlight
        } else {
            PlanMode::Initial
        };
        let plan = oracle.propose(&snapshot.serialized_tree, profile, mode)?;

        if !plan.page_analysis.is_empty() {
            println!("Page analysis: {}", plan.page_analysis);
        }

        let planned = plan.actions.len();
        let actions = ledger.retain_unhandled(plan.actions);
        tracer.log(
            &TraceEvent::now(pass, "plan").with_plan_sizes(planned, actions.len()),
        );

        if actions.is_empty() {
            println!("\nNothing left to do; plan is empty after filtering.");
            outcome.converged = true;
            break;
        }

        println!("\nProposed actions:");
        println!("{}", format_plan_table(&actions));

        // Every forwarded action is ledgered up front, whatever its fate at
        // execution time, so no field is ever acted on twice.
        ledger.record_all(actions.iter().map(|a| &a.id));

        let summary = execute_plan(driver, &actions, pass, policy.pace_ms, tracer);
        outcome.executed.extend(summary.executed);
        outcome.flagged_for_human.extend(summary.flagged_for_human);
        outcome.skipped += summary.skipped;
        outcome.failed += summary.failed;
    }

    outcome.fields_seen = seen.total_seen();
    tracer.log(
        &TraceEvent::now(outcome.passes_run, "done")
            .with_field_count(outcome.fields_seen)
            .with_outcome(if outcome.converged {
                "converged"
            } else {
                "pass budget exhausted"
            }),
    );

    Ok(outcome)
}

/// Best-effort per-pass dump of the distilled markup, for offline debugging.
fn log_distilled_tree(dir: &Path, pass: u32, serialized_tree: &str) {
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("Warning: could not create log dir {}: {}", dir.display(), e);
        return;
    }
    let path = dir.join(format!("pass_{}_distill.html", pass));
    if let Err(e) = fs::write(&path, serialized_tree) {
        eprintln!("Warning: could not write {}: {}", path.display(), e);
    }
}
