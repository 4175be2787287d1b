use std::path::Path;

use crate::browser::driver::PageDriver;
use crate::browser::session::BrowserSession;
use crate::dom::distill::{distill, IdMint, SemanticSnapshot};
use crate::oracle::ollama::OllamaOracle;
use crate::oracle::oracle_model::PlanMode;
use crate::oracle::{MockOracle, PlanOracle};
use crate::pilot::runner::{run_fill, PassPolicy};
use crate::profile::load_profile;
use crate::report::console::{format_field_table, format_plan_table};
use crate::trace::logger::TraceLogger;

// ============================================================================
// fill subcommand
// ============================================================================

pub fn cmd_fill(
    url: &str,
    profile_path: &str,
    oracle_name: &str,
    policy: &PassPolicy,
    logs_dir: Option<&str>,
    trace_path: Option<&str>,
    verbose: u8,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = load_profile(profile_path)?;
    let oracle = build_oracle(oracle_name, ollama_endpoint, ollama_model)?;
    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let mut session = BrowserSession::launch()?;
    session.navigate(url)?;

    if verbose > 0 {
        eprintln!(
            "Filling {} (max_passes={}, oracle={})...",
            url, policy.max_passes, oracle_name
        );
    }

    let outcome = run_fill(
        &mut session,
        oracle.as_ref(),
        &profile,
        policy,
        &tracer,
        logs_dir.map(Path::new),
    )?;
    session.quit()?;

    println!(
        "\nDone: {} passes, {} fields seen, {} filled, {} skipped, {} failed",
        outcome.passes_run,
        outcome.fields_seen,
        outcome.executed.len(),
        outcome.skipped,
        outcome.failed
    );
    if !outcome.flagged_for_human.is_empty() {
        println!("Needs manual review: {}", outcome.flagged_for_human.join(", "));
    }
    if !outcome.converged {
        println!("Stopped at pass budget; the form may have fields left open.");
    }

    Ok(())
}

// ============================================================================
// distill subcommand
// ============================================================================

pub fn cmd_distill(
    url: &str,
    fold: bool,
    output: Option<&str>,
    settle_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = BrowserSession::launch()?;
    session.navigate(url)?;

    let snapshot = take_snapshot(&mut session, fold, settle_ms)?;
    session.quit()?;

    println!("{}", format_field_table(&snapshot.fields));

    match output {
        Some(path) => {
            std::fs::write(path, &snapshot.serialized_tree)?;
            println!("Distilled HTML written to {}", path);
        }
        None => println!("{}", snapshot.serialized_tree),
    }

    Ok(())
}

// ============================================================================
// plan subcommand
// ============================================================================

pub fn cmd_plan(
    url: &str,
    profile_path: &str,
    oracle_name: &str,
    settle_ms: u64,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = load_profile(profile_path)?;
    let oracle = build_oracle(oracle_name, ollama_endpoint, ollama_model)?;

    let mut session = BrowserSession::launch()?;
    session.navigate(url)?;

    let snapshot = take_snapshot(&mut session, false, settle_ms)?;
    session.quit()?;

    println!("{}", format_field_table(&snapshot.fields));

    let plan = oracle.propose(&snapshot.serialized_tree, &profile, PlanMode::Initial)?;
    if !plan.page_analysis.is_empty() {
        println!("Page analysis: {}", plan.page_analysis);
    }
    println!("{}", format_plan_table(&plan.actions));

    Ok(())
}

// ============================================================================
// Shared helpers
// ============================================================================

fn take_snapshot(
    session: &mut BrowserSession,
    fold: bool,
    settle_ms: u64,
) -> Result<SemanticSnapshot, Box<dyn std::error::Error>> {
    session.settle(settle_ms)?;
    let mut tree = session.extract_tree()?;
    let mut ids = IdMint::new();
    let (snapshot, annotations) = distill(&mut tree, fold, &mut ids);
    for annotation in &annotations {
        session.annotate(annotation)?;
    }
    Ok(snapshot)
}

/// Build the requested oracle. Unknown names fall back to mock with a warning.
pub fn build_oracle(
    name: &str,
    ollama_endpoint: Option<&str>,
    ollama_model: Option<&str>,
) -> Result<Box<dyn PlanOracle>, Box<dyn std::error::Error>> {
    match name {
        "ollama" => {
            let default = OllamaOracle::default();
            let endpoint = ollama_endpoint.unwrap_or(&default.endpoint);
            let model = ollama_model.unwrap_or(&default.model);
            Ok(Box::new(OllamaOracle::new(endpoint, model)))
        }
        "mock" => Ok(Box::new(MockOracle)),
        other => {
            eprintln!("Unknown oracle '{}', using mock", other);
            Ok(Box::new(MockOracle))
        }
    }
}
