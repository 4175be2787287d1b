use clap::Parser;
use form_autopilot::cli::commands::{cmd_distill, cmd_fill, cmd_plan};
use form_autopilot::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve Ollama settings: CLI > config > defaults
    let ollama_endpoint = cli
        .ollama_endpoint
        .as_deref()
        .or(config.ollama.endpoint.as_deref());
    let ollama_model = cli
        .ollama_model
        .as_deref()
        .or(config.ollama.model.as_deref());

    match cli.command {
        Commands::Fill {
            url,
            profile,
            oracle,
            max_passes,
            logs_dir,
            trace,
        } => {
            let policy = config.fill.to_policy(max_passes);
            let logs_dir = logs_dir.or(config.fill.logs_dir.clone());
            cmd_fill(
                &url,
                &profile,
                &oracle,
                &policy,
                logs_dir.as_deref(),
                trace.as_deref(),
                cli.verbose,
                ollama_endpoint,
                ollama_model,
            )?;
        }
        Commands::Distill { url, fold, output } => {
            cmd_distill(&url, fold, output.as_deref(), config.fill.settle_ms)?;
        }
        Commands::Plan {
            url,
            profile,
            oracle,
        } => {
            cmd_plan(
                &url,
                &profile,
                &oracle,
                config.fill.settle_ms,
                ollama_endpoint,
                ollama_model,
            )?;
        }
    }

    Ok(())
}
