use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::pilot::runner::PassPolicy;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autopilot",
    version,
    about = "LLM-guided web form autofill engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ollama API endpoint
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: form-autopilot.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill a form end to end via the multi-pass reconciliation loop
    Fill {
        /// URL of the form page
        #[arg(long)]
        url: String,

        /// Path to the user profile JSON file
        #[arg(long, default_value = "profile.json")]
        profile: String,

        /// Plan oracle: mock or ollama
        #[arg(long, default_value = "ollama")]
        oracle: String,

        /// Maximum reconciliation passes
        #[arg(long)]
        max_passes: Option<u32>,

        /// Directory for per-pass distilled HTML dumps
        #[arg(long)]
        logs_dir: Option<String>,

        /// Path for the JSONL trace file (omit to disable tracing)
        #[arg(long)]
        trace: Option<String>,
    },

    /// Extract and print the distilled snapshot of a page, without planning
    Distill {
        /// URL of the form page
        #[arg(long)]
        url: String,

        /// Collapse already-filled fields
        #[arg(long, default_value_t = false)]
        fold: bool,

        /// Write the distilled HTML here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Snapshot a page and print the oracle's proposed plan, without executing
    Plan {
        /// URL of the form page
        #[arg(long)]
        url: String,

        /// Path to the user profile JSON file
        #[arg(long, default_value = "profile.json")]
        profile: String,

        /// Plan oracle: mock or ollama
        #[arg(long, default_value = "ollama")]
        oracle: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autopilot.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default = "default_three")]
    pub max_passes: u32,

    #[serde(default = "default_two")]
    pub fold_from_pass: u32,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    #[serde(default = "default_pace")]
    pub pace_ms: u64,

    pub logs_dir: Option<String>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_passes: 3,
            fold_from_pass: 2,
            settle_ms: 2000,
            pace_ms: 500,
            logs_dir: None,
        }
    }
}

impl FillConfig {
    pub fn to_policy(&self, max_passes_override: Option<u32>) -> PassPolicy {
        PassPolicy {
            max_passes: max_passes_override.unwrap_or(self.max_passes),
            fold_from_pass: self.fold_from_pass,
            settle_ms: self.settle_ms,
            pace_ms: self.pace_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

// Serde default helpers
fn default_three() -> u32 { 3 }
fn default_two() -> u32 { 2 }
fn default_settle() -> u64 { 2000 }
fn default_pace() -> u64 { 500 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-autopilot.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
