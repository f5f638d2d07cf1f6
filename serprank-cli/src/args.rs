//! Command argument structures
//!
//! This module contains all CLI argument structs organized by command.

use std::path::PathBuf;

use clap::Args;

// Ingestion arguments
#[derive(Args)]
pub struct QueryArgs {
    /// Search query to fetch and index
    pub query: String,

    /// Number of result pages to fetch (defaults to search_api.max_pages)
    #[arg(short, long)]
    pub pages: Option<usize>,

    /// Results requested per page (defaults to search_api.results_per_page)
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Check configuration and credentials, then exit without searching
    #[arg(long)]
    pub validate_config: bool,

    /// Index into a throwaway in-memory store instead of the configured one
    #[arg(long)]
    pub dry_run: bool,
}

// Training data arguments
#[derive(Args)]
pub struct PrepareArgs {
    /// Training file to write (defaults to the configured export path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Training file format (structured, prompt, conversation)
    #[arg(short, long, default_value = "structured")]
    pub format: String,

    /// Weight of the inverse-rank score
    #[arg(long)]
    pub base_weight: Option<f64>,

    /// Weight of the recency score
    #[arg(long)]
    pub recency_weight: Option<f64>,

    /// Days for the recency score to decay by a factor of e
    #[arg(long)]
    pub decay_days: Option<f64>,

    /// Score documents on the worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Reference time for recency (ISO 8601, defaults to now)
    #[arg(long)]
    pub reference: Option<String>,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Target format (prompt, conversation)
    pub target: String,

    /// Input JSONL file (defaults to the configured training or prompt file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSONL file (defaults to the configured export path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// Scoring arguments
#[derive(Args)]
pub struct ScoreArgs {
    /// Position in the result list (1 is the top result)
    #[arg(short, long)]
    pub rank: i64,

    /// Publication or fetch time (ISO 8601)
    #[arg(short, long)]
    pub timestamp: String,

    /// Reference time for recency (ISO 8601, defaults to now)
    #[arg(long)]
    pub reference: Option<String>,

    /// Weight of the inverse-rank score
    #[arg(long)]
    pub base_weight: Option<f64>,

    /// Weight of the recency score
    #[arg(long)]
    pub recency_weight: Option<f64>,

    /// Days for the recency score to decay by a factor of e
    #[arg(long)]
    pub decay_days: Option<f64>,
}

// Inspection arguments
#[derive(Args)]
pub struct ViewArgs {
    /// Only show results matching this query text
    #[arg(long)]
    pub query: Option<String>,

    /// Only show one category (video, article)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 10)]
    pub size: usize,

    /// Show every stored field of each result
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
