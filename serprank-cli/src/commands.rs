//! Command enum definitions
//!
//! This module contains the CLI command enum that defines the command structure.

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,

    /// Fetch search results for a query and index them
    #[command(
        alias = "ingest",
        long_about = r#"
Search for a query, sort the hits into videos and articles, and index them
into the configured document store.

WHAT HAPPENS:
  1. Result pages are requested from the search API until one comes back empty
  2. Hits with a video pagemap become videos, everything else an article
  3. Each hit is structured into a document with its rank and fetch time
  4. Documents are bulk indexed under ids built from query, category and rank

CREDENTIALS:
  • SERPAPI_KEY (or search_api.api_key) is always required
  • ELASTIC_API_KEY is required when the store URL points at a hosted cluster
  • ELASTIC_URL overrides the default local store URL

EXAMPLES:
  # Fetch three pages of results
  serprank query "rust async runtime" --pages 3

  # Check configuration only
  serprank query "rust" --validate-config

  # Fetch and classify without touching the store
  serprank query "rust" --dry-run

RELATED COMMANDS:
  • serprank prepare - Score stored results and export training data
  • serprank view - List stored results
"#
    )]
    Query(QueryArgs),

    /// Score stored results, write scores back and export training data
    #[command(
        long_about = r#"
Read every stored document, compute its relevance scores against a single
reference time, write the scores back to the store and export a training file.

SCORES:
  • base_rank_score - 1 / rank
  • recency_score - exp(-days_old / decay_days)
  • relevance_score - base_weight * base + recency_weight * recency
  • user_engagement_score - constant placeholder

Documents that cannot be scored (bad timestamp, non-positive rank) are skipped
and reported; the rest of the batch is still exported.

FORMATS:
  • structured (default) - one enriched document per line
  • prompt - {"input_text", "output_text"} pairs
  • conversation - user/model turns

EXAMPLES:
  # Default weights, structured export
  serprank prepare

  # Favor recent results and write prompt records
  serprank prepare --recency-weight 0.7 --base-weight 0.3 --format prompt

  # Score on the worker pool with a fixed reference time
  serprank prepare --parallel --reference 2024-06-01T00:00:00Z
"#
    )]
    Prepare(PrepareArgs),

    /// Convert a training file into prompt or conversation records
    #[command(
        long_about = r#"
Convert an exported JSONL file offline, without the store.

TARGETS:
  • prompt - reads structured records
  • conversation - reads structured or prompt records

Lines that are not valid JSON or lack the required fields are skipped and
reported with their line number.

EXAMPLES:
  serprank convert prompt
  serprank convert conversation --input output/vertex_ready.jsonl
"#
    )]
    Convert(ConvertArgs),

    /// Score a single result from its rank and timestamp
    Score(ScoreArgs),

    /// Check that stored documents carry score fields
    #[command(alias = "check")]
    Verify,

    /// List stored results
    #[command(alias = "list")]
    View(ViewArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}
