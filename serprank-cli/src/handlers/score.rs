//! Single result scoring handler

use serde_json::json;
use serprank::models::Document;
use serprank::scoring::{RelevanceScorer, now_reference};

use crate::args::ScoreArgs;
use crate::context::CliContext;
use crate::output::*;
use crate::utils::*;

pub async fn handle_score_command(
    args: ScoreArgs,
    ctx: &CliContext,
    output_format: &str,
) -> serprank::Result<()> {
    let scoring = scoring_overrides(
        ctx.config.scoring.clone(),
        args.base_weight,
        args.recency_weight,
        args.decay_days,
    );
    let scorer = RelevanceScorer::new(scoring)?;
    let reference = parse_reference_time(args.reference.as_deref())?.unwrap_or_else(now_reference);

    let document = Document::new()
        .with("rank", args.rank)
        .with("timestamp", args.timestamp.as_str());
    let scores = scorer.score_document(&document, Some(reference))?;

    if output_format == "json" {
        print_json(&json!({
            "rank": args.rank,
            "timestamp": args.timestamp,
            "reference_time": reference.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "scores": scores,
        }));
    } else {
        println!(
            "{}",
            format_info(&format!(
                "Rank {} published {} (reference {})",
                args.rank,
                args.timestamp,
                reference.format("%Y-%m-%d %H:%M:%S")
            ))
        );
        print_score_fields(&scores);
    }

    Ok(())
}
