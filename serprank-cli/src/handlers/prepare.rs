//! Training data preparation handler

use serprank::pipeline::PreparePipeline;
use serprank::scoring::RelevanceScorer;

use crate::args::PrepareArgs;
use crate::context::CliContext;
use crate::output::*;
use crate::utils::*;

pub async fn handle_prepare_command(
    args: PrepareArgs,
    ctx: &CliContext,
    output_format: &str,
) -> serprank::Result<()> {
    let format = parse_export_format(&args.format)?;
    let reference = parse_reference_time(args.reference.as_deref())?;
    let scoring = scoring_overrides(
        ctx.config.scoring.clone(),
        args.base_weight,
        args.recency_weight,
        args.decay_days,
    );
    let scorer = RelevanceScorer::new(scoring)?;
    let output = args
        .output
        .unwrap_or_else(|| export_path(&ctx.config.export, format));

    let mut pipeline = PreparePipeline::new(scorer, output)
        .with_format(format)
        .parallel(args.parallel);
    if let Some(reference) = reference {
        pipeline = pipeline.with_reference_time(reference);
    }

    let pb = spinner("Scoring stored results...", output_format);
    let result = pipeline.run(&*ctx.store).await;
    finish_spinner(pb);
    let summary = result?;

    if output_format == "json" {
        print_json(&summary);
    } else {
        print_prepare_summary(&summary);
    }

    Ok(())
}
