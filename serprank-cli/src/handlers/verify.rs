//! Score verification handler

use serprank::pipeline::verify_scores;

use crate::context::CliContext;
use crate::output::*;

pub async fn handle_verify_command(ctx: &CliContext, output_format: &str) -> serprank::Result<()> {
    let report = verify_scores(&*ctx.store).await?;

    if output_format == "json" {
        print_json(&report);
    } else {
        print_verify_report(&report);
    }

    Ok(())
}
