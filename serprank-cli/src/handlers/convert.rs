//! Offline training file conversion handler

use serprank::export::convert_file;

use crate::args::ConvertArgs;
use crate::context::CliContext;
use crate::output::*;
use crate::utils::*;

pub async fn handle_convert_command(
    args: ConvertArgs,
    ctx: &CliContext,
    output_format: &str,
) -> serprank::Result<()> {
    let target = parse_target_format(&args.target)?;
    let input = args
        .input
        .unwrap_or_else(|| conversion_input(&ctx.config.export, target));
    let output = args
        .output
        .unwrap_or_else(|| conversion_output(&ctx.config.export, target));

    tracing::debug!("Converting {} to {} records", input.display(), target);
    let report = convert_file(&input, &output, target)?;

    if output_format == "json" {
        print_json(&report);
    } else {
        print_conversion_report(&report);
    }

    Ok(())
}
