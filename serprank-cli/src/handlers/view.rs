//! Stored result listing handler

use serprank::pipeline::view_results;

use crate::args::ViewArgs;
use crate::context::CliContext;
use crate::output::*;
use crate::utils::parse_category;

pub async fn handle_view_command(
    args: ViewArgs,
    ctx: &CliContext,
    output_format: &str,
) -> serprank::Result<()> {
    let category = args.category.as_deref().map(parse_category).transpose()?;
    let summary = view_results(&*ctx.store, args.query.as_deref(), category, args.size).await?;

    if output_format == "json" {
        print_json(&summary);
    } else if args.full {
        for document in &summary.documents {
            print_document(document);
            println!();
        }
    } else {
        print_view_summary(&summary);
    }

    Ok(())
}
