//! Query ingestion handler

use serde_json::json;
use serprank::config::{validate_config, validate_credentials};
use serprank::pipeline::process_query;
use serprank::store::InMemoryStore;

use crate::args::QueryArgs;
use crate::context::CliContext;
use crate::output::*;

pub async fn handle_query_command(
    args: QueryArgs,
    ctx: &CliContext,
    output_format: &str,
) -> serprank::Result<()> {
    validate_config(&ctx.config)?;

    if args.validate_config {
        validate_credentials(&ctx.config)?;
        if output_format == "json" {
            print_json(&json!({
                "valid": true,
                "search_endpoint": ctx.config.search_api.endpoint,
                "store_url": ctx.config.store.url,
                "index": ctx.config.store.index,
                "cloud": ctx.config.store.is_cloud_deployment(),
            }));
        } else {
            println!("{}", format_success("Configuration is valid"));
        }
        return Ok(());
    }

    // A dry run never touches the store, so only the search key matters
    if !args.dry_run {
        validate_credentials(&ctx.config)?;
    }

    let pages = args.pages.unwrap_or(ctx.config.search_api.max_pages);
    let per_page = args
        .per_page
        .unwrap_or(ctx.config.search_api.results_per_page);
    let fetcher = ctx.fetcher()?;

    let pb = spinner(&format!("Searching for '{}'...", args.query), output_format);
    let result = if args.dry_run {
        let store = InMemoryStore::new();
        process_query(&*fetcher, &store, &args.query, pages, per_page).await
    } else {
        process_query(&*fetcher, &*ctx.store, &args.query, pages, per_page).await
    };
    finish_spinner(pb);
    let summary = result?;

    if output_format == "json" {
        print_json(&json!({
            "dry_run": args.dry_run,
            "summary": summary,
        }));
    } else {
        print_ingest_summary(&summary);
        if args.dry_run {
            println!(
                "{}",
                format_info("Dry run: documents were not written to the store")
            );
        }
    }

    Ok(())
}
