use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use serprank_cli::commands::Commands;
use serprank_cli::context::CliContext;
use serprank_cli::handlers::*;
use serprank_cli::output::output_error_json;
use serprank_cli::utils::{cli_log_level, is_quiet, resolve_output_format};

#[derive(Parser)]
#[command(name = "serprank")]
#[command(about = "Search result relevance scoring CLI", long_about = None)]
#[command(version = serprank::VERSION)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, default_value = "table", global = true)]
    output_format: String,

    /// Use machine-readable output (alias for --output-format json)
    #[arg(long, global = true)]
    machine: bool,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();
    let output_format = resolve_output_format(cli_args.machine, &cli_args.output_format);

    if let Err(e) = run(cli_args, &output_format).await {
        output_error_json(&e, &output_format);
        std::process::exit(1);
    }
}

async fn run(cli_args: Cli, output_format: &str) -> serprank::Result<()> {
    // Commands that need neither configuration nor a store
    match &cli_args.command {
        Commands::Version => {
            println!("serprank v{}", serprank::VERSION);
            return Ok(());
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            clap_complete::generate(
                clap_complete::Shell::from(args.shell),
                &mut command,
                "serprank",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        _ => {}
    }

    let mut ctx = CliContext::load(cli_args.config.as_deref())?;

    let logging = &mut ctx.config.logging;
    logging.level = cli_log_level(
        is_quiet(cli_args.quiet),
        cli_args.machine,
        cli_args.verbose,
        logging.level,
    );
    // Keep stdout clean for JSON consumers
    if output_format == "json" {
        logging.stdout = false;
    }
    let _guard = serprank::logging::init(logging)?;

    match cli_args.command {
        Commands::Query(args) => handle_query_command(args, &ctx, output_format).await,
        Commands::Prepare(args) => handle_prepare_command(args, &ctx, output_format).await,
        Commands::Convert(args) => handle_convert_command(args, &ctx, output_format).await,
        Commands::Score(args) => handle_score_command(args, &ctx, output_format).await,
        Commands::Verify => handle_verify_command(&ctx, output_format).await,
        Commands::View(args) => handle_view_command(args, &ctx, output_format).await,
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}
