pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;
pub mod utils;

pub use context::CliContext;
pub use output::{
    CliColors, error_code, format_category, format_error, format_info, format_score,
    format_success, format_warning, output_error, output_error_json, print_json,
};
pub use utils::{
    cli_log_level, conversion_input, conversion_output, export_path, is_quiet,
    parse_category, parse_export_format, parse_reference_time, parse_target_format,
    resolve_output_format, scoring_overrides,
};
