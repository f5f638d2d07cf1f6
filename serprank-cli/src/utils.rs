use std::path::PathBuf;

use chrono::NaiveDateTime;
use serprank::SerprankError;
use serprank::config::{ExportConfig, LogLevel};
use serprank::export::{ExportFormat, TargetFormat};
use serprank::models::Category;
use serprank::scoring::{ScoringConfig, parse_timestamp};

use crate::args::Shell;

/// Environment variable overriding `--output`
pub const OUTPUT_ENV: &str = "SERPRANK_OUTPUT";

/// Environment variable forcing quiet mode
pub const QUIET_ENV: &str = "SERPRANK_QUIET";

/// Resolve the output format; priority: machine flag > env var > cli arg
pub fn resolve_output_format(machine: bool, cli_output: &str) -> String {
    if machine {
        "json".to_string()
    } else if let Ok(env_output) = std::env::var(OUTPUT_ENV) {
        env_output
    } else {
        cli_output.to_string()
    }
}

pub fn is_quiet(quiet_flag: bool) -> bool {
    quiet_flag
        || std::env::var(QUIET_ENV)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false)
}

/// Log level for a run; machine mode implies quiet for clean JSON output
pub fn cli_log_level(quiet: bool, machine: bool, verbose: bool, configured: LogLevel) -> LogLevel {
    if quiet || machine {
        LogLevel::Error
    } else if verbose {
        LogLevel::Debug
    } else {
        configured
    }
}

pub fn parse_export_format(format_str: &str) -> serprank::Result<ExportFormat> {
    format_str.parse().map_err(SerprankError::Other)
}

pub fn parse_target_format(target_str: &str) -> serprank::Result<TargetFormat> {
    target_str.parse().map_err(SerprankError::Other)
}

pub fn parse_category(category_str: &str) -> serprank::Result<Category> {
    category_str.parse().map_err(SerprankError::Other)
}

pub fn parse_reference_time(reference: Option<&str>) -> serprank::Result<Option<NaiveDateTime>> {
    reference
        .map(parse_timestamp)
        .transpose()
        .map_err(SerprankError::from)
}

/// Apply command-line weight overrides on top of the configured weights
pub fn scoring_overrides(
    mut config: ScoringConfig,
    base_weight: Option<f64>,
    recency_weight: Option<f64>,
    decay_days: Option<f64>,
) -> ScoringConfig {
    if let Some(weight) = base_weight {
        config.base_weight = weight;
    }
    if let Some(weight) = recency_weight {
        config.recency_weight = weight;
    }
    if let Some(days) = decay_days {
        config.decay_days = days;
    }
    config
}

/// Configured file for a training export format
pub fn export_path(config: &ExportConfig, format: ExportFormat) -> PathBuf {
    match format {
        ExportFormat::Structured => config.training_path(),
        ExportFormat::Prompt => config.prompt_path(),
        ExportFormat::Conversation => config.conversation_path(),
    }
}

/// Default input for a conversion
///
/// Conversation records are built from the prompt file when one exists,
/// otherwise straight from the structured training file.
pub fn conversion_input(config: &ExportConfig, target: TargetFormat) -> PathBuf {
    match target {
        TargetFormat::Prompt => config.training_path(),
        TargetFormat::Conversation => {
            let prompt = config.prompt_path();
            if prompt.exists() {
                prompt
            } else {
                config.training_path()
            }
        }
    }
}

/// Default output for a conversion
pub fn conversion_output(config: &ExportConfig, target: TargetFormat) -> PathBuf {
    match target {
        TargetFormat::Prompt => config.prompt_path(),
        TargetFormat::Conversation => config.conversation_path(),
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Écrire du Rust efficace", 10), "Écrire ...");
    }

    #[test]
    fn test_cli_log_level() {
        assert_eq!(cli_log_level(true, false, true, LogLevel::Info), LogLevel::Error);
        assert_eq!(cli_log_level(false, true, false, LogLevel::Info), LogLevel::Error);
        assert_eq!(cli_log_level(false, false, true, LogLevel::Info), LogLevel::Debug);
        assert_eq!(cli_log_level(false, false, false, LogLevel::Warn), LogLevel::Warn);
    }

    #[test]
    fn test_scoring_overrides_keep_unset_values() {
        let config = scoring_overrides(ScoringConfig::default(), None, Some(0.7), None);
        assert_eq!(config.base_weight, 0.6);
        assert_eq!(config.recency_weight, 0.7);
        assert_eq!(config.decay_days, 30.0);
    }

    #[test]
    fn test_conversion_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().to_path_buf(),
            ..ExportConfig::default()
        };

        assert_eq!(
            conversion_input(&config, TargetFormat::Conversation),
            config.training_path()
        );
        std::fs::write(config.prompt_path(), "").unwrap();
        assert_eq!(
            conversion_input(&config, TargetFormat::Conversation),
            config.prompt_path()
        );
        assert_eq!(
            conversion_output(&config, TargetFormat::Prompt),
            dir.path().join("vertex_ready.jsonl")
        );
        assert_eq!(
            export_path(&config, ExportFormat::Conversation),
            dir.path().join("gemini_ready.jsonl")
        );
    }

    #[test]
    fn test_parse_helpers_reject_unknown_values() {
        assert!(parse_export_format("xml").is_err());
        assert!(parse_target_format("prompt").is_ok());
        assert!(matches!(parse_category("videos"), Ok(Category::Video)));
        assert!(parse_reference_time(Some("yesterday")).is_err());
        assert_eq!(parse_reference_time(None).unwrap(), None);
    }
}
