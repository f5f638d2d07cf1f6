use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use serde_json::{Value, json};
use serprank::SerprankError;
use serprank::batch::FailureReason;
use serprank::export::ConversionReport;
use serprank::models::{Category, Document, ScoreFields};
use serprank::pipeline::{
    FieldCheck, IngestSummary, PipelineError, PrepareSummary, VerifyReport, ViewSummary,
};

use crate::utils::truncate;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn video() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }

    pub fn article() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn primary() -> Color {
        Color::White
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }
}

pub fn output_error(error_msg: &str, output_format: &str) {
    if output_format == "json" {
        let error_response = json!({
            "error": true,
            "message": error_msg,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        tracing::error!("{}", error_msg);
    }
}

/// Stable code for an error, used in JSON error output
pub fn error_code(error: &SerprankError) -> &'static str {
    match error {
        SerprankError::Scoring(_) => "SCORING_ERROR",
        SerprankError::Batch(_) => "NO_DOCUMENTS_SCORED",
        SerprankError::Configuration(serprank::config::ConfigError::MissingCredentials(_)) => {
            "MISSING_CREDENTIALS"
        }
        SerprankError::Configuration(_) => "CONFIGURATION_ERROR",
        SerprankError::Logging(_) => "LOGGING_ERROR",
        SerprankError::SearchApi(_) => "SEARCH_API_ERROR",
        SerprankError::Store(_) => "STORE_ERROR",
        SerprankError::Export(_) => "EXPORT_ERROR",
        SerprankError::Pipeline(PipelineError::StoreUnavailable) => "STORE_UNAVAILABLE",
        SerprankError::Pipeline(PipelineError::IndexMissing(_)) => "INDEX_MISSING",
        SerprankError::Pipeline(PipelineError::NoDocuments) => "NO_DOCUMENTS",
        SerprankError::Pipeline(PipelineError::Store(_)) => "STORE_ERROR",
        SerprankError::Pipeline(PipelineError::Search(_)) => "SEARCH_API_ERROR",
        SerprankError::Pipeline(PipelineError::Batch(_)) => "NO_DOCUMENTS_SCORED",
        SerprankError::Pipeline(PipelineError::Export(_)) => "EXPORT_ERROR",
        SerprankError::Other(_) => "OTHER_ERROR",
    }
}

/// Output a SerprankError in structured JSON format
pub fn output_error_json(error: &SerprankError, output_format: &str) {
    if output_format == "json" {
        let mut error_response = json!({
            "error": true,
            "code": error_code(error),
            "message": error.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        let details = match error {
            SerprankError::Configuration(serprank::config::ConfigError::MissingCredentials(
                vars,
            )) => Some(json!({
                "missing": vars,
                "hint": "Set the variables in the environment or a .env file"
            })),
            SerprankError::Pipeline(PipelineError::IndexMissing(index)) => Some(json!({
                "index": index,
                "hint": "Run 'serprank query <q>' to create and fill the index"
            })),
            _ => None,
        };
        if let Some(details) = details {
            error_response["details"] = details;
        }

        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}", format_error(&error.to_string()));
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_category(category: &str) -> ColoredString {
    match category.parse::<Category>() {
        Ok(Category::Video) => "video".color(CliColors::video()),
        Ok(Category::Article) => "article".color(CliColors::article()),
        Err(_) => category.color(CliColors::muted()),
    }
}

/// Color a score by how close it is to the top result
pub fn format_score(score: f64) -> ColoredString {
    let text = format!("{:.6}", score);
    if score >= 0.75 {
        text.color(CliColors::success()).bold()
    } else if score >= 0.4 {
        text.color(CliColors::warning())
    } else {
        text.color(CliColors::muted())
    }
}

/// Spinner for long-running steps; only shown on an interactive table output
pub fn spinner(message: &str, output_format: &str) -> Option<ProgressBar> {
    if output_format == "json" || !std::io::stdout().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

pub fn finish_spinner(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}

fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{}: {}", label.color(CliColors::muted()), value);
}

pub fn print_ingest_summary(summary: &IngestSummary) {
    println!(
        "{}",
        "━━━ Ingest Summary ━━━".color(CliColors::accent()).bold()
    );
    print_field("Query", summary.query.color(CliColors::primary()).bold());
    print_field("Videos", summary.videos.to_string().color(CliColors::video()));
    print_field(
        "Articles",
        summary.articles.to_string().color(CliColors::article()),
    );
    print_field("Indexed", summary.indexed);

    if summary.all_indexed() {
        println!(
            "{}",
            format_success(&format!("Indexed {} documents", summary.indexed))
        );
    } else {
        println!(
            "{}",
            format_warning(&format!(
                "{} of {} documents were rejected",
                summary.failed,
                summary.total()
            ))
        );
        for error in &summary.errors {
            println!("  {} {}", "•".color(CliColors::muted()), error);
        }
    }
}

pub fn print_score_fields(scores: &ScoreFields) {
    print_field("Base rank score", format_score(scores.base_rank_score));
    print_field("Recency score", format_score(scores.recency_score));
    print_field("Relevance score", format_score(scores.relevance_score));
    print_field(
        "Engagement score",
        format!("{:.6}", scores.user_engagement_score).color(CliColors::muted()),
    );
}

pub fn print_failures(failures: &[FailureReason]) {
    if failures.is_empty() {
        return;
    }
    println!(
        "{}",
        format_warning(&format!("{} documents could not be scored:", failures.len()))
    );
    for failure in failures {
        println!(
            "  {} #{:<5} {:<20} {}",
            "•".color(CliColors::muted()),
            failure.index,
            failure.code.color(CliColors::warning()),
            failure.reason
        );
    }
}

pub fn print_prepare_summary(summary: &PrepareSummary) {
    println!(
        "{}",
        "━━━ Training Data ━━━".color(CliColors::accent()).bold()
    );
    print_field("Fetched", summary.fetched);
    print_field("Scored", summary.scored.to_string().color(CliColors::success()));
    print_field("Updated", summary.updated);
    if summary.update_failures > 0 {
        print_field(
            "Update failures",
            summary.update_failures.to_string().color(CliColors::error()),
        );
    }
    print_field("Format", &summary.format);
    print_field(
        "Output",
        summary.output.display().to_string().color(CliColors::accent()),
    );

    if let Some(sample) = &summary.sample {
        println!();
        println!("{}", "Sample scores".color(CliColors::muted()).bold());
        print_score_fields(sample);
    }

    println!();
    print_failures(&summary.skipped);
    println!(
        "{}",
        format_success(&format!("Exported {} records", summary.exported))
    );
}

pub fn print_conversion_report(report: &ConversionReport) {
    if report.is_clean() {
        println!(
            "{}",
            format_success(&format!(
                "Converted {} records to {} ({} bytes)",
                report.converted,
                report.output.display(),
                report.bytes
            ))
        );
        return;
    }

    println!(
        "{}",
        format_warning(&format!(
            "Converted {} records to {}, skipped {} lines",
            report.converted,
            report.output.display(),
            report.skipped.len()
        ))
    );
    for skipped in &report.skipped {
        println!(
            "  {} line {}: {}",
            "•".color(CliColors::muted()),
            skipped.line,
            skipped.reason
        );
    }
}

fn print_check(check: &FieldCheck) {
    match &check.value {
        Some(value) => println!(
            "  {} {}: {}",
            "✓".color(CliColors::success()),
            check.field,
            render_value(value)
        ),
        None => println!(
            "  {} {}: {}",
            "✗".color(CliColors::error()),
            check.field,
            "missing".color(CliColors::error())
        ),
    }
}

pub fn print_verify_report(report: &VerifyReport) {
    println!(
        "{}",
        "━━━ Score Verification ━━━".color(CliColors::accent()).bold()
    );
    print_field("Documents", report.total);
    if let Some(id) = &report.sample_id {
        print_field("Sample", id.color(CliColors::accent()));
    }

    println!();
    println!("{}", "Required fields".color(CliColors::muted()).bold());
    report.required.iter().for_each(print_check);
    println!("{}", "Score fields".color(CliColors::muted()).bold());
    report.scores.iter().for_each(print_check);
    println!();

    if report.has_scores() {
        println!("{}", format_success("Stored documents carry relevance scores"));
    } else {
        println!(
            "{}",
            format_warning("Scores are missing; run 'serprank prepare' first")
        );
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_f64()
            .filter(|_| !n.is_i64() && !n.is_u64())
            .map_or_else(|| n.to_string(), |f| format!("{:.6}", f)),
        other => other.to_string(),
    }
}

pub fn print_document(document: &Document) {
    println!(
        "{}",
        format!("━━━ {} ━━━", document.id().unwrap_or("document"))
            .color(CliColors::accent())
            .bold()
    );
    for (key, value) in document.as_map() {
        if key == "_id" {
            continue;
        }
        print_field(key, render_value(value));
    }
}

pub fn print_view_summary(summary: &ViewSummary) {
    if summary.documents.is_empty() {
        println!("{}", format_info("No results found."));
        return;
    }

    let breakdown = summary
        .categories
        .iter()
        .map(|(category, count)| format!("{} {}", count, category))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}",
        format_info(&format!(
            "Found {} results ({}):",
            summary.documents.len(),
            breakdown
        ))
    );
    println!();

    println!(
        "{:<5} {:<8} {:<10} {:<50} {}",
        "Rank".color(CliColors::muted()).bold(),
        "Type".color(CliColors::muted()).bold(),
        "Relevance".color(CliColors::muted()).bold(),
        "Title".color(CliColors::muted()).bold(),
        "Link".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(100).color(CliColors::muted()));

    for document in &summary.documents {
        let rank = document
            .get("rank")
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let relevance = document
            .get_f64("relevance_score")
            .map(format_score)
            .unwrap_or_else(|| "-".color(CliColors::muted()));
        println!(
            "{:<5} {:<8} {:<10} {:<50} {}",
            rank,
            format_category(document.get_str("category").unwrap_or("?")),
            relevance,
            truncate(document.get_str("title").unwrap_or(""), 50),
            document
                .get_str("link")
                .unwrap_or("")
                .color(CliColors::muted())
        );
    }
}
