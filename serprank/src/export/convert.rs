//! Offline conversion of training files between formats
//!
//! Conversion is line-tolerant: a line that is not JSON, or that lacks the
//! fields the target needs, is recorded as skipped and the rest of the file
//! is still converted.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{ExportError, ExportResult};
use super::jsonl::ensure_parent_dir;
use super::records::{ConversationRecord, PromptRecord, missing_prompt_fields};
use crate::models::Document;

const PROGRESS_INTERVAL: usize = 100;

/// Format a training file can be converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// `{"input_text", "output_text"}` pairs; input must be structured records
    Prompt,
    /// `{"contents": [user, model]}`; input may be structured or prompt records
    Conversation,
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prompt => write!(f, "prompt"),
            Self::Conversation => write!(f, "conversation"),
        }
    }
}

impl FromStr for TargetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" | "vertex" => Ok(Self::Prompt),
            "conversation" | "gemini" => Ok(Self::Conversation),
            _ => Err(format!("Unknown target format: {}", s)),
        }
    }
}

/// A line left out of the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-indexed line number in the input
    pub line: usize,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of converting one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    /// Records written
    pub converted: usize,
    /// Lines left out
    pub skipped: Vec<SkippedLine>,
    /// Output file
    pub output: PathBuf,
    /// Output size in bytes
    pub bytes: u64,
}

impl ConversionReport {
    /// Whether every line converted
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Convert one input line into the target's JSON record
fn convert_line(line: &str, target: TargetFormat) -> Result<Value, String> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| format!("not valid JSON: {}", e))?;

    if target == TargetFormat::Conversation
        && let Some(prompt) = PromptRecord::from_json(&value)
    {
        return serde_json::to_value(ConversationRecord::from(prompt)).map_err(|e| e.to_string());
    }

    let document = Document::from_value(value).ok_or_else(|| "not a JSON object".to_string())?;
    let missing = missing_prompt_fields(&document);
    if !missing.is_empty() {
        return Err(format!("missing fields: {}", missing.join(", ")));
    }

    let prompt = PromptRecord::from_document_lenient(&document);
    let record = match target {
        TargetFormat::Prompt => serde_json::to_value(prompt),
        TargetFormat::Conversation => serde_json::to_value(ConversationRecord::from(prompt)),
    };
    record.map_err(|e| e.to_string())
}

/// Convert `input` into `target` format, writing `output`
///
/// Empty lines are ignored without being counted as skipped.
pub fn convert_file(input: &Path, output: &Path, target: TargetFormat) -> ExportResult<ConversionReport> {
    if !input.exists() {
        return Err(ExportError::InputNotFound(input.to_path_buf()));
    }
    info!(input = %input.display(), output = %output.display(), %target, "Converting training file");

    let reader = BufReader::new(File::open(input).map_err(|e| ExportError::io(input, e))?);
    ensure_parent_dir(output)?;
    let mut writer = BufWriter::new(File::create(output).map_err(|e| ExportError::io(output, e))?);

    let mut converted = 0;
    let mut skipped = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(|e| ExportError::io(input, e))?;
        if line.trim().is_empty() {
            continue;
        }

        match convert_line(&line, target) {
            Ok(record) => {
                serde_json::to_writer(&mut writer, &record)?;
                writer
                    .write_all(b"\n")
                    .map_err(|e| ExportError::io(output, e))?;
                converted += 1;
                if converted % PROGRESS_INTERVAL == 0 {
                    debug!(converted, "Conversion progress");
                }
            }
            Err(reason) => {
                warn!(line = line_number, %reason, "Skipping line");
                skipped.push(SkippedLine {
                    line: line_number,
                    reason,
                });
            }
        }
    }
    writer.flush().map_err(|e| ExportError::io(output, e))?;
    drop(writer);

    let bytes = fs::metadata(output)
        .map_err(|e| ExportError::io(output, e))?
        .len();
    info!(converted, skipped = skipped.len(), bytes, "Conversion complete");

    Ok(ConversionReport {
        converted,
        skipped,
        output: output.to_path_buf(),
        bytes,
    })
}
