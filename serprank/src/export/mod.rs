//! Training data export
//!
//! Enriched documents become JSON-Lines training files in one of three
//! shapes, and existing files can be converted between them offline.

pub mod convert;
pub mod errors;
pub mod format;
pub mod jsonl;
pub mod records;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use convert::{ConversionReport, SkippedLine, TargetFormat, convert_file};
pub use errors::{ExportError, ExportResult};
pub use format::{format_float, render_value};
pub use jsonl::{SpacedFormatter, read_jsonl, to_jsonl_line, write_jsonl};
pub use records::{
    ConversationRecord, PROMPT_FIELDS, PromptRecord, Role, Turn, missing_prompt_fields,
    structured_record,
};

/// Shape of an exported training file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Enriched documents as stored, minus the store id
    #[default]
    Structured,
    /// Prompt/response pairs
    Prompt,
    /// User/model conversations
    Conversation,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Prompt => write!(f, "prompt"),
            Self::Conversation => write!(f, "conversation"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structured" => Ok(Self::Structured),
            "prompt" | "vertex" => Ok(Self::Prompt),
            "conversation" | "gemini" => Ok(Self::Conversation),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}
