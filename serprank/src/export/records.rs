//! Training record formats
//!
//! Three shapes are produced from an enriched document:
//! - the structured record (the document itself, minus its store id)
//! - a prompt/response pair ([`PromptRecord`])
//! - a two-turn conversation ([`ConversationRecord`])

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ExportError, ExportResult};
use super::format::render_value;
use crate::models::{Document, fields};

/// Fields a document needs to become a prompt record
pub const PROMPT_FIELDS: &[&str] = &[
    fields::QUERY,
    fields::CATEGORY,
    fields::TITLE,
    fields::RANK,
    fields::RECENCY_SCORE,
    fields::USER_ENGAGEMENT_SCORE,
    fields::RELEVANCE_SCORE,
];

/// Instruction closing every prompt
pub const PROMPT_INSTRUCTION: &str = "Predict a relevance score between 0 and 1.";

const MISSING_TEXT: &str = "N/A";
const MISSING_SCORE: &str = "0.0";

/// Prompt/response training pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Prompt describing the result
    pub input_text: String,
    /// Target relevance score as text
    pub output_text: String,
}

impl PromptRecord {
    /// Build a prompt record, failing if any prompt field is absent
    pub fn from_document(document: &Document) -> ExportResult<Self> {
        let missing = missing_prompt_fields(document);
        if !missing.is_empty() {
            return Err(ExportError::MissingFields(missing));
        }
        Ok(Self::from_document_lenient(document))
    }

    /// Build a prompt record, printing `N/A` for absent fields and `0.0` for an
    /// absent relevance score
    pub fn from_document_lenient(document: &Document) -> Self {
        let text = |key: &str| {
            document
                .get(key)
                .map(render_value)
                .unwrap_or_else(|| MISSING_TEXT.to_string())
        };

        let input_text = format!(
            "query: {}\ncategory: {}\ntitle: {}\nrank: {}\nrecency_score: {}\nuser_engagement_score: {}\n\n{}",
            text(fields::QUERY),
            text(fields::CATEGORY),
            text(fields::TITLE),
            text(fields::RANK),
            text(fields::RECENCY_SCORE),
            text(fields::USER_ENGAGEMENT_SCORE),
            PROMPT_INSTRUCTION,
        );
        let output_text = document
            .get(fields::RELEVANCE_SCORE)
            .map(render_value)
            .unwrap_or_else(|| MISSING_SCORE.to_string());

        Self {
            input_text,
            output_text,
        }
    }

    /// Read a prompt record out of a JSON object carrying `input_text` and
    /// `output_text`
    pub fn from_json(value: &Value) -> Option<Self> {
        let input_text = value.get("input_text")?;
        let output_text = value.get("output_text")?;
        Some(Self {
            input_text: render_value(input_text),
            output_text: render_value(output_text),
        })
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Prompt side
    User,
    /// Response side
    Model,
}

/// Text fragment of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Fragment text
    pub text: String,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who is speaking
    pub role: Role,
    /// Turn content
    pub parts: Vec<Part>,
}

impl Turn {
    fn text(role: Role, text: String) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

/// Conversational training example: a user prompt and the model's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// User turn followed by model turn
    pub contents: Vec<Turn>,
}

impl From<PromptRecord> for ConversationRecord {
    fn from(record: PromptRecord) -> Self {
        Self {
            contents: vec![
                Turn::text(Role::User, record.input_text),
                Turn::text(Role::Model, record.output_text),
            ],
        }
    }
}

impl ConversationRecord {
    /// Build a conversation from an enriched document (strict)
    pub fn from_document(document: &Document) -> ExportResult<Self> {
        PromptRecord::from_document(document).map(Self::from)
    }
}

/// Structured training record: the enriched document without its store id
pub fn structured_record(document: &Document) -> Document {
    document.without_id()
}

/// Prompt fields absent from `document`, in prompt order
pub fn missing_prompt_fields(document: &Document) -> Vec<String> {
    PROMPT_FIELDS
        .iter()
        .filter(|key| !document.contains(key))
        .map(|key| key.to_string())
        .collect()
}
