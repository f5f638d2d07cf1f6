//! Integration tests for training export and offline conversion

use std::fs;

use chrono::NaiveDate;
use serde_json::{Value, json};
use serprank::batch::enrich_batch;
use serprank::export::{
    ConversationRecord, PromptRecord, TargetFormat, convert_file, read_jsonl, structured_record,
    write_jsonl,
};
use serprank::models::Document;
use serprank::scoring::{RelevanceScorer, ScoringConfig};
use tempfile::TempDir;

fn enriched_documents() -> Vec<Document> {
    let reference = NaiveDate::from_ymd_opt(2024, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let documents: Vec<Document> = [(1, "2024-02-01T00:00:00Z"), (5, "2024-01-02T00:00:00Z")]
        .into_iter()
        .map(|(rank, ts)| {
            Document::from_value(json!({
                "_id": format!("rust_article_{rank}_0"),
                "query": "rust",
                "category": "article",
                "title": "Écrire du Rust",
                "rank": rank,
                "timestamp": ts,
            }))
            .unwrap()
        })
        .collect();

    let scorer = RelevanceScorer::new(ScoringConfig::default()).unwrap();
    enrich_batch(&scorer, &documents, Some(reference))
        .into_documents_or_error()
        .unwrap()
}

#[test]
fn test_structured_export_then_prompt_then_conversation() {
    let dir = TempDir::new().unwrap();
    let structured = dir.path().join("output/ranking_training_data.jsonl");
    let prompt = dir.path().join("output/vertex_ready.jsonl");
    let conversation = dir.path().join("output/gemini_ready.jsonl");

    let documents = enriched_documents();
    let written = write_jsonl(&structured, documents.iter().map(structured_record)).unwrap();
    assert_eq!(written, 2);
    assert!(fs::read_to_string(&structured).unwrap().contains("Écrire du Rust"));

    let report = convert_file(&structured, &prompt, TargetFormat::Prompt).unwrap();
    assert_eq!(report.converted, 2);
    assert!(report.is_clean());

    let prompts: Vec<PromptRecord> = read_jsonl(&prompt).unwrap();
    assert_eq!(prompts[0].output_text, "1.0");
    assert_eq!(
        prompts[1].input_text,
        "query: rust\ncategory: article\ntitle: Écrire du Rust\nrank: 5\nrecency_score: 0.367879\nuser_engagement_score: 0.5\n\nPredict a relevance score between 0 and 1."
    );
    assert_eq!(prompts[1].output_text, "0.267152");

    let report = convert_file(&prompt, &conversation, TargetFormat::Conversation).unwrap();
    assert_eq!(report.converted, 2);

    let conversations: Vec<ConversationRecord> = read_jsonl(&conversation).unwrap();
    assert_eq!(conversations[1], ConversationRecord::from(prompts[1].clone()));
}

#[test]
fn test_structured_records_drop_store_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("structured.jsonl");
    write_jsonl(&path, enriched_documents().iter().map(structured_record)).unwrap();

    let lines: Vec<Value> = read_jsonl(&path).unwrap();
    assert!(lines.iter().all(|line| line.get("_id").is_none()));
    assert!(lines.iter().all(|line| line.get("relevance_score").is_some()));
}

#[test]
fn test_conversion_counts_skipped_lines() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("mixed.jsonl");
    let output = dir.path().join("prompt.jsonl");

    let good = serde_json::to_string(&structured_record(&enriched_documents()[0])).unwrap();
    fs::write(
        &input,
        format!("{good}\n{{\"query\": \"rust\", \"rank\": 2}}\n{{broken\n{good}\n"),
    )
    .unwrap();

    let report = convert_file(&input, &output, TargetFormat::Prompt).unwrap();
    assert_eq!(report.converted, 2);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(
        report.skipped.iter().map(|s| s.line).collect::<Vec<_>>(),
        vec![2, 3]
    );
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 2);
}
