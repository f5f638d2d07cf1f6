//! Domain models for search hits and scored documents

pub mod document;
pub mod hit;

// Re-export important models
pub use document::{Document, ScoreFields, fields};
pub use hit::{Category, RawHit};
