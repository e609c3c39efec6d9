//! Full-text search over a static corpus of Wikipedia abstracts.
//!
//! The pipeline: a gzipped XML dump is streamed once into the `docs`
//! namespace of an embedded key-value store, an inverted index is built from
//! the stored documents, and queries are answered by combining posting
//! lists, hydrating documents and ranking them by query-token coverage.

pub mod dump;
pub mod engine;
pub mod index;
pub mod postings;
pub mod progress;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

pub type DocId = u32;

/// A searchable document. Immutable once loaded; `rank` is only populated
/// in query responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    /// The abstract body, the only field analyzed and searched. Kept under
    /// the JSON key `abstract` for compatibility with the dump schema.
    #[serde(rename = "abstract")]
    pub text: String,
    #[serde(default)]
    pub rank: f64,
}

/// Checkpoint record proving that a load or build phase completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbStateMeta {
    pub last_updated_at: String,
    pub count: u64,
}
