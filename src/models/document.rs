use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::human_size;

/// A file of the retrieval document library.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentFile {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub chunks_count: usize,
    #[serde(default)]
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub n_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<i64>>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, n_results: usize) -> Self {
        Self {
            query: query.into(),
            n_results,
            file_ids: None,
        }
    }

    pub fn with_file_ids(mut self, ids: Vec<i64>) -> Self {
        self.file_ids = if ids.is_empty() { None } else { Some(ids) };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub filename: String,
    #[serde(default)]
    pub chunk_id: i64,
    #[serde(default)]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LibraryStats {
    pub files: FileStats,
    #[serde(default)]
    pub vector_store: Value,
    #[serde(default)]
    pub supported_formats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileStats {
    pub total: usize,
    pub indexed: usize,
    pub total_size_mb: f64,
}

impl Display for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>4}  {} [{}] {} chunks, {}",
            self.id,
            self.filename,
            self.file_type,
            self.chunks_count,
            human_size(self.file_size)
        )
    }
}
