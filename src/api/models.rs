//! Typed views of the responses the CLI renders. Every other call is left as
//! `serde_json::Value`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SyllableCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: i64,
}

/// Body of `GET /analysis/stats`.
#[derive(Debug, Deserialize)]
pub struct Statistics {
    pub total_words: i64,
    pub unique_words: i64,
    pub words_with_shva: i64,
    pub words_with_dagesh: i64,
    pub total_sources: i64,
    pub total_categories: i64,
    #[serde(default)]
    pub syllable_distribution: Vec<SyllableCount>,
}

/// Body of `GET /words/search`.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Body of `POST /sources/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    pub source_id: Option<i64>,
    #[serde(default)]
    pub word_count: i64,
}
