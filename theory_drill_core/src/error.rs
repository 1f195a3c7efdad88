// Error type for the drill engine.
//
// Only load-time and storage failures are errors. Anything an end user can
// type degrades to "wrong answer", "placeholder question" or "base weight"
// instead (see grading.rs, generate/mod.rs, recommend.rs).

use thiserror::Error;

/// Result alias using the crate's error type.
pub type Result<T> = std::result::Result<T, DrillError>;

#[derive(Error, Debug)]
pub enum DrillError {
    /// The theory tables JSON could not be parsed.
    #[error("theory tables: {0}")]
    Tables(#[source] serde_json::Error),

    /// The theory tables parsed but contain an entry the generators cannot use.
    #[error("invalid theory table `{table}`: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    /// Configuration failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A category/subcategory pair that names no topic.
    #[error("unknown topic: {category}/{subcategory}")]
    UnknownTopic {
        category: String,
        subcategory: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DrillError {
    pub(crate) fn invalid_table(table: &'static str, reason: impl Into<String>) -> Self {
        DrillError::InvalidTable {
            table,
            reason: reason.into(),
        }
    }
}
