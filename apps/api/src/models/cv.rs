use serde::{Deserialize, Serialize};

/// An uploaded CV as stored in the vector database.
///
/// A session may own several records, one per upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRecord {
    pub session_id: String,
    /// Upload time in epoch seconds; uploads may carry a fractional part.
    pub created: Option<f64>,
    pub summary: Option<String>,
    pub contents: Option<String>,
}
