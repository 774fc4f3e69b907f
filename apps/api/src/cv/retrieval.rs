//! `review_user_cv` — the advisor's tool for reading a session's uploaded CVs.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::advisor::tools::Tool;
use crate::cv::store::{CvStore, VectorStoreError};
use crate::models::cv::CvRecord;

pub const TOOL_NAME: &str = "review_user_cv";
/// Assumes no session uploads more than this many CVs.
pub const CV_RETRIEVAL_LIMIT: usize = 10;
pub const NO_CVS_FOUND: &str = "No CVs found for this session ID.";

const TOOL_DESCRIPTION: &str = "Retrieves the user's CV(s) from the database using their session_id. \
    Returns the CV summaries and contents.";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING_SUMMARY: &str = "No summary available.";
const MISSING_CONTENTS: &str = "No detailed contents available.";

pub struct CvReviewTool {
    store: Arc<dyn CvStore>,
}

impl CvReviewTool {
    pub fn new(store: Arc<dyn CvStore>) -> Self {
        Self { store }
    }

    async fn review(&self, session_id: &str) -> Result<String, VectorStoreError> {
        let mut records = self
            .store
            .records_for_session(session_id, CV_RETRIEVAL_LIMIT)
            .await?;

        if records.is_empty() {
            info!("No CVs found for session {session_id}");
            return Ok(NO_CVS_FOUND.to_string());
        }

        sort_newest_first(&mut records);
        info!("Retrieved {} CV(s) for session {session_id}", records.len());
        Ok(format_records(&records))
    }
}

#[async_trait]
impl Tool for CvReviewTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        TOOL_DESCRIPTION
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "session_id": {
                    "type": "string",
                    "description": "The current user's session_id."
                }
            },
            "required": ["session_id"]
        })
    }

    async fn call(&self, arguments: &Value) -> String {
        let session_id = match arguments.get("session_id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id,
            _ => return "Error retrieving CV: a non-empty session_id argument is required".to_string(),
        };

        match self.review(session_id).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error retrieving CV for session {session_id}: {e}");
                format!("Error retrieving CV: {e}")
            }
        }
    }
}

/// Most recent upload first; records without a timestamp count as epoch 0.
/// Equal timestamps keep store order.
fn sort_newest_first(records: &mut [CvRecord]) {
    records.sort_by(|a, b| {
        let a = a.created.unwrap_or(0.0);
        let b = b.created.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
}

fn format_records(records: &[CvRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format_block(record, i == 0))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_block(record: &CvRecord, most_recent: bool) -> String {
    let date = format_upload_date(record.created.unwrap_or(0.0));
    let label = if most_recent {
        "MOST RECENT CV".to_string()
    } else {
        format!("OLDER CV (Uploaded: {date})")
    };

    format!(
        "=== {label} ===\n\
         Date Uploaded: {date}\n\
         Summary: {}\n\
         Full Content Snippet: {}...\n\
         =======================\n",
        record.summary.as_deref().unwrap_or(MISSING_SUMMARY),
        record.contents.as_deref().unwrap_or(MISSING_CONTENTS),
    )
}

/// Local-time rendering of epoch seconds; the fractional part is dropped.
fn format_upload_date(created: f64) -> String {
    DateTime::from_timestamp(created.floor() as i64, 0)
        .map(|utc| utc.with_timezone(&Local).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| created.to_string())
}
