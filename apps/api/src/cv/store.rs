//! Vector CV store — read access to uploaded CVs in Qdrant.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::cv::CvRecord;

/// Payload field holding the owning session of a CV point.
pub const SESSION_ID_FIELD: &str = "metadata.session_id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Qdrant error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read access to stored CVs, scoped by session.
#[async_trait]
pub trait CvStore: Send + Sync {
    /// Returns up to `limit` records whose session id equals `session_id`, in store order.
    async fn records_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<CvRecord>, VectorStoreError>;
}

#[derive(Debug, Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Debug, Deserialize)]
struct ScrollResult {
    points: Vec<Point>,
    next_page_offset: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Point {
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize)]
struct QdrantStatus {
    status: QdrantErrorBody,
}

#[derive(Debug, Deserialize)]
struct QdrantErrorBody {
    error: String,
}

/// Builds a record from a point payload. A non-string field is kept in its JSON
/// text form so one odd point cannot fail the whole scroll.
fn record_from_payload(payload: &Value, queried_session: &str) -> CvRecord {
    let metadata = payload.get("metadata");
    let meta_field = |key: &str| metadata.and_then(|m| m.get(key));
    CvRecord {
        session_id: text_field(meta_field("session_id"))
            .unwrap_or_else(|| queried_session.to_string()),
        // Integer or float epoch seconds depending on the uploader.
        created: meta_field("created").and_then(Value::as_f64),
        summary: text_field(payload.get("page_content")),
        contents: text_field(meta_field("cv_contents")),
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Qdrant REST client bound to the CV collection.
#[derive(Clone)]
pub struct QdrantCvStore {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    collection: String,
}

impl QdrantCvStore {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        collection: impl Into<String>,
    ) -> Result<Self, VectorStoreError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            collection: collection.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/collections/{}/{path}", self.endpoint, self.collection);
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    /// Creates the keyword index that session filtering relies on.
    /// Idempotent: Qdrant accepts repeated creation of the same index.
    pub async fn ensure_session_index(&self) -> Result<(), VectorStoreError> {
        let response = self
            .request(Method::PUT, "index?wait=true")
            .json(&json!({
                "field_name": SESSION_ID_FIELD,
                "field_schema": "keyword",
            }))
            .send()
            .await?;
        check_status(response).await?;
        info!(
            "Keyword index on {SESSION_ID_FIELD} ready for collection '{}'",
            self.collection
        );
        Ok(())
    }
}

#[async_trait]
impl CvStore for QdrantCvStore {
    async fn records_for_session(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<CvRecord>, VectorStoreError> {
        let response = self
            .request(Method::POST, "points/scroll")
            .json(&json!({
                "filter": {
                    "must": [
                        { "key": SESSION_ID_FIELD, "match": { "value": session_id } }
                    ]
                },
                "limit": limit,
                "with_payload": true,
                "with_vector": false,
            }))
            .send()
            .await?;
        let body = check_status(response).await?;
        let scroll: ScrollResponse = serde_json::from_str(&body)?;

        if scroll.result.next_page_offset.is_some() {
            warn!("Session {session_id} has more than {limit} stored CVs; only the first {limit} are used");
        }
        debug!(
            "Fetched {} CV point(s) for session {session_id}",
            scroll.result.points.len()
        );

        Ok(scroll
            .result
            .points
            .into_iter()
            .map(|point| record_from_payload(&point.payload, session_id))
            .collect())
    }
}

/// Returns the body of a successful response, or the Qdrant error message.
async fn check_status(response: reqwest::Response) -> Result<String, VectorStoreError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    let message = serde_json::from_str::<QdrantStatus>(&body)
        .map(|s| s.status.error)
        .unwrap_or(body);
    Err(VectorStoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> QdrantCvStore {
        QdrantCvStore::new(&server.uri(), Some("qd-key".to_string()), "uploaded_cvs").unwrap()
    }

    #[tokio::test]
    async fn test_scroll_filters_by_session_and_parses_payloads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/uploaded_cvs/points/scroll"))
            .and(header("api-key", "qd-key"))
            .and(body_json(json!({
                "filter": {"must": [{"key": "metadata.session_id", "match": {"value": "s-1"}}]},
                "limit": 10,
                "with_payload": true,
                "with_vector": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "points": [
                        {"id": 1, "payload": {
                            "page_content": "Backend engineer, 4 years",
                            "metadata": {"session_id": "s-1", "created": 1700000000.75, "cv_contents": "Full CV"}
                        }},
                        {"id": 2, "payload": {"metadata": {"session_id": "s-1", "created": 1600000000}}},
                        {"id": 3, "payload": null}
                    ],
                    "next_page_offset": null
                },
                "status": "ok",
                "time": 0.001
            })))
            .mount(&server)
            .await;

        let records = store(&server).records_for_session("s-1", 10).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].created, Some(1700000000.75));
        assert_eq!(records[0].summary.as_deref(), Some("Backend engineer, 4 years"));
        assert_eq!(records[0].contents.as_deref(), Some("Full CV"));
        assert_eq!(records[1].created, Some(1600000000.0));
        assert_eq!(records[1].summary, None);
        assert_eq!(records[2].session_id, "s-1");
        assert_eq!(records[2].created, None);
    }

    #[tokio::test]
    async fn test_odd_payload_types_do_not_hide_other_cvs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/uploaded_cvs/points/scroll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "points": [
                        {"id": 1, "payload": {
                            "page_content": {"headline": "Analyst"},
                            "metadata": {"session_id": 42, "created": "yesterday", "cv_contents": 7}
                        }},
                        {"id": 2, "payload": {"page_content": "Designer", "metadata": "broken"}},
                        {"id": 3, "payload": {
                            "page_content": "Backend engineer",
                            "metadata": {"session_id": "s-1", "created": 1700000000}
                        }}
                    ],
                    "next_page_offset": null
                },
                "status": "ok"
            })))
            .mount(&server)
            .await;

        let records = store(&server).records_for_session("s-1", 10).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].summary.as_deref(), Some(r#"{"headline":"Analyst"}"#));
        assert_eq!(records[0].session_id, "42");
        assert_eq!(records[0].created, None);
        assert_eq!(records[0].contents.as_deref(), Some("7"));
        assert_eq!(records[1].summary.as_deref(), Some("Designer"));
        assert_eq!(records[1].session_id, "s-1");
        assert_eq!(records[2].created, Some(1700000000.0));
    }

    #[tokio::test]
    async fn test_scroll_error_carries_qdrant_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/collections/uploaded_cvs/points/scroll"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": {"error": "Not found: Collection `uploaded_cvs` doesn't exist!"},
                "time": 0.0
            })))
            .mount(&server)
            .await;

        let err = store(&server).records_for_session("s-1", 10).await.unwrap_err();
        match err {
            VectorStoreError::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("doesn't exist"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ensure_session_index() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/collections/uploaded_cvs/index"))
            .and(query_param("wait", "true"))
            .and(body_json(json!({"field_name": "metadata.session_id", "field_schema": "keyword"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"operation_id": 1, "status": "completed"},
                "status": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).ensure_session_index().await.unwrap();
    }
}
