//! Delegate agents — CV analysis and job search run as separate services.
//! This module validates the request shape and relays it; the upstream JSON
//! response is returned to the caller unchanged.

pub mod handlers;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;

/// Agent runs can take a while; the upstream services stream nothing back.
const DELEGATE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvAnalysisRequest {
    pub summary: String,
    pub cv_contents: String,
    pub best_jobs: Vec<Value>,
    /// Base64 of the uploaded file.
    pub file_bytes: String,
    pub session_id: String,
    pub assessment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSearchRequest {
    pub query: String,
    pub summary: String,
    pub best_jobs: Vec<Value>,
    pub messages: Vec<Value>,
}

/// Where the delegate services live. Either may be left unconfigured.
#[derive(Clone)]
pub struct DelegateClient {
    client: Client,
    document_agent_url: Option<String>,
    search_agent_url: Option<String>,
}

impl DelegateClient {
    pub fn new(
        document_agent_url: Option<String>,
        search_agent_url: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(DELEGATE_TIMEOUT).build()?,
            document_agent_url,
            search_agent_url,
        })
    }

    pub async fn analyze_cv(&self, request: &CvAnalysisRequest) -> Result<Value, AppError> {
        let url = self
            .document_agent_url
            .as_deref()
            .ok_or(AppError::NotConfigured("DOCUMENT_AGENT_URL"))?;
        info!("Forwarding CV analysis for session {}", request.session_id);
        self.forward(url, request).await
    }

    pub async fn search_jobs(&self, request: &JobSearchRequest) -> Result<Value, AppError> {
        let url = self
            .search_agent_url
            .as_deref()
            .ok_or(AppError::NotConfigured("SEARCH_AGENT_URL"))?;
        info!("Forwarding job search ({} prior messages)", request.messages.len());
        self.forward(url, request).await
    }

    async fn forward<T: Serialize>(&self, url: &str, body: &T) -> Result<Value, AppError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "{url} returned {status}: {text}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::Upstream(format!("{url} returned invalid JSON: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_request() -> JobSearchRequest {
        JobSearchRequest {
            query: "remote rust jobs".to_string(),
            summary: "Backend engineer".to_string(),
            best_jobs: vec![json!({"job_title": "Rust Engineer"})],
            messages: vec![],
        }
    }

    #[tokio::test]
    async fn test_search_is_forwarded_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({
                "query": "remote rust jobs",
                "summary": "Backend engineer",
                "best_jobs": [{"job_title": "Rust Engineer"}],
                "messages": []
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"answer": "3 matches", "jobs": []})),
            )
            .mount(&server)
            .await;

        let client = DelegateClient::new(None, Some(format!("{}/search", server.uri()))).unwrap();
        let value = client.search_jobs(&search_request()).await.unwrap();
        assert_eq!(value, json!({"answer": "3 matches", "jobs": []}));
    }

    #[tokio::test]
    async fn test_unconfigured_delegate() {
        let client = DelegateClient::new(None, None).unwrap();
        let err = client.search_jobs(&search_request()).await.unwrap_err();
        assert!(matches!(err, AppError::NotConfigured("SEARCH_AGENT_URL")));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(500).set_body_string("agent crashed"))
            .mount(&server)
            .await;

        let client = DelegateClient::new(Some(format!("{}/analyze", server.uri())), None).unwrap();
        let request = CvAnalysisRequest {
            summary: "s".to_string(),
            cv_contents: "c".to_string(),
            best_jobs: vec![],
            file_bytes: "".to_string(),
            session_id: "s-1".to_string(),
            assessment: "".to_string(),
        };
        match client.analyze_cv(&request).await.unwrap_err() {
            AppError::Upstream(msg) => assert!(msg.contains("agent crashed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
