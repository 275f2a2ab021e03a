//! Submission sources
//!
//! A source yields raw submission documents exactly as the form platform
//! exports them. Conformance checking happens in [`seed`](super::seed).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;

use super::errors::{IngestError, IngestResult};

/// Page size requested from the upstream API
pub const UPSTREAM_PAGE_SIZE: u32 = 150;

/// Boxed future returned by [`SubmissionSource::fetch_all`]
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = IngestResult<Vec<Value>>> + Send + 'a>>;

/// Origin of mirrored submissions
pub trait SubmissionSource: Send + Sync {
    /// Fetches every raw submission document
    fn fetch_all(&self) -> SourceFuture<'_>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

/// Pulls documents out of an export payload.
///
/// Accepts `{"responses": [...]}` or a bare array. An object without
/// `responses` holds no documents.
pub fn extract_documents(payload: Value) -> IngestResult<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut object) => match object.remove("responses") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(IngestError::MalformedPayload(format!(
                "'responses' must be an array, got {}",
                json_type(&other)
            ))),
            None => Ok(Vec::new()),
        },
        other => Err(IngestError::MalformedPayload(format!(
            "expected an object or array, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Form platform REST API
pub struct UpstreamSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    form_id: String,
}

impl UpstreamSource {
    pub fn new(config: &UpstreamConfig, form_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            form_id: form_id.into(),
        }
    }

    /// Submissions endpoint for the configured form
    pub fn endpoint(&self) -> String {
        format!("{}forms/{}/submissions", self.base_url, self.form_id)
    }

    async fn fetch_page(&self, offset: u64) -> IngestResult<Value> {
        let url = self.endpoint();
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("includeEditLink", "true".to_string()),
                ("limit", UPSTREAM_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn fetch_pages(&self) -> IngestResult<Vec<Value>> {
        let mut documents = Vec::new();

        loop {
            let payload = self.fetch_page(documents.len() as u64).await?;
            let total = payload.get("totalResponses").and_then(Value::as_u64);
            let page = extract_documents(payload)?;
            let fetched = page.len();
            documents.extend(page);

            debug!(
                fetched,
                collected = documents.len(),
                total = ?total,
                "fetched upstream page"
            );

            if fetched < UPSTREAM_PAGE_SIZE as usize {
                break;
            }
            match total {
                Some(total) if (documents.len() as u64) < total => continue,
                _ => break,
            }
        }

        Ok(documents)
    }
}

impl SubmissionSource for UpstreamSource {
    fn fetch_all(&self) -> SourceFuture<'_> {
        Box::pin(self.fetch_pages())
    }

    fn describe(&self) -> String {
        self.endpoint()
    }
}

/// Local JSON export
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionSource for JsonFileSource {
    fn fetch_all(&self) -> SourceFuture<'_> {
        Box::pin(async move {
            let content = tokio::fs::read_to_string(&self.path).await?;
            let payload: Value = serde_json::from_str(&content)?;
            extract_documents(payload)
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_wrapped_and_bare() {
        let wrapped = extract_documents(json!({ "responses": [{ "a": 1 }], "totalResponses": 1 }));
        assert_eq!(wrapped.unwrap().len(), 1);

        let bare = extract_documents(json!([{ "a": 1 }, { "b": 2 }]));
        assert_eq!(bare.unwrap().len(), 2);

        let empty = extract_documents(json!({ "totalResponses": 0 }));
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn test_extract_rejects_bad_shapes() {
        assert!(matches!(
            extract_documents(json!({ "responses": "nope" })),
            Err(IngestError::MalformedPayload(_))
        ));
        assert!(matches!(
            extract_documents(json!(42)),
            Err(IngestError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_upstream_endpoint() {
        let config = UpstreamConfig {
            base_url: "https://api.example.com/v1/api/".into(),
            api_key: "secret".into(),
        };
        let source = UpstreamSource::new(&config, "cLZojxk94ous");

        assert_eq!(
            source.endpoint(),
            "https://api.example.com/v1/api/forms/cLZojxk94ous/submissions"
        );
    }
}
