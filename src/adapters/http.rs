use crate::domain::model::{BatchRequest, JobHandle, JobStatus, RawResultPayload};
use crate::domain::ports::JobBackend;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    result: Option<serde_json::Value>,
}

impl StatusResponse {
    /// Lifts the wire shape into a typed status. A `done` body whose
    /// result does not match the payload shape is rejected here.
    fn into_status(self) -> Result<JobStatus> {
        match self.status.as_str() {
            "pending" => Ok(JobStatus::Pending),
            "done" => {
                let result = self.result.ok_or_else(|| {
                    LookupError::poll_transport("status 'done' without a result")
                })?;
                let payload: RawResultPayload = serde_json::from_value(result).map_err(|e| {
                    LookupError::poll_transport(format!("malformed result payload: {}", e))
                })?;
                Ok(JobStatus::Done(payload))
            }
            "error" => {
                let reason = match self.result {
                    Some(serde_json::Value::String(reason)) => reason,
                    Some(serde_json::Value::Null) | None => "job reported an error".to_string(),
                    Some(other) => other.to_string(),
                };
                Ok(JobStatus::Error(reason))
            }
            // queue states such as STARTED or RETRY are still in progress
            other => {
                tracing::debug!("Treating job status '{}' as pending", other);
                Ok(JobStatus::Pending)
            }
        }
    }
}

/// Job backend reached over HTTP: `POST /scrape` and `GET /scrape-status/{id}`.
#[derive(Debug, Clone)]
pub struct HttpJobBackend {
    client: Client,
    base_url: Url,
}

impl HttpJobBackend {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| LookupError::InvalidConfigValueError {
            field: "backend.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LookupError::InvalidConfigValueError {
                field: "backend.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn submit_url(&self) -> Url {
        self.endpoint(&["scrape"])
    }

    pub fn status_url(&self, handle: &JobHandle) -> Url {
        self.endpoint(&["scrape-status", handle.as_str()])
    }
}

#[async_trait]
impl JobBackend for HttpJobBackend {
    async fn submit(&self, request: &BatchRequest) -> Result<JobHandle> {
        let url = self.submit_url();
        tracing::debug!("Making submit request to: {}", url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| LookupError::submission(e.to_string()))?;

        tracing::debug!("Submit response status: {}", response.status());
        if !response.status().is_success() {
            return Err(LookupError::submission(format!(
                "backend answered HTTP {}",
                response.status()
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| LookupError::submission(format!("unreadable submit response: {}", e)))?;
        Ok(JobHandle::new(body.job_id))
    }

    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus> {
        let url = self.status_url(handle);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::poll_transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::poll_transport(format!(
                "backend answered HTTP {}",
                response.status()
            )));
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| LookupError::poll_transport(format!("unreadable status response: {}", e)))?;
        body.into_status()
    }
}
