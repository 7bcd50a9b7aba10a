use crate::domain::model::{AggregatedView, BatchRequest, JobHandle, JobStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn poll_interval(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn vehicles_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn case_insensitive_grouping(&self) -> bool;
}

/// Submit / poll boundary of the job backend.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Starts a job. Any failure here is a submission failure.
    async fn submit(&self, request: &BatchRequest) -> Result<JobHandle>;

    /// One status query. Transport, HTTP status and body parsing failures are all errors.
    async fn poll(&self, handle: &JobHandle) -> Result<JobStatus>;
}

/// Presentation callbacks, invoked as notifications only.
pub trait Presenter: Send + Sync {
    fn show_waiting(&self);
    fn show_results(&self, view: &AggregatedView);
    fn reset(&self);
    fn notify(&self, message: &str);
}

#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
