pub mod aggregator;
pub mod engine;
pub mod poller;
pub mod price;
pub mod report;
pub mod submission;

pub use crate::domain::model::{AggregatedView, JobHandle, JobStatus, RawResultPayload, Vehicle};
pub use crate::domain::ports::{ConfigProvider, Delay, JobBackend, Presenter, Storage};
pub use crate::utils::error::Result;
