use crate::domain::model::{JobHandle, JobStatus, RawResultPayload};
use crate::domain::ports::{Delay, JobBackend};
use crate::utils::error::{LookupError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Why a job ended up in [`PollState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollFailure {
    /// The backend reported `error` for the job.
    Backend(String),
    /// The status query itself failed.
    Transport(String),
}

impl PollFailure {
    pub fn into_error(self) -> LookupError {
        match self {
            Self::Backend(reason) => LookupError::backend_job(reason),
            Self::Transport(reason) => LookupError::poll_transport(reason),
        }
    }
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(reason) => write!(f, "backend reported error: {}", reason),
            Self::Transport(reason) => write!(f, "status query failed: {}", reason),
        }
    }
}

/// Lifecycle of a single job as seen by the poller.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Polling,
    Done(RawResultPayload),
    Failed(PollFailure),
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Polling)
    }

    /// Applies the outcome of one status query. Terminal states absorb
    /// every further outcome.
    pub fn transition(self, outcome: Result<JobStatus>) -> PollState {
        if self.is_terminal() {
            return self;
        }

        match outcome {
            Ok(JobStatus::Pending) => PollState::Polling,
            Ok(JobStatus::Done(payload)) => PollState::Done(payload),
            Ok(JobStatus::Error(reason)) => PollState::Failed(PollFailure::Backend(reason)),
            Err(LookupError::PollTransportError { message }) => {
                PollState::Failed(PollFailure::Transport(message))
            }
            Err(e) => PollState::Failed(PollFailure::Transport(e.to_string())),
        }
    }
}

/// Terminal result of [`JobPoller::run`].
#[derive(Debug)]
pub struct PollReport {
    pub state: PollState,
    pub queries: usize,
}

impl PollReport {
    /// Maps the terminal state onto the crate error type.
    pub fn into_payload(self) -> Result<RawResultPayload> {
        match self.state {
            PollState::Done(payload) => Ok(payload),
            PollState::Failed(failure) => Err(failure.into_error()),
            PollState::Polling => Err(LookupError::poll_transport(
                "polling stopped before the job reached a terminal state",
            )),
        }
    }
}

pub struct JobPoller<'a, B: JobBackend + ?Sized, D: Delay + ?Sized> {
    backend: &'a B,
    delay: &'a D,
    interval: Duration,
}

impl<'a, B: JobBackend + ?Sized, D: Delay + ?Sized> JobPoller<'a, B, D> {
    pub fn new(backend: &'a B, delay: &'a D, interval: Duration) -> Self {
        Self {
            backend,
            delay,
            interval,
        }
    }

    /// Queries the job until it is done or failed. Each query is awaited
    /// before the next one is scheduled, so at most one is ever in flight.
    /// There is no upper bound on the number of queries.
    pub async fn run(&self, handle: JobHandle) -> PollReport {
        let mut state = PollState::Polling;
        let mut queries = 0usize;

        loop {
            queries += 1;
            tracing::debug!("Polling job {} (query #{})", handle, queries);

            let outcome = self.backend.poll(&handle).await;
            if let Err(e) = &outcome {
                tracing::warn!("Status query for job {} failed: {}", handle, e);
            }

            state = state.transition(outcome);
            match &state {
                PollState::Polling => {
                    self.delay.sleep(self.interval).await;
                }
                PollState::Done(payload) => {
                    tracing::info!(
                        "✅ Job {} finished after {} queries ({} sources)",
                        handle,
                        queries,
                        payload.len()
                    );
                    break;
                }
                PollState::Failed(reason) => {
                    tracing::error!("❌ Job {} failed: {}", handle, reason);
                    break;
                }
            }
        }

        PollReport { state, queries }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::model::BatchRequest;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that replays a scripted list of status outcomes.
    pub struct ScriptedBackend {
        pub submit_result: Mutex<Option<Result<JobHandle>>>,
        pub statuses: Mutex<VecDeque<Result<JobStatus>>>,
        pub submitted: Mutex<Vec<BatchRequest>>,
        pub polls: AtomicUsize,
        in_flight: AtomicBool,
    }

    impl ScriptedBackend {
        pub fn new(statuses: Vec<Result<JobStatus>>) -> Self {
            Self {
                submit_result: Mutex::new(Some(Ok(JobHandle::new("job-1")))),
                statuses: Mutex::new(statuses.into()),
                submitted: Mutex::new(Vec::new()),
                polls: AtomicUsize::new(0),
                in_flight: AtomicBool::new(false),
            }
        }

        pub fn failing_submit(error: LookupError) -> Self {
            let backend = Self::new(Vec::new());
            *backend.submit_result.lock().unwrap() = Some(Err(error));
            backend
        }

        pub fn poll_count(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }

        pub fn submit_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobBackend for ScriptedBackend {
        async fn submit(&self, request: &BatchRequest) -> Result<JobHandle> {
            self.submitted.lock().unwrap().push(request.clone());
            self.submit_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(LookupError::submission("submitted twice")))
        }

        async fn poll(&self, handle: &JobHandle) -> Result<JobStatus> {
            assert_eq!(handle.as_str(), "job-1");
            assert!(
                !self.in_flight.swap(true, Ordering::SeqCst),
                "overlapping status queries"
            );
            self.polls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            let next = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted status left"));
            self.in_flight.store(false, Ordering::SeqCst);
            next
        }
    }

    /// Records requested delays instead of sleeping.
    #[derive(Default)]
    pub struct RecordingDelay {
        pub calls: Mutex<Vec<Duration>>,
    }

    impl RecordingDelay {
        pub fn recorded(&self) -> Vec<Duration> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn sleep(&self, duration: Duration) {
            self.calls.lock().unwrap().push(duration);
        }
    }
}
