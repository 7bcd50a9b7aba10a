use crate::core::aggregator::ResultAggregator;
use crate::core::poller::{JobPoller, PollState, DEFAULT_POLL_INTERVAL};
use crate::core::submission::SubmissionClient;
use crate::domain::model::{AggregatedView, Vehicle};
use crate::domain::ports::{Delay, JobBackend, Presenter, TokioDelay};
use crate::utils::error::Result;
use std::time::Duration;

/// Runs one lookup: submit, poll to a terminal state, aggregate, present.
pub struct LookupEngine<B: JobBackend, P: Presenter, D: Delay = TokioDelay> {
    backend: B,
    presenter: P,
    delay: D,
    aggregator: ResultAggregator,
    poll_interval: Duration,
}

impl<B: JobBackend, P: Presenter> LookupEngine<B, P, TokioDelay> {
    pub fn new(backend: B, presenter: P) -> Self {
        Self::with_delay(backend, presenter, TokioDelay)
    }
}

impl<B: JobBackend, P: Presenter, D: Delay> LookupEngine<B, P, D> {
    pub fn with_delay(backend: B, presenter: P, delay: D) -> Self {
        Self {
            backend,
            presenter,
            delay,
            aggregator: ResultAggregator::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn aggregator(mut self, aggregator: ResultAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub async fn run(&self, selection: &[Vehicle]) -> Result<AggregatedView> {
        tracing::info!("Starting price lookup for {} vehicles", selection.len());

        let handle = SubmissionClient::new(&self.backend, &self.presenter)
            .submit(selection)
            .await?;

        let poller = JobPoller::new(&self.backend, &self.delay, self.poll_interval);
        let report = poller.run(handle).await;

        if let PollState::Failed(failure) = &report.state {
            let err = failure.clone().into_error();
            self.presenter.notify(&err.user_friendly_message());
            self.presenter.reset();
            return Err(err);
        }

        let payload = report.into_payload()?;
        let view = self.aggregator.aggregate(&payload);
        tracing::info!(
            "📊 Aggregated {} vehicles from {} sources",
            view.len(),
            payload.len()
        );

        self.presenter.show_results(&view);
        Ok(view)
    }
}
