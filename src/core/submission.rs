use crate::domain::model::{BatchRequest, JobHandle, Vehicle};
use crate::domain::ports::{JobBackend, Presenter};
use crate::utils::error::{LookupError, Result};

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one car.";

pub struct SubmissionClient<'a, B: JobBackend + ?Sized, P: Presenter + ?Sized> {
    backend: &'a B,
    presenter: &'a P,
}

impl<'a, B: JobBackend + ?Sized, P: Presenter + ?Sized> SubmissionClient<'a, B, P> {
    pub fn new(backend: &'a B, presenter: &'a P) -> Self {
        Self { backend, presenter }
    }

    /// Sends the selection as one batch. An empty selection is rejected
    /// before anything is shown or sent; a failed submit resets the
    /// presenter and never yields a handle.
    pub async fn submit(&self, selection: &[Vehicle]) -> Result<JobHandle> {
        if selection.is_empty() {
            self.presenter.notify(EMPTY_SELECTION_MESSAGE);
            return Err(LookupError::validation(EMPTY_SELECTION_MESSAGE));
        }

        let request = BatchRequest::new(selection.to_vec());

        self.presenter.show_waiting();
        tracing::info!("🚀 Submitting {} vehicles for price lookup", request.len());

        match self.backend.submit(&request).await {
            Ok(handle) => {
                tracing::info!("Job {} accepted", handle);
                Ok(handle)
            }
            Err(e) => {
                tracing::error!("❌ Failed to start price lookup: {}", e);
                let err = match e {
                    LookupError::SubmissionError { .. } => e,
                    other => LookupError::submission(other.to_string()),
                };
                self.presenter.notify(&err.user_friendly_message());
                self.presenter.reset();
                Err(err)
            }
        }
    }
}
