//! Contact form draft and its cancellable submission.

use crate::api::service::AirAwareService;
use crate::config::{ContactConfig, ContactDelivery, Notice};
use crate::error::{AirAwareError, ApiError};
use crate::utils::is_valid_email;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The four fields of the contact form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Validates the draft
    ///
    /// # Errors
    ///
    /// Returns an error naming the first blank field, or an invalid email address
    pub fn validate(&self) -> crate::error::Result<()> {
        let fields = [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Subject", &self.subject),
            ("Message", &self.message),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(AirAwareError::from(format!("{label} is required")));
            }
        }
        if !is_valid_email(self.email.trim()) {
            return Err(AirAwareError::from("Please enter a valid email address"));
        }
        Ok(())
    }
}

/// What a finished submission reports back
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub delivery: ContactDelivery,
    /// Server body, for API deliveries
    pub response: Option<serde_json::Value>,
}

/// Final state of a [`PendingSubmission`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Delivered(SubmissionOutcome),
    Failed(ApiError),
    /// Cancelled before completion; no outcome is ever observed
    Cancelled,
}

/// Handle to an in-flight submission.
///
/// Cancelling, or dropping the handle, stops the work and guarantees no
/// completion is reported.
pub struct PendingSubmission {
    token: CancellationToken,
    handle: Option<JoinHandle<Option<Result<SubmissionOutcome, ApiError>>>>,
}

impl PendingSubmission {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the submission to settle.
    pub async fn wait(mut self) -> SubmissionResult {
        let Some(handle) = self.handle.take() else {
            return SubmissionResult::Cancelled;
        };
        let joined = handle.await;
        if self.token.is_cancelled() {
            return SubmissionResult::Cancelled;
        }
        match joined {
            Ok(Some(Ok(outcome))) => SubmissionResult::Delivered(outcome),
            Ok(Some(Err(error))) => SubmissionResult::Failed(error),
            Ok(None) => SubmissionResult::Cancelled,
            Err(e) => SubmissionResult::Failed(ApiError::unknown(format!(
                "Submission task failed: {e}"
            ))),
        }
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Delivers validated contact forms
#[derive(Clone)]
pub struct ContactSubmitter {
    delivery: ContactDelivery,
    delay: Duration,
    service: Option<AirAwareService>,
    success: Notice,
    failure: Notice,
}

impl ContactSubmitter {
    /// Submitter that waits `delay` and reports success without sending anything
    #[must_use]
    pub fn simulated(delay: Duration) -> Self {
        let defaults = ContactConfig::default();
        Self {
            delivery: ContactDelivery::Simulated,
            delay,
            service: None,
            success: defaults.success_message,
            failure: defaults.error_message,
        }
    }

    /// Submitter that posts forms to the `/contact` endpoint
    #[must_use]
    pub fn via_api(service: AirAwareService) -> Self {
        Self {
            delivery: ContactDelivery::Api,
            service: Some(service),
            ..Self::simulated(Duration::ZERO)
        }
    }

    /// Submitter following the configured delivery mode
    #[must_use]
    pub fn from_config(config: &ContactConfig, service: AirAwareService) -> Self {
        Self {
            delivery: config.delivery,
            delay: config.simulated_delay(),
            service: Some(service),
            success: config.success_message.clone(),
            failure: config.error_message.clone(),
        }
    }

    #[must_use]
    pub fn delivery(&self) -> ContactDelivery {
        self.delivery
    }

    /// Notice to show for a settled submission; `None` when it was cancelled
    #[must_use]
    pub fn notice_for(&self, result: &SubmissionResult) -> Option<&Notice> {
        match result {
            SubmissionResult::Delivered(_) => Some(&self.success),
            SubmissionResult::Failed(_) => Some(&self.failure),
            SubmissionResult::Cancelled => None,
        }
    }

    /// Validate `form` and start delivering it in the background.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the validation error; nothing is started in that case.
    pub fn submit(&self, form: ContactForm) -> crate::error::Result<PendingSubmission> {
        form.validate()?;

        let token = CancellationToken::new();
        let task_token = token.clone();
        let delivery = self.delivery;
        let delay = self.delay;
        let service = self.service.clone();

        info!("Submitting contact form ({delivery})");
        let handle = tokio::spawn(async move {
            let work = async move {
                match delivery {
                    ContactDelivery::Simulated => {
                        tokio::time::sleep(delay).await;
                        Ok(SubmissionOutcome {
                            delivery,
                            response: None,
                        })
                    }
                    ContactDelivery::Api => {
                        let Some(service) = service else {
                            return Err(ApiError::unknown(
                                "Contact submission requires an API service",
                            ));
                        };
                        let response = service.submit_contact_form(&form).await?;
                        Ok(SubmissionOutcome {
                            delivery,
                            response: Some(response),
                        })
                    }
                }
            };

            tokio::select! {
                biased;
                () = task_token.cancelled() => {
                    debug!("Contact submission cancelled");
                    None
                }
                result = work => {
                    if let Err(e) = &result {
                        warn!("Contact submission failed: {}", e.message);
                    }
                    Some(result)
                }
            }
        });

        Ok(PendingSubmission {
            token,
            handle: Some(handle),
        })
    }
}
