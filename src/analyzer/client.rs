//! Generation client.
//!
//! One retry loop for every backend. An attempt is a backend call plus the
//! caller's acceptance check; an attempt counts as failed when either the
//! call or the check fails. Only terminal errors leave this module.

use std::thread;

use tracing::{debug, warn};

use super::backend::{BackendSet, GenerationRequest};
use super::error::AnalysisError;
use super::recover::RecoveryError;
use super::retry::RetryPolicy;

/// Invokes backends with bounded retry.
pub struct GenerationClient {
    backends: BackendSet,
    policy: RetryPolicy,
}

impl GenerationClient {
    pub fn new(backends: BackendSet, policy: RetryPolicy) -> Self {
        Self { backends, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate free text.
    ///
    /// The backend's text is accepted as is. Empty responses never get here:
    /// each backend reports them as `BackendError::EmptyResponse`, which is
    /// retried like any other transport failure.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, AnalysisError> {
        self.generate_with(request, |raw| Ok(raw.to_string()))
    }

    /// Generate and accept the response with `accept`.
    ///
    /// A rejected response counts as a failed attempt and is retried with the
    /// same budget as transport failures. A context overflow is terminal.
    pub fn generate_with<T, F>(
        &self,
        request: &GenerationRequest,
        accept: F,
    ) -> Result<T, AnalysisError>
    where
        F: Fn(&str) -> Result<T, RecoveryError>,
    {
        let backend =
            self.backends
                .get(request.role)
                .map_err(|reason| AnalysisError::BackendNotConfigured {
                    role: request.role,
                    reason: reason.to_string(),
                })?;

        let attempts = self.policy.attempts();
        let mut last_error = None;

        for attempt in 0..attempts {
            let wait = match backend.invoke(request) {
                Ok(raw) => match accept(&raw) {
                    Ok(value) => {
                        debug!(
                            kind = %request.kind,
                            backend = backend.name(),
                            attempt = attempt + 1,
                            chars = raw.chars().count(),
                            "Generation accepted"
                        );
                        return Ok(value);
                    }
                    Err(rejection) => {
                        warn!(
                            kind = %request.kind,
                            backend = backend.name(),
                            attempt = attempt + 1,
                            reason = %rejection,
                            "Response rejected"
                        );
                        last_error = Some(AnalysisError::from_recovery_error(&rejection, &raw));
                        self.policy.delay_for_attempt(attempt)
                    }
                },
                Err(error) => {
                    warn!(
                        kind = %request.kind,
                        backend = backend.name(),
                        attempt = attempt + 1,
                        error = %error,
                        "Backend attempt failed"
                    );
                    let failure = AnalysisError::from_backend_error(backend.name(), &error);
                    if !failure.is_retriable() {
                        return Err(failure);
                    }
                    last_error = Some(failure);
                    self.policy
                        .clamp(error.wait_duration(self.policy.delay_for_attempt(attempt)))
                }
            };

            if self.policy.has_next(attempt) && !wait.is_zero() {
                debug!(wait_ms = wait.as_millis() as u64, "Backing off before retry");
                thread::sleep(wait);
            }
        }

        Err(AnalysisError::ExhaustedRetries {
            attempts,
            last_error: Box::new(last_error.unwrap_or(AnalysisError::Transport {
                backend: backend.name().to_string(),
                message: "no attempt was made".to_string(),
            })),
        })
    }
}
