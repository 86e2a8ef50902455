//! User-friendly error handling for analysis operations.
//!
//! This module provides:
//! - `AnalysisError` - enum with all failure modes and Display trait
//! - Clear, user-friendly error messages (no stack traces)
//! - A status mapping for the request boundary (400 vs 500)
//!
//! # Error Categories
//!
//! - Caller errors: unknown kind, empty transcript, oversized transcript
//! - Per-attempt errors absorbed by retry: transport, malformed payload
//! - Terminal errors: exhausted retries, split partial failure, image failure
//! - Setup errors: a backend role with no configured backend

use std::fmt;

use super::backend::BackendError;
use super::kind::AnalysisKind;
use super::recover::RecoveryError;
use super::router::BackendRole;
use super::split::SplitPart;

/// Error type for analysis operations.
///
/// All variants include user-friendly messages suitable for CLI output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Kind name outside the registered set.
    UnknownKind {
        /// The name the caller supplied
        name: String,
    },

    /// Transcript is empty after trimming.
    NoContent,

    /// One attempt failed at the transport or provider level.
    Transport {
        /// Backend that failed
        backend: String,
        /// Human-readable reason
        message: String,
    },

    /// Response could not be recovered into the required payload.
    MalformedPayload {
        /// Why recovery failed
        reason: String,
        /// Truncated response for debugging
        response_preview: String,
    },

    /// Every attempt failed.
    ExhaustedRetries {
        /// Attempts made
        attempts: usize,
        /// Failure of the final attempt
        last_error: Box<AnalysisError>,
    },

    /// Provider reported the input exceeds its context window.
    ContextTooLarge {
        /// Backend that rejected the input
        backend: String,
    },

    /// One half of a split request failed terminally.
    SplitPartialFailure {
        /// Which half failed
        part: SplitPart,
        /// Terminal error of that half
        source: Box<AnalysisError>,
    },

    /// Routed role has no backend.
    BackendNotConfigured {
        role: BackendRole,
        /// Why the backend is unavailable (e.g. missing API key)
        reason: String,
    },

    /// Image collaborator failed or returned no reference.
    ImageGenerationFailed {
        /// Human-readable reason
        reason: String,
    },
}

fn available_kinds() -> String {
    AnalysisKind::all()
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::UnknownKind { name } => {
                write!(
                    f,
                    "Invalid analysis type '{}'. Available types: {}.",
                    name,
                    available_kinds()
                )
            }
            AnalysisError::NoContent => {
                write!(f, "No conversation to analyze. The transcript is empty.")
            }
            AnalysisError::Transport { backend, message } => {
                write!(f, "{} request failed: {}", backend, message)
            }
            AnalysisError::MalformedPayload {
                reason,
                response_preview,
            } => {
                write!(
                    f,
                    "Could not read the model response ({}). Response preview: {}",
                    reason, response_preview
                )
            }
            AnalysisError::ExhaustedRetries {
                attempts,
                last_error,
            } => {
                write!(
                    f,
                    "Analysis failed after {} attempts, please retry. Last error: {}",
                    attempts, last_error
                )
            }
            AnalysisError::ContextTooLarge { backend } => {
                write!(
                    f,
                    "The conversation is too long for {}. Please choose a shorter conversation.",
                    backend
                )
            }
            AnalysisError::SplitPartialFailure { part, source } => {
                write!(
                    f,
                    "Analysis of the {} half of the conversation failed: {}",
                    part, source
                )
            }
            AnalysisError::BackendNotConfigured { role, reason } => {
                write!(
                    f,
                    "No {} backend is configured: {}. Set the API key environment variable or update the config file.",
                    role, reason
                )
            }
            AnalysisError::ImageGenerationFailed { reason } => {
                write!(f, "Image generation failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl AnalysisError {
    /// Create from a BackendError for one attempt.
    pub fn from_backend_error(backend: &str, error: &BackendError) -> Self {
        if error.is_context_too_large() {
            return AnalysisError::ContextTooLarge {
                backend: backend.to_string(),
            };
        }
        AnalysisError::Transport {
            backend: backend.to_string(),
            message: error.to_string(),
        }
    }

    /// Create from a recovery failure for one attempt.
    pub fn from_recovery_error(error: &RecoveryError, response: &str) -> Self {
        AnalysisError::MalformedPayload {
            reason: error.to_string(),
            response_preview: truncate_response(response, 100),
        }
    }

    /// Check if another attempt may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Transport { .. } | AnalysisError::MalformedPayload { .. }
        )
    }

    /// Check if this error was caused by the caller's input.
    ///
    /// A failed split half counts when its own error does, so an oversized
    /// half still reports 400.
    pub fn is_client_error(&self) -> bool {
        match self {
            AnalysisError::UnknownKind { .. }
            | AnalysisError::NoContent
            | AnalysisError::ContextTooLarge { .. } => true,
            AnalysisError::SplitPartialFailure { source, .. } => source.is_client_error(),
            _ => false,
        }
    }

    /// HTTP-style status for the request boundary.
    pub fn status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

/// Truncate a response string for display.
fn truncate_response(response: &str, max_len: usize) -> String {
    let trimmed = response.trim();
    if trimmed.chars().count() <= max_len {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}
