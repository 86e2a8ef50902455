//! Generation backends.
//!
//! A backend turns one [`GenerationRequest`] into raw model text. The core
//! only ever talks to the [`GenerationBackend`] trait; provider request and
//! response shapes are adapted inside each implementation.
//!
//! # Supported Providers
//!
//! - **OpenAI**: chat completions (`system` = instructions, `user` = transcript)
//! - **Anthropic**: messages API (`system` field, single user message)
//!
//! # Design
//!
//! Backends are stateless apart from their pooled HTTP client and are shared
//! by reference across the two halves of a split request.

mod anthropic;
mod openai;

pub use anthropic::{AnthropicBackend, DEFAULT_ANTHROPIC_ENDPOINT};
pub use openai::{OpenAiBackend, DEFAULT_OPENAI_ENDPOINT};

use crate::analyzer::kind::AnalysisKind;
use crate::analyzer::router::BackendRole;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// One immutable sub-request. Every retry attempt reuses it unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: AnalysisKind,
    pub role: BackendRole,
    /// Fixed instruction text from the prompt catalog
    pub prompt_text: String,
    /// Prepared transcript text
    pub input_text: String,
    pub max_output_tokens: u32,
}

/// Trait for text-generation backends (Strategy pattern).
///
/// Implementors must be thread-safe; the split path invokes the same
/// backend from two threads at once.
pub trait GenerationBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Perform a single attempt and return the raw response text.
    fn invoke(&self, request: &GenerationRequest) -> BackendResult<String>;
}

/// Providers with a built-in backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Create the backend for this provider.
    pub fn create_backend(
        &self,
        settings: &BackendSettings,
    ) -> BackendResult<Box<dyn GenerationBackend>> {
        Ok(match self {
            ProviderKind::OpenAi => Box::new(OpenAiBackend::new(settings)?),
            ProviderKind::Anthropic => Box::new(AnthropicBackend::new(settings)?),
        })
    }

    /// Endpoint used when none is configured.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => DEFAULT_OPENAI_ENDPOINT,
            ProviderKind::Anthropic => DEFAULT_ANTHROPIC_ENDPOINT,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "OpenAI"),
            ProviderKind::Anthropic => write!(f, "Anthropic"),
        }
    }
}

/// Everything an HTTP backend needs at construction time.
///
/// The API key is an opaque credential resolved by the caller; backends never
/// read the environment themselves.
#[derive(Clone)]
pub struct BackendSettings {
    pub model: String,
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Errors from a single backend attempt.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {code}: {}", truncate_body(body))]
    Status { code: u16, body: String },

    #[error("Rate limited: {0}")]
    RateLimited(RateLimitInfo),

    #[error("Input exceeds the model context window: {}", truncate_body(message))]
    ContextTooLarge { message: String },

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),

    #[error("Failed to parse response as JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Rate limit information extracted from a 429 response.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Provider-suggested delay (from `retry-after`)
    pub retry_after: Option<Duration>,
    /// Human-readable message
    pub message: String,
}

impl std::fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(retry_after) = self.retry_after {
            write!(f, "{} (retry after {:?})", self.message, retry_after)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl BackendError {
    /// Wait before the next attempt.
    ///
    /// Uses the provider's `retry-after` when present, otherwise `fallback`.
    pub fn wait_duration(&self, fallback: Duration) -> Duration {
        match self {
            BackendError::RateLimited(info) => info.retry_after.unwrap_or(fallback),
            _ => fallback,
        }
    }

    /// Whether retrying the same input cannot succeed.
    pub fn is_context_too_large(&self) -> bool {
        matches!(self, BackendError::ContextTooLarge { .. })
    }

    /// Map a reqwest failure onto a transport-level error.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            BackendError::Timeout(timeout)
        } else {
            BackendError::Transport(error.to_string())
        }
    }
}

/// Markers providers use to report an oversized input.
const CONTEXT_OVERFLOW_MARKERS: &[&str] = &[
    "context_length_exceeded",
    "maximum context length",
    "prompt is too long",
    "too many tokens",
];

/// Classify a non-success HTTP response.
pub fn classify_status(code: u16, retry_after: Option<Duration>, body: &str) -> BackendError {
    // A 429 is a rate limit even when its body mentions tokens
    if code == 429 {
        return BackendError::RateLimited(RateLimitInfo {
            retry_after,
            message: truncate_body(body),
        });
    }
    let lower = body.to_lowercase();
    if CONTEXT_OVERFLOW_MARKERS.iter().any(|m| lower.contains(m)) {
        return BackendError::ContextTooLarge {
            message: body.to_string(),
        };
    }
    BackendError::Status {
        code,
        body: body.to_string(),
    }
}

/// Parse a `retry-after` header value given in seconds.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0 && *secs <= f64::from(u32::MAX))
        .map(Duration::from_secs_f64)
}

/// Read a response, turning non-success statuses into errors.
pub(crate) fn read_body(
    response: reqwest::blocking::Response,
    timeout: Duration,
) -> BackendResult<String> {
    let status = response.status();
    let retry_after = parse_retry_after(
        response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok()),
    );
    let body = response
        .text()
        .map_err(|e| BackendError::from_reqwest(e, timeout))?;

    if !status.is_success() {
        return Err(classify_status(status.as_u16(), retry_after, &body));
    }
    Ok(body)
}

/// Build the blocking HTTP client shared by all attempts of one backend.
pub(crate) fn http_client(timeout: Duration) -> BackendResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))
}

/// First line of a response body, capped at 200 chars.
fn truncate_body(body: &str) -> String {
    let first_line = body.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > 200 {
        let cut: String = first_line.chars().take(200).collect();
        format!("{}...", cut)
    } else {
        first_line.to_string()
    }
}

/// Slot for one backend role.
enum BackendSlot {
    Ready(Box<dyn GenerationBackend>),
    Missing(String),
}

/// Backends keyed by role.
///
/// A role may be left unconfigured (e.g. missing API key). Requests routed to
/// it fail before any network call.
pub struct BackendSet {
    primary: BackendSlot,
    secondary: BackendSlot,
}

impl BackendSet {
    /// Both roles configured.
    pub fn new(primary: Box<dyn GenerationBackend>, secondary: Box<dyn GenerationBackend>) -> Self {
        Self {
            primary: BackendSlot::Ready(primary),
            secondary: BackendSlot::Ready(secondary),
        }
    }

    /// No roles configured.
    pub fn empty() -> Self {
        Self {
            primary: BackendSlot::Missing("no backend configured".to_string()),
            secondary: BackendSlot::Missing("no backend configured".to_string()),
        }
    }

    /// Install a backend for `role`.
    pub fn with_backend(mut self, role: BackendRole, backend: Box<dyn GenerationBackend>) -> Self {
        *self.slot_mut(role) = BackendSlot::Ready(backend);
        self
    }

    /// Mark `role` as unavailable with a reason shown to the user.
    pub fn with_missing(mut self, role: BackendRole, reason: impl Into<String>) -> Self {
        *self.slot_mut(role) = BackendSlot::Missing(reason.into());
        self
    }

    /// Backend for `role`, or the reason it is unavailable.
    pub fn get(&self, role: BackendRole) -> Result<&dyn GenerationBackend, &str> {
        match self.slot(role) {
            BackendSlot::Ready(backend) => Ok(backend.as_ref()),
            BackendSlot::Missing(reason) => Err(reason.as_str()),
        }
    }

    fn slot(&self, role: BackendRole) -> &BackendSlot {
        match role {
            BackendRole::Primary => &self.primary,
            BackendRole::Secondary => &self.secondary,
        }
    }

    fn slot_mut(&mut self, role: BackendRole) -> &mut BackendSlot {
        match role {
            BackendRole::Primary => &mut self.primary,
            BackendRole::Secondary => &mut self.secondary,
        }
    }
}
