//! Image materialization.
//!
//! Once an image-prompt payload is accepted, its `prompt` is handed to an
//! [`ImageGenerator`] that returns an image reference. The generator owns its
//! own request/response format; the core only needs a non-empty reference.

use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

/// Replicate API base.
pub const DEFAULT_REPLICATE_ENDPOINT: &str = "https://api.replicate.com/v1";
/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/flux-schnell";
/// Fixed seed so the same prompt yields the same image.
pub const DEFAULT_IMAGE_SEED: u64 = 123_456_789;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from the image collaborator.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Prediction {status}: {message}")]
    PredictionFailed { status: String, message: String },

    #[error("Prediction did not finish within {0:?}")]
    Timeout(Duration),

    #[error("No image reference in output: {0}")]
    NoReference(String),

    #[error("Failed to parse response as JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Turns a text prompt into an image reference (URL or data URI).
pub trait ImageGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(&self, prompt: &str) -> Result<String, ImageError>;
}

/// Pull an image reference out of a model output value.
///
/// Accepts a string, an array whose first element is a string, or an object
/// with a `url` field. Empty references are rejected.
pub fn extract_reference(output: &Value) -> Result<String, ImageError> {
    let reference = match output {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::Object(map) => map.get("url").and_then(Value::as_str),
        _ => None,
    };
    reference
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ImageError::NoReference(output.to_string()))
}

/// Settings for [`ReplicateImageGenerator`].
#[derive(Clone)]
pub struct ReplicateSettings {
    pub endpoint: String,
    pub model: String,
    pub api_token: String,
    pub seed: u64,
    pub disable_safety_checker: bool,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

/// Image generation through Replicate's model predictions API.
pub struct ReplicateImageGenerator {
    client: reqwest::blocking::Client,
    settings: ReplicateSettings,
}

impl ReplicateImageGenerator {
    pub fn new(settings: ReplicateSettings) -> Result<Self, ImageError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ImageError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    fn predictions_url(&self) -> String {
        format!(
            "{}/models/{}/predictions",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    pub(crate) fn build_body(&self, prompt: &str) -> Value {
        json!({
            "input": {
                "prompt": prompt,
                "disable_safety_checker": self.settings.disable_safety_checker,
                "seed": self.settings.seed,
            }
        })
    }

    fn read_prediction(response: reqwest::blocking::Response) -> Result<Prediction, ImageError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ImageError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn poll(&self, url: &str, started: Instant) -> Result<Prediction, ImageError> {
        loop {
            if started.elapsed() >= self.settings.timeout {
                return Err(ImageError::Timeout(self.settings.timeout));
            }
            thread::sleep(POLL_INTERVAL);
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.settings.api_token)
                .send()
                .map_err(|e| ImageError::Transport(e.to_string()))?;
            let prediction = Self::read_prediction(response)?;
            if is_terminal(&prediction.status) {
                return Ok(prediction);
            }
            debug!(status = %prediction.status, "Prediction still running");
        }
    }
}

fn is_terminal(status: &str) -> bool {
    matches!(status, "succeeded" | "failed" | "canceled")
}

impl ImageGenerator for ReplicateImageGenerator {
    fn name(&self) -> &'static str {
        "Replicate"
    }

    fn generate(&self, prompt: &str) -> Result<String, ImageError> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.predictions_url())
            .bearer_auth(&self.settings.api_token)
            .header("Prefer", "wait")
            .json(&self.build_body(prompt))
            .send()
            .map_err(|e| ImageError::Transport(e.to_string()))?;

        let mut prediction = Self::read_prediction(response)?;
        if !is_terminal(&prediction.status) {
            let url = prediction
                .urls
                .as_ref()
                .and_then(|u| u.get.clone())
                .ok_or_else(|| ImageError::NoReference("prediction has no polling url".to_string()))?;
            prediction = self.poll(&url, started)?;
        }

        if prediction.status != "succeeded" {
            return Err(ImageError::PredictionFailed {
                status: prediction.status,
                message: match prediction.error {
                    Value::String(s) => s,
                    Value::Null => "no error message".to_string(),
                    other => other.to_string(),
                },
            });
        }

        let reference = extract_reference(&prediction.output)?;
        debug!(model = %self.settings.model, "Image generated");
        Ok(reference)
    }
}
