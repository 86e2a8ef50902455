//! Anthropic messages backend.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::{
    http_client, read_body, BackendError, BackendResult, BackendSettings, GenerationBackend,
    GenerationRequest,
};

/// Messages endpoint.
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Backend for the Anthropic messages API.
pub struct AnthropicBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl AnthropicBackend {
    pub fn new(settings: &BackendSettings) -> BackendResult<Self> {
        Ok(Self {
            client: http_client(settings.timeout)?,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            timeout: settings.timeout,
        })
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn build_body(model: &str, request: &GenerationRequest) -> serde_json::Value {
    json!({
        "model": model,
        "max_tokens": request.max_output_tokens,
        "system": request.prompt_text,
        "messages": [
            { "role": "user", "content": request.input_text },
        ],
    })
}

/// Concatenate the text blocks of a messages response.
pub(crate) fn parse_content(body: &str) -> BackendResult<String> {
    let response: MessagesResponse = serde_json::from_str(body)?;
    let text: String = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(text)
}

impl GenerationBackend for AnthropicBackend {
    fn name(&self) -> &'static str {
        "Anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, request: &GenerationRequest) -> BackendResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&build_body(&self.model, request))
            .send()
            .map_err(|e| BackendError::from_reqwest(e, self.timeout))?;

        let body = read_body(response, self.timeout)?;
        parse_content(&body)
    }
}
