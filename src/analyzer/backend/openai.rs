//! OpenAI chat completions backend.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::{
    http_client, read_body, BackendError, BackendResult, BackendSettings, GenerationBackend,
    GenerationRequest,
};

/// Chat completions endpoint.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Backend for OpenAI-compatible chat completion APIs.
pub struct OpenAiBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiBackend {
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
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Build the request body. Instructions go in the system message.
pub(crate) fn build_body(model: &str, request: &GenerationRequest) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": request.prompt_text },
            { "role": "user", "content": request.input_text },
        ],
        "max_tokens": request.max_output_tokens,
    })
}

/// Extract the first choice's text from a chat completion body.
pub(crate) fn parse_content(body: &str) -> BackendResult<String> {
    let response: ChatResponse = serde_json::from_str(body)?;
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::InvalidResponse("no choices in response".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(content)
}

impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn invoke(&self, request: &GenerationRequest) -> BackendResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_body(&self.model, request))
            .send()
            .map_err(|e| BackendError::from_reqwest(e, self.timeout))?;

        let body = read_body(response, self.timeout)?;
        parse_content(&body)
    }
}
