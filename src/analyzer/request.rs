//! Request and response shapes at the analysis boundary.
//!
//! Inbound: `{ "kind": "...", "transcript": "...", "part": "first" }`.
//! `type` and `chatData` are accepted as aliases. Outbound: `{ "result": ... }`
//! on success or `{ "error": "..." }` with a 400/500 status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AnalysisError;
use super::split::SplitPart;

/// Inbound analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Kind name, validated by the router
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(alias = "chatData")]
    pub transcript: String,
    /// Informational tag set by callers that split on their side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<SplitPart>,
}

/// Successful analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    /// Image prompt, explanation and generated image reference.
    Image {
        prompt: String,
        explanation: String,
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    /// Free-form text report.
    Text(String),
}

impl fmt::Display for AnalysisOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisOutput::Text(text) => write!(f, "{}", text),
            AnalysisOutput::Image {
                prompt,
                explanation,
                image_url,
            } => {
                writeln!(f, "Prompt: {}", prompt)?;
                writeln!(f, "Explanation: {}", explanation)?;
                write!(f, "Image: {}", image_url)
            }
        }
    }
}

/// Response body at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success { result: AnalysisOutput },
    Failure { error: String },
}

/// Response body plus HTTP-style status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeReply {
    pub status: u16,
    pub body: AnalyzeResponse,
}

impl AnalyzeReply {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl From<Result<AnalysisOutput, AnalysisError>> for AnalyzeReply {
    fn from(result: Result<AnalysisOutput, AnalysisError>) -> Self {
        match result {
            Ok(result) => AnalyzeReply {
                status: 200,
                body: AnalyzeResponse::Success { result },
            },
            Err(error) => AnalyzeReply {
                status: error.status(),
                body: AnalyzeResponse::Failure {
                    error: error.to_string(),
                },
            },
        }
    }
}
