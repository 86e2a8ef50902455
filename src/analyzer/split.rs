//! Split-merge orchestration.
//!
//! Oversized timeline transcripts are sent as two sub-requests. Both run
//! concurrently through the full retry contract and are joined before any
//! result is assembled. Either half failing fails the whole request; a
//! partial timeline is never returned.

use serde::{Deserialize, Serialize};
use std::fmt;

use tracing::info;

use super::backend::GenerationRequest;
use super::client::GenerationClient;
use super::error::AnalysisError;
use super::prepare::PreparedInput;
use super::router::Route;

/// Which half of a split transcript a sub-request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPart {
    First,
    Second,
}

impl fmt::Display for SplitPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPart::First => write!(f, "first"),
            SplitPart::Second => write!(f, "second"),
        }
    }
}

/// Concatenate two partial results, first half first.
pub fn merge(first: &str, second: &str) -> String {
    format!("{}\n\n{}", first, second)
}

fn sub_request(route: &Route, input: &str) -> GenerationRequest {
    GenerationRequest {
        kind: route.kind,
        role: route.role,
        prompt_text: route.prompt_text.to_string(),
        input_text: input.to_string(),
        max_output_tokens: route.max_output_tokens,
    }
}

/// Runs split inputs through the generation client.
pub struct SplitMerge<'a> {
    client: &'a GenerationClient,
}

impl<'a> SplitMerge<'a> {
    pub fn new(client: &'a GenerationClient) -> Self {
        Self { client }
    }

    /// Generate for `input`, fanning out when it is split.
    pub fn run(&self, route: &Route, input: &PreparedInput) -> Result<String, AnalysisError> {
        match input {
            PreparedInput::Whole { text, .. } => self.client.generate(&sub_request(route, text)),
            PreparedInput::Split {
                first_half,
                second_half,
            } => self.run_split(route, first_half, second_half),
        }
    }

    fn run_split(
        &self,
        route: &Route,
        first_half: &str,
        second_half: &str,
    ) -> Result<String, AnalysisError> {
        let first_request = sub_request(route, first_half);
        let second_request = sub_request(route, second_half);

        info!(kind = %route.kind, "Running split request in two parts");

        // Join barrier: both halves settle before either result is used
        let (first, second) = rayon::join(
            || self.client.generate(&first_request),
            || self.client.generate(&second_request),
        );

        let first = first.map_err(|e| AnalysisError::SplitPartialFailure {
            part: SplitPart::First,
            source: Box::new(e),
        })?;
        let second = second.map_err(|e| AnalysisError::SplitPartialFailure {
            part: SplitPart::Second,
            source: Box::new(e),
        })?;

        Ok(merge(&first, &second))
    }
}
