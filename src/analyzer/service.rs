//! AnalyzerService facade for orchestrating analysis operations.
//!
//! This module provides the main entry point for analyzing a transcript.
//!
//! # Workflow
//!
//! 1. Route the kind name (unknown kinds never reach the network)
//! 2. Reject empty transcripts
//! 3. Prepare the input (normalize, truncate or split)
//! 4. Generate through the retrying client
//! 5. For the image kind, recover the payload and materialize the image

use tracing::{debug, info, warn};

use super::backend::{BackendSet, BackendSettings, GenerationRequest};
use super::client::GenerationClient;
use super::config::PrepareConfig;
use super::error::AnalysisError;
use super::image::{ImageGenerator, ReplicateImageGenerator, ReplicateSettings};
use super::prepare::{prepare, PreparedInput};
use super::recover::{recover, StructuredPayload};
use super::request::{AnalysisOutput, AnalyzeReply, AnalyzeRequest};
use super::retry::RetryPolicy;
use super::router::{BackendRole, Route, Router};
use super::split::SplitMerge;
use crate::config::Config;
use std::time::Duration;

/// Main service for analyzing transcripts.
///
/// Facade pattern - coordinates routing, preparation, generation and
/// image materialization.
pub struct AnalyzerService {
    router: Router,
    prepare: PrepareConfig,
    client: GenerationClient,
    image: Option<Box<dyn ImageGenerator>>,
}

impl AnalyzerService {
    /// Create a service without an image generator.
    pub fn new(router: Router, prepare: PrepareConfig, client: GenerationClient) -> Self {
        Self {
            router,
            prepare,
            client,
            image: None,
        }
    }

    /// Attach the image generator used by the image kind.
    pub fn with_image_generator(mut self, generator: Box<dyn ImageGenerator>) -> Self {
        self.image = Some(generator);
        self
    }

    /// Build a service from configuration, reading credentials from the
    /// process environment.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_env(config, |name| std::env::var(name).ok())
    }

    /// Build a service from configuration with an explicit credential lookup.
    ///
    /// A role whose key is missing (or whose backend fails to build) is left
    /// unconfigured; requests routed to it fail with `BackendNotConfigured`.
    pub fn from_config_with_env<F>(config: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut backends = BackendSet::empty();
        for role in [BackendRole::Primary, BackendRole::Secondary] {
            let resolved = config.backends.get(role).resolve(role);
            let api_key = env(&resolved.api_key_env).filter(|k| !k.trim().is_empty());
            backends = match api_key {
                Some(api_key) => {
                    let settings = BackendSettings {
                        model: resolved.model.clone(),
                        endpoint: resolved.endpoint.clone(),
                        api_key,
                        timeout: resolved.timeout,
                    };
                    match resolved.provider.create_backend(&settings) {
                        Ok(backend) => {
                            debug!(%role, provider = %resolved.provider, model = %resolved.model, "Backend configured");
                            backends.with_backend(role, backend)
                        }
                        Err(e) => {
                            warn!(%role, error = %e, "Failed to create backend");
                            backends.with_missing(role, e.to_string())
                        }
                    }
                }
                None => backends.with_missing(role, format!("{} is not set", resolved.api_key_env)),
            };
        }

        let router = Router::new(
            config
                .backends
                .primary
                .resolve(BackendRole::Primary)
                .max_output_tokens,
            config
                .backends
                .secondary
                .resolve(BackendRole::Secondary)
                .max_output_tokens,
        );
        let client = GenerationClient::new(backends, config.retry.to_policy());
        let service = Self::new(router, config.limits, client);

        if !config.image.enabled {
            return service;
        }
        match env(&config.image.api_token_env).filter(|t| !t.trim().is_empty()) {
            Some(api_token) => {
                let settings = ReplicateSettings {
                    endpoint: config.image.endpoint.clone(),
                    model: config.image.model.clone(),
                    api_token,
                    seed: config.image.seed,
                    disable_safety_checker: config.image.disable_safety_checker,
                    timeout: Duration::from_secs(config.image.timeout_secs),
                };
                match ReplicateImageGenerator::new(settings) {
                    Ok(generator) => service.with_image_generator(Box::new(generator)),
                    Err(e) => {
                        warn!(error = %e, "Failed to create image generator");
                        service
                    }
                }
            }
            None => {
                debug!(env = %config.image.api_token_env, "Image token not set");
                service
            }
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.client.policy()
    }

    /// Route and prepare without touching the network.
    pub fn plan(
        &self,
        kind_name: &str,
        transcript: &str,
    ) -> Result<(Route, PreparedInput), AnalysisError> {
        let route = self
            .router
            .route_name(kind_name)
            .map_err(|e| AnalysisError::UnknownKind { name: e.0 })?;

        if transcript.trim().is_empty() {
            return Err(AnalysisError::NoContent);
        }

        let input = prepare(transcript, route.kind, &self.prepare);
        Ok((route, input))
    }

    /// Analyze `transcript` with the kind named `kind_name`.
    pub fn analyze(
        &self,
        kind_name: &str,
        transcript: &str,
    ) -> Result<AnalysisOutput, AnalysisError> {
        let (route, input) = self.plan(kind_name, transcript)?;
        info!(
            kind = %route.kind,
            role = %route.role,
            chars = input.char_count(),
            split = input.is_split(),
            "Analyzing transcript"
        );

        if route.kind.expects_structured() {
            return self.analyze_image(&route, &input);
        }

        SplitMerge::new(&self.client)
            .run(&route, &input)
            .map(AnalysisOutput::Text)
    }

    /// Analyze an inbound request and shape the reply.
    pub fn analyze_request(&self, request: &AnalyzeRequest) -> AnalyzeReply {
        if let Some(part) = request.part {
            info!(%part, kind = %request.kind, "Received split part");
        }
        let reply = AnalyzeReply::from(self.analyze(&request.kind, &request.transcript));
        if !reply.is_success() {
            warn!(status = reply.status, kind = %request.kind, "Analysis failed");
        }
        reply
    }

    fn analyze_image(
        &self,
        route: &Route,
        input: &PreparedInput,
    ) -> Result<AnalysisOutput, AnalysisError> {
        // Only splittable kinds are ever split
        let text = match input {
            PreparedInput::Whole { text, .. } => text.clone(),
            PreparedInput::Split {
                first_half,
                second_half,
            } => format!("{}{}", first_half, second_half),
        };
        let request = GenerationRequest {
            kind: route.kind,
            role: route.role,
            prompt_text: route.prompt_text.to_string(),
            input_text: text,
            max_output_tokens: route.max_output_tokens,
        };

        let StructuredPayload {
            prompt,
            explanation,
        } = self.client.generate_with(&request, recover)?;

        let generator =
            self.image
                .as_ref()
                .ok_or_else(|| AnalysisError::BackendNotConfigured {
                    role: route.role,
                    reason: "no image generator is configured".to_string(),
                })?;

        let image_url = generator
            .generate(&prompt)
            .map_err(|e| AnalysisError::ImageGenerationFailed {
                reason: e.to_string(),
            })?;
        debug!(generator = generator.name(), "Image materialized");

        Ok(AnalysisOutput::Image {
            prompt,
            explanation,
            image_url,
        })
    }
}
