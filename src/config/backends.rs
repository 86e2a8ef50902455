//! Backend and image configuration types.
//!
//! These are pure data containers (serde structs + validation). Backend
//! fields are optional so users only need to specify what they want to
//! override; anything left out falls back to the provider's defaults.
//!
//! ```toml
//! [backends.primary]
//! provider = "openai"
//! model = "gpt-4o"
//!
//! [backends.secondary]
//! provider = "anthropic"
//! max_output_tokens = 4000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::analyzer::backend::ProviderKind;
use crate::analyzer::image::{DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SEED, DEFAULT_REPLICATE_ENDPOINT};
use crate::analyzer::router::{BackendRole, DEFAULT_PRIMARY_MAX_TOKENS, DEFAULT_SECONDARY_MAX_TOKENS};

const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 180;

/// One backend role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// "openai" or "anthropic"
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default)]
    pub model: Option<String>,
    /// Override the provider endpoint (e.g. an OpenAI-compatible proxy)
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// Per-attempt request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Backend settings with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackend {
    pub role: BackendRole,
    pub provider: ProviderKind,
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

fn default_provider(role: BackendRole) -> ProviderKind {
    match role {
        BackendRole::Primary => ProviderKind::OpenAi,
        BackendRole::Secondary => ProviderKind::Anthropic,
    }
}

fn default_model(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::OpenAi => "gpt-4o",
        ProviderKind::Anthropic => "claude-3-5-sonnet-20241022",
    }
}

fn default_api_key_env(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::OpenAi => "OPENAI_API_KEY",
        ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
    }
}

fn default_max_output_tokens(role: BackendRole) -> u32 {
    match role {
        BackendRole::Primary => DEFAULT_PRIMARY_MAX_TOKENS,
        BackendRole::Secondary => DEFAULT_SECONDARY_MAX_TOKENS,
    }
}

impl BackendConfig {
    /// Fully populated defaults for `role`.
    pub fn defaults_for(role: BackendRole) -> Self {
        let provider = default_provider(role);
        Self {
            provider: Some(provider),
            model: Some(default_model(provider).to_string()),
            endpoint: None,
            api_key_env: Some(default_api_key_env(provider).to_string()),
            max_output_tokens: Some(default_max_output_tokens(role)),
            timeout_secs: Some(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }

    /// Apply defaults for `role`.
    pub fn resolve(&self, role: BackendRole) -> ResolvedBackend {
        let provider = self.provider.unwrap_or_else(|| default_provider(role));
        ResolvedBackend {
            role,
            provider,
            model: self
                .model
                .clone()
                .unwrap_or_else(|| default_model(provider).to_string()),
            endpoint: self
                .endpoint
                .clone()
                .unwrap_or_else(|| provider.default_endpoint().to_string()),
            api_key_env: self
                .api_key_env
                .clone()
                .unwrap_or_else(|| default_api_key_env(provider).to_string()),
            max_output_tokens: self
                .max_output_tokens
                .unwrap_or_else(|| default_max_output_tokens(role)),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self, role: BackendRole) -> Result<(), String> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(format!("backends.{}.model must not be empty", role));
            }
        }
        if let Some(env) = &self.api_key_env {
            if env.trim().is_empty() {
                return Err(format!("backends.{}.api_key_env must not be empty", role));
            }
        }
        if let Some(0) = self.max_output_tokens {
            return Err(format!("backends.{}.max_output_tokens must be > 0", role));
        }
        validate_timeout(&format!("backends.{}.timeout_secs", role), self.timeout_secs)
    }
}

fn validate_timeout(key: &str, timeout: Option<u64>) -> Result<(), String> {
    match timeout {
        Some(0) => Err(format!("{} must be > 0", key)),
        Some(t) if t > 3600 => Err(format!("{} {} exceeds maximum (3600s)", key, t)),
        _ => Ok(()),
    }
}

/// Both backend roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_primary_backend")]
    pub primary: BackendConfig,
    #[serde(default = "default_secondary_backend")]
    pub secondary: BackendConfig,
}

fn default_primary_backend() -> BackendConfig {
    BackendConfig::defaults_for(BackendRole::Primary)
}

fn default_secondary_backend() -> BackendConfig {
    BackendConfig::defaults_for(BackendRole::Secondary)
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_backend(),
            secondary: default_secondary_backend(),
        }
    }
}

impl BackendsConfig {
    pub fn get(&self, role: BackendRole) -> &BackendConfig {
        match role {
            BackendRole::Primary => &self.primary,
            BackendRole::Secondary => &self.secondary,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.primary.validate(BackendRole::Primary)?;
        self.secondary.validate(BackendRole::Secondary)
    }
}

/// Image generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Generate an image for the image kind (false returns an error after the prompt)
    #[serde(default = "default_image_enabled")]
    pub enabled: bool,
    #[serde(default = "default_image_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_image_model")]
    pub model: String,
    /// Environment variable holding the API token
    #[serde(default = "default_image_token_env")]
    pub api_token_env: String,
    #[serde(default = "default_image_seed")]
    pub seed: u64,
    #[serde(default = "default_disable_safety_checker")]
    pub disable_safety_checker: bool,
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
}

pub fn default_image_enabled() -> bool {
    true
}

pub fn default_image_endpoint() -> String {
    DEFAULT_REPLICATE_ENDPOINT.to_string()
}

pub fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

pub fn default_image_token_env() -> String {
    "REPLICATE_API_TOKEN".to_string()
}

pub fn default_image_seed() -> u64 {
    DEFAULT_IMAGE_SEED
}

pub fn default_disable_safety_checker() -> bool {
    true
}

pub fn default_image_timeout() -> u64 {
    120
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: default_image_enabled(),
            endpoint: default_image_endpoint(),
            model: default_image_model(),
            api_token_env: default_image_token_env(),
            seed: default_image_seed(),
            disable_safety_checker: default_disable_safety_checker(),
            timeout_secs: default_image_timeout(),
        }
    }
}

impl ImageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("image.model must not be empty".to_string());
        }
        if self.api_token_env.trim().is_empty() {
            return Err("image.api_token_env must not be empty".to_string());
        }
        validate_timeout("image.timeout_secs", Some(self.timeout_secs))
    }
}
