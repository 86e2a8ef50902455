//! Provider routing.
//!
//! Static mapping from analysis kind to backend role and invocation
//! parameters. Parsing the kind name here is the only input-validation gate:
//! an unknown kind is rejected before any backend is touched.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::kind::{AnalysisKind, UnknownKindError};
use super::prompt::prompt_for;

/// Default output budget for the primary backend.
pub const DEFAULT_PRIMARY_MAX_TOKENS: u32 = 5000;
/// Default output budget for the secondary backend.
pub const DEFAULT_SECONDARY_MAX_TOKENS: u32 = 4000;

/// The two backend slots a kind can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendRole {
    /// General text analyses
    Primary,
    /// Structured image-prompt generation
    Secondary,
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendRole::Primary => write!(f, "primary"),
            BackendRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// Routing decision for one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub kind: AnalysisKind,
    pub role: BackendRole,
    pub prompt_text: &'static str,
    pub max_output_tokens: u32,
}

/// Maps kinds to routes using per-role output budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    primary_max_tokens: u32,
    secondary_max_tokens: u32,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_MAX_TOKENS, DEFAULT_SECONDARY_MAX_TOKENS)
    }
}

impl Router {
    pub fn new(primary_max_tokens: u32, secondary_max_tokens: u32) -> Self {
        Self {
            primary_max_tokens,
            secondary_max_tokens,
        }
    }

    /// Backend role serving `kind`.
    pub fn role_for(kind: AnalysisKind) -> BackendRole {
        match kind {
            AnalysisKind::Image => BackendRole::Secondary,
            AnalysisKind::Report
            | AnalysisKind::Emotion
            | AnalysisKind::Memory
            | AnalysisKind::Narrative
            | AnalysisKind::Lyric
            | AnalysisKind::Anniversary => BackendRole::Primary,
        }
    }

    /// Route a known kind.
    pub fn route(&self, kind: AnalysisKind) -> Route {
        let role = Self::role_for(kind);
        let max_output_tokens = match role {
            BackendRole::Primary => self.primary_max_tokens,
            BackendRole::Secondary => self.secondary_max_tokens,
        };
        Route {
            kind,
            role,
            prompt_text: prompt_for(kind),
            max_output_tokens,
        }
    }

    /// Parse and route a caller-supplied kind name.
    pub fn route_name(&self, name: &str) -> Result<Route, UnknownKindError> {
        let kind: AnalysisKind = name.parse()?;
        Ok(self.route(kind))
    }
}
