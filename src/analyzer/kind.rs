//! Analysis kinds.
//!
//! The set of kinds is fixed at build time. Each kind selects a prompt from
//! the catalog and a backend role from the router.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed analysis category requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Relationship report quoting the conversation verbatim.
    #[serde(rename = "basic")]
    Report,
    /// Frequency survey of six basic emotions.
    Emotion,
    /// Month-by-month memory timeline.
    Memory,
    /// Past-life narrative.
    #[serde(rename = "past")]
    Narrative,
    /// Rap lyrics about the relationship.
    #[serde(rename = "rap")]
    Lyric,
    /// Invented anniversary with its backing dialogue.
    Anniversary,
    /// Image prompt plus explanation, returned as JSON.
    Image,
}

impl AnalysisKind {
    /// Every registered kind, in display order.
    pub fn all() -> &'static [AnalysisKind] {
        &[
            AnalysisKind::Report,
            AnalysisKind::Emotion,
            AnalysisKind::Memory,
            AnalysisKind::Narrative,
            AnalysisKind::Lyric,
            AnalysisKind::Anniversary,
            AnalysisKind::Image,
        ]
    }

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Report => "basic",
            AnalysisKind::Emotion => "emotion",
            AnalysisKind::Memory => "memory",
            AnalysisKind::Narrative => "past",
            AnalysisKind::Lyric => "rap",
            AnalysisKind::Anniversary => "anniversary",
            AnalysisKind::Image => "image",
        }
    }

    /// Descriptive alias accepted alongside the canonical name.
    pub fn alias(&self) -> &'static str {
        match self {
            AnalysisKind::Report => "report",
            AnalysisKind::Emotion => "emotion-survey",
            AnalysisKind::Memory => "memory-timeline",
            AnalysisKind::Narrative => "narrative",
            AnalysisKind::Lyric => "lyric",
            AnalysisKind::Anniversary => "anniversary",
            AnalysisKind::Image => "image-prompt",
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisKind::Report => "Conversation report: speech style, personality, memories",
            AnalysisKind::Emotion => "Emotion survey with quoted examples",
            AnalysisKind::Memory => "Chronological timeline of the main event per month",
            AnalysisKind::Narrative => "Story of the pair's relationship in a past life",
            AnalysisKind::Lyric => "Rap lyrics about the relationship",
            AnalysisKind::Anniversary => "A meaningful anniversary drawn from the chat",
            AnalysisKind::Image => "Abstract image prompt, explanation and generated image",
        }
    }

    /// Whether the response must be a structured JSON payload.
    pub fn expects_structured(&self) -> bool {
        matches!(self, AnalysisKind::Image)
    }

    /// Whether oversized transcripts are split instead of truncated.
    pub fn supports_split(&self) -> bool {
        matches!(self, AnalysisKind::Memory)
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a kind name is not registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindError(pub String);

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown analysis kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKindError {}

impl FromStr for AnalysisKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        AnalysisKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == needle || kind.alias() == needle)
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}
