//! Transcript normalization, truncation and splitting.
//!
//! Chat exports prefix every message with a timestamp
//! (`2024/08/10 23:03, Alice : hello`). The prefix carries no information the
//! models need, so it is collapsed to `Alice : hello` before any length is
//! measured. The normalized text is then fitted to the context budget:
//!
//! - splittable kinds longer than the split threshold keep both ends as two
//!   halves with "omitted" markers
//! - everything else keeps the most recent `truncate_chars` characters
//!
//! All lengths are counted in `char`s so a cut never lands inside a code point.

use std::sync::OnceLock;

use regex::Regex;

use super::config::PrepareConfig;
use super::kind::AnalysisKind;

/// Appended when the start of a transcript was dropped.
pub const EARLIER_OMITTED_MARKER: &str = "\n\n... (earlier conversation was omitted)";

/// Appended to the first half of a split transcript.
pub const MIDDLE_OMITTED_MARKER: &str = "\n\n... (the middle of the conversation was omitted)";

const MESSAGE_PREFIX_PATTERN: &str = r"\d{4}/\d{2}/\d{2} \d{2}:\d{2}, ([^:]+) : ";

fn message_prefix() -> Option<&'static Regex> {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    PREFIX
        .get_or_init(|| Regex::new(MESSAGE_PREFIX_PATTERN).ok())
        .as_ref()
}

/// Transcript fitted to the context budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedInput {
    /// Single request input.
    Whole {
        text: String,
        /// True when the start of the transcript was dropped
        truncated: bool,
    },
    /// Two sub-request inputs covering both ends of the transcript.
    Split {
        first_half: String,
        second_half: String,
    },
}

impl PreparedInput {
    /// Whether this input needs the split-merge path.
    pub fn is_split(&self) -> bool {
        matches!(self, PreparedInput::Split { .. })
    }

    /// Total characters that will be sent, markers included.
    pub fn char_count(&self) -> usize {
        match self {
            PreparedInput::Whole { text, .. } => text.chars().count(),
            PreparedInput::Split {
                first_half,
                second_half,
            } => first_half.chars().count() + second_half.chars().count(),
        }
    }
}

/// Collapse per-message timestamp prefixes to `<sender> : `.
///
/// Date separator lines (e.g. a day header) are left alone.
pub fn normalize(raw: &str) -> String {
    match message_prefix() {
        Some(re) => re.replace_all(raw, "$1 : ").into_owned(),
        None => {
            tracing::error!("message prefix pattern failed to compile, skipping normalization");
            raw.to_string()
        }
    }
}

/// Byte offset of the `n`th char, or the string length when out of range.
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// The first `n` chars of `text`.
pub fn head_chars(text: &str, n: usize) -> &str {
    &text[..byte_offset(text, n)]
}

/// The last `n` chars of `text`.
pub fn tail_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    &text[byte_offset(text, total - n)..]
}

/// Keep the last `budget` chars, appending the omitted marker when anything
/// was cut. Returns the text and whether truncation happened.
pub fn truncate_tail(text: &str, budget: usize) -> (String, bool) {
    if text.chars().count() <= budget {
        return (text.to_string(), false);
    }
    let mut kept = tail_chars(text, budget).to_string();
    kept.push_str(EARLIER_OMITTED_MARKER);
    (kept, true)
}

/// Take `half` chars from each end, each with its own marker.
pub fn split_ends(text: &str, half: usize) -> (String, String) {
    let mut first = head_chars(text, half).to_string();
    first.push_str(MIDDLE_OMITTED_MARKER);
    let mut second = tail_chars(text, half).to_string();
    second.push_str(EARLIER_OMITTED_MARKER);
    (first, second)
}

/// Normalize and fit a raw transcript for the given kind.
pub fn prepare(raw: &str, kind: AnalysisKind, config: &PrepareConfig) -> PreparedInput {
    let normalized = normalize(raw);
    let length = normalized.chars().count();

    if kind.supports_split() && length > config.split_threshold_chars {
        let (first_half, second_half) = split_ends(&normalized, config.split_half_chars);
        tracing::debug!(
            kind = %kind,
            chars = length,
            half = config.split_half_chars,
            "Transcript split into two halves"
        );
        return PreparedInput::Split {
            first_half,
            second_half,
        };
    }

    let (text, truncated) = truncate_tail(&normalized, config.truncate_chars);
    if truncated {
        tracing::debug!(
            kind = %kind,
            chars = length,
            kept = config.truncate_chars,
            "Transcript truncated to its most recent part"
        );
    }
    PreparedInput::Whole { text, truncated }
}
