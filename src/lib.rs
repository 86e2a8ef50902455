//! chatlens Library
//!
//! Analyze chat conversation transcripts with hosted language models.

pub mod analyzer;
pub mod cli;
pub mod config;

pub use analyzer::{AnalysisError, AnalysisKind, AnalysisOutput, AnalyzerService};
pub use config::Config;
