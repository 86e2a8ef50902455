//! Conversation analysis pipeline.
//!
//! A transcript and a kind name go in; a text report (or, for the image kind,
//! a prompt, explanation and image reference) comes out.
//!
//! # Module Structure
//!
//! - [`kind`] - The closed set of analysis kinds
//! - [`prepare`] - Normalization, truncation and splitting of transcripts
//! - [`router`] - Kind to backend role and prompt
//! - [`prompt`] - Instruction texts per kind
//! - [`backend`] - HTTP backends for the generation providers
//! - [`client`] - Bounded retry around backend calls
//! - [`recover`] / [`repair`] - Structured payload recovery
//! - [`split`] - Two-way fan-out for oversized timelines
//! - [`image`] - Image materialization
//! - [`service`] - The facade tying it together

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod kind;
pub mod prepare;
pub mod prompt;
pub mod recover;
pub mod repair;
pub mod request;
pub mod retry;
pub mod router;
pub mod service;
pub mod split;

pub use backend::{BackendError, BackendSet, GenerationBackend, GenerationRequest, ProviderKind};
pub use client::GenerationClient;
pub use config::PrepareConfig;
pub use error::AnalysisError;
pub use image::{ImageError, ImageGenerator};
pub use kind::{AnalysisKind, UnknownKindError};
pub use prepare::{prepare, PreparedInput};
pub use recover::{recover, RecoveryError, StructuredPayload};
pub use request::{AnalysisOutput, AnalyzeReply, AnalyzeRequest, AnalyzeResponse};
pub use retry::RetryPolicy;
pub use router::{BackendRole, Route, Router};
pub use service::AnalyzerService;
pub use split::SplitPart;
