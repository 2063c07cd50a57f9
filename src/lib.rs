//! ytsum - Summarize YouTube videos from their transcripts
//!
//! This library resolves a video reference into a canonical id, acquires a
//! transcript across the available caption tracks with language-preference
//! fallback, and asks an OpenAI model for a structured summary.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod summarize;
pub mod transcript;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{Pipeline, PipelineError, Stage, SummaryOutcome};
pub use resolver::{resolve, VideoId};
pub use summarize::{PromptTemplate, Summarizer};
pub use transcript::{Transcript, TranscriptSource, TranscriptTrack};

/// Result type used throughout the binary
pub type Result<T> = anyhow::Result<T>;
