use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::resolver::{self, ResolveError};
use crate::summarize::openai::OpenAiClient;
use crate::summarize::{self, PromptTemplate, SummarizeError, Summarizer};
use crate::transcript::innertube::InnertubeSource;
use crate::transcript::{self, AcquireError, TranscriptSource};

/// Which pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Resolve,
    Acquire,
    Summarize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Resolve(_) => Stage::Resolve,
            PipelineError::Acquire(_) => Stage::Acquire,
            PipelineError::Summarize(_) => Stage::Summarize,
        }
    }
}

/// Terminal artifact of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub video_id: String,
    pub transcript_language: String,
    pub transcript_auto_generated: bool,
    pub transcript_chars: usize,
    pub completed_at: DateTime<Utc>,
}

/// End-to-end summarization pipeline: resolve the reference, acquire a
/// transcript, summarize it. Strictly linear; each stage's failure is final
/// for the invocation and no stage is retried.
pub struct Pipeline {
    source: Box<dyn TranscriptSource>,
    summarizer: Box<dyn Summarizer>,
    template: PromptTemplate,
    preferred_languages: Vec<String>,
}

impl Pipeline {
    /// Wire up the real collaborators from configuration.
    pub fn new(config: &Config, template: PromptTemplate) -> Result<Self, PipelineError> {
        let source = InnertubeSource::new().map_err(|e| {
            PipelineError::Acquire(AcquireError::AllCandidatesFailed {
                video_id: String::new(),
                causes: vec![("source setup".to_string(), e)],
            })
        })?;

        let endpoint = (!config.openai.endpoint.is_empty()).then_some(config.openai.endpoint.as_str());
        let summarizer = OpenAiClient::new(&config.api_key(), endpoint)?;

        Ok(Self::with_collaborators(
            Box::new(source),
            Box::new(summarizer),
            template,
            config.transcript.preferred_languages.clone(),
        ))
    }

    /// Assemble a pipeline from explicit collaborators (used by tests).
    pub fn with_collaborators(
        source: Box<dyn TranscriptSource>,
        summarizer: Box<dyn Summarizer>,
        template: PromptTemplate,
        preferred_languages: Vec<String>,
    ) -> Self {
        Self {
            source,
            summarizer,
            template,
            preferred_languages,
        }
    }

    /// Run the full pipeline for one video reference.
    pub async fn run(&self, reference: &str) -> Result<SummaryOutcome, PipelineError> {
        let video_id = resolver::resolve(reference)?;
        tracing::info!(%video_id, "resolved video reference");

        let transcript =
            transcript::acquire(self.source.as_ref(), &video_id, &self.preferred_languages).await?;
        tracing::info!(
            language = %transcript.language_code,
            chars = transcript.text.len(),
            "acquired transcript"
        );

        let request = summarize::build_request(&transcript.text, &self.template);
        let summary = self.summarizer.complete(&request).await?;
        tracing::info!(chars = summary.len(), "summary generated");

        Ok(SummaryOutcome {
            summary,
            video_id: video_id.to_string(),
            transcript_language: transcript.language_code,
            transcript_auto_generated: transcript.is_generated,
            transcript_chars: transcript.text.len(),
            completed_at: Utc::now(),
        })
    }
}
