use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod openai;

/// Everything needed to turn a transcript into a completion request:
/// the persona/system instruction, how the transcript is framed as user
/// content, and the generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system_instruction: String,
    /// Prepended to the transcript to form the user message.
    pub user_preamble: String,
    pub model: String,
    /// Sampling temperature, valid range 0.0..=2.0.
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl PromptTemplate {
    /// Default template: a detailed summary organized into topics, with the
    /// main points translated into the reader's language where needed.
    pub fn topics(model: &str, temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            system_instruction: "You are an assistant that writes detailed summaries \
                                 organized into topics."
                .to_string(),
            user_preamble: "Please translate and summarize the main points of the \
                            following transcript:"
                .to_string(),
            model: model.to_string(),
            temperature,
            max_output_tokens,
        }
    }

    /// Free-form variant: no imposed structure.
    pub fn free_form(model: &str, temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            system_instruction: "You are an assistant that writes concise, faithful \
                                 summaries of video transcripts."
                .to_string(),
            user_preamble: "Summarize the following transcript:".to_string(),
            model: model.to_string(),
            temperature,
            max_output_tokens,
        }
    }
}

/// Chat completion request payload. Built fresh per invocation and never
/// mutated afterwards; serializes directly to the OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Build the completion request for a transcript. Pure: identical inputs
/// produce a byte-identical request, and the transcript is passed through
/// untouched (no truncation or translation here).
pub fn build_request(transcript: &str, template: &PromptTemplate) -> SummaryRequest {
    SummaryRequest {
        model: template.model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: template.system_instruction.clone(),
            },
            Message {
                role: "user".to_string(),
                content: format!("{}\n\n{}", template.user_preamble, transcript),
            },
        ],
        temperature: template.temperature,
        max_tokens: template.max_output_tokens,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarization request failed: {0}")]
    TransportFailure(String),

    #[error("summarization service rejected the credential: {0}")]
    AuthFailure(String),

    #[error("summarization service returned no completion text")]
    EmptyResponse,
}

/// Summarization service client. The concrete implementation talks to the
/// OpenAI API ([`openai::OpenAiClient`]); tests substitute fakes.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Run one completion and return the normalized summary text.
    async fn complete(&self, request: &SummaryRequest) -> Result<String, SummarizeError>;
}
