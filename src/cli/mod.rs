use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "ytsum - Summarize YouTube videos from their transcripts using OpenAI",
    version,
    long_about = "A CLI tool that fetches the transcript of a YouTube video, falling back across \
                  the available caption tracks, and asks an OpenAI model for a topic-organized \
                  summary of its content."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize a video from a URL or bare video id
    Summarize {
        /// Video reference (watch/short/embed URL, or a bare video id)
        #[arg(value_name = "URL_OR_ID")]
        reference: String,

        /// Preferred transcript language, repeatable in priority order
        /// (all other tracks are still tried as fallbacks)
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Model to use (overrides the configured one)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Sampling temperature, 0.0 - 2.0 (overrides the configured one)
        #[arg(short, long, value_name = "TEMP", value_parser = parse_temperature)]
        temperature: Option<f64>,

        /// Maximum tokens in the summary (overrides the configured one)
        #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..))]
        max_output_tokens: Option<u32>,

        /// Use the free-form prompt instead of the topic-organized one
        #[arg(long)]
        free_form: bool,
    },

    /// Configure API credentials and defaults
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Same range `Config::validate` enforces for the configured value.
fn parse_temperature(raw: &str) -> Result<f64, String> {
    let temperature: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if (0.0..=2.0).contains(&temperature) {
        Ok(temperature)
    } else {
        Err(format!(
            "temperature must be between 0.0 and 2.0 (got {temperature})"
        ))
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Plain text, just the summary
    Text,
    /// Markdown with provenance metadata
    Markdown,
    /// JSON with all outcome fields
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_within_range_parses() {
        assert_eq!(parse_temperature("0.7").unwrap(), 0.7);
        assert_eq!(parse_temperature("0").unwrap(), 0.0);
        assert_eq!(parse_temperature("2.0").unwrap(), 2.0);
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        assert!(parse_temperature("9").is_err());
        assert!(parse_temperature("-0.1").is_err());
        assert!(parse_temperature("warm").is_err());
    }
}
