use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI configuration
    pub openai: OpenAiConfig,

    /// Transcript acquisition settings
    pub transcript: TranscriptConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key; the OPENAI_API_KEY environment variable takes precedence
    pub api_key: String,

    /// Override for the API endpoint (e.g. a proxy); empty means the default
    pub endpoint: String,

    /// Model used for summarization
    pub model: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f64,

    /// Maximum tokens in the generated summary
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Language codes to prefer, in order; all other tracks are still tried
    pub preferred_languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai: OpenAiConfig {
                api_key: String::new(),
                endpoint: String::new(),
                model: "gpt-4".to_string(),
                temperature: 0.7,
                max_output_tokens: 500,
            },
            transcript: TranscriptConfig {
                preferred_languages: vec!["en".to_string()],
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("ytsum").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            anyhow::bail!(
                "openai.temperature must be between 0.0 and 2.0 (got {})",
                self.openai.temperature
            );
        }

        if self.openai.max_output_tokens == 0 {
            anyhow::bail!("openai.max_output_tokens must be positive");
        }

        if self.openai.model.trim().is_empty() {
            anyhow::bail!("openai.model must be set");
        }

        Ok(())
    }

    /// Resolve the API key, preferring the environment over the config file
    pub fn api_key(&self) -> String {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| self.openai.api_key.trim().to_string())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Model: {}", self.openai.model);
        println!("  Temperature: {}", self.openai.temperature);
        println!("  Max Output Tokens: {}", self.openai.max_output_tokens);
        if !self.openai.endpoint.is_empty() {
            println!("  Endpoint: {}", self.openai.endpoint);
        }
        println!(
            "  API Key: {}",
            if self.api_key().is_empty() { "(not set)" } else { "(configured)" }
        );
        println!(
            "  Preferred Languages: {}",
            self.transcript.preferred_languages.join(", ")
        );
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
