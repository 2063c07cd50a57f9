use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ytsum::cli::{Cli, Commands};
use ytsum::config::Config;
use ytsum::pipeline::{Pipeline, PipelineError, Stage};
use ytsum::summarize::PromptTemplate;
use ytsum::output;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ytsum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().await?;

    match cli.command {
        Commands::Summarize {
            reference,
            languages,
            output: output_path,
            format,
            model,
            temperature,
            max_output_tokens,
            free_form,
        } => {
            let model = model.unwrap_or_else(|| config.openai.model.clone());
            let temperature = temperature.unwrap_or(config.openai.temperature);
            let max_tokens = max_output_tokens.unwrap_or(config.openai.max_output_tokens);

            let template = if free_form {
                PromptTemplate::free_form(&model, temperature, max_tokens)
            } else {
                PromptTemplate::topics(&model, temperature, max_tokens)
            };

            let mut config = config;
            if !languages.is_empty() {
                config.transcript.preferred_languages = languages;
            }

            let pipeline = match Pipeline::new(&config, template) {
                Ok(pipeline) => pipeline,
                Err(e) => return report_failure(e),
            };

            tracing::info!("Starting summarization for: {}", reference);

            let progress = (!cli.quiet).then(|| {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap(),
                );
                spinner.enable_steady_tick(std::time::Duration::from_millis(120));
                spinner.set_message("Fetching transcript and summarizing...");
                spinner
            });

            let result = pipeline.run(&reference).await;

            if let Some(spinner) = progress {
                spinner.finish_and_clear();
            }

            match result {
                Ok(outcome) => match output_path {
                    Some(path) => {
                        output::save_to_file(&outcome, &path, &format).await?;
                        println!("Summary saved to: {}", path.display());
                    }
                    None => output::print_to_console(&outcome, &format)?,
                },
                Err(e) => return report_failure(e),
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file directly:");
                println!("  ~/.config/ytsum/config.yaml");
                println!("The OPENAI_API_KEY environment variable overrides openai.api_key.");
            }
        }
    }

    Ok(())
}

/// Render a stage-tagged pipeline failure and exit non-zero.
fn report_failure(error: PipelineError) -> Result<()> {
    let stage = match error.stage() {
        Stage::Resolve => "resolving the video reference",
        Stage::Acquire => "fetching the transcript",
        Stage::Summarize => "generating the summary",
    };
    eprintln!("Error while {}: {}", stage, error);

    if let PipelineError::Acquire(ytsum::transcript::AcquireError::AllCandidatesFailed {
        causes,
        ..
    }) = &error
    {
        for (track, cause) in causes {
            eprintln!("  - {}: {}", track, cause);
        }
    }

    std::process::exit(1);
}
