use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::SummaryOutcome;
use crate::Result;

/// Save a summary to file
pub async fn save_to_file(outcome: &SummaryOutcome, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(outcome, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a summary to the console
pub fn print_to_console(outcome: &SummaryOutcome, format: &OutputFormat) -> Result<()> {
    println!("{}", render(outcome, format)?);
    Ok(())
}

fn render(outcome: &SummaryOutcome, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => outcome.summary.clone(),
        OutputFormat::Markdown => format_as_markdown(outcome),
        OutputFormat::Json => serde_json::to_string_pretty(outcome)?,
    })
}

fn format_as_markdown(outcome: &SummaryOutcome) -> String {
    let origin = if outcome.transcript_auto_generated {
        "auto-generated"
    } else {
        "authored"
    };

    format!(
        "# Summary of {id}\n\n{summary}\n\n---\n*Transcript: {lang} ({origin}), {chars} characters. \
         Generated {when}.*\n",
        id = outcome.video_id,
        summary = outcome.summary,
        lang = outcome.transcript_language,
        origin = origin,
        chars = outcome.transcript_chars,
        when = outcome.completed_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
