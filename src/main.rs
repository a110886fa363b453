use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use email_draft::composer::EmailComposer;
use email_draft::config::GeneratorConfig;
use email_draft::llm::{CannedGenerator, DraftGenerator, create_generator};
use email_draft::request::{DraftRequest, Preset};

/// Generate a business email draft and enforce signature, CTA and subject policy.
#[derive(Parser, Debug)]
#[command(name = "email-draft", version, about, long_about = None)]
struct Cli {
    /// Request file (JSON)
    #[arg(long, required_unless_present = "preset", conflicts_with = "preset")]
    request: Option<PathBuf>,

    /// Use a built-in quick-start request instead of a file
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Use a saved generation response instead of calling the service
    #[arg(long)]
    response_file: Option<PathBuf>,

    /// Write the draft here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use alternative subject N (0-based) instead of the resolved one
    #[arg(long)]
    pick: Option<usize>,

    /// Print the prompt and raw response to stderr
    #[arg(long)]
    show_prompt: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let request = match (&cli.request, cli.preset) {
        (Some(path), _) => DraftRequest::from_path(path)
            .with_context(|| format!("Failed to load request from {}", path.display()))?,
        (None, Some(preset)) => DraftRequest::preset(preset),
        (None, None) => anyhow::bail!("either --request or --preset is required"),
    };

    let generator: Arc<dyn DraftGenerator> = match &cli.response_file {
        Some(path) => {
            let saved = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read response from {}", path.display()))?;
            Arc::new(CannedGenerator::new(saved))
        }
        None => create_generator(&GeneratorConfig::from_env()?)?,
    };

    let composition = EmailComposer::new(generator).compose(&request).await?;

    if cli.show_prompt {
        eprintln!("── Prompt ──\n{}\n", composition.prompt);
        eprintln!("── Raw response ──\n{}\n", composition.raw_response);
    }

    let mut processed = composition.processed;
    if let Some(index) = cli.pick {
        if index >= processed.subject_alternatives.len() {
            tracing::warn!(index, "No such subject alternative; keeping the resolved subject");
        }
        processed = processed.pick_subject(index);
    }

    eprintln!("Subject alternatives:");
    for (i, alternative) in processed.subject_alternatives.iter().enumerate() {
        eprintln!("  [{i}] {alternative}");
    }
    if processed.subject_fallback {
        eprintln!("Note: the model returned no usable subject; a fallback subject was used.");
    }
    eprintln!(
        "Subject length: {} chars | Body words: {}",
        processed.draft.subject.chars().count(),
        processed.draft.body.split_whitespace().count()
    );

    let artifact = processed.draft.to_artifact();
    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, artifact.as_bytes())
                .await
                .with_context(|| format!("Failed to write draft to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Draft written");
        }
        None => println!("{artifact}"),
    }

    Ok(())
}
