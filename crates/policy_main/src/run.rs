use std::sync::Arc;

use anyhow::Context as _;
use policy_config::{PolicyConfig, SystemPrompt, load_catalog};
use policy_domain::{AnswerSource, RunReport};
use policy_provider::{AnthropicSource, HttpChatSource};
use policy_server::ChatService;
use policy_verdict::{Grader, RunOptions, VerdictEngine};
use tokio::net::TcpListener;
use tracing::info;

use crate::{Progress, ServeArgs, SourceMode, ValidateArgs};

/// Runs the catalog against the selected source, prints progress and the
/// summary, and writes the report.
pub async fn validate(args: ValidateArgs, mut config: PolicyConfig) -> anyhow::Result<RunReport> {
    if let Some(model) = &args.model {
        config.model = model.clone();
    }

    let catalog = load_catalog(args.catalog.as_deref())?;
    let source = answer_source(&args.mode(), &config)?;

    let options = RunOptions::default()
        .call_delay(
            args.delay_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| config.call_delay()),
        )
        .grader(
            Grader::default()
                .partial_threshold(config.partial_threshold)
                .preview_chars(config.preview_chars),
        );

    let progress = Progress::new(catalog.len());
    progress.print_header();

    let report = VerdictEngine::new(source, options)
        .run_all_with(&catalog, |case, result| progress.print_result(case, result))
        .await;

    progress.print_summary(&report.summary);

    let output = args.output.unwrap_or_else(|| config.report_path.clone());
    report.write_json(&output)?;
    println!("Results saved to: {}", output.display());

    Ok(report)
}

/// Builds the answer source for a run. API mode fails here, before any case
/// is attempted, when the credential or knowledge base is unavailable.
pub fn answer_source(
    mode: &SourceMode,
    config: &PolicyConfig,
) -> anyhow::Result<Arc<dyn AnswerSource>> {
    match mode {
        SourceMode::Api => {
            let source = anthropic(config)?;
            println!("Testing Anthropic API directly ({})", source.model());
            Ok(Arc::new(source))
        }
        SourceMode::Url(url) => {
            let source = HttpChatSource::new(url, config.request_timeout(), config.retry.clone())?;
            println!("Testing deployed service at {}", source.url());
            Ok(Arc::new(source))
        }
    }
}

fn anthropic(config: &PolicyConfig) -> anyhow::Result<AnthropicSource> {
    let api_key = config.api_key()?;
    let prompt = SystemPrompt::load(config)?;
    AnthropicSource::new(config, api_key, prompt)
}

/// Serves the chat endpoint until the listener fails.
pub async fn serve(args: ServeArgs, mut config: PolicyConfig) -> anyhow::Result<()> {
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let source = anthropic(&config)?;
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Starting chat service");

    ChatService::new(Arc::new(source), config.model).serve(listener).await
}
