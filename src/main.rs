use background_service::DailyTrigger;
use clap::Parser;
use reddit_client::{RedditClient, RedditOAuth2Config};
use rumour_collator::{telemetry, Pipeline};
use rumour_core::{AppConfig, CoreError, ErrorReporter};
use signal_engine::LexiconSentiment;
use std::path::PathBuf;

/// Collects merger, layoff, reassignment and workload rumours from subreddits.
#[derive(Debug, Parser)]
#[command(name = "rumour-collator", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Analyse every configured subreddit now and exit instead of waiting for the schedule
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config).map_err(|e| {
        telemetry::report_startup_failure(&e);
        e
    })?;
    telemetry::init(&config.logging).map_err(|e| {
        telemetry::report_startup_failure(&e);
        e
    })?;

    tracing::info!("Starting rumour collator");

    let reporter = ErrorReporter::new();
    if let Err(e) = run(&cli, &config).await {
        reporter.report_error(&e);
        return Err(e.into());
    }
    Ok(())
}

async fn run(cli: &Cli, config: &AppConfig) -> Result<(), CoreError> {
    let forums = config.forums();
    if forums.is_empty() {
        tracing::warn!("No subreddits configured, nothing to analyse");
    }

    let client = RedditClient::new(RedditOAuth2Config::from(&config.reddit))?;
    let pipeline = Pipeline::from_config(client, LexiconSentiment::new(), config)?;

    if cli.once {
        let summaries = pipeline.run_all(&forums).await?;
        for summary in &summaries {
            tracing::info!(
                forum = %summary.forum,
                dir = %summary.directory.display(),
                posts = summary.post_count,
                comments = summary.comment_count,
                "Report written"
            );
        }
        return Ok(());
    }

    let trigger = DailyTrigger::new(&config.schedule.cron)?;
    tracing::info!(cron = %trigger.expression(), forums = forums.len(), "Waiting for schedule");
    trigger.run(|| pipeline.run_all(&forums)).await
}
