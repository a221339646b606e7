use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{builder::PossibleValuesParser, Parser};
use neurofocus_lib::{
    init_logging,
    models::STUDY_MODES,
    settings::{debug_enabled, SettingsStore},
    FileFrameSource, HttpScoringClient, LoggingObserver, ScoringClient, SessionEngine,
};

#[derive(Parser, Debug)]
#[command(name = "neurofocus")]
#[command(about = "Run a timed focus session against an attention scoring service", long_about = None)]
struct Cli {
    /// Session length in minutes
    #[arg(short, long, default_value_t = 25)]
    minutes: u32,

    /// Study mode sent to the scoring service
    #[arg(short = 'M', long, value_parser = PossibleValuesParser::new(STUDY_MODES))]
    mode: Option<String>,

    /// File holding the current encoded camera frame
    #[arg(short, long)]
    frame: PathBuf,

    /// Settings file
    #[arg(short, long, env = "NEUROFOCUS_SETTINGS", default_value = "neurofocus.json")]
    settings: PathBuf,

    /// Override the scoring service URL
    #[arg(long)]
    scoring_url: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose || debug_enabled());

    log::info!("NeuroFocus starting up...");

    let store = SettingsStore::new(cli.settings.clone())?;
    let mut settings = store.effective();
    if let Some(url) = cli.scoring_url {
        settings.scoring_url = url;
    }

    let scorer: Arc<dyn ScoringClient> = match settings.request_timeout() {
        Some(timeout) => Arc::new(
            HttpScoringClient::with_timeout(&settings.scoring_url, timeout)
                .context("Failed to build scoring client")?,
        ),
        None => Arc::new(HttpScoringClient::new(&settings.scoring_url)),
    };

    let engine = SessionEngine::with_window_capacity(
        Arc::new(FileFrameSource::new(cli.frame)),
        scorer,
        Arc::new(LoggingObserver),
        settings.window_capacity,
    );

    let config = settings.session_config(cli.minutes, cli.mode.as_deref());
    engine.begin(config).await.context("Failed to start session")?;

    let summary = tokio::select! {
        summary = engine.wait_for_summary() => summary,
        _ = tokio::signal::ctrl_c() => {
            log::info!("interrupted, ending session early");
            match engine.end().await {
                Some(summary) => Some(summary),
                None => engine.wait_for_summary().await,
            }
        }
    };

    let summary = summary.context("session ended without a summary")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
