//! slack-relay - standalone host for the Slack notifier.
//!
//! Reads one notification from a JSON file and relays it to the
//! configured webhook. Platforms embedding the library use the
//! `NotificationSender` trait directly instead.

use anyhow::{Context, Result};
use clap::Parser;
use slack_relay::{
    cli::Cli,
    config::{Config, OPTION_SCHEMA},
    core::{BaseUrlResolver, NoopTagLookup, Notification, NotificationSender},
    notification::slack::{SlackNotifier, TITLE, VERSION},
    transport::HttpTransport,
};
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_schema {
        println!("{}", serde_json::to_string_pretty(OPTION_SCHEMA)?);
        return Ok(());
    }

    let config = Config::load(&cli.config.to_string_lossy())
        .with_context(|| format!("Failed to load configuration: {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!("slack-relay starting up ({} notifier v{})...", TITLE, VERSION);
    info!("Base URL: {}", config.base_url);
    info!(
        "Webhook: {}",
        if config.slack.is_configured() {
            "Configured"
        } else {
            "Not configured"
        }
    );
    info!("Sort On Tag: {}", config.slack.sort_on_tag);

    let notification = read_notification(&cli)?;

    let notifier = SlackNotifier::new(
        config.slack,
        Arc::new(NoopTagLookup),
        Arc::new(BaseUrlResolver::new(config.base_url)),
        Arc::new(HttpTransport::new()?),
    );

    notifier.notify(&notification).await?;
    info!("Done.");
    Ok(())
}

fn read_notification(cli: &Cli) -> Result<Notification> {
    // clap enforces the path unless --print-schema was given, and that
    // mode exits before reaching here.
    let path = cli
        .notification
        .as_deref()
        .context("No notification file given")?;

    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read notification from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read notification file: {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Failed to parse notification JSON")
}
