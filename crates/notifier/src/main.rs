mod channel;
mod config;
mod feed;
mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use schedule_notifier_core::{MessageGenerator, Mode};
use tracing::info;

use crate::{
    channel::{Channel, DiscordWebhook},
    config::{open_config, write_default_config},
    feed::FeedClient,
    version::{long_version, short_version},
};

#[derive(Parser)]
#[command(
    about = "CAMPHOR- Schedule Notifier",
    version = short_version(),
    long_version = long_version()
)]
struct Args {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Write messages to stdout instead of posting them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Announce the next 7 days instead of today
    #[arg(long)]
    week: bool,

    /// Reference time in RFC 3339 (defaults to the current time)
    #[arg(long)]
    now: Option<DateTime<FixedOffset>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.init {
        write_default_config(&args.config)?;
        info!(path = ?args.config, "Created default configuration");
        return Ok(());
    }

    info!(version = short_version(), "schedule-notifier version");

    let config = open_config(&args.config).context("Failed to load configuration")?;
    let tz = config.notifier.timezone;
    let now = match args.now {
        Some(now) => now.with_timezone(&tz),
        None => Utc::now().with_timezone(&tz),
    };
    let mode = Mode::from_week_flag(args.week);
    info!(%now, ?mode, "Reference time resolved");

    let client = FeedClient::new(config.feed.timeout)?;
    info!(
        url = %config.feed.url,
        timeout = %humantime::format_duration(config.feed.timeout),
        "Fetching events"
    );
    let records = client
        .fetch(&config.feed.url)
        .await
        .context("Failed to fetch events")?;
    let events = feed::into_events(records)?;
    info!(events = events.len(), "Events loaded");

    let messages = MessageGenerator::new(events, now, mode)
        .generate_messages()
        .context("Failed to generate messages")?;
    let messages = with_closed_message(messages, mode, config.notifier.closed_message.as_deref());

    if messages.is_empty() {
        info!("Nothing to announce");
        return Ok(());
    }

    let channel = if args.dry_run {
        Channel::Stdout
    } else {
        Channel::Discord(DiscordWebhook::connect(&config.discord.webhook_url).await?)
    };
    channel.send_all(&messages).await?;
    info!(count = messages.len(), "Announcement finished");

    Ok(())
}

/// 当日モードでメッセージが 1 件もなく、閉館時の文面が設定されていればそれを投稿する。
fn with_closed_message(messages: Vec<String>, mode: Mode, closed: Option<&str>) -> Vec<String> {
    match (mode, closed) {
        (Mode::Day, Some(closed)) if messages.is_empty() => vec![closed.to_string()],
        _ => messages,
    }
}
