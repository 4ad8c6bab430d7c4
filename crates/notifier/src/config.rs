use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedConfig {
    /// イベント一覧を JSON で返すエンドポイント
    pub url: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://camph.net/api/v1/events/".to_string(),
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// 「今日」「今週」を判定するタイムゾーン
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// 当日のメッセージが 1 件もないときに代わりに投稿する文面
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_message: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            closed_message: None,
        }
    }
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Tokyo
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiscordConfig {
    pub webhook_url: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            webhook_url: "YOUR_DISCORD_WEBHOOK_URL".to_string(),
        }
    }
}

pub fn open_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
    let config: Config = toml::from_str(&content).context("Failed to parse configuration file")?;
    Ok(config)
}

pub fn write_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let content =
        toml::to_string_pretty(&Config::default()).context("Failed to serialize configuration")?;
    fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
    Ok(())
}
