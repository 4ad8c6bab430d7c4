//! カレンダーフィードの取得。

use std::time::Duration;

use anyhow::{Context as _, Result};
use schedule_notifier_core::{Event, RawEvent};

use crate::version::user_agent;

/// イベント一覧を取得するクライアント。
pub struct FeedClient {
    http_client: reqwest::Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()
            .context("Failed to create HTTP client for event feed")?;

        Ok(Self { http_client })
    }

    /// フィードを取得し、JSON 配列のレコードとして返す。
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawEvent>> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP status: {}", response.status());
        }

        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        let records = parse_events(&body)?;
        tracing::debug!(records = records.len(), "Event feed fetched");
        Ok(records)
    }
}

/// フィードの本文をレコードの一覧としてパースする。
pub fn parse_events(body: &str) -> Result<Vec<RawEvent>> {
    serde_json::from_str(body).context("Failed to parse event feed")
}

/// レコードをイベントに変換する。1 件でも不正なレコードがあれば全体を失敗とする。
pub fn into_events(records: Vec<RawEvent>) -> Result<Vec<Event>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Event::try_from(record).with_context(|| format!("Invalid event record at {index}"))
        })
        .collect()
}
