//! 生成したメッセージの投稿先。

use anyhow::{Context as _, Result};
use serenity::all::{ExecuteWebhook, Http, Webhook};
use tracing::info;

/// メッセージの送り先。
pub enum Channel {
    /// 標準出力に書き出す (dry run)
    Stdout,
    /// Discord の Webhook に投稿する
    Discord(DiscordWebhook),
}

impl Channel {
    /// 1 件のメッセージを 1 件の投稿として送る。
    pub async fn send(&self, message: &str) -> Result<()> {
        match self {
            Channel::Stdout => {
                println!("{message}\n");
                Ok(())
            }
            Channel::Discord(webhook) => webhook.send(message).await,
        }
    }

    /// メッセージを順番に送る。途中で失敗した場合は残りを送らない。
    pub async fn send_all(&self, messages: &[String]) -> Result<()> {
        send_in_order(messages, async |message: &str| self.send(message).await).await
    }
}

async fn send_in_order<F>(messages: &[String], mut send: F) -> Result<()>
where
    F: AsyncFnMut(&str) -> Result<()>,
{
    for (index, message) in messages.iter().enumerate() {
        send(message)
            .await
            .with_context(|| format!("Failed to send message {}", index + 1))?;
        info!(index, total = messages.len(), "Message sent");
    }
    Ok(())
}

pub struct DiscordWebhook {
    http: Http,
    webhook: Webhook,
}

impl DiscordWebhook {
    /// Webhook URL からトークンなしの HTTP クライアントで Webhook を解決する。
    pub async fn connect(url: &str) -> Result<Self> {
        let http = Http::new("");
        let webhook = Webhook::from_url(&http, url)
            .await
            .context("Failed to resolve Discord webhook")?;

        info!(webhook_id = webhook.id.get(), "Discord webhook resolved");
        Ok(Self { http, webhook })
    }

    async fn send(&self, message: &str) -> Result<()> {
        let builder = ExecuteWebhook::new().content(message);
        self.webhook
            .execute(&self.http, true, builder)
            .await
            .context("Failed to execute Discord webhook")?;
        Ok(())
    }
}
