//! Discord webhook notifier.
//!
//! Renders one rich embed per announcement and delivers it to the configured
//! webhook. Payload building is pure so the embed shape is testable without
//! a network.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::{Config, PromotionRecord};
use crate::utils::http::create_async_client;

/// Embed accent color (yellow).
const EMBED_COLOR: u32 = 16_776_960;

/// Footer line on every announcement.
const FOOTER_TEXT: &str = "Epic Games Freebie Notifier";

/// Kind of announcement to deliver for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    New,
    UpdatedExpiration,
    Removed,
}

impl ChangeKind {
    /// Status tag shown next to the title.
    pub fn status_label(self) -> &'static str {
        match self {
            ChangeKind::New => "New",
            ChangeKind::UpdatedExpiration => "Updated Expiration",
            ChangeKind::Removed => "No Longer Free",
        }
    }
}

/// Sink for promotion announcements.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one announcement. A failure affects only this event.
    async fn announce(&self, record: &PromotionRecord, kind: ChangeKind) -> Result<()>;
}

/// Notifier delivering rich embeds to a Discord webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Create a notifier from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            webhook_url: config.discord_webhook.clone(),
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn announce(&self, record: &PromotionRecord, kind: ChangeKind) -> Result<()> {
        let payload = build_embed_payload(record, kind, Utc::now());

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notify(&record.id, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(
                &record.id,
                format!("webhook returned {status}: {body}"),
            ));
        }

        log::info!(
            "Successfully sent: {} ({})",
            record.title,
            kind.status_label()
        );
        Ok(())
    }
}

/// Build the webhook payload for one announcement.
///
/// One embed titled `{title} ({status})` with a yellow accent, the cover
/// image when there is one, and a description carrying the countdown, the
/// struck-through original price and the claim link.
pub fn build_embed_payload(record: &PromotionRecord, kind: ChangeKind, now: DateTime<Utc>) -> Value {
    let mut embed = json!({
        "title": format!("{} ({})", record.title, kind.status_label()),
        "description": build_description(record, kind, now),
        "color": EMBED_COLOR,
        "footer": { "text": FOOTER_TEXT },
        "timestamp": now.to_rfc3339(),
    });

    if !record.image_url.is_empty() {
        embed["image"] = json!({ "url": record.image_url });
    }

    json!({ "embeds": [embed] })
}

fn build_description(record: &PromotionRecord, kind: ChangeKind, now: DateTime<Utc>) -> String {
    let mut lines: Vec<String> = Vec::new();

    match kind {
        ChangeKind::New | ChangeKind::UpdatedExpiration => {
            let ts = record.end_time.timestamp();
            lines.push(format!(
                "🔥 **FREE for {} days!** (<t:{ts}:R> (⏰ <t:{ts}:t>))",
                record.remaining_days(now)
            ));
            lines.push(format!("⏰ Time Remaining: {}", record.time_remaining(now)));

            if record.original_price > 0 {
                lines.push(format!(
                    "\n💰 Original Price: ~~{}~~ → **FREE**",
                    record.display_original_price()
                ));
            }

            if !record.claim_url.is_empty() {
                lines.push(format!("\n👉 **[🎮 Claim Now]({})**", record.claim_url));
            }
        }
        ChangeKind::Removed => {
            lines.push("💸 **No longer free.** The giveaway has ended.".to_string());
            if record.original_price > 0 {
                lines.push(format!(
                    "\n💰 Price returns to **{}**",
                    record.display_original_price()
                ));
            }
        }
    }

    lines.join("\n")
}
