//! Promotion record data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-game promotion normalized from the storefront feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromotionRecord {
    /// Stable product identifier (product slug, falling back to the offer id)
    pub id: String,

    /// Display title
    pub title: String,

    /// Promotional window start (UTC)
    pub start_time: DateTime<Utc>,

    /// Promotional window end (UTC)
    pub end_time: DateTime<Utc>,

    /// Pre-promotion price in minor currency units (e.g. cents)
    pub original_price: i64,

    /// Current price in minor currency units; zero while the game is free
    pub discount_price: i64,

    /// ISO 4217 currency code as reported by the feed
    pub currency_code: String,

    /// Cover image URL (empty string when the feed has none)
    pub image_url: String,

    /// Storefront page where the promotion can be claimed
    pub claim_url: String,
}

impl PromotionRecord {
    /// Whether `previous` matches in every change-significant field.
    ///
    /// Only the promotion end and the discounted price decide whether a
    /// record counts as changed; title or artwork edits are not announced.
    pub fn same_offer(&self, previous: &Self) -> bool {
        self.end_time == previous.end_time && self.discount_price == previous.discount_price
    }

    /// Human-readable time left until the promotion ends, e.g. `3d 4h 12m`.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> String {
        if now >= self.end_time {
            return "Promotion ended".to_string();
        }

        let remaining = self.end_time - now;
        let days = remaining.num_days();
        let hours = remaining.num_hours() % 24;
        let minutes = remaining.num_minutes() % 60;

        if days > 0 {
            format!("{days}d {hours}h {minutes}m")
        } else if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }

    /// Whole days left until the promotion ends, clamped at zero.
    pub fn remaining_days(&self, now: DateTime<Utc>) -> i64 {
        let remaining_seconds = (self.end_time - now).num_seconds();
        (remaining_seconds / 86_400).max(0)
    }

    /// The pre-promotion price formatted for display.
    pub fn display_original_price(&self) -> String {
        format_minor_units(self.original_price, &self.currency_code)
    }
}

/// Format a minor-unit amount (cents) as a display price.
pub fn format_minor_units(amount: i64, currency_code: &str) -> String {
    let units = amount as f64 / 100.0;
    match currency_code {
        "USD" => format!("${units:.2}"),
        "EUR" => format!("€{units:.2}"),
        "GBP" => format!("£{units:.2}"),
        _ => format!("{units:.2} {currency_code}"),
    }
}
