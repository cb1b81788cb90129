//! Service layer for the notifier application.
//!
//! This module contains the outward-facing boundaries:
//! - Storefront feed fetching (`EpicStorefront`)
//! - Discord webhook delivery (`DiscordNotifier`)

mod discord;
mod storefront;

pub use discord::{build_embed_payload, ChangeKind, DiscordNotifier, Notifier};
pub use storefront::{EpicStorefront, PromotionSource};
