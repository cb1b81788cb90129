// src/models/mod.rs

//! Domain models for the notifier application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod promotion;
mod snapshot;

// Re-export all public types
pub use config::Config;
pub use promotion::{format_minor_units, PromotionRecord};
pub use snapshot::Snapshot;
