//! Application configuration loaded from the environment.

use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

/// Runtime configuration.
///
/// Every field maps to the environment variable of the same name in upper
/// case; `DISCORD_WEBHOOK` is the only one without a default. A `.env` file
/// in the working directory is honored before the environment is read.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord webhook URL announcements are delivered to
    pub discord_webhook: String,

    /// Path of the snapshot file tracking announced promotions
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Two-letter storefront country filter
    #[serde(default = "defaults::region")]
    pub epic_games_region: String,

    /// Free-games promotions endpoint
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Also announce promotions that disappeared from the feed
    #[serde(default)]
    pub announce_removals: bool,
}

impl Config {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.discord_webhook.trim().is_empty() {
            return Err(AppError::validation("DISCORD_WEBHOOK is empty"));
        }
        let webhook = Url::parse(&self.discord_webhook)
            .map_err(|e| AppError::validation(format!("DISCORD_WEBHOOK is not a valid URL: {e}")))?;
        if webhook.scheme() != "http" && webhook.scheme() != "https" {
            return Err(AppError::validation("DISCORD_WEBHOOK must be an http(s) URL"));
        }
        Url::parse(&self.api_url)
            .map_err(|e| AppError::validation(format!("API_URL is not a valid URL: {e}")))?;
        if self.epic_games_region.trim().is_empty() {
            return Err(AppError::validation("EPIC_GAMES_REGION is empty"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("USER_AGENT is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("TIMEOUT_SECS must be > 0"));
        }
        Ok(())
    }

    /// Webhook URL with the secret path hidden, safe for logs.
    pub fn redacted_webhook(&self) -> String {
        match Url::parse(&self.discord_webhook) {
            Ok(url) => format!(
                "{}://{}/[REDACTED]",
                url.scheme(),
                url.host_str().unwrap_or("?")
            ),
            Err(_) => "[invalid URL]".to_string(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("epics.json")
    }
    pub fn region() -> String {
        "US".into()
    }
    pub fn api_url() -> String {
        "https://store-site-backend-static.ak.epicgames.com/freeGamesPromotions".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; freebie-notifier/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_vars(vars: &[(&str, &str)]) -> envy::Result<Config> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    fn minimal_config() -> Config {
        from_vars(&[(
            "DISCORD_WEBHOOK",
            "https://discord.com/api/webhooks/123/token",
        )])
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = minimal_config();
        assert_eq!(config.snapshot_path, PathBuf::from("epics.json"));
        assert_eq!(config.epic_games_region, "US");
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.announce_removals);
        assert!(config.api_url.contains("freeGamesPromotions"));
    }

    #[test]
    fn test_missing_webhook_is_an_error() {
        assert!(from_vars(&[("EPIC_GAMES_REGION", "GB")]).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let config = from_vars(&[
            ("DISCORD_WEBHOOK", "https://discord.com/api/webhooks/1/t"),
            ("SNAPSHOT_PATH", "/var/lib/freebies/state.json"),
            ("EPIC_GAMES_REGION", "DE"),
            ("TIMEOUT_SECS", "5"),
            ("ANNOUNCE_REMOVALS", "true"),
        ])
        .unwrap();

        assert_eq!(
            config.snapshot_path,
            PathBuf::from("/var/lib/freebies/state.json")
        );
        assert_eq!(config.epic_games_region, "DE");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.announce_removals);
    }

    #[test]
    fn test_validate_accepts_minimal_config() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_webhook() {
        let mut config = minimal_config();
        config.discord_webhook = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_url_webhook() {
        let mut config = minimal_config();
        config.discord_webhook = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = minimal_config();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_region() {
        let mut config = minimal_config();
        config.epic_games_region = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redacted_webhook_hides_token() {
        let config = minimal_config();
        let redacted = config.redacted_webhook();
        assert_eq!(redacted, "https://discord.com/[REDACTED]");
        assert!(!redacted.contains("token"));
    }
}
