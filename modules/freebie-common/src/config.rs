use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FreebieError;

const DEFAULT_CHECK_INTERVAL_SECS: u64 = 1800;
const DEFAULT_NOTIFY_DELAY_MS: u64 = 2000;
const DEFAULT_SEEN_FILE: &str = "seen_deals.json";
const DEFAULT_STEAM_COUNTRY: &str = "us";

/// Whether the scout keeps polling or exits after a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Continuous,
    /// One full cycle, then exit. For cron / CI-triggered runs.
    Once,
}

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to each component.
#[derive(Debug, Clone)]
pub struct FreebieConfig {
    // Notification
    pub discord_webhook_url: Option<String>,

    // Sources
    pub itad_api_key: Option<String>,
    pub steam_country: String,

    // Loop
    pub run_mode: RunMode,
    pub check_interval: Duration,
    pub notify_delay: Duration,

    // Storage
    pub seen_file: PathBuf,
}

impl Default for FreebieConfig {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            itad_api_key: None,
            steam_country: DEFAULT_STEAM_COUNTRY.to_string(),
            run_mode: RunMode::Continuous,
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            notify_delay: Duration::from_millis(DEFAULT_NOTIFY_DELAY_MS),
            seen_file: PathBuf::from(DEFAULT_SEEN_FILE),
        }
    }
}

impl FreebieConfig {
    /// Load configuration from the process environment, reading `.env` first
    /// if present. Missing webhook or API key degrade features, never fail.
    pub fn from_env() -> Result<Self, FreebieError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FreebieError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let run_mode = match get("RUN_ONCE") {
            Some(v) if v == "true" => RunMode::Once,
            _ => RunMode::Continuous,
        };

        Ok(Self {
            discord_webhook_url: get("DISCORD_WEBHOOK_URL"),
            itad_api_key: get("ITAD_API_KEY"),
            steam_country: get("STEAM_COUNTRY").unwrap_or(defaults.steam_country),
            run_mode,
            check_interval: match get("CHECK_INTERVAL_SECS") {
                Some(v) => Duration::from_secs(parse_number("CHECK_INTERVAL_SECS", &v)?),
                None => defaults.check_interval,
            },
            notify_delay: match get("NOTIFY_DELAY_MS") {
                Some(v) => Duration::from_millis(parse_number("NOTIFY_DELAY_MS", &v)?),
                None => defaults.notify_delay,
            },
            seen_file: get("SEEN_FILE").map(PathBuf::from).unwrap_or(defaults.seen_file),
        })
    }

    pub fn check_interval_minutes(&self) -> u64 {
        self.check_interval.as_secs() / 60
    }

    pub fn log_redacted(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let n = v.char_indices().nth(5).map(|(i, _)| i).unwrap_or(v.len());
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  DISCORD_WEBHOOK_URL: {}", preview_opt(&self.discord_webhook_url));
        tracing::info!("  ITAD_API_KEY: {}", preview_opt(&self.itad_api_key));
        tracing::info!("  STEAM_COUNTRY: {}", self.steam_country);
        tracing::info!("  RUN_MODE: {:?}", self.run_mode);
        tracing::info!(
            "  CHECK_INTERVAL: {}s ({} min)",
            self.check_interval.as_secs(),
            self.check_interval_minutes()
        );
        tracing::info!("  NOTIFY_DELAY: {}ms", self.notify_delay.as_millis());
        tracing::info!("  SEEN_FILE: {}", self.seen_file.display());
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, FreebieError> {
    value
        .parse()
        .map_err(|_| FreebieError::Config(format!("{key} must be a non-negative integer, got {value:?}")))
}
