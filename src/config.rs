//! # config: read the monitor's settings from environment variables
//!
//! `DISCORD_TOKEN` and `CHANNEL_ID` are required; everything else has a
//! default matching the production deployment (rendered backend, 12 h
//! interval, 3 attempts with 5 s backoff).

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::engine::retry::RetryPolicy;
use crate::models::AlertMode;

/// How pages are retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBackend {
    /// WebDriver-driven browser; executes the page's scripts.
    Rendered,
    /// Plain HTTP GET + HTML parse.
    Raw,
}

impl fmt::Display for FetchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchBackend::Rendered => write!(f, "rendered"),
            FetchBackend::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for FetchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rendered" | "browser" => Ok(FetchBackend::Rendered),
            "raw" | "http" => Ok(FetchBackend::Raw),
            other => Err(format!("unknown backend '{other}' (expected rendered or raw)")),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub channel_id: u64,
    pub discord_api_base: String,
    /// Base URL of the scraped site.
    pub site_url: String,
    pub backend: FetchBackend,
    pub webdriver_url: String,
    pub headless: bool,
    /// Fixed wait after navigation for scripts to fill the table.
    pub settle: Duration,
    /// Bounded wait for each table cell.
    pub element_timeout: Duration,
    pub page_load_timeout: Duration,
    /// Pause between the two page requests of the raw backend.
    pub page_gap: Duration,
    pub retry: RetryPolicy,
    pub monitor_interval: Duration,
    pub alert_mode: AlertMode,
    /// `0` = alert on every cycle the condition holds.
    pub alert_cooldown: Duration,
    pub snapshot_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("site_url", &self.site_url)
            .field("backend", &self.backend)
            .field("retry", &self.retry)
            .field("monitor_interval", &self.monitor_interval)
            .field("alert_mode", &self.alert_mode)
            .field("alert_cooldown", &self.alert_cooldown)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let discord_token = required(&lookup, "DISCORD_TOKEN")?;
        let channel_id: u64 = required(&lookup, "CHANNEL_ID")?
            .parse()
            .context("CHANNEL_ID must be a numeric channel id")?;

        let max_attempts: u32 = parsed(&lookup, "RETRY_MAX_ATTEMPTS", 3)?;
        if max_attempts == 0 {
            bail!("RETRY_MAX_ATTEMPTS must be at least 1");
        }

        let monitor_interval = secs(&lookup, "MONITOR_INTERVAL_SECS", 12 * 60 * 60)?;
        if monitor_interval.is_zero() {
            bail!("MONITOR_INTERVAL_SECS must be greater than 0");
        }

        Ok(Self {
            discord_token,
            channel_id,
            discord_api_base: text(&lookup, "DISCORD_API_BASE", "https://discord.com/api/v10"),
            site_url: text(&lookup, "OI_SITE_URL", "https://coinalyze.net"),
            backend: parsed(&lookup, "FETCH_BACKEND", FetchBackend::Rendered)?,
            webdriver_url: text(&lookup, "WEBDRIVER_URL", "http://localhost:9515"),
            headless: lookup("HEADLESS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            settle: secs(&lookup, "SETTLE_SECS", 10)?,
            element_timeout: secs(&lookup, "ELEMENT_TIMEOUT_SECS", 20)?,
            page_load_timeout: secs(&lookup, "PAGE_LOAD_TIMEOUT_SECS", 30)?,
            page_gap: secs(&lookup, "PAGE_GAP_SECS", 2)?,
            retry: RetryPolicy {
                max_attempts,
                backoff: secs(&lookup, "RETRY_BACKOFF_SECS", 5)?,
            },
            monitor_interval,
            alert_mode: parsed(&lookup, "ALERT_MODE", AlertMode::Combined)?,
            alert_cooldown: secs(&lookup, "ALERT_COOLDOWN_SECS", 0)?,
            snapshot_dir: PathBuf::from(text(&lookup, "SNAPSHOT_DIR", ".")),
            bind_addr: parsed(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .with_context(|| format!("{key} is missing — set it in the environment or .env"))
}

fn text(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}='{raw}' is invalid: {e}")),
        None => Ok(default),
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> anyhow::Result<Duration> {
    parsed(lookup, key, default).map(Duration::from_secs)
}
