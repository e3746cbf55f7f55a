// src/config.rs

use std::{env, net::SocketAddr};

use anyhow::{Context, bail};
use chrono::{NaiveDate, NaiveTime};
use dotenvy::dotenv;
use url::Url;

pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub log_dir: String,

    /// LINE Messaging API channel token. Without it broadcasts are only logged.
    pub line_channel_access_token: Option<String>,
    pub line_api_base: Url,

    /// Allowed requests per minute for each (peer IP, path) pair.
    pub rate_limit_per_minute: u32,

    /// Daily dispatch times, UTC.
    pub question_time: NaiveTime,
    pub answer_time: NaiveTime,
    pub countdown_time: Option<NaiveTime>,

    pub countdown_date: Option<NaiveDate>,
    pub countdown_label: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let line_channel_access_token = env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let line_api_base = Url::parse(
            &env::var("LINE_API_BASE").unwrap_or_else(|_| DEFAULT_LINE_API_BASE.to_string()),
        )
        .context("LINE_API_BASE must be a valid URL")?;

        let rate_limit_per_minute = match env::var("RATE_LIMIT_PER_MINUTE") {
            Ok(raw) => raw
                .parse::<u32>()
                .context("RATE_LIMIT_PER_MINUTE must be a positive integer")?,
            Err(_) => 30,
        };
        if rate_limit_per_minute == 0 {
            bail!("RATE_LIMIT_PER_MINUTE must be at least 1");
        }

        let question_time = time_var("QUESTION_TIME")?
            .unwrap_or(NaiveTime::from_hms_opt(8, 0, 0).context("invalid default time")?);
        let answer_time = time_var("ANSWER_TIME")?
            .unwrap_or(NaiveTime::from_hms_opt(10, 0, 0).context("invalid default time")?);
        let countdown_time = time_var("COUNTDOWN_TIME")?;

        let countdown_date = match env::var("COUNTDOWN_DATE") {
            Ok(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .context("COUNTDOWN_DATE must be formatted as YYYY-MM-DD")?,
            ),
            Err(_) => None,
        };
        let countdown_label =
            env::var("COUNTDOWN_LABEL").unwrap_or_else(|_| "the exam".to_string());

        Ok(Self {
            database_url,
            rust_log,
            bind_addr,
            log_dir,
            line_channel_access_token,
            line_api_base,
            rate_limit_per_minute,
            question_time,
            answer_time,
            countdown_time,
            countdown_date,
            countdown_label,
        })
    }
}

/// Parses an optional `HH:MM` environment variable.
fn time_var(key: &str) -> anyhow::Result<Option<NaiveTime>> {
    match env::var(key) {
        Ok(raw) => parse_daily_time(&raw)
            .with_context(|| format!("{} must be formatted as HH:MM", key))
            .map(Some),
        Err(_) => Ok(None),
    }
}

pub fn parse_daily_time(raw: &str) -> anyhow::Result<NaiveTime> {
    Ok(NaiveTime::parse_from_str(raw.trim(), "%H:%M")?)
}
