use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::fetch::{RetryPolicy, DEFAULT_DELAY_SECS, DEFAULT_MAX_RETRIES};

pub const DEFAULT_INPUT_PATH: &str = "data/notes/helpful_notes.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/notes/helpful_notes_enriched.csv";

/// Enricher configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    pub scrapfly_key: String,
    pub scrapfly_base_url: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub delay_secs: u64,
    pub max_retries: u32,
}

impl EnricherConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let scrapfly_key = get("SCRAPFLY_KEY").context("SCRAPFLY_KEY environment variable is required")?;

        Ok(Self {
            scrapfly_key,
            scrapfly_base_url: get("SCRAPFLY_BASE_URL")
                .unwrap_or_else(|| scrapfly_client::DEFAULT_BASE_URL.to_string()),
            input_path: get("NOTESOURCE_INPUT")
                .unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string())
                .into(),
            output_path: get("NOTESOURCE_OUTPUT")
                .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string())
                .into(),
            delay_secs: positive(get("SCRAPE_DELAY_SECS"), "SCRAPE_DELAY_SECS", DEFAULT_DELAY_SECS)?,
            max_retries: positive(get("SCRAPE_MAX_RETRIES"), "SCRAPE_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
        })
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(self.delay_secs, self.max_retries)?)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  SCRAPFLY_KEY: {}", preview(&self.scrapfly_key));
        tracing::info!("  SCRAPFLY_BASE_URL: {}", self.scrapfly_base_url);
        tracing::info!("  NOTESOURCE_INPUT: {}", self.input_path.display());
        tracing::info!("  NOTESOURCE_OUTPUT: {}", self.output_path.display());
        tracing::info!(
            "  SCRAPE_DELAY_SECS: {}, SCRAPE_MAX_RETRIES: {}",
            self.delay_secs,
            self.max_retries
        );
    }
}

/// First five characters of a secret plus its length in characters.
fn preview(val: &str) -> String {
    let n = val.chars().take(5).map(char::len_utf8).sum();
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

fn positive<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{key} must be a positive integer, got {raw:?}"))?;
    if value <= T::default() {
        bail!("{key} must be a positive integer, got {raw:?}");
    }
    Ok(value)
}
