use std::time::Duration;

use async_trait::async_trait;
use scrapfly_client::{ScrapeConfig, ScrapeResult, ScrapflyClient, ScrapflyError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{EnrichError, Result};
use crate::extract::{self, TweetFields};

/// Substring identifying the GraphQL call that carries the tweet payload.
pub const TWEET_ENDPOINT_MARKER: &str = "TweetResultByRestId";

/// Present in the rendered page once the tweet has loaded.
pub const TWEET_READY_SELECTOR: &str = "[data-testid='tweet']";

// --- Seams ---

/// Render a tweet page and return what the browser captured.
#[async_trait]
pub trait TweetScraper: Send + Sync {
    async fn render(&self, url: &str) -> std::result::Result<ScrapeResult, ScrapflyError>;
}

#[async_trait]
impl TweetScraper for ScrapflyClient {
    async fn render(&self, url: &str) -> std::result::Result<ScrapeResult, ScrapflyError> {
        let config = ScrapeConfig::new(url)
            .render_js(true)
            .wait_for_selector(TWEET_READY_SELECTOR);
        self.scrape(&config).await
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// --- Retry policy ---

pub const DEFAULT_DELAY_SECS: u64 = 3;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(delay_secs: u64, max_retries: u32) -> Result<Self> {
        if delay_secs == 0 {
            return Err(EnrichError::InvalidPolicy("delay must be positive".into()));
        }
        if max_retries == 0 {
            return Err(EnrichError::InvalidPolicy("max_retries must be positive".into()));
        }
        Ok(Self {
            delay: Duration::from_secs(delay_secs),
            max_retries,
        })
    }

    /// Sleep after failed attempt `attempt` (0-based): 1s, 2s, 4s, ...
    pub fn backoff(attempt: u32) -> Duration {
        Duration::from_secs(2u64.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

// --- Fetcher ---

/// Why a single attempt produced nothing. All variants lead to a retry.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("scrape failed: {0}")]
    Service(#[from] ScrapflyError),

    #[error("malformed tweet payload: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("tweet payload lacks data.tweetResult.result.legacy text or timestamp")]
    MissingFields,

    #[error("blank source URL")]
    BlankUrl,

    #[error("no TweetResultByRestId response carried tweet data")]
    NoMatch,
}

pub struct TweetFetcher<'a> {
    scraper: &'a dyn TweetScraper,
    sleeper: &'a dyn Sleeper,
    policy: RetryPolicy,
}

impl<'a> TweetFetcher<'a> {
    pub fn new(scraper: &'a dyn TweetScraper, sleeper: &'a dyn Sleeper, policy: RetryPolicy) -> Self {
        Self {
            scraper,
            sleeper,
            policy,
        }
    }

    /// Fetch a tweet's text and timestamp, pausing before every attempt and
    /// backing off exponentially between failures. `None` once all attempts
    /// are spent.
    pub async fn fetch_tweet_fields(&self, url: &str) -> Option<TweetFields> {
        let max_retries = self.policy.max_retries;
        for attempt in 0..max_retries {
            self.sleeper.sleep(self.policy.delay).await;

            match self.attempt(url).await {
                Ok(fields) => return Some(fields),
                Err(e) => {
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_retries,
                        error = %e,
                        "Tweet fetch attempt failed"
                    );
                    if attempt + 1 < max_retries {
                        self.sleeper.sleep(RetryPolicy::backoff(attempt)).await;
                    }
                }
            }
        }

        None
    }

    async fn attempt(&self, url: &str) -> std::result::Result<TweetFields, AttemptError> {
        if url.trim().is_empty() {
            return Err(AttemptError::BlankUrl);
        }

        let result = self.scraper.render(url).await?;

        for call in result.xhr_calls_matching(TWEET_ENDPOINT_MARKER) {
            let Some(body) = call.response_body() else {
                continue;
            };
            debug!(url, xhr = %call.url, "Parsing captured tweet payload");
            return extract::tweet_fields(body)?.ok_or(AttemptError::MissingFields);
        }

        Err(AttemptError::NoMatch)
    }
}
