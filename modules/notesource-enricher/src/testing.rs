// Test doubles for the enrichment loop.
//
// - MockScraper (TweetScraper): per-URL scripted outcomes, consumed in order;
//   the last outcome repeats once the script runs out.
// - RecordingSleeper (Sleeper): returns immediately and records every duration.
// - LogCapture: thread-local tracing subscriber writing plain text to a buffer.
//
// Plus builders for captured-exchange fixtures.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scrapfly_client::{BrowserData, ScrapeResult, ScrapflyError, XhrCall, XhrResponse};

use crate::fetch::{Sleeper, TweetScraper, TWEET_ENDPOINT_MARKER};

#[derive(Debug, Clone)]
enum Outcome {
    Render(ScrapeResult),
    Error(String),
}

#[derive(Default)]
struct Script {
    outcomes: Vec<Outcome>,
    calls: usize,
}

/// Scripted scraper. Unregistered URLs fail with a network error.
#[derive(Default)]
pub struct MockScraper {
    scripts: Mutex<HashMap<String, Script>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_render(self, url: &str, result: ScrapeResult) -> Self {
        self.push(url, Outcome::Render(result))
    }

    pub fn on_error(self, url: &str, message: &str) -> Self {
        self.push(url, Outcome::Error(message.to_string()))
    }

    /// Number of render calls made for `url`.
    pub fn calls(&self, url: &str) -> usize {
        self.scripts
            .lock()
            .unwrap()
            .get(url)
            .map(|s| s.calls)
            .unwrap_or(0)
    }

    fn push(self, url: &str, outcome: Outcome) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .outcomes
            .push(outcome);
        self
    }
}

#[async_trait]
impl TweetScraper for MockScraper {
    async fn render(&self, url: &str) -> Result<ScrapeResult, ScrapflyError> {
        let mut scripts = self.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(url) else {
            return Err(ScrapflyError::Network(format!("no mock registered for {url}")));
        };

        let idx = script.calls.min(script.outcomes.len().saturating_sub(1));
        script.calls += 1;
        match script.outcomes.get(idx).cloned() {
            Some(Outcome::Render(result)) => Ok(result),
            Some(Outcome::Error(message)) => Err(ScrapflyError::Network(message)),
            None => Err(ScrapflyError::Network(format!("empty script for {url}"))),
        }
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    durations: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.durations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.durations.lock().unwrap().push(duration);
    }
}

/// Collects formatted log lines emitted on the current thread while its
/// guard is alive. Use with the default current-thread `#[tokio::test]`.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- Fixtures ---

/// A `TweetResultByRestId` response body carrying the given fields.
pub fn tweet_body(text: &str, created_at: &str) -> String {
    serde_json::json!({
        "data": {
            "tweetResult": {
                "result": {
                    "legacy": {
                        "full_text": text,
                        "created_at": created_at,
                    }
                }
            }
        }
    })
    .to_string()
}

/// A captured `TweetResultByRestId` exchange. `None` means no response was captured.
pub fn tweet_call(body: Option<&str>) -> XhrCall {
    XhrCall {
        url: format!("https://x.com/i/api/graphql/0hWvDhmW8YQ-S_ib3azIrw/{TWEET_ENDPOINT_MARKER}?variables=%7B%7D"),
        method: Some("GET".to_string()),
        response: body.map(|b| XhrResponse {
            status: Some(200),
            body: Some(b.to_string()),
        }),
    }
}

pub fn xhr_result(calls: Vec<XhrCall>) -> ScrapeResult {
    ScrapeResult {
        status_code: Some(200),
        content: None,
        browser_data: BrowserData { xhr_call: calls },
    }
}

/// A render result with one matching exchange carrying the tweet.
pub fn tweet_result(text: &str, created_at: &str) -> ScrapeResult {
    xhr_result(vec![tweet_call(Some(&tweet_body(text, created_at)))])
}
