pub mod error;
pub mod types;

pub use error::{Result, ScrapflyError};
pub use types::{BrowserData, ScrapeConfig, ScrapeResponse, ScrapeResult, XhrCall, XhrResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.scrapfly.io";

pub struct ScrapflyClient {
    client: reqwest::Client,
    base_url: String,
    key: String,
}

impl ScrapflyClient {
    pub fn with_base_url(key: String, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
        }
    }

    /// Scrape a URL. With `render_js` set the result carries the background
    /// requests the browser captured while loading the page.
    pub async fn scrape(&self, config: &ScrapeConfig) -> Result<ScrapeResult> {
        let endpoint = format!("{}/scrape", self.base_url);
        tracing::debug!(url = %config.url, render_js = config.render_js, "Scrapfly request");

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("key", self.key.as_str())])
            .query(&config.query_params())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ScrapflyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let parsed: ScrapeResponse = serde_json::from_str(&body)?;
        Ok(parsed.result)
    }
}
