use serde::Deserialize;

// --- Request ---

/// Parameters for a single Scrapfly `/scrape` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub url: String,
    /// Render the page in a headless browser so page scripts run and
    /// background requests are captured.
    pub render_js: bool,
    /// CSS selector the browser waits for before the page counts as loaded.
    pub wait_for_selector: Option<String>,
}

impl ScrapeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            render_js: false,
            wait_for_selector: None,
        }
    }

    pub fn render_js(mut self, enabled: bool) -> Self {
        self.render_js = enabled;
        self
    }

    pub fn wait_for_selector(mut self, selector: &str) -> Self {
        self.wait_for_selector = Some(selector.to_string());
        self
    }

    /// Query parameters for this config, excluding the API key.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("url", self.url.clone())];
        if self.render_js {
            params.push(("render_js", "true".to_string()));
        }
        if let Some(ref selector) = self.wait_for_selector {
            params.push(("wait_for_selector", selector.clone()));
        }
        params
    }
}

// --- Response ---

/// Envelope returned by `/scrape`. Only the `result` section is modelled.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    pub result: ScrapeResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeResult {
    pub status_code: Option<u16>,
    pub content: Option<String>,
    #[serde(default)]
    pub browser_data: BrowserData,
}

impl ScrapeResult {
    /// Captured background exchanges whose request URL contains `needle`,
    /// in capture order.
    pub fn xhr_calls_matching<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a XhrCall> {
        self.browser_data
            .xhr_call
            .iter()
            .filter(move |call| call.url.contains(needle))
    }
}

/// Data the headless browser collected while rendering the page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowserData {
    #[serde(default)]
    pub xhr_call: Vec<XhrCall>,
}

/// One intercepted XHR/fetch exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct XhrCall {
    pub url: String,
    pub method: Option<String>,
    pub response: Option<XhrResponse>,
}

impl XhrCall {
    /// The response body, or `None` when there was no response or it was empty.
    pub fn response_body(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|r| r.body.as_deref())
            .filter(|body| !body.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct XhrResponse {
    pub status: Option<u16>,
    pub body: Option<String>,
}
