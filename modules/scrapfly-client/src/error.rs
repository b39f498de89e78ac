use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapflyError>;

#[derive(Debug, Error)]
pub enum ScrapflyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ScrapflyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScrapflyError::Parse(err.to_string())
        } else {
            ScrapflyError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScrapflyError {
    fn from(err: serde_json::Error) -> Self {
        ScrapflyError::Parse(err.to_string())
    }
}
