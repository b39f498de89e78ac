pub mod config;
pub mod enrich;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod table;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::EnricherConfig;
pub use enrich::{enrich_table, EnrichSummary};
pub use error::{EnrichError, Result, TableError};
pub use extract::TweetFields;
pub use fetch::{RetryPolicy, Sleeper, TokioSleeper, TweetFetcher, TweetScraper};
pub use table::Table;
