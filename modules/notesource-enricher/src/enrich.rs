use tracing::info;

use crate::error::Result;
use crate::extract::TweetFields;
use crate::fetch::TweetFetcher;
use crate::table::Table;

pub const SOURCE_LINK_COLUMN: &str = "sourceLink";
pub const SOURCE_TEXT_COLUMN: &str = "source_text";
pub const SOURCE_TIMESTAMP_COLUMN: &str = "source_timestamp";

/// Totals for one enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub rows: usize,
    pub enriched: usize,
    pub missing: usize,
}

/// Fetch tweet text and timestamp for every row's `sourceLink`, one row at a
/// time in table order, then set the `source_text` and `source_timestamp`
/// columns. Rows whose fetch gives up get empty cells in both columns.
pub async fn enrich_table(table: &mut Table, fetcher: &TweetFetcher<'_>) -> Result<EnrichSummary> {
    let urls: Vec<String> = table
        .column(SOURCE_LINK_COLUMN)?
        .map(String::from)
        .collect();
    let total = urls.len();

    let mut texts = Vec::with_capacity(total);
    let mut timestamps = Vec::with_capacity(total);
    let mut summary = EnrichSummary {
        rows: total,
        ..Default::default()
    };

    for (i, url) in urls.iter().enumerate() {
        println!("Scraping {}/{}: {}", i + 1, total, url);

        match fetcher.fetch_tweet_fields(url).await {
            Some(TweetFields { text, created_at }) => {
                texts.push(Some(text));
                timestamps.push(Some(created_at));
                summary.enriched += 1;
            }
            None => {
                texts.push(None);
                timestamps.push(None);
                summary.missing += 1;
            }
        }
    }

    table.set_column(SOURCE_TEXT_COLUMN, texts)?;
    table.set_column(SOURCE_TIMESTAMP_COLUMN, timestamps)?;

    info!(
        rows = summary.rows,
        enriched = summary.enriched,
        missing = summary.missing,
        "Enrichment complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EnrichError, TableError};
    use crate::fetch::RetryPolicy;
    use crate::testing::{tweet_result, MockScraper, RecordingSleeper};

    fn notes(links: &[&str]) -> Table {
        let rows = links
            .iter()
            .enumerate()
            .map(|(i, link)| vec![format!("note-{i}"), link.to_string()])
            .collect();
        Table::new(vec!["noteId".into(), SOURCE_LINK_COLUMN.into()], rows).unwrap()
    }

    #[tokio::test]
    async fn appends_both_columns_in_row_order() {
        let scraper = MockScraper::new()
            .on_render("https://x.com/a/status/1", tweet_result("one", "t1"))
            .on_error("https://x.com/b/status/2", "blocked")
            .on_render("https://x.com/c/status/3", tweet_result("three", "t3"));
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::new(1, 2).unwrap());
        let mut table = notes(&[
            "https://x.com/a/status/1",
            "https://x.com/b/status/2",
            "https://x.com/c/status/3",
        ]);

        let summary = enrich_table(&mut table, &fetcher).await.unwrap();

        assert_eq!(
            summary,
            EnrichSummary {
                rows: 3,
                enriched: 2,
                missing: 1
            }
        );
        assert_eq!(
            table.headers(),
            ["noteId", SOURCE_LINK_COLUMN, SOURCE_TEXT_COLUMN, SOURCE_TIMESTAMP_COLUMN]
        );
        assert_eq!(table.rows()[0], ["note-0", "https://x.com/a/status/1", "one", "t1"]);
        assert_eq!(table.rows()[1], ["note-1", "https://x.com/b/status/2", "", ""]);
        assert_eq!(table.rows()[2], ["note-2", "https://x.com/c/status/3", "three", "t3"]);
    }

    #[tokio::test]
    async fn text_and_timestamp_are_empty_together() {
        let scraper = MockScraper::new()
            .on_render("https://x.com/a/status/1", tweet_result("one", "t1"))
            .on_error("https://x.com/b/status/2", "blocked");
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::new(1, 1).unwrap());
        let mut table = notes(&["https://x.com/a/status/1", "https://x.com/b/status/2"]);

        enrich_table(&mut table, &fetcher).await.unwrap();

        for row in 0..table.len() {
            let text = table.get(row, SOURCE_TEXT_COLUMN).unwrap();
            let ts = table.get(row, SOURCE_TIMESTAMP_COLUMN).unwrap();
            assert_eq!(text.is_empty(), ts.is_empty(), "row {row}");
        }
    }

    #[tokio::test]
    async fn reenrichment_overwrites_existing_columns() {
        let scraper =
            MockScraper::new().on_render("https://x.com/a/status/1", tweet_result("one", "t1"));
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::default());
        let mut table = notes(&["https://x.com/a/status/1"]);

        enrich_table(&mut table, &fetcher).await.unwrap();
        let first = table.clone();
        enrich_table(&mut table, &fetcher).await.unwrap();

        assert_eq!(table, first);
        assert_eq!(table.headers().len(), 4);
    }

    #[tokio::test]
    async fn rate_limit_pause_happens_once_per_successful_row() {
        let scraper = MockScraper::new()
            .on_render("https://x.com/a/status/1", tweet_result("one", "t1"))
            .on_render("https://x.com/b/status/2", tweet_result("two", "t2"));
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::default());
        let mut table = notes(&["https://x.com/a/status/1", "https://x.com/b/status/2"]);

        enrich_table(&mut table, &fetcher).await.unwrap();

        assert_eq!(sleeper.durations().len(), 2);
    }

    #[tokio::test]
    async fn blank_link_gets_empty_cells_and_the_run_continues() {
        let scraper = MockScraper::new()
            .on_render("https://x.com/a/status/1", tweet_result("one", "t1"))
            .on_render("https://x.com/c/status/3", tweet_result("three", "t3"));
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::new(1, 2).unwrap());
        let mut table = notes(&["https://x.com/a/status/1", "", "https://x.com/c/status/3"]);

        let summary = enrich_table(&mut table, &fetcher).await.unwrap();

        assert_eq!(summary.enriched, 2);
        assert_eq!(summary.missing, 1);
        assert_eq!(table.rows()[0], ["note-0", "https://x.com/a/status/1", "one", "t1"]);
        assert_eq!(table.rows()[1], ["note-1", "", "", ""]);
        assert_eq!(table.rows()[2], ["note-2", "https://x.com/c/status/3", "three", "t3"]);
    }

    #[tokio::test]
    async fn missing_source_link_column_is_an_error() {
        let scraper = MockScraper::new();
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::default());
        let mut table = Table::new(vec!["url".into()], vec![vec!["x".into()]]).unwrap();

        let err = enrich_table(&mut table, &fetcher).await.unwrap_err();

        assert!(matches!(
            err,
            EnrichError::Table(TableError::MissingColumn(ref c)) if c == SOURCE_LINK_COLUMN
        ));
    }

    #[tokio::test]
    async fn empty_table_gains_headers_only() {
        let scraper = MockScraper::new();
        let sleeper = RecordingSleeper::new();
        let fetcher = TweetFetcher::new(&scraper, &sleeper, RetryPolicy::default());
        let mut table = notes(&[]);

        let summary = enrich_table(&mut table, &fetcher).await.unwrap();

        assert_eq!(summary.rows, 0);
        assert!(table.is_empty());
        assert_eq!(table.column_index(SOURCE_TIMESTAMP_COLUMN), Some(3));
        assert!(sleeper.durations().is_empty());
    }
}
