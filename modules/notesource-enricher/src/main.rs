use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use notesource_enricher::{enrich_table, EnricherConfig, Table, TokioSleeper, TweetFetcher};
use scrapfly_client::ScrapflyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the per-row progress lines.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("notesource_enricher=info".parse()?)
                .add_directive("scrapfly_client=info".parse()?),
        )
        .init();

    let config = EnricherConfig::from_env()?;
    let policy = config.retry_policy()?;

    let client = ScrapflyClient::with_base_url(config.scrapfly_key.clone(), &config.scrapfly_base_url);
    let sleeper = TokioSleeper;
    let fetcher = TweetFetcher::new(&client, &sleeper, policy);

    let mut table = Table::read_csv(&config.input_path)
        .with_context(|| format!("Failed to read {}", config.input_path.display()))?;
    info!(rows = table.len(), path = %config.input_path.display(), "Loaded notes table");

    let summary = enrich_table(&mut table, &fetcher).await?;

    table
        .write_csv(&config.output_path)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    info!(
        rows = summary.rows,
        enriched = summary.enriched,
        missing = summary.missing,
        path = %config.output_path.display(),
        "Wrote enriched table"
    );

    println!("Enrichment process done.");
    Ok(())
}
