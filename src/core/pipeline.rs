use crate::adapters::csv_sink::CsvSink;
use crate::adapters::http::fetch_json;
use crate::adapters::postgres::PostgresSink;
use crate::core::enrich::{enrich_at, Provenance};
use crate::core::extract::extract;
use crate::core::project::project;
use crate::domain::model::{FeedSnapshot, LoadSummary, NormalizedTable};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use chrono::Local;
use reqwest::Client;

/// Scrape-normalize-persist for one company and one feed type.
pub struct FeedPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) csv_sink: CsvSink<S>,
    pub(crate) config: C,
    pub(crate) client: Client,
}

impl<S: Storage, C: ConfigProvider> FeedPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_client(storage, config, Client::new())
    }

    /// Shares one HTTP client across several pipelines.
    pub fn with_client(storage: S, config: C, client: Client) -> Self {
        Self {
            csv_sink: CsvSink::new(storage),
            config,
            client,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FeedPipeline<S, C> {
    async fn extract(&self) -> Result<FeedSnapshot> {
        let feed_type = self.config.feed_type();
        tracing::info!(
            "🚲 Fetching {} for {} from {}",
            feed_type,
            self.config.company_name(),
            self.config.feed_url()
        );

        let document = fetch_json(&self.client, self.config.feed_url()).await?;
        let scraped_at = Local::now();
        let records = extract(&document, &feed_type.adapter().path)?;

        tracing::info!("📊 Extracted {} records", records.len());
        Ok(FeedSnapshot {
            feed_type,
            document,
            records,
            scraped_at,
        })
    }

    async fn transform(&self, snapshot: FeedSnapshot) -> Result<NormalizedTable> {
        let adapter = snapshot.feed_type.adapter();
        tracing::debug!(
            "Projecting {} records onto {} columns",
            snapshot.records.len(),
            adapter.columns.len()
        );

        let provenance = Provenance::new(
            &snapshot.document,
            self.config.company_name(),
            snapshot.scraped_at,
        );
        let rows = enrich_at(project(adapter.columns, &snapshot.records), &provenance);

        Ok(NormalizedTable {
            feed_type: snapshot.feed_type,
            company_name: self.config.company_name().to_string(),
            scraped_at: snapshot.scraped_at,
            columns: provenance.output_columns(adapter.columns),
            rows,
        })
    }

    async fn load(&self, table: NormalizedTable) -> Result<LoadSummary> {
        let mut summary = LoadSummary {
            rows: table.len(),
            ..LoadSummary::default()
        };

        if self.config.write_csv() {
            let path = self.csv_sink.write(&table).await?;
            tracing::info!("💾 Wrote {} rows to {}", table.len(), path);
            summary.csv_path = Some(path);
        }

        if let Some(database) = self.config.database() {
            let sink = PostgresSink::new(database.clone());
            let inserted = sink.append(&table, &self.config.table_name()).await?;
            summary.database_rows = Some(inserted);
        }

        Ok(summary)
    }
}
