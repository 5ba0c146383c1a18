use crate::adapters::storage::LocalStorage;
use crate::config::toml_config::{FeedJob, ScrapeConfig};
use crate::core::etl::EtlEngine;
use crate::core::feeds::FeedType;
use crate::core::pipeline::FeedPipeline;
use crate::domain::model::LoadSummary;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Result of one (company, feed type) scrape inside a batch.
#[derive(Debug)]
pub struct FeedOutcome {
    pub company_name: String,
    pub feed_type: FeedType,
    pub result: Result<LoadSummary>,
}

impl FeedOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs every job of the config one after another.
///
/// A failing job is logged and recorded; the remaining jobs still run.
pub async fn run_all(config: &ScrapeConfig, monitor_enabled: bool) -> Result<Vec<FeedOutcome>> {
    let jobs = config.jobs()?;
    let client = Client::new();
    let mut outcomes = Vec::with_capacity(jobs.len());

    tracing::info!("🚀 Running {} feed scrapes", jobs.len());

    for job in jobs {
        let company_name = job.company_name.clone();
        let feed_type = job.feed_type;
        let result = run_job(config, job, client.clone(), monitor_enabled).await;

        match &result {
            Ok(summary) => tracing::info!(
                "✅ {} / {}: {} rows",
                company_name,
                feed_type,
                summary.rows
            ),
            Err(e) => log_failure(&company_name, feed_type, e),
        }

        outcomes.push(FeedOutcome {
            company_name,
            feed_type,
            result,
        });
    }

    Ok(outcomes)
}

async fn run_job(
    config: &ScrapeConfig,
    job: FeedJob,
    client: Client,
    monitor_enabled: bool,
) -> Result<LoadSummary> {
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = FeedPipeline::with_client(storage, job, client);
    EtlEngine::new_with_monitoring(pipeline, monitor_enabled)
        .run()
        .await
}

fn log_failure(company_name: &str, feed_type: FeedType, e: &EtlError) {
    tracing::error!(
        "❌ {} / {} failed: {} (Category: {:?}, Severity: {:?})",
        company_name,
        feed_type,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
}
