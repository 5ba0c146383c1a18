use crate::domain::model::LoadSummary;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs extract, transform and load once. The first error ends the run; nothing is
    /// written for a feed that failed to fetch or parse.
    pub async fn run(&self) -> Result<LoadSummary> {
        tracing::debug!("Starting ETL process...");
        self.monitor.log_stats("Start");

        let snapshot = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        let table = self.pipeline.transform(snapshot).await?;
        tracing::debug!(
            "Normalized {} rows x {} columns",
            table.len(),
            table.columns.len()
        );
        self.monitor.log_stats("Transform");

        let summary = self.pipeline.load(table).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(summary)
    }
}
