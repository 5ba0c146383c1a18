use crate::config::toml_config::DatabaseConfig;
use crate::core::feeds::FeedType;
use crate::domain::model::{FeedSnapshot, LoadSummary, NormalizedTable};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Settings for a single scrape invocation: one company, one feed type.
pub trait ConfigProvider: Send + Sync {
    fn feed_type(&self) -> FeedType;
    fn feed_url(&self) -> &str;
    fn company_name(&self) -> &str;
    fn write_csv(&self) -> bool;
    fn database(&self) -> Option<&DatabaseConfig>;

    fn table_name(&self) -> String {
        match self.database() {
            Some(db) => db.table_name_for(self.feed_type()),
            None => self.feed_type().as_str().to_string(),
        }
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<FeedSnapshot>;
    async fn transform(&self, snapshot: FeedSnapshot) -> Result<NormalizedTable>;
    async fn load(&self, table: NormalizedTable) -> Result<LoadSummary>;
}
