pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::config::toml_config::DatabaseConfig;
    use crate::core::feeds::FeedType;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};
    use clap::Parser;

    /// Scrapes a single feed into a CSV file.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "gbfs-etl")]
    #[command(about = "Scrape one GBFS feed into a normalized CSV file")]
    pub struct CliConfig {
        /// Feed type, e.g. free_bike_status or station_information
        #[arg(long)]
        pub feed_type: FeedType,

        /// Feed URL
        #[arg(long)]
        pub url: String,

        /// Operator name written to every row and to the file name
        #[arg(long)]
        pub company_name: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn feed_type(&self) -> FeedType {
            self.feed_type
        }

        fn feed_url(&self) -> &str {
            &self.url
        }

        fn company_name(&self) -> &str {
            &self.company_name
        }

        fn write_csv(&self) -> bool {
            true
        }

        fn database(&self) -> Option<&DatabaseConfig> {
            None
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_url("url", &self.url)?;
            validate_non_empty_string("company_name", &self.company_name)?;
            validate_path("output_path", &self.output_path)
        }
    }

}
