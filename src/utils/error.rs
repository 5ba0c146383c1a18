use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Feed at {url} returned HTTP status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Feed at {url} is not valid JSON: {source}")]
    InvalidJsonError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected feed shape at '{path}': {message}")]
    ShapeError { path: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FetchError { .. }
            | EtlError::HttpStatusError { .. }
            | EtlError::InvalidJsonError { .. } => ErrorCategory::Network,
            EtlError::ShapeError { .. } => ErrorCategory::Data,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::DatabaseError(_) => {
                ErrorCategory::Storage
            }
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    /// True for the failures a single scrape reports to its caller: fetch and shape problems.
    pub fn is_feed_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Data
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::FetchError { .. } => {
                "Check network connectivity and that the feed URL is reachable".to_string()
            }
            EtlError::HttpStatusError { status, .. } if *status == 404 => {
                "The provider may not publish this feed type; check its gbfs.json".to_string()
            }
            EtlError::HttpStatusError { .. } => {
                "The feed provider returned an error; try the next scheduled scrape".to_string()
            }
            EtlError::InvalidJsonError { .. } => {
                "Verify the URL points at a GBFS JSON document and not an HTML page".to_string()
            }
            EtlError::ShapeError { .. } => {
                "Verify the URL matches the selected feed type".to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output path exists and is writable".to_string()
            }
            EtlError::DatabaseError(_) => {
                "Check the database credentials and that the server accepts connections"
                    .to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Review the configuration file or command line arguments".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the feed: {}", self),
            ErrorCategory::Data => format!("The feed did not have the expected layout: {}", self),
            ErrorCategory::Storage => format!("Could not save the scraped data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}
