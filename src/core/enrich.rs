use crate::domain::model::{FieldValue, NormalizedRow};
use chrono::{DateTime, Local, TimeZone};
use serde_json::Value;
use thiserror::Error;

pub const LAST_UPDATED: &str = "last_updated";
pub const TIME_SCRAPED: &str = "time_scraped";
pub const COMPANY_NAME: &str = "company_name";

/// Reasons a document-level `last_updated` cannot be turned into a timestamp.
/// These never abort a scrape; the column is left out instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampParseError {
    #[error("document has no last_updated")]
    Missing,
    #[error("last_updated {0} is not an integer epoch")]
    NotAnInteger(String),
    #[error("last_updated {0} is outside the representable range")]
    OutOfRange(i64),
}

/// Provenance columns shared by every row of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    pub last_updated: Option<String>,
    pub time_scraped: String,
    pub company_name: String,
}

impl Provenance {
    pub fn new(document: &Value, company_name: &str, scraped_at: DateTime<Local>) -> Self {
        let last_updated = match parse_last_updated(document) {
            Ok(ts) => Some(ts),
            Err(e @ TimestampParseError::Missing) => {
                tracing::debug!("Skipping last_updated: {}", e);
                None
            }
            Err(e @ (TimestampParseError::NotAnInteger(_) | TimestampParseError::OutOfRange(_))) => {
                tracing::warn!("⚠️ Skipping last_updated: {}", e);
                None
            }
        };

        Self {
            last_updated,
            time_scraped: format_time_scraped(scraped_at),
            company_name: company_name.to_string(),
        }
    }

    /// Columns appended after the adapter's columns, skipping names already present.
    pub fn output_columns(&self, adapter_columns: &[&str]) -> Vec<String> {
        let mut columns: Vec<String> = adapter_columns.iter().map(|c| c.to_string()).collect();
        let mut extra = Vec::with_capacity(3);
        if self.last_updated.is_some() {
            extra.push(LAST_UPDATED);
        }
        extra.push(TIME_SCRAPED);
        extra.push(COMPANY_NAME);

        for name in extra {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
        columns
    }

    fn apply(&self, row: &mut NormalizedRow) {
        if let Some(last_updated) = &self.last_updated {
            row.insert(LAST_UPDATED, Value::String(last_updated.clone()).into());
        }
        row.insert(TIME_SCRAPED, Value::String(self.time_scraped.clone()).into());
        row.insert(COMPANY_NAME, Value::String(self.company_name.clone()).into());
    }
}

/// Stamps each row with the batch provenance, using the current time as scrape time.
pub fn enrich(rows: Vec<NormalizedRow>, document: &Value, company_name: &str) -> Vec<NormalizedRow> {
    enrich_at(rows, &Provenance::new(document, company_name, Local::now()))
}

pub fn enrich_at(mut rows: Vec<NormalizedRow>, provenance: &Provenance) -> Vec<NormalizedRow> {
    for row in &mut rows {
        provenance.apply(row);
    }
    rows
}

/// Reads the document's `last_updated` epoch seconds as a local ISO-8601 timestamp.
///
/// Integers, floats (truncated) and integer strings are accepted.
pub fn parse_last_updated(document: &Value) -> Result<String, TimestampParseError> {
    let raw = document
        .get(LAST_UPDATED)
        .ok_or(TimestampParseError::Missing)?;

    let seconds = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| TimestampParseError::NotAnInteger(raw.to_string()))?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| TimestampParseError::NotAnInteger(raw.to_string()))?,
        other => return Err(TimestampParseError::NotAnInteger(other.to_string())),
    };

    let local = Local
        .timestamp_opt(seconds, 0)
        .earliest()
        .ok_or(TimestampParseError::OutOfRange(seconds))?;

    Ok(local.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub fn format_time_scraped(scraped_at: DateTime<Local>) -> String {
    scraped_at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
