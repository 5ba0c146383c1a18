//! Delimited-file sink.
//!
//! Cells are written through [`FieldValue::to_cell`](crate::domain::model::FieldValue::to_cell):
//! absent fields as `NaN`, JSON `null` as an empty cell, nested values as JSON text. Reading
//! a file back keeps the header and row count but loses the distinction between `null` and
//! `""` and between numbers and numeric strings.

use crate::core::feeds::FeedType;
use crate::domain::model::NormalizedTable;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Local};

/// `{company}__{feed_type}__{timestamp}.csv`; the timestamp keeps each scrape's file unique.
pub fn output_file_name(company_name: &str, feed_type: FeedType, at: DateTime<Local>) -> String {
    let company: String = company_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!(
        "{}__{}__{}.csv",
        company,
        feed_type.as_str(),
        at.format("%Y-%m-%dT%H-%M-%S%.6f")
    )
}

pub fn to_csv_bytes(table: &NormalizedTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for cells in table.cell_rows() {
        writer.write_record(cells.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(std::io::Error::other(e.to_string())))
}

pub struct CsvSink<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvSink<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes the table to a new file and returns its full path.
    pub async fn write(&self, table: &NormalizedTable) -> Result<String> {
        let file_name = output_file_name(&table.company_name, table.feed_type, Local::now());
        let bytes = to_csv_bytes(table)?;

        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            table.len(),
            bytes.len(),
            file_name
        );
        self.storage.write_file(&file_name, &bytes).await
    }
}
