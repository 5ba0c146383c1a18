use crate::config::toml_config::DatabaseConfig;
use crate::domain::model::NormalizedTable;
use crate::utils::error::Result;
use crate::utils::validation::validate_sql_identifier;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Postgres, QueryBuilder};

/// Postgres accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = 65_535;

/// Append-only table sink. Missing tables are created with one TEXT column per table
/// column; rows are never deduplicated, so repeating a load repeats its rows.
pub struct PostgresSink {
    config: DatabaseConfig,
}

impl PostgresSink {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub async fn append(&self, table: &NormalizedTable, table_name: &str) -> Result<u64> {
        validate_sql_identifier("table_name", table_name)?;
        for column in &table.columns {
            validate_sql_identifier("column", column)?;
        }

        let url = self.config.connection_url()?;
        tracing::debug!(
            "Connecting to {}:{}/{}",
            self.config.host,
            self.config.port,
            self.config.database
        );
        let mut conn = PgConnection::connect(url.as_str()).await?;

        sqlx::query(&create_table_sql(table_name, &table.columns))
            .execute(&mut conn)
            .await?;

        let rows: Vec<Vec<Option<String>>> = table.cell_rows().collect();
        let mut inserted = 0u64;
        for chunk in rows.chunks(rows_per_statement(table.columns.len())) {
            let mut builder = insert_builder(table_name, &table.columns);
            builder.push_values(chunk, |mut values, cells| {
                for cell in cells {
                    values.push_bind(cell.clone());
                }
            });
            inserted += builder.build().execute(&mut conn).await?.rows_affected();
        }

        tracing::info!("🗄️ Appended {} rows to {}", inserted, table_name);
        conn.close().await?;
        Ok(inserted)
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn create_table_sql(table_name: &str, columns: &[String]) -> String {
    let column_defs: Vec<String> = columns
        .iter()
        .map(|column| format!("{} TEXT", quote_identifier(column)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table_name),
        column_defs.join(", ")
    )
}

fn insert_builder<'args>(table_name: &str, columns: &[String]) -> QueryBuilder<'args, Postgres> {
    let column_list: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        quote_identifier(table_name),
        column_list.join(", ")
    ))
}

pub(crate) fn rows_per_statement(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).max(1)
}
