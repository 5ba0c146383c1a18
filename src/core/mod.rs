pub mod batch;
pub mod enrich;
pub mod etl;
pub mod extract;
pub mod feeds;
pub mod pipeline;
pub mod project;

pub use crate::domain::model::{FeedSnapshot, FieldValue, NormalizedRow, NormalizedTable, Record};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
