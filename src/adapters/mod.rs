// Adapters layer: concrete implementations for external systems (http, storage, sinks).

pub mod csv_sink;
pub mod http;
pub mod postgres;
pub mod storage;
