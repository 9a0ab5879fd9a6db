// Adapters layer: concrete implementations of the domain ports (report exports).

pub mod export;

pub use export::{CsvReportWriter, JsonReportWriter};
