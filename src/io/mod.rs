pub mod csv;
pub mod json;

pub use self::csv::{CsvError, ProductRow};
pub use self::json::ExportBundle;
