//! Result export.
//!
//! - **TSV**: one header row, one tab-separated row per result
//! - **JSON**: one object per line

mod format;
mod json;
mod tsv;

pub use format::ExportFormat;
pub use json::*;
pub use tsv::*;
