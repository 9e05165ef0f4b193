//! JSON export format implementation

use serde_json::{Value as JsonValue, json};

use super::format::ExportFormat;
use crate::score::SessionResult;

/// JSON exporter (one object per line, NDJSON format)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl ExportFormat for JsonExporter {
    fn header(&self) -> Option<String> {
        None
    }

    fn format_row(&self, result: &SessionResult) -> String {
        format_json_entry(result).to_string()
    }
}

pub fn format_json_entry(result: &SessionResult) -> JsonValue {
    json!({
        "timestamp": result.timestamp.to_rfc3339(),
        "song_id": result.song_id,
        "difficulty": result.difficulty.short_name(),
        "score": result.score,
        "judge": {
            "perfect": result.perfect,
            "good": result.good,
            "miss": result.miss
        },
        "max_combo": result.max_combo,
        "full_combo": result.full_combo,
        "all_perfect": result.all_perfect
    })
}
