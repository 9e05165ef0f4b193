//! TSV export format implementation

use super::format::ExportFormat;
use crate::score::SessionResult;

const COLUMNS: [&str; 10] = [
    "timestamp",
    "song_id",
    "difficulty",
    "score",
    "perfect",
    "good",
    "miss",
    "max_combo",
    "clear",
    "all_perfect",
];

/// Tab-separated exporter with a header row
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvExporter;

impl ExportFormat for TsvExporter {
    fn header(&self) -> Option<String> {
        Some(COLUMNS.join("\t"))
    }

    fn format_row(&self, result: &SessionResult) -> String {
        [
            result.timestamp.to_rfc3339(),
            sanitize(&result.song_id),
            result.difficulty.short_name().to_string(),
            result.score.to_string(),
            result.perfect.to_string(),
            result.good.to_string(),
            result.miss.to_string(),
            result.max_combo.to_string(),
            result.clear_label().to_string(),
            result.all_perfect.to_string(),
        ]
        .join("\t")
    }
}

fn sanitize(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Difficulty;
    use crate::score::ScoreState;

    #[test]
    fn test_tsv_rows() {
        let state = ScoreState {
            score: 700,
            perfect_count: 7,
            max_combo: 7,
            ..ScoreState::default()
        };
        let result = SessionResult::from_state(&state, "zuizui\trock", Difficulty::Hard);
        let output = TsvExporter.format_rows(std::slice::from_ref(&result));
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("timestamp\tsong_id"));
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields.len(), COLUMNS.len());
        assert_eq!(fields[1], "zuizui rock");
        assert_eq!(fields[2], "hard");
        assert_eq!(fields[3], "700");
        assert_eq!(fields[8], "ALL PERFECT");
    }
}
