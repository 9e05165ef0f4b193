//! ExportFormat trait definition

use crate::score::SessionResult;

/// Common interface for result export formats
pub trait ExportFormat {
    /// Header line, if the format has one
    fn header(&self) -> Option<String>;

    fn format_row(&self, result: &SessionResult) -> String;

    fn format_rows(&self, results: &[SessionResult]) -> String {
        let mut output = String::new();
        if let Some(header) = self.header() {
            output.push_str(&header);
            output.push('\n');
        }
        for result in results {
            output.push_str(&self.format_row(result));
            output.push('\n');
        }
        output
    }
}
