//! Export command for play history.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use notefall::{ExportFormat, HistoryLog, JsonExporter, TsvExporter};

use crate::cli::ExportKind;
use crate::paths::DataPaths;

pub fn run(paths: &DataPaths, format: ExportKind, output: Option<&Path>) -> Result<()> {
    let history = HistoryLog::new(paths.history_dir());
    let results = history.read_all().context("Failed to read play history")?;

    let exporter: Box<dyn ExportFormat> = match format {
        ExportKind::Tsv => Box::new(TsvExporter),
        ExportKind::Json => Box::new(JsonExporter),
    };
    let content = exporter.format_rows(&results);

    if let Some(output_path) = output {
        fs::write(output_path, &content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        eprintln!("Exported {} plays to {}", results.len(), output_path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}
