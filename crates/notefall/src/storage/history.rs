use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::Result;
use crate::score::SessionResult;

/// Append-only log of finished sessions, one JSON line per result.
///
/// Files live under `<base>/<YYYY-MM-DD>/history_<HHMMSS>.jsonl`.
pub struct HistoryLog {
    base_dir: PathBuf,
    current: Option<PathBuf>,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            current: None,
        }
    }

    pub fn start(&mut self) -> Result<PathBuf> {
        let now: DateTime<Local> = Local::now();
        let dir = self.base_dir.join(now.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&dir)?;

        let file = dir.join(format!("history_{}.jsonl", now.format("%H%M%S")));
        debug!("History file: {}", file.display());
        self.current = Some(file.clone());
        Ok(file)
    }

    /// Append a result, opening a new file on first use
    pub fn append(&mut self, result: &SessionResult) -> Result<()> {
        let path = match &self.current {
            Some(path) => path.clone(),
            None => self.start()?,
        };
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        writeln!(file, "{}", serde_json::to_string(result)?)?;
        Ok(())
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Read every logged result under the base directory, oldest first
    pub fn read_all(&self) -> Result<Vec<SessionResult>> {
        let mut files = Vec::new();
        let days = match fs::read_dir(&self.base_dir) {
            Ok(days) => days,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        for day in days {
            let day = day?.path();
            if !day.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&day)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "jsonl") {
                    files.push(path);
                }
            }
        }
        files.sort();

        let mut results = Vec::new();
        for path in files {
            let reader = BufReader::new(File::open(&path)?);
            for (i, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str(&line) {
                    Ok(result) => results.push(result),
                    Err(e) => warn!("Skipping {}:{}: {}", path.display(), i + 1, e),
                }
            }
        }
        results.sort_by_key(|r: &SessionResult| r.timestamp);
        Ok(results)
    }
}
