use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notefall::{JsonFileStore, Profile, SessionResult};
use tracing::warn;

/// Files the CLI keeps between runs
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => dirs::data_dir()
                .context("Failed to determine data directory, use --data-dir")?
                .join("notefall"),
        };
        Ok(Self { root })
    }

    pub fn profile_store(&self) -> PathBuf {
        self.root.join("profile.json")
    }

    pub fn history_dir(&self) -> PathBuf {
        self.root.join("history")
    }

    pub fn last_result(&self) -> PathBuf {
        self.root.join("last_result.json")
    }

    /// Open the profile. An unreadable store falls back to an in-memory default profile.
    pub fn load_profile(&self) -> Profile {
        match JsonFileStore::open(self.profile_store()) {
            Ok(store) => Profile::load(Box::new(store)),
            Err(e) => {
                warn!("Profile store unavailable, using defaults: {}", e);
                Profile::load(Box::new(notefall::MemoryStore::new()))
            }
        }
    }

    pub fn save_last_result(&self, result: &SessionResult) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create data directory")?;
        let content = serde_json::to_string_pretty(result)?;
        fs::write(self.last_result(), content).context("Failed to write last result")
    }

    pub fn load_last_result(&self) -> Result<SessionResult> {
        let content = fs::read_to_string(self.last_result())
            .context("No finished play found, run `notefall play` first")?;
        serde_json::from_str(&content).context("Failed to parse last result")
    }
}
