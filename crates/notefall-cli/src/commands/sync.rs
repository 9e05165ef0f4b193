//! Sync command: retry queued submissions.

use anyhow::Result;
use notefall::sync_pending;

use super::leaderboard_client;
use crate::paths::DataPaths;

pub fn run(paths: &DataPaths, endpoint: Option<&str>) -> Result<()> {
    let mut profile = paths.load_profile();
    if profile.pending_scores().is_empty() {
        eprintln!("No pending scores");
        return Ok(());
    }

    let mut leaderboard = leaderboard_client(endpoint)?;
    let report = sync_pending(&mut profile, &mut leaderboard);

    eprintln!(
        "Submitted {}, rejected {}, remaining {}",
        report.submitted, report.rejected, report.remaining
    );
    if let Some(reason) = report.stopped_by {
        eprintln!("Stopped early: {}", reason);
    }
    Ok(())
}
