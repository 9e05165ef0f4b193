//! Submit command: send the last finished play to the leaderboard.

use anyhow::Result;
use notefall::{SubmissionNotice, submit_or_queue};

use super::leaderboard_client;
use crate::paths::DataPaths;

pub fn run(paths: &DataPaths, endpoint: Option<&str>) -> Result<()> {
    let result = paths.load_last_result()?;
    let mut profile = paths.load_profile();
    let mut leaderboard = leaderboard_client(endpoint)?;

    match submit_or_queue(&mut profile, &mut leaderboard, &result)? {
        SubmissionNotice::Submitted => {
            eprintln!(
                "Submitted {} ({} [{}])",
                result.score,
                result.song_id,
                result.difficulty.expand_name()
            );
        }
        SubmissionNotice::Queued { reason, .. } => {
            eprintln!("Leaderboard unreachable, score queued: {}", reason);
            eprintln!(
                "{} score(s) waiting, run `notefall sync` later",
                profile.pending_scores().len()
            );
        }
    }
    Ok(())
}
