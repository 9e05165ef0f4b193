use tracing::{info, warn};

use super::{Leaderboard, ScoreSubmission};
use crate::chart::DEFAULT_SONG_ID;
use crate::error::{Error, Result};
use crate::score::SessionResult;
use crate::storage::Profile;

/// What happened to a submitted result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionNotice {
    Submitted,
    /// The leaderboard was unreachable; the score waits in the pending queue
    Queued { timestamp: i64, reason: String },
}

/// Submit a result, queueing it for later when the leaderboard fails.
///
/// Requires a username. Rejected data (`InvalidInput`) is returned, not queued.
pub fn submit_or_queue(
    profile: &mut Profile,
    leaderboard: &mut dyn Leaderboard,
    result: &SessionResult,
) -> Result<SubmissionNotice> {
    let username = profile.username().ok_or(Error::MissingUsername)?.to_string();
    let submission = ScoreSubmission::from_result(result, &username);

    match leaderboard.submit_score(&submission) {
        Ok(()) => {
            info!("Submitted score {} as {}", result.score, username);
            Ok(SubmissionNotice::Submitted)
        }
        Err(e) if e.is_network() => {
            warn!("Submission failed, queued for retry: {}", e);
            let pending = profile.add_pending_score(result)?;
            Ok(SubmissionNotice::Queued {
                timestamp: pending.timestamp,
                reason: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub submitted: usize,
    /// Entries the leaderboard rejected; they stay queued
    pub rejected: usize,
    pub remaining: usize,
    /// Transport failure that stopped the sync
    pub stopped_by: Option<String>,
}

/// Submit queued scores oldest first.
///
/// Each success is removed from the queue. The first transport failure
/// stops the sync so later entries keep their order.
pub fn sync_pending(profile: &mut Profile, leaderboard: &mut dyn Leaderboard) -> SyncReport {
    let mut report = SyncReport::default();
    let queue = profile.pending_scores().to_vec();

    for pending in queue {
        let submission = ScoreSubmission::from_pending(&pending, DEFAULT_SONG_ID);
        match leaderboard.submit_score(&submission) {
            Ok(()) => {
                profile.remove_pending_score(pending.timestamp);
                report.submitted += 1;
            }
            Err(e) if e.is_network() => {
                warn!("Pending sync stopped: {}", e);
                report.stopped_by = Some(e.to_string());
                break;
            }
            Err(e) => {
                warn!("Pending score {} rejected: {}", pending.timestamp, e);
                report.rejected += 1;
            }
        }
    }

    report.remaining = profile.pending_scores().len();
    if report.submitted > 0 {
        info!(
            "Synced {} pending scores, {} remaining",
            report.submitted, report.remaining
        );
    }
    report
}
