use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::debug;

use super::{
    AllRankings, Leaderboard, RankedScore, ScoreSubmission, TopScores, resolve_limit,
    validate_song_id,
};
use crate::chart::Difficulty;
use crate::error::{Error, Result};

/// In-process leaderboard. Can be taken offline to simulate network failure.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    rows: Vec<RankedScore>,
    next_id: u64,
    offline: bool,
    now: Option<DateTime<Utc>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_online(&mut self, online: bool) {
        self.offline = !online;
    }

    /// Pin the clock used for new rows and the month boundary
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = Some(now);
    }

    pub fn rows(&self) -> &[RankedScore] {
        &self.rows
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(Error::NetworkSubmissionFailed(
                "leaderboard offline".to_string(),
            ));
        }
        Ok(())
    }

    /// Matching rows, best first. Ties keep insertion order.
    fn ranked<F>(&self, limit: u32, filter: F) -> Vec<RankedScore>
    where
        F: Fn(&RankedScore) -> bool,
    {
        let mut rows: Vec<RankedScore> = self.rows.iter().filter(|r| filter(r)).cloned().collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit as usize);
        rows
    }

    fn month_start(&self) -> DateTime<Utc> {
        let now = self.now();
        Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now)
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<()> {
        submission.validate()?;
        self.check_online()?;

        self.next_id += 1;
        let row = RankedScore {
            id: self.next_id,
            username: submission.username.clone(),
            score: submission.score,
            song_id: submission.song_id.clone(),
            difficulty: submission.difficulty,
            perfect: submission.perfect,
            good: submission.good,
            miss: submission.miss,
            max_combo: submission.max_combo,
            created_at: self.now(),
        };
        debug!("Stored score {} for {}", row.score, row.username);
        self.rows.push(row);
        Ok(())
    }

    fn by_difficulty(&self, difficulty: Difficulty, limit: Option<u32>) -> Result<Vec<RankedScore>> {
        let limit = resolve_limit(limit)?;
        self.check_online()?;
        Ok(self.ranked(limit, |r| r.difficulty == difficulty))
    }

    fn all(&self, limit: Option<u32>) -> Result<AllRankings> {
        let limit = resolve_limit(limit)?;
        self.check_online()?;
        Ok(AllRankings {
            easy: self.ranked(limit, |r| r.difficulty == Difficulty::Easy),
            normal: self.ranked(limit, |r| r.difficulty == Difficulty::Normal),
            hard: self.ranked(limit, |r| r.difficulty == Difficulty::Hard),
        })
    }

    fn by_song(
        &self,
        song_id: &str,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<RankedScore>> {
        validate_song_id(song_id)?;
        let limit = resolve_limit(limit)?;
        self.check_online()?;
        Ok(self.ranked(limit, |r| {
            r.song_id == song_id && difficulty.is_none_or(|d| r.difficulty == d)
        }))
    }

    fn top_scores_by_song(&self, song_id: &str, difficulty: Difficulty) -> Result<TopScores> {
        validate_song_id(song_id)?;
        self.check_online()?;
        let month_start = self.month_start();
        let chart = |r: &RankedScore| r.song_id == song_id && r.difficulty == difficulty;
        Ok(TopScores {
            all_time: self.ranked(1, chart).into_iter().next(),
            this_month: self
                .ranked(1, |r| chart(r) && r.created_at >= month_start)
                .into_iter()
                .next(),
        })
    }
}
