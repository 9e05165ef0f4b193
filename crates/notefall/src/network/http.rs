use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::{
    AllRankings, Leaderboard, RankedScore, ScoreSubmission, TopScores, resolve_limit,
    validate_song_id,
};
use crate::chart::Difficulty;
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(serde::Deserialize)]
struct Envelope<T> {
    result: EnvelopeResult<T>,
}

#[derive(serde::Deserialize)]
struct EnvelopeResult<T> {
    data: T,
}

/// Leaderboard service over tRPC-style HTTP endpoints
/// (`<base>/api/trpc/leaderboard.<procedure>`)
pub struct HttpLeaderboard {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpLeaderboard {
    pub fn new(base_url: &str) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, procedure: &str) -> String {
        format!("{}/api/trpc/leaderboard.{}", self.base_url, procedure)
    }

    fn query<T: DeserializeOwned>(&self, procedure: &str, input: serde_json::Value) -> Result<T> {
        let url = self.url(procedure);
        let input = serde_json::to_string(&input)?;
        debug!("GET {} input={}", url, input);

        let mut response = self
            .agent
            .get(&url)
            .query("input", &input)
            .call()
            .map_err(|e| Error::Network(format!("{}: {}", procedure, e)))?;
        let envelope: Envelope<T> = response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Network(format!("{}: malformed response: {}", procedure, e)))?;
        Ok(envelope.result.data)
    }

    fn mutate<B: Serialize>(&self, procedure: &str, body: &B) -> Result<()> {
        let url = self.url(procedure);
        debug!("POST {}", url);
        self.agent
            .post(&url)
            .send_json(body)
            .map_err(|e| Error::NetworkSubmissionFailed(format!("{}: {}", procedure, e)))?;
        Ok(())
    }
}

impl Leaderboard for HttpLeaderboard {
    fn submit_score(&mut self, submission: &ScoreSubmission) -> Result<()> {
        submission.validate()?;
        self.mutate("submitScore", submission)
    }

    fn by_difficulty(&self, difficulty: Difficulty, limit: Option<u32>) -> Result<Vec<RankedScore>> {
        let limit = resolve_limit(limit)?;
        self.query(
            "getByDifficulty",
            json!({ "difficulty": difficulty, "limit": limit }),
        )
    }

    fn all(&self, limit: Option<u32>) -> Result<AllRankings> {
        let limit = resolve_limit(limit)?;
        self.query("getAll", json!({ "limit": limit }))
    }

    fn by_song(
        &self,
        song_id: &str,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<RankedScore>> {
        validate_song_id(song_id)?;
        let limit = resolve_limit(limit)?;
        let mut input = json!({ "songId": song_id, "limit": limit });
        if let Some(difficulty) = difficulty {
            input["difficulty"] = json!(difficulty);
        }
        self.query("getBySong", input)
    }

    fn top_scores_by_song(&self, song_id: &str, difficulty: Difficulty) -> Result<TopScores> {
        validate_song_id(song_id)?;
        self.query(
            "getTopScoresBySong",
            json!({ "songId": song_id, "difficulty": difficulty }),
        )
    }
}
