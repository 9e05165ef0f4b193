//! CLI command implementations.
//!
//! - **play**: Generate a chart and play it with the autoplay bot or the keyboard
//! - **leaderboard**: Query rankings from the leaderboard service
//! - **submit**: Submit the last finished play
//! - **sync**: Retry queued submissions
//! - **profile**: Show or change username and note speed
//! - **export**: Export play history as TSV or JSON

pub mod export;
pub mod leaderboard;
pub mod play;
pub mod profile;
pub mod submit;
pub mod sync;

use anyhow::{Context, Result};
use notefall::HttpLeaderboard;

/// Build the leaderboard client, requiring an endpoint
pub(crate) fn leaderboard_client(endpoint: Option<&str>) -> Result<HttpLeaderboard> {
    let endpoint = endpoint
        .filter(|e| !e.trim().is_empty())
        .context("No leaderboard endpoint, use --endpoint or NOTEFALL_API_ENDPOINT")?;
    Ok(HttpLeaderboard::new(endpoint))
}
