//! Leaderboard command: print rankings.

use anyhow::Result;
use notefall::{Difficulty, Leaderboard, RankedScore};

use super::leaderboard_client;
use crate::cli::LeaderboardQuery;

pub fn run(endpoint: Option<&str>, query: &LeaderboardQuery) -> Result<()> {
    let leaderboard = leaderboard_client(endpoint)?;
    run_with(&leaderboard, query)
}

fn run_with(leaderboard: &dyn Leaderboard, query: &LeaderboardQuery) -> Result<()> {
    match query {
        LeaderboardQuery::Difficulty { difficulty, limit } => {
            let rows = leaderboard.by_difficulty(*difficulty, *limit)?;
            print!("{}", render_table(difficulty.expand_name(), &rows));
        }
        LeaderboardQuery::All { limit } => {
            let all = leaderboard.all(*limit)?;
            for difficulty in Difficulty::ALL {
                print!("{}", render_table(difficulty.expand_name(), all.get(difficulty)));
            }
        }
        LeaderboardQuery::Song {
            song_id,
            difficulty,
            limit,
        } => {
            let rows = leaderboard.by_song(song_id, *difficulty, *limit)?;
            let title = match difficulty {
                Some(d) => format!("{} [{}]", song_id, d.expand_name()),
                None => song_id.clone(),
            };
            print!("{}", render_table(&title, &rows));
        }
        LeaderboardQuery::Top {
            song_id,
            difficulty,
        } => {
            let top = leaderboard.top_scores_by_song(song_id, *difficulty)?;
            println!("{} [{}]", song_id, difficulty.expand_name());
            println!("All time:   {}", describe(top.all_time.as_ref()));
            println!("This month: {}", describe(top.this_month.as_ref()));
        }
    }
    Ok(())
}

fn describe(row: Option<&RankedScore>) -> String {
    match row {
        Some(row) => format!(
            "{} by {} ({})",
            row.score,
            row.username,
            row.created_at.format("%Y-%m-%d")
        ),
        None => "-".to_string(),
    }
}

fn render_table(title: &str, rows: &[RankedScore]) -> String {
    let mut out = format!("== {} ==\n", title);
    if rows.is_empty() {
        out.push_str("(no scores)\n");
        return out;
    }
    for (rank, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<20} {:>7}  P{} G{} M{} C{}\n",
            rank + 1,
            row.username,
            row.score,
            row.perfect,
            row.good,
            row.miss,
            row.max_combo
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(username: &str, score: u32) -> RankedScore {
        RankedScore {
            id: 1,
            username: username.to_string(),
            score,
            song_id: "zuizui_rock".to_string(),
            difficulty: Difficulty::Hard,
            perfect: 10,
            good: 2,
            miss: 1,
            max_combo: 9,
            created_at: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_table_ranks() {
        let table = render_table("HARD", &[row("alice", 900), row("bob", 800)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "== HARD ==");
        assert!(lines[1].starts_with("  1. alice"));
        assert!(lines[2].contains("800"));
    }

    #[test]
    fn test_render_empty_table() {
        assert!(render_table("EASY", &[]).contains("(no scores)"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(None), "-");
        assert_eq!(describe(Some(&row("alice", 900))), "900 by alice (2026-03-14)");
    }
}
