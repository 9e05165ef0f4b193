use serde::{Deserialize, Serialize};

/// Default song when none is selected
pub const DEFAULT_SONG_ID: &str = "zuizui_rock";

/// Song metadata needed to drive a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongInfo {
    pub id: String,
    pub title: String,
    pub bpm: f64,
    pub duration_secs: f64,
}

impl SongInfo {
    pub fn new(id: &str, title: &str, bpm: f64, duration_secs: f64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            bpm,
            duration_secs,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        (self.duration_secs * 1000.0).round() as u64
    }

    /// Duration formatted as m:ss
    pub fn duration_display(&self) -> String {
        let total = self.duration_secs.round() as u64;
        format!("{}:{:02}", total / 60, total % 60)
    }
}

/// Songs shipped with the game
pub fn builtin_songs() -> Vec<SongInfo> {
    vec![
        SongInfo::new("cruel_angel_thesis", "Cyber Angel Thesis", 129.3, 284.0),
        SongInfo::new("solid_state_scouter", "Solid State Scouter", 94.2, 250.0),
        SongInfo::new("moechakka_fire", "Moechakka Fire", 81.6, 233.0),
        SongInfo::new("zuizui_anime", "Zuizui Song 2025 (Anime)", 76.0, 130.0),
        SongInfo::new("zuizui_rock", "Zuizui Song (Rock)", 82.0, 207.0),
    ]
}

pub fn find_song(id: &str) -> Option<SongInfo> {
    builtin_songs().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_song() {
        let song = find_song(DEFAULT_SONG_ID).unwrap();
        assert_eq!(song.bpm, 82.0);
        assert_eq!(song.duration_ms(), 207_000);
        assert!(find_song("missing").is_none());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(find_song("zuizui_anime").unwrap().duration_display(), "2:10");
        assert_eq!(find_song("cruel_angel_thesis").unwrap().duration_display(), "4:44");
    }
}
