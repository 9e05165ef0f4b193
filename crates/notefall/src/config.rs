//! Game and session configuration.
//!
//! [`GameConfig`] holds tuning shared by every session (judge windows,
//! scoring, fever, timing) and loads from TOML. [`SessionConfig`] describes
//! one play and is built with [`SessionConfig::builder`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{DEFAULT_SONG_ID, Difficulty, SongInfo};
use crate::clock::DEFAULT_TICK_MS;
use crate::error::{Error, Result};
use crate::judge::JudgeWindows;
use crate::score::{FeverConfig, ScoreTable};

pub const NOTE_SPEED_MIN: f64 = 0.5;
pub const NOTE_SPEED_MAX: f64 = 2.0;
pub const DEFAULT_NOTE_SPEED: f64 = 1.0;

/// Clamp a note speed multiplier into the supported range
pub fn clamp_note_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return DEFAULT_NOTE_SPEED;
    }
    speed.clamp(NOTE_SPEED_MIN, NOTE_SPEED_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_ms: u64,
    /// Fall time at note speed 1.0
    pub base_fall_duration_ms: f64,
    pub countdown_from: u32,
    pub countdown_step_ms: u64,
    pub lane_count: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            base_fall_duration_ms: 2500.0,
            countdown_from: 3,
            countdown_step_ms: 1000,
            lane_count: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub judge: JudgeWindows,
    pub scoring: ScoreTable,
    pub fever: FeverConfig,
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded game config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.judge.validate()?;
        self.fever.validate()?;
        if self.timing.tick_ms == 0 || self.timing.countdown_step_ms == 0 {
            return Err(Error::InvalidInput(
                "tick and countdown periods must be non-zero".to_string(),
            ));
        }
        if self.timing.lane_count == 0 {
            return Err(Error::InvalidInput("lane count must be non-zero".to_string()));
        }
        let fall = self.timing.base_fall_duration_ms;
        if !fall.is_finite() || fall <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "fall duration must be positive, got {}",
                fall
            )));
        }
        Ok(())
    }
}

/// Parameters of a single play
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub song_id: String,
    pub song_duration_ms: f64,
    /// Clamped to [0.5, 2.0]
    pub note_speed: f64,
}

impl SessionConfig {
    /// Create a new configuration builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Time a note spends falling before it reaches the judgement line
    pub fn fall_duration_ms(&self, timing: &TimingConfig) -> f64 {
        timing.base_fall_duration_ms / self.note_speed
    }
}

/// Builder for SessionConfig
#[derive(Debug, Clone, Default)]
pub struct SessionConfigBuilder {
    difficulty: Option<Difficulty>,
    song_id: Option<String>,
    song_duration_ms: Option<f64>,
    note_speed: Option<f64>,
}

impl SessionConfigBuilder {
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Take id and duration from a song
    pub fn song(mut self, song: &SongInfo) -> Self {
        self.song_id = Some(song.id.clone());
        self.song_duration_ms = Some(song.duration_secs * 1000.0);
        self
    }

    pub fn song_id<S: Into<String>>(mut self, id: S) -> Self {
        self.song_id = Some(id.into());
        self
    }

    pub fn song_duration_ms(mut self, ms: f64) -> Self {
        self.song_duration_ms = Some(ms);
        self
    }

    pub fn note_speed(mut self, speed: f64) -> Self {
        self.note_speed = Some(speed);
        self
    }

    /// Build the configuration. The song duration is required.
    pub fn build(self) -> Result<SessionConfig> {
        let song_duration_ms = self
            .song_duration_ms
            .ok_or_else(|| Error::InvalidInput("song duration is required".to_string()))?;
        if !song_duration_ms.is_finite() || song_duration_ms <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "song duration must be positive, got {}",
                song_duration_ms
            )));
        }

        Ok(SessionConfig {
            difficulty: self.difficulty.unwrap_or_default(),
            song_id: self.song_id.unwrap_or_else(|| DEFAULT_SONG_ID.to_string()),
            song_duration_ms,
            note_speed: clamp_note_speed(self.note_speed.unwrap_or(DEFAULT_NOTE_SPEED)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::find_song;

    #[test]
    fn test_clamp_note_speed() {
        assert_eq!(clamp_note_speed(0.1), 0.5);
        assert_eq!(clamp_note_speed(3.0), 2.0);
        assert_eq!(clamp_note_speed(1.25), 1.25);
        assert_eq!(clamp_note_speed(f64::NAN), 1.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml(
            r#"
            [judge]
            perfect_ms = 50.0
            good_ms = 100.0

            [fever]
            duration_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.judge.perfect_ms, 50.0);
        assert_eq!(config.judge.normal_ms, 500.0);
        assert_eq!(config.fever.duration_ms, 5000);
        assert_eq!(config.timing.tick_ms, 16);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(matches!(
            GameConfig::from_toml("[judge]\nperfect_ms = 400.0"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[timing]\ntick_ms = \"fast\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_fever_is_rejected() {
        assert!(matches!(
            GameConfig::from_toml("[fever]\ngauge_max = 0.0"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            GameConfig::from_toml("[fever]\nperfect_gain = -2.0"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_toml_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        let config = GameConfig::default();
        fs::write(&path, config.to_toml().unwrap()).unwrap();
        assert_eq!(GameConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_session_builder() {
        let song = find_song("zuizui_anime").unwrap();
        let config = SessionConfig::builder()
            .difficulty(Difficulty::Hard)
            .song(&song)
            .note_speed(4.0)
            .build()
            .unwrap();
        assert_eq!(config.song_id, "zuizui_anime");
        assert_eq!(config.song_duration_ms, 130_000.0);
        assert_eq!(config.note_speed, 2.0);
        assert_eq!(config.fall_duration_ms(&TimingConfig::default()), 1250.0);
    }

    #[test]
    fn test_session_builder_requires_duration() {
        assert!(SessionConfig::builder().build().is_err());
        assert!(SessionConfig::builder().song_duration_ms(-1.0).build().is_err());
    }
}
