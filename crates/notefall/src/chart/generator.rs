//! Procedural note generation.
//!
//! Produces a chart from difficulty, BPM and song length. The random source
//! is seeded at construction so the same seed always yields the same chart.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{Difficulty, FlickDirection, Note};

/// Song length used when the caller does not know it
pub const DEFAULT_SONG_DURATION_SECS: f64 = 206.0;
pub const DEFAULT_BPM: f64 = 82.0;
pub const MIN_BPM: f64 = 20.0;
pub const MAX_BPM: f64 = 400.0;

/// No notes during the first seconds of a song
const INTRO_SECS: f64 = 8.0;
/// Main section stops this many seconds before the end
const MAIN_TAIL_SECS: f64 = 10.0;
/// Outro stops this many seconds before the end
const OUTRO_TAIL_SECS: f64 = 5.0;

/// Tempo the generator can work with. Unusable values fall back to
/// [`DEFAULT_BPM`], out-of-range ones are clamped.
pub fn sanitize_bpm(bpm: f64) -> f64 {
    if !bpm.is_finite() || bpm <= 0.0 {
        warn!("Unusable BPM {}, using {}", bpm, DEFAULT_BPM);
        return DEFAULT_BPM;
    }
    let clamped = bpm.clamp(MIN_BPM, MAX_BPM);
    if clamped != bpm {
        warn!("BPM {} out of range, using {}", bpm, clamped);
    }
    clamped
}

/// Producer of the note sequence for a session
pub trait NoteProducer {
    fn generate(&mut self, difficulty: Difficulty, bpm: f64, duration_secs: Option<f64>)
    -> Vec<Note>;
}

/// Per-difficulty density and special-note ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternProfile {
    /// Beats between consecutive notes
    pub beats_per_note: f64,
    /// Number of lanes notes are spread over
    pub lane_variety: u8,
    pub long_chance: f64,
    pub flick_chance: f64,
}

impl PatternProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                beats_per_note: 2.0,
                lane_variety: 2,
                long_chance: 0.1,
                flick_chance: 0.1,
            },
            Difficulty::Normal => Self {
                beats_per_note: 1.0,
                lane_variety: 3,
                long_chance: 0.2,
                flick_chance: 0.15,
            },
            Difficulty::Hard => Self {
                beats_per_note: 0.5,
                lane_variety: 4,
                long_chance: 0.3,
                flick_chance: 0.2,
            },
        }
    }
}

/// Seeded random pattern generator
pub struct PatternGenerator {
    rng: StdRng,
}

impl PatternGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    fn lane(&mut self, variety: u8) -> u8 {
        self.rng.gen_range(0..variety.max(1))
    }

    /// Spacing jitter of up to ±10% of the interval
    fn jitter(&mut self, interval: f64) -> f64 {
        (self.unit() - 0.5) * interval * 0.2
    }
}

impl NoteProducer for PatternGenerator {
    fn generate(
        &mut self,
        difficulty: Difficulty,
        bpm: f64,
        duration_secs: Option<f64>,
    ) -> Vec<Note> {
        let profile = PatternProfile::for_difficulty(difficulty);
        let beat = 60.0 / sanitize_bpm(bpm);
        let interval = beat * profile.beats_per_note;
        let duration = duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_SONG_DURATION_SECS);

        let mut notes = Vec::new();
        let mut next_id = 0u32;
        let mut make_id = || {
            let id = format!("note_{}", next_id);
            next_id += 1;
            id
        };

        let mut cursor = INTRO_SECS;
        while cursor < duration - MAIN_TAIL_SECS {
            let lane = self.lane(profile.lane_variety);
            let roll = self.unit();

            if roll < profile.long_chance {
                let hold = beat * (1.0 + self.rng.gen_range(0..2) as f64);
                notes.push(Note::long(make_id(), cursor, lane, hold));
                cursor += hold + interval;
            } else if roll < profile.long_chance + profile.flick_chance {
                let direction = FlickDirection::ALL[self.rng.gen_range(0..FlickDirection::ALL.len())];
                notes.push(Note::flick(make_id(), cursor, lane, direction));
                cursor += interval + self.jitter(interval);
            } else {
                notes.push(Note::normal(make_id(), cursor, lane));
                cursor += interval + self.jitter(interval);
            }
        }

        while cursor < duration - OUTRO_TAIL_SECS {
            let lane = self.lane(profile.lane_variety);
            notes.push(Note::normal(make_id(), cursor, lane));
            cursor += interval * 2.0;
        }

        debug!(
            "Generated {} notes ({}, {} BPM, {:.0}s)",
            notes.len(),
            difficulty,
            bpm,
            duration
        );
        notes
    }
}
