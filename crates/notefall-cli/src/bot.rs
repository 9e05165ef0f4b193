use notefall::session::ScriptedInput;
use notefall::{InputEvent, InputSource, Note, NoteKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Imperfections applied by the autoplay bot
#[derive(Debug, Clone, Copy, Default)]
pub struct BotSkill {
    /// Constant timing error, positive is late
    pub offset_ms: f64,
    /// Uniform random error in `[-jitter, jitter]`
    pub jitter_ms: f64,
    /// Probability of ignoring a note entirely
    pub miss_rate: f64,
}

/// Plays a chart from its note list
pub struct AutoplayBot {
    script: ScriptedInput,
}

impl AutoplayBot {
    pub fn new(notes: &[Note], skill: BotSkill, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let miss_rate = if skill.miss_rate.is_nan() {
            0.0
        } else {
            skill.miss_rate.clamp(0.0, 1.0)
        };
        let jitter = skill.jitter_ms.abs();

        let timing = |target_ms: f64, rng: &mut StdRng| -> u64 {
            let noise = if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            (target_ms + skill.offset_ms + noise).max(0.0).round() as u64
        };

        let mut events = Vec::with_capacity(notes.len() * 2);
        for note in notes {
            if rng.gen_bool(miss_rate) {
                continue;
            }
            let press_at = timing(note.time_ms(), &mut rng);
            match note.kind {
                NoteKind::Normal => events.push((press_at, InputEvent::press(note.lane))),
                NoteKind::Flick { direction } => {
                    events.push((press_at, InputEvent::flick(note.lane, direction)))
                }
                NoteKind::Long { .. } => {
                    let release_at = timing(note.end_time_ms(), &mut rng).max(press_at);
                    events.push((press_at, InputEvent::press(note.lane)));
                    events.push((release_at, InputEvent::release(note.lane)));
                }
            }
        }

        Self {
            script: ScriptedInput::new(events),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.remaining()
    }
}

impl InputSource for AutoplayBot {
    fn poll(&mut self, logical_ms: u64) -> Vec<InputEvent> {
        self.script.poll(logical_ms)
    }
}
