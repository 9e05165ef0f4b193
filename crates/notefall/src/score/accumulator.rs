use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{FeverConfig, ScoreTable};
use crate::judge::{JudgementOutcome, Tier};

/// Running score of a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub good_count: u32,
    pub normal_count: u32,
    pub miss_count: u32,
    /// 0..=gauge_max
    pub fever_gauge: f64,
    pub fever_active: bool,
}

impl ScoreState {
    pub fn is_full_combo(&self) -> bool {
        self.miss_count == 0
    }

    pub fn is_all_perfect(&self) -> bool {
        self.miss_count == 0 && self.good_count == 0 && self.normal_count == 0
    }

    pub fn judged_count(&self) -> u32 {
        self.perfect_count + self.good_count + self.normal_count + self.miss_count
    }
}

/// Folds judgement outcomes into score, combo and the fever state machine
#[derive(Debug, Clone)]
pub struct ScoreAccumulator {
    table: ScoreTable,
    fever: FeverConfig,
    state: ScoreState,
    /// Real-time instant at which an active fever ends
    fever_ends_at_ms: Option<u64>,
}

impl ScoreAccumulator {
    pub fn new(table: ScoreTable, fever: FeverConfig) -> Self {
        Self {
            table,
            fever,
            state: ScoreState::default(),
            fever_ends_at_ms: None,
        }
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    /// Apply one outcome. `real_now_ms` is wall-clock time, not song time.
    pub fn apply(&mut self, outcome: &JudgementOutcome, real_now_ms: u64) -> ScoreState {
        self.update_fever(real_now_ms);
        let state = &mut self.state;

        if outcome.tier.is_miss() {
            state.combo = 0;
            state.miss_count += 1;
            if !state.fever_active {
                state.fever_gauge = (state.fever_gauge - self.fever.miss_penalty).max(0.0);
            }
            debug!("{}: MISS", outcome.note_id);
            return *state;
        }

        state.combo += 1;
        state.max_combo = state.max_combo.max(state.combo);
        state.score = state.score.saturating_add(self.table.points(
            outcome.tier,
            state.fever_active,
            state.combo,
        ));
        match outcome.tier {
            Tier::Perfect => state.perfect_count += 1,
            Tier::Good => state.good_count += 1,
            Tier::Normal => state.normal_count += 1,
            Tier::Miss => {}
        }

        if !state.fever_active {
            state.fever_gauge =
                (state.fever_gauge + self.fever.gain(outcome.tier)).min(self.fever.gauge_max);
            if self.fever.should_activate(state.combo, state.fever_gauge) {
                state.fever_active = true;
                self.fever_ends_at_ms = Some(real_now_ms + self.fever.duration_ms);
                info!("Fever started at combo {}", state.combo);
            }
        }

        debug!(
            "{}: {} ({}) combo {}",
            outcome.note_id, outcome.tier, outcome.timing_bias, state.combo
        );
        *state
    }

    /// End fever once its real-time duration elapsed. Returns true on deactivation.
    pub fn update_fever(&mut self, real_now_ms: u64) -> bool {
        match self.fever_ends_at_ms {
            Some(end) if real_now_ms >= end => {
                self.fever_ends_at_ms = None;
                self.state.fever_active = false;
                self.state.fever_gauge = 0.0;
                info!("Fever ended");
                true
            }
            _ => false,
        }
    }
}
