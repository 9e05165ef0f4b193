use serde::{Deserialize, Serialize};

use super::{JudgementOutcome, Tier, TimingBias};
use crate::chart::Note;
use crate::error::{Error, Result};

/// Timing windows in milliseconds, applied to the absolute time delta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeWindows {
    pub perfect_ms: f64,
    pub good_ms: f64,
    pub normal_ms: f64,
    /// A visible note this late is swept as a miss
    pub miss_ms: f64,
    /// Inputs this close to the target report no fast/late bias
    pub fast_late_epsilon_ms: f64,
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect_ms: 150.0,
            good_ms: 300.0,
            normal_ms: 500.0,
            miss_ms: 700.0,
            fast_late_epsilon_ms: 50.0,
        }
    }
}

impl JudgeWindows {
    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.perfect_ms
            && self.perfect_ms <= self.good_ms
            && self.good_ms <= self.normal_ms
            && self.normal_ms <= self.miss_ms;
        if !ordered || !self.fast_late_epsilon_ms.is_finite() || self.fast_late_epsilon_ms < 0.0 {
            return Err(Error::InvalidInput(format!(
                "judge windows must not decrease (perfect {} <= good {} <= normal {} <= miss {})",
                self.perfect_ms, self.good_ms, self.normal_ms, self.miss_ms
            )));
        }
        Ok(())
    }

    /// Map a time delta to a tier. Windows are inclusive upper bounds.
    pub fn classify(&self, time_delta_ms: f64) -> Tier {
        let delta = time_delta_ms.abs();
        if delta <= self.perfect_ms {
            Tier::Perfect
        } else if delta <= self.good_ms {
            Tier::Good
        } else if delta <= self.normal_ms {
            Tier::Normal
        } else {
            Tier::Miss
        }
    }

    pub fn timing_bias(&self, actual_ms: f64, target_ms: f64) -> TimingBias {
        let diff = actual_ms - target_ms;
        if diff.abs() <= self.fast_late_epsilon_ms {
            TimingBias::OnTime
        } else if diff < 0.0 {
            TimingBias::Fast
        } else {
            TimingBias::Late
        }
    }

    /// True once a note's judgement instant is strictly more than `miss_ms` behind `now`
    pub fn is_expired(&self, now_ms: f64, target_ms: f64) -> bool {
        now_ms - target_ms > self.miss_ms
    }

    /// Judge a press on a normal or flick note. Flick direction is not checked.
    pub fn judge_press(&self, note: &Note, now_ms: f64) -> JudgementOutcome {
        self.judge_against(note, now_ms, note.time_ms())
    }

    /// Judge the release of a held long note against its end time
    pub fn judge_release(&self, note: &Note, now_ms: f64) -> JudgementOutcome {
        self.judge_against(note, now_ms, note.end_time_ms())
    }

    fn judge_against(&self, note: &Note, now_ms: f64, target_ms: f64) -> JudgementOutcome {
        JudgementOutcome::new(
            note.id.clone(),
            self.classify(now_ms - target_ms),
            self.timing_bias(now_ms, target_ms),
        )
    }
}
