use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::judge::Tier;

/// Fever gauge tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeverConfig {
    pub gauge_max: f64,
    pub perfect_gain: f64,
    pub good_gain: f64,
    pub normal_gain: f64,
    pub miss_penalty: f64,
    /// Combo needed (together with a full gauge) to start fever
    pub combo_required: u32,
    /// Real time fever lasts once started
    pub duration_ms: u64,
}

impl Default for FeverConfig {
    fn default() -> Self {
        Self {
            gauge_max: 100.0,
            perfect_gain: 2.0,
            good_gain: 1.0,
            normal_gain: 0.5,
            miss_penalty: 10.0,
            combo_required: 50,
            duration_ms: 10_000,
        }
    }
}

impl FeverConfig {
    pub fn gain(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Perfect => self.perfect_gain,
            Tier::Good => self.good_gain,
            Tier::Normal => self.normal_gain,
            Tier::Miss => 0.0,
        }
    }

    /// The gauge must have a positive finite size; gains and the miss
    /// penalty must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.gauge_max.is_finite() || self.gauge_max <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "fever gauge size must be positive, got {}",
                self.gauge_max
            )));
        }
        let amounts = [
            ("perfect_gain", self.perfect_gain),
            ("good_gain", self.good_gain),
            ("normal_gain", self.normal_gain),
            ("miss_penalty", self.miss_penalty),
        ];
        if let Some((name, value)) = amounts
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(Error::InvalidInput(format!(
                "fever {} must be non-negative, got {}",
                name, value
            )));
        }
        Ok(())
    }

    pub fn should_activate(&self, combo: u32, gauge: f64) -> bool {
        combo >= self.combo_required && gauge >= self.gauge_max
    }
}
