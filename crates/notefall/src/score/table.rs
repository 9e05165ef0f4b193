use serde::{Deserialize, Serialize};

use crate::judge::Tier;

/// Points awarded per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    pub perfect: u32,
    pub good: u32,
    pub normal: u32,
    pub fever_perfect: u32,
    pub fever_good: u32,
    pub fever_normal: u32,
    /// Scale points by the combo multiplier
    pub combo_bonus: bool,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            perfect: 100,
            good: 70,
            normal: 40,
            fever_perfect: 150,
            fever_good: 105,
            fever_normal: 60,
            combo_bonus: false,
        }
    }
}

impl ScoreTable {
    pub fn base_points(&self, tier: Tier, fever: bool) -> u32 {
        match (tier, fever) {
            (Tier::Perfect, false) => self.perfect,
            (Tier::Good, false) => self.good,
            (Tier::Normal, false) => self.normal,
            (Tier::Perfect, true) => self.fever_perfect,
            (Tier::Good, true) => self.fever_good,
            (Tier::Normal, true) => self.fever_normal,
            (Tier::Miss, _) => 0,
        }
    }

    /// Points for a hit that brings the combo to `combo`
    pub fn points(&self, tier: Tier, fever: bool, combo: u32) -> u32 {
        let base = self.base_points(tier, fever);
        if self.combo_bonus {
            combo_bonus_points(base, combo)
        } else {
            base
        }
    }
}

/// Multiplier of 1.0 plus 0.1 per full ten combo
pub fn combo_multiplier(combo: u32) -> f64 {
    (combo / 10) as f64 * 0.1 + 1.0
}

/// `floor(base * combo_multiplier(combo))` in integer arithmetic
pub fn combo_bonus_points(base: u32, combo: u32) -> u32 {
    let scaled = base as u64 * (10 + (combo / 10) as u64) / 10;
    scaled.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_points() {
        let table = ScoreTable::default();
        assert_eq!(table.base_points(Tier::Perfect, false), 100);
        assert_eq!(table.base_points(Tier::Good, true), 105);
        assert_eq!(table.base_points(Tier::Normal, true), 60);
        assert_eq!(table.base_points(Tier::Miss, true), 0);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(combo_multiplier(0), 1.0);
        assert_eq!(combo_multiplier(9), 1.0);
        assert!((combo_multiplier(10) - 1.1).abs() < 1e-9);
        assert!((combo_multiplier(20) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_combo_bonus_points() {
        assert_eq!(combo_bonus_points(100, 10), 110);
        assert_eq!(combo_bonus_points(100, 20), 120);
        assert_eq!(combo_bonus_points(50, 20), 60);
        assert_eq!(combo_bonus_points(100, 9), 100);
        assert_eq!(combo_bonus_points(100, 50), 150);
    }

    #[test]
    fn test_points_with_bonus_enabled() {
        let table = ScoreTable {
            combo_bonus: true,
            ..ScoreTable::default()
        };
        assert_eq!(table.points(Tier::Perfect, false, 10), 110);
        assert_eq!(table.points(Tier::Perfect, false, 20), 120);
        assert_eq!(ScoreTable::default().points(Tier::Perfect, false, 20), 100);
    }
}
