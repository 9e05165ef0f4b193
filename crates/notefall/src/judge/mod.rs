//! Judgement engine.
//!
//! Stateless decision logic: given a time delta (or a note and the current
//! song time) decide the accuracy tier and fast/late bias. All thresholds
//! come from [`JudgeWindows`].

mod tier;
mod windows;

pub use tier::*;
pub use windows::*;

/// Classify a time delta with the default windows
pub fn classify(time_delta_ms: f64) -> Tier {
    JudgeWindows::default().classify(time_delta_ms)
}

/// Fast/late bias with the default epsilon
pub fn timing_bias(actual_ms: f64, target_ms: f64) -> TimingBias {
    JudgeWindows::default().timing_bias(actual_ms, target_ms)
}
