//! Time sources.
//!
//! [`GameClock`] is the logical song clock: it advances by a fixed step per
//! tick, not by measured wall-clock delta, so it drifts from real time under
//! scheduling jitter. [`MonotonicClock`] provides real time for the
//! countdown and fever duration, which must not depend on the song clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::debug;

/// Default tick period
pub const DEFAULT_TICK_MS: u64 = 16;

/// Wall-clock milliseconds since an arbitrary origin
pub trait MonotonicClock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Real time from `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.fetch_max(ms, Ordering::SeqCst);
    }
}

impl MonotonicClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Logical song clock driven by the tick loop
#[derive(Debug, Clone)]
pub struct GameClock {
    logical_ms: u64,
    step_ms: u64,
    running: bool,
    stopped: bool,
}

impl GameClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            logical_ms: 0,
            step_ms,
            running: false,
            stopped: false,
        }
    }

    pub fn logical_ms(&self) -> u64 {
        self.logical_ms
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Start ticking. A stopped clock never restarts.
    pub fn start(&mut self) -> bool {
        if self.running || self.stopped {
            return false;
        }
        self.running = true;
        debug!("Game clock started ({}ms step)", self.step_ms);
        true
    }

    /// Advance one step. Returns the new time, or None when not running.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.logical_ms += self.step_ms;
        Some(self.logical_ms)
    }

    /// Stop for good. Returns true only on the first call.
    pub fn stop(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.running = false;
        self.stopped = true;
        debug!("Game clock stopped at {}ms", self.logical_ms);
        true
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_MS)
    }
}
