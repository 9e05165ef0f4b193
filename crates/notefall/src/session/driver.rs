use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::{InputEvent, Session, SessionPhase, StopReason, StopSignal};
use crate::clock::ManualClock;
use crate::score::SessionResult;

/// Produces inputs for the session, polled once per tick
pub trait InputSource {
    fn poll(&mut self, logical_ms: u64) -> Vec<InputEvent>;
}

/// Input source with nothing to say
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self, _logical_ms: u64) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// Inputs scheduled at fixed logical times
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<(u64, InputEvent)>,
    next: usize,
}

impl ScriptedInput {
    pub fn new(mut events: Vec<(u64, InputEvent)>) -> Self {
        events.sort_by_key(|(at, _)| *at);
        Self { events, next: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.next
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, logical_ms: u64) -> Vec<InputEvent> {
        let due = self.events[self.next..].partition_point(|(at, _)| *at <= logical_ms);
        let out = self.events[self.next..self.next + due]
            .iter()
            .map(|(_, event)| *event)
            .collect();
        self.next += due;
        out
    }
}

/// How the driver paces ticks
#[derive(Debug, Clone)]
pub enum Pacing {
    /// One tick per period of wall-clock time
    RealTime,
    /// Advance a manual clock by one period per tick, never sleeping
    Simulated(ManualClock),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DriveOutcome {
    Finished(SessionResult),
    Stopped(StopReason),
}

/// Runs a session to completion on the current thread
pub struct TickDriver {
    tick_ms: u64,
    pacing: Pacing,
    stop: Arc<StopSignal>,
}

impl TickDriver {
    pub fn new(tick_ms: u64, pacing: Pacing) -> Self {
        Self {
            tick_ms,
            pacing,
            stop: Arc::new(StopSignal::new()),
        }
    }

    pub fn with_stop_signal(mut self, stop: Arc<StopSignal>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_handle(&self) -> Arc<StopSignal> {
        Arc::clone(&self.stop)
    }

    /// Tick until the session ends or a stop is requested.
    ///
    /// Real-time ticks are scheduled on fixed deadlines so time spent inside
    /// a tick does not stretch the period. A stopped session is torn down
    /// before returning.
    pub fn run(&self, session: &mut Session<'_>, input: &mut dyn InputSource) -> DriveOutcome {
        let period = Duration::from_millis(self.tick_ms);
        let mut deadline = Instant::now();
        info!("Driving session at {}ms per tick", self.tick_ms);

        loop {
            if let Some(reason) = self.stop.reason() {
                return self.abandon(session, reason);
            }

            if session.phase() == SessionPhase::Running {
                for event in input.poll(session.logical_ms()) {
                    if let Err(e) = session.push_input(event) {
                        warn!("Dropped input: {}", e);
                    }
                }
            }

            if session.tick() == SessionPhase::Ended {
                return match session.result() {
                    Some(result) => DriveOutcome::Finished(result.clone()),
                    None => self.abandon(session, StopReason::Interrupted),
                };
            }

            match &self.pacing {
                Pacing::RealTime => {
                    deadline = next_deadline(deadline, period, Instant::now());
                    if let Some(reason) = self.stop.wait_until(deadline) {
                        return self.abandon(session, reason);
                    }
                }
                Pacing::Simulated(clock) => clock.advance(self.tick_ms),
            }
        }
    }

    fn abandon(&self, session: &mut Session<'_>, reason: StopReason) -> DriveOutcome {
        info!("Play stopped at {}ms ({})", session.logical_ms(), reason);
        session.teardown();
        DriveOutcome::Stopped(reason)
    }
}

/// Next tick deadline. A loop that fell behind resumes from `now` instead of
/// bursting through the missed ticks.
fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Instant {
    let next = previous + period;
    if next < now { now } else { next }
}
