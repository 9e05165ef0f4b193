use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use strum::{Display, IntoStaticStr};
use tracing::debug;

/// Why a play stopped before its natural end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// Quit key (Esc or q)
    UserQuit,
    /// Ctrl+C or a process signal
    Interrupted,
    /// The play ended on its own; helpers should wind down
    Finished,
}

/// Stop request shared between the tick loop and the threads that feed it.
///
/// The first reason recorded wins. Pacing waits wake as soon as a stop is requested.
#[derive(Debug, Default)]
pub struct StopSignal {
    reason: Mutex<Option<StopReason>>,
    wake: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock still holds a valid `Option`, so keep using it
    fn lock(&self) -> MutexGuard<'_, Option<StopReason>> {
        self.reason.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request a stop. Returns false if a stop was already requested.
    pub fn stop(&self, reason: StopReason) -> bool {
        let mut current = self.lock();
        if current.is_some() {
            return false;
        }
        *current = Some(reason);
        drop(current);
        debug!("Stop requested: {}", reason);
        self.wake.notify_all();
        true
    }

    pub fn reason(&self) -> Option<StopReason> {
        *self.lock()
    }

    pub fn is_stopped(&self) -> bool {
        self.reason().is_some()
    }

    /// Sleep until `deadline` unless a stop arrives first
    pub fn wait_until(&self, deadline: Instant) -> Option<StopReason> {
        let mut current = self.lock();
        loop {
            if let Some(reason) = *current {
                return Some(reason);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            current = match self.wake.wait_timeout(current, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}
