use std::sync::Arc;

use tracing::debug;

use crate::clock::{MonotonicClock, SystemClock};
use crate::judge::JudgementOutcome;

/// Music playback. Calls are fire-and-forget.
pub trait AudioPort: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn release(&mut self);
    fn seek_to(&mut self, position_ms: u64);
}

/// Receives every judgement for haptics or visual effects
pub trait FeedbackSink: Send {
    fn on_judgement(&mut self, outcome: &JudgementOutcome);
}

/// Audio port that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPort for NullAudio {
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn release(&mut self) {}
    fn seek_to(&mut self, _position_ms: u64) {}
}

/// Feedback sink that drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn on_judgement(&mut self, _outcome: &JudgementOutcome) {}
}

/// Feedback sink that logs judgements at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn on_judgement(&mut self, outcome: &JudgementOutcome) {
        debug!(
            "feedback: {} {} {}",
            outcome.note_id, outcome.tier, outcome.timing_bias
        );
    }
}

/// Collaborators injected into a session
pub struct SessionPorts {
    pub audio: Box<dyn AudioPort>,
    pub feedback: Box<dyn FeedbackSink>,
    /// Real time for the countdown and fever duration
    pub clock: Arc<dyn MonotonicClock>,
}

impl SessionPorts {
    pub fn new(clock: Arc<dyn MonotonicClock>) -> Self {
        Self {
            audio: Box::new(NullAudio),
            feedback: Box::new(NullFeedback),
            clock,
        }
    }

    pub fn audio(mut self, audio: Box<dyn AudioPort>) -> Self {
        self.audio = audio;
        self
    }

    pub fn feedback(mut self, feedback: Box<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }
}

impl Default for SessionPorts {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }
}
