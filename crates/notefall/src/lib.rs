//! # notefall
//!
//! Real-time judgement core for a lane-based rhythm game.
//!
//! This crate provides:
//! - Charts: notes, difficulties, the song catalog and a seeded pattern generator
//! - The judgement engine, note lifecycle tracking and score/combo/fever accounting
//! - A fixed-step game clock and the session state machine that wires them together
//! - Profile persistence, play history and result export
//! - Leaderboard access with offline queueing
//!
//! ## Feature Flags
//!
//! - `api`: Enables `HttpLeaderboard`, a client for the remote leaderboard service.

pub mod chart;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod judge;
pub mod lifecycle;
pub mod network;
pub mod prelude;
pub mod score;
pub mod session;
pub mod storage;
pub mod timeline;

pub use chart::{
    DEFAULT_SONG_ID, Difficulty, FlickDirection, Note, NoteId, NoteKind, NoteProducer,
    PatternGenerator, SongInfo, builtin_songs, find_song,
};
pub use clock::{GameClock, ManualClock, MonotonicClock, SystemClock};
pub use config::{GameConfig, SessionConfig, SessionConfigBuilder, TimingConfig};
pub use error::{Error, Result};
pub use export::{ExportFormat, JsonExporter, TsvExporter};
pub use judge::{JudgeWindows, JudgementOutcome, Tier, TimingBias, classify, timing_bias};
pub use lifecycle::{LifecycleTracker, NotePhase};
#[cfg(feature = "api")]
pub use network::HttpLeaderboard;
pub use network::{
    Leaderboard, MemoryLeaderboard, RankedScore, ScoreSubmission, SubmissionNotice, SyncReport,
    TopScores, submit_or_queue, sync_pending,
};
pub use score::{ScoreAccumulator, ScoreState, SessionResult};
pub use session::{
    AudioPort, DriveOutcome, FeedbackSink, InputEvent, InputSource, Pacing, Session,
    SessionPhase, SessionPorts, StopReason, StopSignal, TickDriver,
};
pub use storage::{HistoryLog, JsonFileStore, KeyValueStore, MemoryStore, Profile};
pub use timeline::NoteTimeline;
