//! Prelude module for convenient imports
//!
//! ```ignore
//! use notefall::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Charts: `Note`, `Difficulty`, `SongInfo`, `NoteProducer`, `PatternGenerator`
//! - Sessions: `Session`, `SessionConfig`, `GameConfig`, `SessionPorts`, `TickDriver`
//! - Scores: `ScoreState`, `SessionResult`, `Tier`
//! - Persistence: `Profile`, `KeyValueStore`
//! - Error handling: `Error`, `Result`

pub use crate::chart::{Difficulty, Note, NoteProducer, PatternGenerator, SongInfo};

pub use crate::error::{Error, Result};

pub use crate::config::{GameConfig, SessionConfig};
pub use crate::session::{
    DriveOutcome, InputEvent, InputSource, Pacing, Session, SessionPhase, SessionPorts,
    TickDriver,
};

pub use crate::judge::Tier;
pub use crate::score::{ScoreState, SessionResult};

pub use crate::storage::{KeyValueStore, Profile};

pub use crate::export::ExportFormat;
pub use crate::network::Leaderboard;
