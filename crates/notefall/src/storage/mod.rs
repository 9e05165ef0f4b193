//! Persistence.
//!
//! - **Key-value port**: [`KeyValueStore`] with in-memory and JSON-file backends
//! - **Profile**: username, note speed, high scores and pending scores
//! - **History**: JSON-lines log of finished sessions

mod history;
mod profile;
mod store;

pub use history::*;
pub use profile::*;
pub use store::*;
