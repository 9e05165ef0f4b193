//! Leaderboard access.
//!
//! - **Port**: [`Leaderboard`] with the five ranking procedures
//! - **Backends**: [`MemoryLeaderboard`], and `HttpLeaderboard` behind the `api` feature
//! - **Submission**: submit-or-queue and pending-score sync over a [`Profile`](crate::storage::Profile)

#[cfg(feature = "api")]
mod http;
mod memory;
mod submit;
mod types;

#[cfg(feature = "api")]
pub use http::*;
pub use memory::*;
pub use submit::*;
pub use types::*;
