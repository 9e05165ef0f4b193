//! Score, combo and fever accumulation.
//!
//! - **Score table**: points per tier, fever rates, optional combo bonus
//! - **Fever**: gauge tuning and activation rule
//! - **Accumulator**: folds judgement outcomes into a [`ScoreState`]
//! - **Result**: the record emitted when a session ends

mod accumulator;
mod fever;
mod result;
mod table;

pub use accumulator::*;
pub use fever::*;
pub use result::*;
pub use table::*;
