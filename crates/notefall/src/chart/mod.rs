//! Chart data: notes, difficulties, songs and the note producer.

mod difficulty;
mod generator;
mod note;
mod song;

pub use difficulty::*;
pub use generator::*;
pub use note::*;
pub use song::*;
