//! Session controller.
//!
//! - **Controller**: the `Countdown -> Running -> Ending -> Ended` state machine
//!   wiring clock, timeline, lifecycle tracker, judge and accumulator
//! - **Ports**: audio and judgement feedback collaborators
//! - **Driver**: fixed-period tick loop paced against deadlines
//! - **Stop**: stop requests with a reason, shared with input threads

mod controller;
mod driver;
mod input;
mod ports;
mod stop;

pub use controller::*;
pub use driver::*;
pub use input::*;
pub use ports::*;
pub use stop::*;
