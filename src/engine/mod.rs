//! Update decision engine.
//!
//! - [`mode`] - The mutually exclusive run modes
//! - [`decision`] - The state machine that runs one mode to an outcome

pub mod decision;
pub mod mode;

pub use decision::{RunOutcome, UpdateEngine, CONFIRM_ACTION};
pub use mode::RunMode;
