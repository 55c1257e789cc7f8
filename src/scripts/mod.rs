//! Update scripts.
//!
//! The actual update work is done by independently-owned executables in
//! a script directory (`/etc/ublue-update.d` by default).
//!
//! - [`source`] - Discovering scripts and their executable bit
//! - [`runner`] - Running them in isolation and aggregating outcomes

pub mod runner;
pub mod source;

pub use runner::{ScriptOutcome, ScriptReport, ScriptRunner};
pub use source::{DirectorySource, ScriptEntry, ScriptSource};
