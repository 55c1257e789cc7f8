//! Process execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, execute_tool, CommandOptions, CommandResult, Executor,
    ProcessExecutor,
};
pub use platform::{is_elevated, is_executable};
