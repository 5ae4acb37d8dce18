//! Build tool delegation for stackpm.
//!
//! Installing dependencies is handed to an external build tool. This crate
//! provides the pluggable `BuildTool` trait, the `StackTool` that runs
//! `stack build --dependencies-only`, a recording `MockTool`, and a
//! prerequisite check for the `stack` executable.

pub mod mock;
pub mod prereq;
pub mod tool;

pub use mock::MockTool;
pub use prereq::{check_stack_prereqs, format_missing, MissingPrereq};
pub use tool::{select_tool, BuildTool, StackTool};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("build tool I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("build tool '{0}' is not available on this system")]
    ToolUnavailable(String),
    #[error("build tool failed: {0}")]
    ExecFailed(String),
}
