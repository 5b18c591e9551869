//! Subprocess execution for check and action plugins.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style
//! invocation. This prevents shell injection by passing arguments as
//! discrete elements rather than shell strings.

pub mod command_spec;
pub mod error;
pub mod exec;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use exec::{bounded_timeout, TimeoutRunner};
pub use process::{ProcessOutput, ProcessRunner};
