//! Host monitoring agent: scheduled check execution, state tracking, and
//! reporting. This crate wires together the check-execution core
//! (`pulsewatch-scheduler`, `pulsewatch-parsers`, `pulsewatch-range`,
//! `pulsewatch-engine`, `pulsewatch-reporter`) with its ambient stack
//! (`pulsewatch-config`, `pulsewatch-discovery`, `pulsewatch-lock`) into one
//! long-lived [`agent::Agent`].

pub mod agent;
pub mod error;
pub mod hostname;

pub use agent::Agent;
pub use error::AgentError;
