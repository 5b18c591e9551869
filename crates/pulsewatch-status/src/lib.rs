//! Canonical health state, status normalization, and the shared per-check
//! data model (`Metric`, `Observation`, `CheckRecord`, `Snapshot`).
//!
//! This crate has no I/O of its own — it is the vocabulary that the parser,
//! range, scheduler, engine, and reporter crates all speak.

mod model;
mod normalize;
mod state;

pub use model::{CheckRecord, Metric, Observation, Snapshot, SCHEMA_VERSION};
pub use normalize::{classify_exit_code, normalize_status, ExitCodeClass, StatusToken};
pub use state::HealthState;
