//! Reporter (C6): persists a [`Snapshot`] to disk and, when a remote
//! collector is configured, submits it over HTTP.

mod error;
mod server;
mod writer;

pub use error::ReportError;
pub use server::{submit_snapshot, ServerTarget};
pub use writer::write_snapshot;
