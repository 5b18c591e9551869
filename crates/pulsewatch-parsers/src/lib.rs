//! The three check-output dialects the agent understands: native YAML,
//! CheckMK local-check lines, and Nagios/generic exit-code-driven scripts.

mod checkmk;
mod error;
mod nagios;
mod native;
mod number;

pub use checkmk::parse_checkmk;
pub use error::ParseError;
pub use nagios::{parse_generic, parse_nagios_metric, parse_nagios_output_string, ExitCodeDialect};
pub use native::parse_native;
pub use number::to_number;
