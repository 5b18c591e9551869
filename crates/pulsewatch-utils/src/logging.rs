//! Structured logging bootstrap for pulsewatch binaries.

use std::io::IsTerminal;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Maps the agent's five-value `log_level` config (`debug`/`info`/
/// `warning`/`error`/`critical`) onto [`tracing::Level`], which only has
/// four variants. `critical` has no dedicated level; it maps to `ERROR` and
/// callers are expected to mark those events with the `agent_fatal` field
/// (see [`log_critical`]) so consumers can still tell the two apart.
#[must_use]
pub fn level_for(log_level: &str) -> tracing::Level {
    match log_level {
        "debug" => tracing::Level::DEBUG,
        "warning" => tracing::Level::WARN,
        "error" | "critical" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Initialize the global tracing subscriber for `log_level`
/// (`debug`/`info`/`warning`/`error`/`critical`; unrecognized values fall
/// back to `info`). `RUST_LOG` overrides the derived filter when set.
///
/// The formatter is chosen by whether stdout is a terminal: a compact,
/// ANSI-colored layout for interactive use, or a fuller one with module
/// targets and no ANSI codes for log collectors.
pub fn init_tracing(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = level_for(log_level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulsewatch={level}")));

    let is_tty = std::io::stdout().is_terminal();
    let ansi = is_tty && std::env::var_os("NO_COLOR").is_none();

    if is_tty {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(ansi).with_target(false).compact())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?;
    }

    Ok(())
}

/// Logs a `critical` event. `tracing::Level` has no `CRITICAL` variant, so
/// this emits at `ERROR` with an `agent_fatal` marker field set, the same
/// way the agent distinguishes the two in its `log_level` config.
#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)*) => {
        tracing::error!(agent_fatal = true, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_levels() {
        assert_eq!(level_for("debug"), tracing::Level::DEBUG);
        assert_eq!(level_for("info"), tracing::Level::INFO);
        assert_eq!(level_for("warning"), tracing::Level::WARN);
        assert_eq!(level_for("error"), tracing::Level::ERROR);
        assert_eq!(level_for("critical"), tracing::Level::ERROR);
    }

    #[test]
    fn unrecognized_level_falls_back_to_info() {
        assert_eq!(level_for("shouting"), tracing::Level::INFO);
    }
}
