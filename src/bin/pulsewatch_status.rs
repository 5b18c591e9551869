//! Read-only status CLI: prints the last-persisted snapshot from
//! `<data-dir>/state.json`, one line per check, colorized by severity.

use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use pulsewatch_status::{HealthState, Snapshot};

const CHECK_NAME_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "pulsewatch-status")]
#[command(about = "Print the current health of every monitored check")]
struct StatusArgs {
    /// Directory containing state.json
    #[arg(short = 'd', long, env = "PULSEWATCH_DATA_DIRECTORY", default_value = "/var/lib/pulsewatch")]
    data_directory: PathBuf,

    /// The agent's default interval, used to judge snapshot staleness
    #[arg(short = 'i', long, env = "PULSEWATCH_INTERVAL", default_value_t = 60)]
    interval: u64,
}

fn main() {
    let args = StatusArgs::parse();
    let path = args.data_directory.join("state.json");

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("pulsewatch-status: could not read {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    let snapshot: Snapshot = match serde_json::from_str(&contents) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("pulsewatch-status: could not parse {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    let staleness_threshold = chrono::Duration::seconds(2 * args.interval as i64);
    let age = Utc::now() - snapshot.timestamp;
    if age > staleness_threshold {
        println!(
            "WARNING: snapshot for {} is stale ({} seconds old)",
            snapshot.hostname,
            age.num_seconds()
        );
    }

    let colorize = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    for (name, record) in &snapshot.checks {
        let status_label = colored_status(record.status, colorize);
        println!("{name:<CHECK_NAME_WIDTH$}{status_label}  {}", record.message);
    }
}

fn colored_status(status: HealthState, colorize: bool) -> String {
    let label = status.to_string();
    if !colorize {
        return label;
    }
    let code = match status {
        HealthState::Ok => Some("32"),
        HealthState::Warning => Some("33"),
        HealthState::Critical => Some("31"),
        HealthState::Unknown => None,
    };
    match code {
        Some(code) => format!("\x1b[{code}m{label}\x1b[0m"),
        None => label,
    }
}
