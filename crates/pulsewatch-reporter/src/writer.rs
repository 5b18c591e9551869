use camino::Utf8Path;
use pulsewatch_status::Snapshot;
use pulsewatch_utils::atomic_write::write_file_atomic;

use crate::error::ReportError;

/// Persist the snapshot to `<data_dir>/state.json` as pretty-printed UTF-8
/// JSON, via a temp-file-then-rename so readers (the status CLI) never see
/// a partially-written file.
pub fn write_snapshot(data_dir: &Utf8Path, snapshot: &Snapshot) -> Result<(), ReportError> {
    let path = data_dir.join("state.json");
    let body = serde_json::to_string_pretty(snapshot)?;
    write_file_atomic(&path, &body).map_err(|source| ReportError::Write { path, source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    #[test]
    fn writes_pretty_json_to_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = Utf8Path::from_path(dir.path()).unwrap();
        let snapshot = Snapshot {
            schema_version: pulsewatch_status::SCHEMA_VERSION,
            agent_version: "1.0.0".to_string(),
            hostname: "host1".to_string(),
            timestamp: Utc::now(),
            checks: BTreeMap::new(),
        };

        write_snapshot(data_dir, &snapshot).unwrap();

        let contents = std::fs::read_to_string(data_dir.join("state.json")).unwrap();
        assert!(contents.contains("\"hostname\": \"host1\""));
        assert!(contents.starts_with('{'));
    }

    #[test]
    fn write_snapshot_creates_data_dir_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = Utf8Path::from_path(dir.path()).unwrap().join("nested").join("data");
        let snapshot = Snapshot {
            schema_version: pulsewatch_status::SCHEMA_VERSION,
            agent_version: "1.0.0".to_string(),
            hostname: "host1".to_string(),
            timestamp: Utc::now(),
            checks: BTreeMap::new(),
        };

        write_snapshot(&nested, &snapshot).unwrap();
        assert!(nested.join("state.json").exists());
    }
}
