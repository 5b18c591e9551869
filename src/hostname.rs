//! Hostname resolution, per spec.md §6: try short hostname, FQDN, and the
//! kernel-reported nodename in that order, preferring the first containing a
//! dot; fall back to the first value if none does. An explicit override wins.

/// Resolve the agent's node name, honoring `override_name` if set.
#[must_use]
pub fn resolve_hostname(override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_string();
    }

    let candidates = [short_hostname(), fqdn(), kernel_nodename()];
    let candidates: Vec<String> = candidates.into_iter().flatten().collect();

    candidates
        .iter()
        .find(|name| name.contains('.'))
        .or_else(|| candidates.first())
        .cloned()
        .unwrap_or_else(|| "localhost".to_string())
}

fn short_hostname() -> Option<String> {
    sysinfo::System::host_name()
}

fn fqdn() -> Option<String> {
    let output = std::process::Command::new("hostname").arg("-f").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}

#[cfg(target_os = "linux")]
fn kernel_nodename() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn kernel_nodename() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_always_wins() {
        assert_eq!(resolve_hostname(Some("pinned.example.com")), "pinned.example.com");
    }

    #[test]
    fn prefers_dotted_candidate_over_bare_name() {
        let candidates = vec!["shorthost".to_string(), "shorthost.example.com".to_string()];
        let chosen = candidates
            .iter()
            .find(|name| name.contains('.'))
            .or_else(|| candidates.first())
            .cloned();
        assert_eq!(chosen.as_deref(), Some("shorthost.example.com"));
    }

    #[test]
    fn falls_back_to_first_when_nothing_has_a_dot() {
        let candidates = vec!["shorthost".to_string(), "shorthost".to_string()];
        let chosen = candidates
            .iter()
            .find(|name| name.contains('.'))
            .or_else(|| candidates.first())
            .cloned();
        assert_eq!(chosen.as_deref(), Some("shorthost"));
    }
}
