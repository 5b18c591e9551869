/// Coerce a string into a number the way the check-output formats expect:
/// anything with a `.` is a float, otherwise it's parsed as an integer (but
/// still returned as `f64` — this crate's data model has no separate int
/// type). Mirrors `to_number` in the source agent.
pub fn to_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.contains('.') {
        return raw.parse::<f64>().ok();
    }
    raw.parse::<i64>().map(|n| n as f64).ok()
}
