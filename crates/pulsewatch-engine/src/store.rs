use std::collections::BTreeMap;

use pulsewatch_status::CheckRecord;

/// The in-memory store of per-check records. Check names are unique;
/// records are created lazily on first observation and never deleted —
/// stale checks simply stop updating (spec.md §3 lifecycle).
#[derive(Debug, Default, Clone)]
pub struct CheckStore {
    records: BTreeMap<String, CheckRecord>,
}

impl CheckStore {
    #[must_use]
    pub fn new() -> Self {
        Self { records: BTreeMap::new() }
    }

    #[must_use]
    pub fn get(&self, check_name: &str) -> Option<&CheckRecord> {
        self.records.get(check_name)
    }

    pub fn insert(&mut self, check_name: impl Into<String>, record: CheckRecord) {
        self.records.insert(check_name.into(), record);
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CheckRecord)> {
        self.records.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, CheckRecord> {
        self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
