use std::collections::HashMap;

use super::types::Achievement;

/// First-seen unlock time per achievement name
///
/// Entries are never updated or removed, the first timestamp stored for a
/// name is kept for the lifetime of the cache.
#[derive(Default, Debug)]
pub struct UnlockTimeCache {
    entries: HashMap<String, i64>,
}

impl UnlockTimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries.get(name).copied()
    }

    /// Stores `unlock_time` unless `name` is already known, returns the kept value
    pub fn insert(&mut self, name: &str, unlock_time: i64) -> i64 {
        if let Some(known) = self.entries.get(name) {
            return *known;
        }
        self.entries.insert(name.to_owned(), unlock_time);
        unlock_time
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One record per input name, in input order
    pub fn reconcile<I, S>(&mut self, names: I, now: i64) -> Vec<Achievement>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                Achievement::new(self.insert(name, now), name)
            })
            .collect()
    }
}
