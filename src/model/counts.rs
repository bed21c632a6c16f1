use std::collections::BTreeMap;

/// Occurrences of each declared status over one run
///
/// Backed by an ordered map so that rows come out sorted by status name and
/// two runs over the same pages render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCount {
    counts: BTreeMap<String, u64>,
}

impl StatusCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more occurrence of `status`
    pub fn record(&mut self, status: &str) {
        *self.counts.entry(status.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, status: &str) -> u64 {
        self.counts.get(status).copied().unwrap_or(0)
    }

    /// Sum over all statuses
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(status, count)` pairs sorted by status name
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(status, count)| (status.as_str(), *count))
    }
}
