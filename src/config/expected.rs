//! Expected-status table
//!
//! Maps an index category key to the set of detail-page statuses that are
//! consistent with it. The empty key is the category of proposals whose index
//! entry carries no status letter.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Category key -> accepted status names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ExpectedStatusTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ExpectedStatusTable {
    /// Builds a table from `(key, statuses)` pairs
    ///
    /// # Example
    ///
    /// ```
    /// use proposal_audit::ExpectedStatusTable;
    ///
    /// let table = ExpectedStatusTable::from_entries([
    ///     ("A", &["Active", "Accepted"][..]),
    ///     ("", &["Draft", "Active"][..]),
    /// ]);
    /// assert!(table.allows("A", "Accepted"));
    /// assert!(!table.allows("D", "Deferred"));
    /// ```
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, statuses)| {
                (
                    key.to_string(),
                    statuses.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Accepted statuses for a category key, `None` if the key is unknown
    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(key)
    }

    /// Whether `key` is known and accepts `status`
    pub fn allows(&self, key: &str, status: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|allowed| allowed.contains(status))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExpectedStatusTable {
    fn default() -> Self {
        Self::from_entries([
            ("A", &["Active", "Accepted"][..]),
            ("D", &["Deferred"][..]),
            ("F", &["Final"][..]),
            ("P", &["Provisional"][..]),
            ("R", &["Rejected"][..]),
            ("S", &["Superseded"][..]),
            ("W", &["Withdrawn"][..]),
            ("", &["Draft", "Active"][..]),
        ])
    }
}
