use std::collections::btree_map::{self, BTreeMap};

use tally_core::{Metric, MetricKey};

/// Immutable copy of the registry's entries, ordered by key.
///
/// Holds handles, not values: reading a metric through a snapshot shows its
/// current value. The set of entries is frozen when the snapshot is taken.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: BTreeMap<MetricKey, Metric>,
}

impl Snapshot {
    pub fn get(&self, key: &MetricKey) -> Option<&Metric> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, MetricKey, Metric> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.entries.keys()
    }

    /// Owned map of the entries. Changing it has no effect on the registry.
    pub fn into_inner(self) -> BTreeMap<MetricKey, Metric> {
        self.entries
    }
}

impl FromIterator<(MetricKey, Metric)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (MetricKey, Metric)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a MetricKey, &'a Metric);
    type IntoIter = btree_map::Iter<'a, MetricKey, Metric>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
