use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::descriptor::{ColumnDescriptor, ColumnId, SortOrder};

/// One entry of a widget's multi-column sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: ColumnId,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(column: ColumnId, order: SortOrder) -> Self {
        Self { column, order }
    }

    pub fn ascending(column: ColumnId) -> Self {
        Self::new(column, SortOrder::Ascending)
    }

    pub fn descending(column: ColumnId) -> Self {
        Self::new(column, SortOrder::Descending)
    }
}

/// Ordered list of active sort keys. Position in the list is the sort priority.
///
/// This is the single mapping between widget sort keys and the
/// `sort_priority`/`sort_order` pair stored on descriptors; both directions
/// of reconciliation go through it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the keys a widget reports. Unsorted entries are dropped and
    /// only the first key of a column counts.
    pub fn from_widget_keys(keys: &[SortKey]) -> Self {
        let mut seen = HashSet::new();
        let keys = keys
            .iter()
            .filter(|key| key.order.is_sorted())
            .filter(|key| seen.insert(key.column))
            .copied()
            .collect();
        Self { keys }
    }

    /// Build from descriptor sort state, ordered by priority ascending.
    /// Equal priorities keep the descriptors' iteration order.
    pub fn from_columns<'a>(columns: impl IntoIterator<Item = &'a ColumnDescriptor>) -> Self {
        let mut ranked: Vec<(usize, SortKey)> = columns
            .into_iter()
            .filter_map(|column| {
                let priority = column.sort_priority()?;
                let order = column.sort_order()?;
                order
                    .is_sorted()
                    .then(|| (priority, SortKey::new(column.id(), order)))
            })
            .collect();
        ranked.sort_by_key(|(priority, _)| *priority);

        Self {
            keys: ranked.into_iter().map(|(_, key)| key).collect(),
        }
    }

    /// Keep only keys whose column satisfies `keep`; priorities close up.
    pub fn retain_columns(mut self, mut keep: impl FnMut(ColumnId) -> bool) -> Self {
        self.keys.retain(|key| keep(key.column));
        self
    }

    /// Priority and direction of `column`, if it takes part in the sort
    pub fn priority_of(&self, column: ColumnId) -> Option<(usize, SortOrder)> {
        self.keys
            .iter()
            .position(|key| key.column == column)
            .map(|priority| (priority, self.keys[priority].order))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<SortKey> {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_keys_drop_unsorted() {
        let spec = SortSpec::from_widget_keys(&[
            SortKey::new(ColumnId(7), SortOrder::Unsorted),
            SortKey::descending(ColumnId(2)),
            SortKey::ascending(ColumnId(1)),
        ]);

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.priority_of(ColumnId(2)), Some((0, SortOrder::Descending)));
        assert_eq!(spec.priority_of(ColumnId(1)), Some((1, SortOrder::Ascending)));
        assert_eq!(spec.priority_of(ColumnId(7)), None);
    }

    #[test]
    fn test_duplicate_widget_key_first_wins() {
        let spec = SortSpec::from_widget_keys(&[SortKey::ascending(ColumnId(4)), SortKey::descending(ColumnId(4))]);
        assert_eq!(spec.keys(), &[SortKey::ascending(ColumnId(4))]);
    }

    #[test]
    fn test_from_columns_orders_by_priority() {
        let columns = vec![
            ColumnDescriptor::new(1, "a", 50).sorted(1, SortOrder::Ascending),
            ColumnDescriptor::new(2, "b", 50),
            ColumnDescriptor::new(3, "c", 50).sorted(0, SortOrder::Descending),
        ];

        let spec = SortSpec::from_columns(&columns);
        assert_eq!(
            spec.keys(),
            &[SortKey::descending(ColumnId(3)), SortKey::ascending(ColumnId(1))]
        );
    }

    #[test]
    fn test_retain_closes_priorities() {
        let spec = SortSpec::from_widget_keys(&[
            SortKey::ascending(ColumnId(1)),
            SortKey::ascending(ColumnId(2)),
            SortKey::descending(ColumnId(3)),
        ])
        .retain_columns(|id| id != ColumnId(1));

        assert_eq!(spec.priority_of(ColumnId(2)), Some((0, SortOrder::Ascending)));
        assert_eq!(spec.priority_of(ColumnId(3)), Some((1, SortOrder::Descending)));
    }
}
