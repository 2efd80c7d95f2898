//! LayoutReconciler - keeps stored column layout and live tables in sync
//!
//! Two directions:
//! - apply:   ColumnSet → tables (order, then widths, then sort)
//! - extract: tables → ColumnSet, reporting whether anything changed
//!
//! Order and widths are handled once per table pane. A single table is one
//! pane at offset 0; a split table is a fixed pane at offset 0 and a scroll
//! pane at offset k. Sort state belongs to the whole set, hidden columns
//! included, and is handled once.

use tracing::{debug, warn};

use crate::column::{ColumnId, ColumnSet, SortOrder, SortSpec};
use crate::widget::{ColumnWidget, SortModel, TableTopology};

/// Result of pushing a stored layout into the tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Column moves issued across all panes
    pub moves: usize,
    /// Width updates issued across all panes
    pub widths_set: usize,
    /// Whether a sort was installed on the sorter
    pub sort_installed: bool,
    /// Displayed columns the target pane has no binding for
    pub unbound: Vec<ColumnId>,
}

impl ApplyOutcome {
    pub fn is_noop(&self) -> bool {
        self.moves == 0 && self.widths_set == 0 && !self.sort_installed
    }
}

pub struct LayoutReconciler;

impl LayoutReconciler {
    /// Move, size and sort the table columns to match the stored layout.
    ///
    /// The sort is only installed when the sorter has none yet, so applying
    /// twice never duplicates or replaces sort keys.
    pub fn apply(
        set: &mut ColumnSet,
        topology: &mut TableTopology<'_>,
        sorter: &mut dyn SortModel,
    ) -> ApplyOutcome {
        let targets = set.displayed_ids().to_vec();
        let split = topology.split_point(targets.len());
        let mut outcome = ApplyOutcome::default();

        match topology {
            TableTopology::Single(table) => {
                Self::apply_pane(set, &mut **table, &targets, &mut outcome);
            }
            TableTopology::Split { fixed, scroll, .. } => {
                Self::apply_pane(set, &mut **fixed, &targets[..split], &mut outcome);
                Self::apply_pane(set, &mut **scroll, &targets[split..], &mut outcome);
            }
        }

        outcome.sort_installed = Self::install_sort(set, sorter);

        debug!(target: "reconciler",
            "apply: {} columns, split at {}, {} moves, {} widths, sort installed: {}",
            targets.len(), split, outcome.moves, outcome.widths_set, outcome.sort_installed);
        outcome
    }

    /// Read order, widths and sort back from the tables into `set`.
    ///
    /// Returns `true` when at least one stored field changed. When nothing
    /// changed, `set` is left untouched.
    pub fn extract(set: &mut ColumnSet, topology: &TableTopology<'_>, sorter: &dyn SortModel) -> bool {
        let split = topology.split_point(set.displayed_count());

        let layout_changed = match topology {
            TableTopology::Single(table) => Self::extract_pane(set, &**table, 0),
            TableTopology::Split { fixed, scroll, .. } => {
                // Both panes always run
                let fixed_changed = Self::extract_pane(set, &**fixed, 0);
                let scroll_changed = Self::extract_pane(set, &**scroll, split);
                fixed_changed | scroll_changed
            }
        };
        let live_sort = Self::live_sort(set, sorter);
        let sort_changed = Self::extract_sort(set, &live_sort);

        let changed = layout_changed | sort_changed;
        debug!(target: "reconciler", "extract: changed={}", changed);
        changed
    }

    /// Insertion-style reorder: walk target slots left to right and pull the
    /// wanted column into each slot. Widths are set once the order settled.
    fn apply_pane(
        set: &ColumnSet,
        widget: &mut dyn ColumnWidget,
        targets: &[ColumnId],
        outcome: &mut ApplyOutcome,
    ) {
        let mut slot = 0;
        let mut placed = Vec::with_capacity(targets.len());

        for &id in targets {
            let Some(current) = widget.view_position(id) else {
                warn!(target: "reconciler", "Column {} is not bound to its table", id);
                outcome.unbound.push(id);
                continue;
            };
            if current != slot {
                widget.move_column(current, slot);
                outcome.moves += 1;
            }
            placed.push(id);
            slot += 1;
        }

        for id in placed {
            let Some(column) = set.find_by_id(id) else {
                continue;
            };
            let width = column.preferred_width();
            if widget.column_width(id) != Some(width) {
                widget.set_column_width(id, width);
                outcome.widths_set += 1;
            }
        }
    }

    /// Sort keys cover hidden columns too; the rows stay sorted by them.
    fn install_sort(set: &ColumnSet, sorter: &mut dyn SortModel) -> bool {
        if let Some(existing) = sorter.sort_keys() {
            debug!(target: "reconciler", "Keeping {} installed sort keys", existing.len());
            return false;
        }

        let spec = set.sort_spec();
        debug!(target: "reconciler", "Installing sort keys {:?}", spec.keys());
        sorter.set_sort_keys(spec.into_keys());
        true
    }

    /// Active sort keys restricted to columns of this set, so priorities stay dense
    fn live_sort(set: &ColumnSet, sorter: &dyn SortModel) -> SortSpec {
        let keys = sorter.sort_keys().unwrap_or_default();
        SortSpec::from_widget_keys(&keys).retain_columns(|id| set.contains(id))
    }

    /// Compare every descriptor, hidden or not, with the live sort.
    /// Priorities missing from `live_sort` are cleared.
    fn extract_sort(set: &mut ColumnSet, live_sort: &SortSpec) -> bool {
        let updates: Vec<(ColumnId, Option<(usize, SortOrder)>)> = set
            .iter()
            .filter_map(|column| {
                let stored = column.sort_priority().zip(column.sort_order());
                let live = live_sort.priority_of(column.id());
                (stored != live).then_some((column.id(), live))
            })
            .collect();

        for &(id, live) in &updates {
            debug!(target: "reconciler", "Column {} sort -> {:?}", id, live);
            set.set_sort(id, live);
        }
        !updates.is_empty()
    }

    fn extract_pane(set: &mut ColumnSet, widget: &dyn ColumnWidget, offset: usize) -> bool {
        let mut changed = false;

        for (position, id) in widget.column_order().into_iter().enumerate() {
            let Some(column) = set.find_by_id(id) else {
                debug!(target: "reconciler", "Table shows unknown column {}", id);
                continue;
            };
            if !column.is_displayed() {
                continue;
            }

            let stored_index = column.index();
            let stored_width = column.preferred_width();

            let index = position + offset;
            if stored_index != index {
                debug!(target: "reconciler", "Column {} index {} -> {}", id, stored_index, index);
                set.set_index(id, index);
                changed = true;
            }

            if let Some(width) = widget.column_width(id) {
                if width != stored_width {
                    debug!(target: "reconciler", "Column {} width {} -> {}", id, stored_width, width);
                    set.set_preferred_width(id, width);
                    changed = true;
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnDescriptor, SortKey, SortOrder};
    use crate::widget::{MemorySorter, MemoryTable};

    fn five_columns() -> ColumnSet {
        ColumnSet::from_schema(vec![
            ColumnDescriptor::new(1, "a", 60),
            ColumnDescriptor::new(2, "b", 70),
            ColumnDescriptor::new(3, "c", 80),
            ColumnDescriptor::new(4, "d", 90),
            ColumnDescriptor::new(5, "e", 100),
        ])
        .unwrap()
    }

    #[test]
    fn test_apply_reorders_into_slots() {
        let mut set = ColumnSet::new(vec![
            ColumnDescriptor::new(1, "a", 60).with_index(3),
            ColumnDescriptor::new(2, "b", 70).with_index(0),
            ColumnDescriptor::new(3, "c", 80).with_index(2),
            ColumnDescriptor::new(4, "d", 90).with_index(1),
        ])
        .unwrap();
        let mut table = MemoryTable::with_ids(&[1, 2, 3, 4]);
        let mut sorter = MemorySorter::new();

        let outcome = LayoutReconciler::apply(&mut set, &mut TableTopology::Single(&mut table), &mut sorter);

        assert_eq!(table.column_order(), vec![ColumnId(2), ColumnId(4), ColumnId(3), ColumnId(1)]);
        assert_eq!(table.column_width(ColumnId(1)), Some(60));
        assert_eq!(table.column_width(ColumnId(4)), Some(90));
        assert!(outcome.sort_installed);
        assert_eq!(sorter.sort_keys(), Some(vec![]));
    }

    #[test]
    fn test_apply_skips_unbound_column() {
        let mut set = five_columns();
        let mut table = MemoryTable::with_ids(&[1, 2, 4, 5]);
        let mut sorter = MemorySorter::new();

        let outcome = LayoutReconciler::apply(&mut set, &mut TableTopology::Single(&mut table), &mut sorter);

        assert_eq!(outcome.unbound, vec![ColumnId(3)]);
        assert_eq!(table.column_order(), vec![ColumnId(1), ColumnId(2), ColumnId(4), ColumnId(5)]);
    }

    #[test]
    fn test_apply_keeps_installed_sort() {
        let mut set = ColumnSet::from_schema(vec![
            ColumnDescriptor::new(1, "a", 60).sorted(0, SortOrder::Ascending),
            ColumnDescriptor::new(2, "b", 70),
        ])
        .unwrap();
        let mut table = MemoryTable::with_ids(&[1, 2]);
        let mut sorter = MemorySorter::new();
        sorter.set_sort_keys(vec![SortKey::descending(ColumnId(2))]);

        let outcome = LayoutReconciler::apply(&mut set, &mut TableTopology::Single(&mut table), &mut sorter);

        assert!(!outcome.sort_installed);
        assert_eq!(sorter.sort_keys(), Some(vec![SortKey::descending(ColumnId(2))]));
    }

    #[test]
    fn test_split_point_clamped() {
        let mut set = five_columns();
        let mut fixed = MemoryTable::with_ids(&[1, 2, 3, 4, 5]);
        let mut scroll = MemoryTable::default();
        let mut sorter = MemorySorter::new();

        let mut topology = TableTopology::Split {
            fixed: &mut fixed,
            scroll: &mut scroll,
            fixed_count: 9,
        };
        let outcome = LayoutReconciler::apply(&mut set, &mut topology, &mut sorter);
        assert!(outcome.unbound.is_empty());
        assert!(!LayoutReconciler::extract(&mut set, &topology, &sorter));
    }

    #[test]
    fn test_extract_ignores_unknown_and_hidden_columns() {
        let mut set = ColumnSet::from_schema(vec![
            ColumnDescriptor::new(1, "a", 75),
            ColumnDescriptor::new(2, "b", 75).hidden(),
            ColumnDescriptor::new(3, "c", 75),
        ])
        .unwrap();
        let mut table = MemoryTable::with_ids(&[1, 3, 99]);
        let sorter = MemorySorter::new();

        let before = set.clone();
        let changed = LayoutReconciler::extract(&mut set, &TableTopology::Single(&mut table), &sorter);
        assert!(!changed);
        assert_eq!(set, before);
    }

    #[test]
    fn test_extract_clears_stale_sort() {
        let mut set = ColumnSet::from_schema(vec![
            ColumnDescriptor::new(1, "a", 75).sorted(0, SortOrder::Descending),
            ColumnDescriptor::new(2, "b", 75),
        ])
        .unwrap();
        let mut table = MemoryTable::with_ids(&[1, 2]);
        let mut sorter = MemorySorter::new();
        sorter.set_sort_keys(vec![SortKey::new(ColumnId(1), SortOrder::Unsorted)]);

        assert!(LayoutReconciler::extract(&mut set, &TableTopology::Single(&mut table), &sorter));
        let column = set.find_by_id(ColumnId(1)).unwrap();
        assert_eq!(column.sort_priority(), None);
        assert_eq!(column.sort_order(), None);
    }
}
