use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::descriptor::{ColumnDescriptor, ColumnId, SortOrder};
use super::sort_spec::SortSpec;
use crate::labels::LabelResolver;

/// All columns of one table model.
///
/// Descriptors are kept in schema order (the canonical/default order) and
/// looked up through an id index. The displayed projection (visible columns
/// sorted by `index`) is cached; every mutation that can affect it drops the
/// cache and the next read recomputes it.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    positions: HashMap<ColumnId, usize>,
    /// `None` means dirty
    projection: Option<Vec<ColumnId>>,
}

impl ColumnSet {
    /// Create a set keeping each descriptor's index as given
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (pos, column) in columns.iter().enumerate() {
            if positions.insert(column.id(), pos).is_some() {
                bail!("Duplicate column id {} in column set", column.id());
            }
        }

        Ok(Self {
            columns,
            positions,
            projection: None,
        })
    }

    /// Create a set from schema defaults: displayed columns get dense
    /// indices in schema order.
    pub fn from_schema(mut columns: Vec<ColumnDescriptor>) -> Result<Self> {
        let mut next = 0;
        for column in columns.iter_mut().filter(|c| c.displayed) {
            column.index = next;
            next += 1;
        }
        Self::new(columns)
    }

    /// All descriptors in schema order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn displayed_count(&self) -> usize {
        self.columns.iter().filter(|c| c.displayed).count()
    }

    pub fn find_by_id(&self, id: ColumnId) -> Option<&ColumnDescriptor> {
        self.positions.get(&id).map(|&pos| &self.columns[pos])
    }

    pub fn contains(&self, id: ColumnId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Ids of the displayed columns in display order
    pub fn displayed_ids(&mut self) -> &[ColumnId] {
        self.ensure_projection();
        self.projection.as_deref().unwrap_or(&[])
    }

    /// The displayed projection: visible descriptors ordered by `index`.
    ///
    /// A stored index beyond the displayed count is clamped to the last
    /// position when the projection is rebuilt. Duplicate indices are kept in
    /// schema order.
    pub fn displayed_columns(&mut self) -> Vec<&ColumnDescriptor> {
        self.ensure_projection();
        let projection = self.projection.as_deref().unwrap_or(&[]);
        projection
            .iter()
            .filter_map(|id| self.positions.get(id).map(|&pos| &self.columns[pos]))
            .collect()
    }

    /// Position of `id` within the displayed projection
    pub fn position_of(&mut self, id: ColumnId) -> Option<usize> {
        self.displayed_ids().iter().position(|&shown| shown == id)
    }

    /// Copy `index` and `preferred_width` from edited copies of descriptors.
    ///
    /// Everything else (visibility, labels, sort) is left alone. Ids that do
    /// not exist in this set are ignored.
    pub fn apply_user_edits(&mut self, edited: &[ColumnDescriptor]) {
        for edit in edited {
            let Some(&pos) = self.positions.get(&edit.id()) else {
                debug!(target: "column_set", "Ignoring edit for unknown column {}", edit.id());
                continue;
            };
            let column = &mut self.columns[pos];
            if column.index != edit.index {
                column.index = edit.index;
                self.projection = None;
            }
            column.preferred_width = edit.preferred_width.max(column.min_width());
        }
    }

    /// Show or hide a column. A column that becomes visible is appended to
    /// the end of the projection. Returns whether anything changed.
    pub fn set_displayed(&mut self, id: ColumnId, displayed: bool) -> bool {
        let Some(&pos) = self.positions.get(&id) else {
            return false;
        };
        if self.columns[pos].displayed == displayed {
            return false;
        }

        if displayed {
            let end = self.displayed_count();
            self.columns[pos].index = end;
        }
        self.columns[pos].displayed = displayed;
        self.projection = None;

        debug!(target: "column_set", "Column {} displayed={}", id, displayed);
        true
    }

    /// Resolved header names of the displayed columns, in display order
    pub fn column_names(&mut self, resolver: &dyn LabelResolver) -> Vec<String> {
        self.displayed_columns()
            .into_iter()
            .map(|c| c.column_name(resolver))
            .collect()
    }

    /// Resolved header tooltips of the displayed columns, in display order
    pub fn tooltips(&mut self, resolver: &dyn LabelResolver) -> Vec<String> {
        self.displayed_columns()
            .into_iter()
            .map(|c| c.tooltip(resolver))
            .collect()
    }

    /// Sort keys implied by stored priorities
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::from_columns(&self.columns)
    }

    /// Check the index and sort priority invariants without changing anything
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut indices: Vec<usize> = self
            .columns
            .iter()
            .filter(|c| c.displayed)
            .map(|c| c.index)
            .collect();
        indices.sort_unstable();
        for (expected, &index) in indices.iter().enumerate() {
            if index != expected {
                issues.push(format!(
                    "displayed indices are not a permutation of 0..{}: found {:?}",
                    indices.len(),
                    indices
                ));
                break;
            }
        }

        let mut priorities: Vec<usize> = self.columns.iter().filter_map(|c| c.sort_priority).collect();
        priorities.sort_unstable();
        for (expected, &priority) in priorities.iter().enumerate() {
            if priority != expected {
                issues.push(format!(
                    "sort priorities are not a permutation of 0..{}: found {:?}",
                    priorities.len(),
                    priorities
                ));
                break;
            }
        }

        for column in &self.columns {
            if column.sort_priority.is_some() != column.sort_order.is_some() {
                issues.push(format!(
                    "column {} has sort priority {:?} but order {:?}",
                    column.id(),
                    column.sort_priority,
                    column.sort_order
                ));
            }
        }

        issues
    }

    pub(crate) fn set_index(&mut self, id: ColumnId, index: usize) {
        if let Some(&pos) = self.positions.get(&id) {
            if self.columns[pos].index != index {
                self.columns[pos].index = index;
                self.projection = None;
            }
        }
    }

    pub(crate) fn set_preferred_width(&mut self, id: ColumnId, width: u32) {
        if let Some(&pos) = self.positions.get(&id) {
            self.columns[pos].preferred_width = width;
        }
    }

    pub(crate) fn set_sort(&mut self, id: ColumnId, sort: Option<(usize, SortOrder)>) {
        if let Some(&pos) = self.positions.get(&id) {
            self.columns[pos].set_sort(sort);
        }
    }

    /// Overwrite the layout fields of one column from a saved snapshot
    pub(crate) fn restore_layout(
        &mut self,
        id: ColumnId,
        displayed: bool,
        index: usize,
        preferred_width: u32,
        sort: Option<(usize, SortOrder)>,
    ) -> bool {
        let Some(&pos) = self.positions.get(&id) else {
            return false;
        };
        let column = &mut self.columns[pos];
        column.displayed = displayed;
        column.index = index;
        column.preferred_width = preferred_width.max(column.min_width());
        column.set_sort(sort);
        self.projection = None;
        true
    }

    fn ensure_projection(&mut self) {
        if self.projection.is_some() {
            return;
        }

        let count = self.displayed_count();
        let mut shown: Vec<usize> = Vec::with_capacity(count);
        for (pos, column) in self.columns.iter_mut().enumerate() {
            if !column.displayed {
                continue;
            }
            if column.index >= count {
                debug!(target: "column_set",
                    "Clamping index {} of column {} to {}", column.index, column.id(), count - 1);
                column.index = count - 1;
            }
            shown.push(pos);
        }

        // Stable: equal indices stay in schema order
        shown.sort_by_key(|&pos| self.columns[pos].index);

        for pair in shown.windows(2) {
            let (a, b) = (&self.columns[pair[0]], &self.columns[pair[1]]);
            if a.index == b.index {
                warn!(target: "column_set",
                    "Columns {} and {} share index {}", a.id(), b.id(), a.index);
            }
        }

        self.projection = Some(shown.into_iter().map(|pos| self.columns[pos].id()).collect());
    }
}

impl PartialEq for ColumnSet {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for ColumnSet {}
