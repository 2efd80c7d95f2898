use std::collections::HashMap;

use super::{ColumnWidget, SortModel};
use crate::column::{ColumnId, ColumnSet, SortKey, SortOrder};

/// Headless table used by tests, benches and the debug tool.
///
/// Mirrors what a toolkit table header does: columns are bound by id at
/// construction, the user can drag and resize them, and widths never drop
/// below a column's minimum.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    order: Vec<ColumnId>,
    widths: HashMap<ColumnId, u32>,
    min_widths: HashMap<ColumnId, u32>,
    moves: usize,
}

const DEFAULT_WIDTH: u32 = 75;

impl MemoryTable {
    /// Bind columns in the given order with the default width
    pub fn new(columns: impl IntoIterator<Item = ColumnId>) -> Self {
        let order: Vec<ColumnId> = columns.into_iter().collect();
        let widths = order.iter().map(|&id| (id, DEFAULT_WIDTH)).collect();
        Self {
            order,
            widths,
            min_widths: HashMap::new(),
            moves: 0,
        }
    }

    /// Bind columns by raw id
    pub fn with_ids(ids: &[u32]) -> Self {
        Self::new(ids.iter().copied().map(ColumnId))
    }

    /// A freshly built table: displayed columns bound in schema order,
    /// minimum widths taken from the descriptors.
    pub fn for_columns(columns: &mut ColumnSet) -> Self {
        let shown = schema_ordered(columns, 0, usize::MAX);
        Self::bind(columns, shown)
    }

    /// Freshly built fixed and scroll panes. The first `fixed_count`
    /// displayed columns go to the fixed pane, each pane in schema order.
    pub fn split_for(columns: &mut ColumnSet, fixed_count: usize) -> (Self, Self) {
        let fixed = schema_ordered(columns, 0, fixed_count);
        let scroll = schema_ordered(columns, fixed_count, usize::MAX);
        (Self::bind(columns, fixed), Self::bind(columns, scroll))
    }

    fn bind(columns: &ColumnSet, ids: Vec<ColumnId>) -> Self {
        let mut table = Self::new(ids.iter().copied());
        for id in ids {
            if let Some(column) = columns.find_by_id(id) {
                if column.min_width() > 0 {
                    table = table.with_min_width(id, column.min_width());
                }
            }
        }
        table
    }

    pub fn with_min_width(mut self, id: ColumnId, min_width: u32) -> Self {
        self.min_widths.insert(id, min_width);
        if let Some(width) = self.widths.get_mut(&id) {
            *width = (*width).max(min_width);
        }
        self
    }

    /// User drags a header from one view position to another
    pub fn drag(&mut self, from: usize, to: usize) {
        self.move_column(from, to);
    }

    /// User drags a column edge
    pub fn resize(&mut self, id: ColumnId, width: u32) {
        self.set_column_width(id, width);
    }

    /// Number of moves issued so far
    pub fn move_count(&self) -> usize {
        self.moves
    }

    pub fn widths(&self) -> Vec<(ColumnId, u32)> {
        self.order
            .iter()
            .map(|id| (*id, self.widths.get(id).copied().unwrap_or(DEFAULT_WIDTH)))
            .collect()
    }
}

/// Displayed ids at projection positions `from..to`, re-sorted into schema order
fn schema_ordered(columns: &mut ColumnSet, from: usize, to: usize) -> Vec<ColumnId> {
    let shown = columns.displayed_ids();
    let end = to.min(shown.len());
    let start = from.min(end);
    let mut picked: Vec<ColumnId> = shown[start..end].to_vec();
    let schema: Vec<ColumnId> = columns.iter().map(|c| c.id()).collect();
    picked.sort_by_key(|id| schema.iter().position(|s| s == id));
    picked
}

impl ColumnWidget for MemoryTable {
    fn column_order(&self) -> Vec<ColumnId> {
        self.order.clone()
    }

    fn move_column(&mut self, from: usize, to: usize) {
        if from >= self.order.len() || to >= self.order.len() || from == to {
            return;
        }
        let column = self.order.remove(from);
        self.order.insert(to, column);
        self.moves += 1;
    }

    fn column_width(&self, id: ColumnId) -> Option<u32> {
        self.widths.get(&id).copied()
    }

    fn set_column_width(&mut self, id: ColumnId, width: u32) {
        let min = self.min_widths.get(&id).copied().unwrap_or(0);
        if let Some(current) = self.widths.get_mut(&id) {
            *current = width.max(min);
        }
    }

    fn column_count(&self) -> usize {
        self.order.len()
    }

    fn view_position(&self, id: ColumnId) -> Option<usize> {
        self.order.iter().position(|&bound| bound == id)
    }
}

/// Headless multi-column row sorter.
///
/// Header clicks follow the usual toolkit behaviour: the clicked column
/// becomes the primary key, clicking the primary key again cycles its
/// direction, and at most `max_keys` keys are remembered.
#[derive(Debug, Clone)]
pub struct MemorySorter {
    keys: Option<Vec<SortKey>>,
    max_keys: usize,
}

impl Default for MemorySorter {
    fn default() -> Self {
        Self {
            keys: None,
            max_keys: 3,
        }
    }
}

impl MemorySorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys.max(1);
        self
    }

    /// User clicks the header of `id`
    pub fn toggle(&mut self, id: ColumnId) {
        let keys = self.keys.get_or_insert_with(Vec::new);

        match keys.iter().position(|key| key.column == id) {
            Some(0) => {
                keys[0].order = keys[0].order.toggled();
            }
            Some(pos) => {
                keys.remove(pos);
                keys.insert(0, SortKey::new(id, SortOrder::Ascending));
            }
            None => keys.insert(0, SortKey::new(id, SortOrder::Ascending)),
        }
        keys.truncate(self.max_keys);
    }

    /// Forget the installed sort entirely
    pub fn reset(&mut self) {
        self.keys = None;
    }
}

impl SortModel for MemorySorter {
    fn sort_keys(&self) -> Option<Vec<SortKey>> {
        self.keys.clone()
    }

    fn set_sort_keys(&mut self, keys: Vec<SortKey>) {
        self.keys = Some(keys);
    }
}
