//! Widget capability surface
//!
//! The reconciler never talks to a UI toolkit directly. A toolkit adapter
//! implements [`ColumnWidget`] for each rendered table and [`SortModel`] for
//! the row sorter those tables share.

pub mod memory_table;

use tracing::warn;

use crate::column::{ColumnId, SortKey};

pub use memory_table::{MemorySorter, MemoryTable};

/// Column order and width of one rendered table
pub trait ColumnWidget {
    /// Bound column ids in current view order
    fn column_order(&self) -> Vec<ColumnId>;

    /// Move the column at view position `from` to view position `to`,
    /// shifting the columns in between.
    fn move_column(&mut self, from: usize, to: usize);

    /// Current pixel width, `None` when the column is not bound here
    fn column_width(&self, id: ColumnId) -> Option<u32>;

    fn set_column_width(&mut self, id: ColumnId, width: u32);

    fn column_count(&self) -> usize {
        self.column_order().len()
    }

    /// View position of `id`, `None` when the column is not bound here
    fn view_position(&self, id: ColumnId) -> Option<usize> {
        self.column_order().iter().position(|&bound| bound == id)
    }
}

/// Active multi-column sort of the rows shown by one or two tables
pub trait SortModel {
    /// `None` until a sort has been installed
    fn sort_keys(&self) -> Option<Vec<SortKey>>;

    fn set_sort_keys(&mut self, keys: Vec<SortKey>);
}

/// How the displayed columns of a model are rendered.
///
/// With `Split`, the first `fixed_count` displayed columns live in the
/// `fixed` table and the rest in `scroll`, at view position `index - fixed_count`.
pub enum TableTopology<'a> {
    Single(&'a mut dyn ColumnWidget),
    Split {
        fixed: &'a mut dyn ColumnWidget,
        scroll: &'a mut dyn ColumnWidget,
        fixed_count: usize,
    },
}

impl TableTopology<'_> {
    /// Effective split point for `displayed` columns.
    ///
    /// A fixed count larger than the displayed count is a configuration
    /// error; the fixed table then takes every column.
    pub fn split_point(&self, displayed: usize) -> usize {
        match self {
            TableTopology::Single(_) => 0,
            TableTopology::Split { fixed_count, .. } => {
                if *fixed_count > displayed {
                    warn!(target: "reconciler",
                        "Fixed column count {} exceeds {} displayed columns", fixed_count, displayed);
                    displayed
                } else {
                    *fixed_count
                }
            }
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, TableTopology::Split { .. })
    }
}
