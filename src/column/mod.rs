//! Column model
//!
//! Descriptors for the logical columns of a table, the set that owns them
//! together with its displayed projection, and the sort key mapping shared by
//! both reconciliation directions.

pub mod column_set;
pub mod descriptor;
pub mod sort_spec;

pub use column_set::ColumnSet;
pub use descriptor::{ColumnDescriptor, ColumnId, ColumnKind, SortOrder};
pub use sort_spec::{SortKey, SortSpec};
