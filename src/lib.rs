//! Column layout synchronization for table views.
//!
//! A [`ColumnModel`] owns the logical columns of one table and remembers
//! their order, visibility, widths and sort. The [`LayoutReconciler`] pushes
//! that layout into live tables and reads user edits back, for a single
//! table or a table split into a fixed and a scrolling pane.

pub mod column;
pub mod config;
pub mod fixed_columns;
pub mod labels;
pub mod model;
pub mod reconciler;
pub mod store;
pub mod utils;
pub mod widget;

pub use column::{ColumnDescriptor, ColumnId, ColumnKind, ColumnSet, SortKey, SortOrder, SortSpec};
pub use fixed_columns::FixedColumnsLayout;
pub use labels::{LabelResolver, StaticLabels};
pub use model::{ColumnModel, ModelId};
pub use reconciler::{ApplyOutcome, LayoutReconciler};
pub use store::{JsonLayoutStore, LayoutStore, MemoryLayoutStore, ParameterStore, SavedLayout};
pub use widget::{ColumnWidget, MemorySorter, MemoryTable, SortModel, TableTopology};
