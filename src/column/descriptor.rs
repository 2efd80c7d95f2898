use serde::{Deserialize, Serialize};
use std::fmt;

use crate::labels::LabelResolver;

/// Stable identity of a column within one column set.
///
/// This is the key widgets bind their columns to. It is never used as a
/// positional index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u32);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ColumnId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Direction of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
    /// A key the widget still lists but no longer sorts by
    Unsorted,
}

impl SortOrder {
    pub fn is_sorted(self) -> bool {
        !matches!(self, SortOrder::Unsorted)
    }

    /// Next direction when a header is clicked
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Unsorted,
            SortOrder::Unsorted => SortOrder::Ascending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
            SortOrder::Unsorted => "-",
        };
        f.write_str(s)
    }
}

/// Kind of data a column renders. Only informational for the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    Rating,
    Icon,
}

/// One logical column: fixed identity and labels, mutable layout.
///
/// Only `index`, `preferred_width`, `sort_priority` and `sort_order` are
/// rewritten by reconciliation. `displayed` changes only through the
/// hide/show path of [`ColumnSet`](super::ColumnSet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    id: ColumnId,
    label_key: String,
    tooltip_key: Option<String>,
    kind: ColumnKind,
    pub(crate) displayed: bool,
    pub(crate) index: usize,
    pub(crate) preferred_width: u32,
    min_width: u32,
    pub(crate) sort_priority: Option<usize>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl ColumnDescriptor {
    /// Create a displayed column with no sort state. The index defaults to 0
    /// and is normally assigned by [`ColumnSet::from_schema`](super::ColumnSet::from_schema).
    pub fn new(id: u32, label_key: impl Into<String>, preferred_width: u32) -> Self {
        Self {
            id: ColumnId(id),
            label_key: label_key.into(),
            tooltip_key: None,
            kind: ColumnKind::default(),
            displayed: true,
            index: 0,
            preferred_width,
            min_width: 0,
            sort_priority: None,
            sort_order: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip_key: impl Into<String>) -> Self {
        self.tooltip_key = Some(tooltip_key.into());
        self
    }

    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Raises the preferred width to `min_width` if it is smaller
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self.preferred_width = self.preferred_width.max(min_width);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn sorted(mut self, priority: usize, order: SortOrder) -> Self {
        self.set_sort(Some((priority, order)));
        self
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    pub fn tooltip_key(&self) -> Option<&str> {
        self.tooltip_key.as_deref()
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn preferred_width(&self) -> u32 {
        self.preferred_width
    }

    pub fn min_width(&self) -> u32 {
        self.min_width
    }

    pub fn sort_priority(&self) -> Option<usize> {
        self.sort_priority
    }

    /// Direction of the sort, only present while a priority is set
    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_priority.and(self.sort_order)
    }

    /// Column header text in the current language
    pub fn column_name(&self, resolver: &dyn LabelResolver) -> String {
        resolver.resolve(&self.label_key)
    }

    /// Header tooltip, falling back to the column name when no tooltip key exists
    pub fn tooltip(&self, resolver: &dyn LabelResolver) -> String {
        match &self.tooltip_key {
            Some(key) => resolver.resolve(key),
            None => self.column_name(resolver),
        }
    }

    /// Set or clear sort state. Priority and order are always written together.
    pub(crate) fn set_sort(&mut self, sort: Option<(usize, SortOrder)>) {
        match sort {
            Some((priority, order)) => {
                self.sort_priority = Some(priority);
                self.sort_order = Some(order);
            }
            None => {
                self.sort_priority = None;
                self.sort_order = None;
            }
        }
    }
}
