use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::{ColumnId, ColumnSet, SortOrder};
use crate::model::ModelId;

/// Persisted layout fields of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedColumn {
    pub id: ColumnId,
    pub displayed: bool,
    pub index: usize,
    pub preferred_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_priority: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Snapshot of a column set as written by a layout store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLayout {
    pub model_id: ModelId,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub columns: Vec<SavedColumn>,
}

/// What happened when a saved layout was merged onto the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub restored: usize,
    /// Saved ids that no longer exist in the schema
    pub stale: Vec<ColumnId>,
}

impl SavedLayout {
    /// Capture the layout fields of every column in schema order
    pub fn capture(model_id: ModelId, columns: &ColumnSet) -> Self {
        Self {
            model_id,
            saved_at: Utc::now(),
            columns: columns
                .iter()
                .map(|c| SavedColumn {
                    id: c.id(),
                    displayed: c.is_displayed(),
                    index: c.index(),
                    preferred_width: c.preferred_width(),
                    sort_priority: c.sort_priority(),
                    sort_order: c.sort_order(),
                })
                .collect(),
        }
    }

    /// Copy saved layout fields onto `columns`.
    ///
    /// Labels, kinds and every other schema field stay as defined in code.
    /// Saved entries for ids the schema no longer has are skipped; schema
    /// columns missing from the snapshot keep their defaults.
    pub fn merge_into(&self, columns: &mut ColumnSet) -> MergeReport {
        let mut report = MergeReport::default();

        for saved in &self.columns {
            let sort = saved.sort_priority.zip(saved.sort_order);
            if columns.restore_layout(saved.id, saved.displayed, saved.index, saved.preferred_width, sort) {
                report.restored += 1;
            } else {
                debug!(target: "layout_store",
                    "Model {}: skipping saved column {} missing from schema", self.model_id, saved.id);
                report.stale.push(saved.id);
            }
        }

        report
    }
}
