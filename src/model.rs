use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::column::{ColumnDescriptor, ColumnId, ColumnSet};
use crate::labels::LabelResolver;
use crate::reconciler::{ApplyOutcome, LayoutReconciler};
use crate::store::LayoutStore;
use crate::widget::{SortModel, TableTopology};

/// Identifier of a column model, the key its layout is saved under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logical table model: identity, name and the column set it owns.
///
/// One instance exists per logical table for the whole session. It is
/// loaded once, applied to its tables when a view opens, and stored when the
/// view closes.
#[derive(Debug, Clone)]
pub struct ColumnModel {
    id: ModelId,
    name_key: String,
    instance: u32,
    user_can_disable_columns: bool,
    columns: ColumnSet,
}

impl ColumnModel {
    pub fn new(id: ModelId, name_key: impl Into<String>, columns: ColumnSet) -> Self {
        Self {
            id,
            name_key: name_key.into(),
            instance: 0,
            user_can_disable_columns: false,
            columns,
        }
    }

    /// Build from schema defaults and overlay the saved layout, if any.
    ///
    /// A failing or empty store leaves the defaults in place.
    pub fn load(
        id: ModelId,
        name_key: impl Into<String>,
        defaults: ColumnSet,
        store: &dyn LayoutStore,
    ) -> Self {
        let mut model = Self::new(id, name_key, defaults);

        match store.load(id) {
            Ok(Some(saved)) => {
                let report = saved.merge_into(&mut model.columns);
                debug!(target: "column_model",
                    "Model {}: restored {} columns, {} stale", id, report.restored, report.stale.len());
            }
            Ok(None) => {
                debug!(target: "column_model", "Model {}: no saved layout, using defaults", id);
            }
            Err(e) => {
                warn!(target: "column_model", "Model {}: failed to load layout, using defaults: {:#}", id, e);
            }
        }

        model
    }

    /// Mark this as the n-th table of the same model in one session
    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_user_can_disable_columns(mut self, allowed: bool) -> Self {
        self.user_can_disable_columns = allowed;
        self
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn user_can_disable_columns(&self) -> bool {
        self.user_can_disable_columns
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    /// Name shown in the options panel
    pub fn display_name(&self, resolver: &dyn LabelResolver) -> String {
        let name = resolver.resolve(&self.name_key);
        if self.instance == 0 {
            name
        } else {
            format!("{}{}", name, self.instance)
        }
    }

    pub fn column_names(&mut self, resolver: &dyn LabelResolver) -> Vec<String> {
        self.columns.column_names(resolver)
    }

    pub fn tooltips(&mut self, resolver: &dyn LabelResolver) -> Vec<String> {
        self.columns.tooltips(resolver)
    }

    /// Push the stored layout into freshly built tables
    pub fn init_table(&mut self, topology: &mut TableTopology<'_>, sorter: &mut dyn SortModel) -> ApplyOutcome {
        LayoutReconciler::apply(&mut self.columns, topology, sorter)
    }

    /// Read the tables back and save when anything changed.
    ///
    /// Returns whether the layout changed. A failed save is logged and the
    /// in-memory layout stays authoritative.
    pub fn store_user_settings(
        &mut self,
        topology: &TableTopology<'_>,
        sorter: &dyn SortModel,
        store: &mut dyn LayoutStore,
    ) -> bool {
        let changed = LayoutReconciler::extract(&mut self.columns, topology, sorter);
        if !changed {
            return false;
        }

        match store.save(self.id, &self.columns) {
            Ok(()) => info!(target: "column_model", "Model {}: layout saved", self.id),
            Err(e) => warn!(target: "column_model", "Model {}: failed to save layout: {:#}", self.id, e),
        }
        true
    }

    /// Feed back edited copies of descriptors (restore / reset layout actions)
    pub fn restore_columns(&mut self, edited: &[ColumnDescriptor]) {
        self.columns.apply_user_edits(edited);
    }

    /// Hide or show a column from the options panel.
    ///
    /// Refused for models whose columns cannot be disabled.
    pub fn set_column_displayed(&mut self, id: ColumnId, displayed: bool) -> bool {
        if !self.user_can_disable_columns {
            warn!(target: "column_model", "Model {} does not allow hiding columns", self.id);
            return false;
        }
        self.columns.set_displayed(id, displayed)
    }
}
