//! Layout persistence
//!
//! The engine needs two things from storage: load the saved layout of a
//! model and save the current one. User parameters (for example the divider
//! position of a split table) go through the same backend.

pub mod json_store;
pub mod layout;
pub mod memory_store;

use anyhow::Result;
use std::collections::BTreeMap;

use crate::column::ColumnSet;
use crate::model::ModelId;

pub use json_store::JsonLayoutStore;
pub use layout::{MergeReport, SavedColumn, SavedLayout};
pub use memory_store::MemoryLayoutStore;

pub trait LayoutStore {
    /// Last saved layout of `model`, `None` if it was never saved
    fn load(&self, model: ModelId) -> Result<Option<SavedLayout>>;

    /// Persist the full layout state of `columns`
    fn save(&mut self, model: ModelId, columns: &ColumnSet) -> Result<()>;
}

pub trait ParameterStore {
    fn load_parameter(&self, key: &str) -> Result<Option<String>>;

    /// Write all given parameters, replacing stored values with the same key
    fn save_parameters(&mut self, parameters: &BTreeMap<String, String>) -> Result<()>;
}
