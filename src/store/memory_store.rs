use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashMap};

use super::{LayoutStore, ParameterStore, SavedLayout};
use crate::column::ColumnSet;
use crate::model::ModelId;

/// In-memory store, mainly for tests.
///
/// Counts writes so callers can check that unchanged layouts are not saved,
/// and can be switched into a failing mode to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryLayoutStore {
    layouts: HashMap<ModelId, SavedLayout>,
    parameters: BTreeMap<String, String>,
    saves: usize,
    failing: bool,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every load and save fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn insert(&mut self, layout: SavedLayout) {
        self.layouts.insert(layout.model_id, layout);
    }

    pub fn layout(&self, model: ModelId) -> Option<&SavedLayout> {
        self.layouts.get(&model)
    }

    /// Number of successful layout and parameter writes
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(anyhow!("Layout store unavailable"));
        }
        Ok(())
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self, model: ModelId) -> Result<Option<SavedLayout>> {
        self.check()?;
        Ok(self.layouts.get(&model).cloned())
    }

    fn save(&mut self, model: ModelId, columns: &ColumnSet) -> Result<()> {
        self.check()?;
        self.layouts.insert(model, SavedLayout::capture(model, columns));
        self.saves += 1;
        Ok(())
    }
}

impl ParameterStore for MemoryLayoutStore {
    fn load_parameter(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.parameters.get(key).cloned())
    }

    fn save_parameters(&mut self, parameters: &BTreeMap<String, String>) -> Result<()> {
        self.check()?;
        self.parameters
            .extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.saves += 1;
        Ok(())
    }
}
