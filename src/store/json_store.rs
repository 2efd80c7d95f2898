use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{LayoutStore, ParameterStore, SavedLayout};
use crate::column::ColumnSet;
use crate::model::ModelId;
use crate::utils::app_paths::AppPaths;

const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    layouts: BTreeMap<u32, SavedLayout>,
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            layouts: BTreeMap::new(),
            parameters: BTreeMap::new(),
        }
    }
}

/// Layout store backed by a single JSON file.
///
/// The file is read on every load and rewritten on every save, so several
/// models can share it and an external edit is picked up on the next load.
/// Writes go to a sibling temp file which is then renamed into place.
#[derive(Debug, Clone)]
pub struct JsonLayoutStore {
    path: PathBuf,
}

impl JsonLayoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location in the application data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(AppPaths::layouts_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ids of all models with a saved layout
    pub fn saved_models(&self) -> Result<Vec<ModelId>> {
        Ok(self.read_document()?.layouts.into_keys().map(ModelId).collect())
    }

    fn read_document(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read layout file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        let document: StoreDocument = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layout file {}", self.path.display()))?;
        Ok(document)
    }

    fn write_document(&self, document: &StoreDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write layout file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace layout file {}", self.path.display()))?;
        Ok(())
    }
}

impl LayoutStore for JsonLayoutStore {
    fn load(&self, model: ModelId) -> Result<Option<SavedLayout>> {
        let mut document = self.read_document()?;
        Ok(document.layouts.remove(&model.0))
    }

    fn save(&mut self, model: ModelId, columns: &ColumnSet) -> Result<()> {
        let mut document = self.read_document()?;
        document
            .layouts
            .insert(model.0, SavedLayout::capture(model, columns));
        self.write_document(&document)?;

        debug!(target: "layout_store", "Saved layout of model {} to {}", model, self.path.display());
        Ok(())
    }
}

impl ParameterStore for JsonLayoutStore {
    fn load_parameter(&self, key: &str) -> Result<Option<String>> {
        let mut document = self.read_document()?;
        Ok(document.parameters.remove(key))
    }

    fn save_parameters(&mut self, parameters: &BTreeMap<String, String>) -> Result<()> {
        let mut document = self.read_document()?;
        document
            .parameters
            .extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.write_document(&document)
    }
}
