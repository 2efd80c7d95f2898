use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::store::ParameterStore;

/// Named user settings that are not part of a column layout.
///
/// Values are looked up once from the store and cached. Writes only mark the
/// cache changed; [`store_parameters`](Self::store_parameters) persists them.
#[derive(Debug, Default)]
pub struct UserParameters {
    values: BTreeMap<String, String>,
    changed: bool,
}

impl UserParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value, else stored value, else `default`
    pub fn get(&mut self, key: &str, default: &str, store: &dyn ParameterStore) -> String {
        if let Some(value) = self.values.get(key) {
            return value.clone();
        }

        let value = match store.load_parameter(key) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!(target: "layout_store", "Failed to load parameter {}: {:#}", key, e);
                default.to_string()
            }
        };
        self.values.insert(key.to_string(), value.clone());
        value
    }

    pub fn get_int(&mut self, key: &str, default: i64, store: &dyn ParameterStore) -> i64 {
        let raw = self.get(key, &default.to_string(), store);
        raw.trim().parse().unwrap_or_else(|_| {
            debug!(target: "layout_store", "Parameter {}={:?} is not an integer", key, raw);
            default
        })
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.changed = true;
        }
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, value.to_string());
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Persist all cached values if any of them changed
    pub fn store_parameters(&mut self, store: &mut dyn ParameterStore) -> Result<bool> {
        if !self.changed {
            return Ok(false);
        }
        store.save_parameters(&self.values)?;
        self.changed = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLayoutStore;

    #[test]
    fn test_default_when_missing() {
        let store = MemoryLayoutStore::new();
        let mut params = UserParameters::new();
        assert_eq!(params.get_int("TableDividerLocation_3", 60, &store), 60);
        assert!(!params.is_changed());
    }

    #[test]
    fn test_only_changed_values_are_stored() {
        let mut store = MemoryLayoutStore::new();
        let mut params = UserParameters::new();

        assert_eq!(params.get_int("divider", 60, &store), 60);
        assert!(!params.store_parameters(&mut store).unwrap());
        assert_eq!(store.save_count(), 0);

        params.set_int("divider", 60);
        assert!(!params.is_changed());

        params.set_int("divider", 140);
        assert!(params.store_parameters(&mut store).unwrap());
        assert_eq!(store.parameters().get("divider").map(String::as_str), Some("140"));
        assert!(!params.is_changed());
    }

    #[test]
    fn test_failed_load_falls_back() {
        let store = MemoryLayoutStore::failing();
        let mut params = UserParameters::new();
        assert_eq!(params.get("x", "fallback", &store), "fallback");
    }

    #[test]
    fn test_non_integer_value() {
        let mut store = MemoryLayoutStore::new();
        let mut values = BTreeMap::new();
        values.insert("divider".to_string(), "wide".to_string());
        store.save_parameters(&values).unwrap();

        let mut params = UserParameters::new();
        assert_eq!(params.get_int("divider", 75, &store), 75);
    }
}
