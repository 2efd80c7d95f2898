use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Divider position of split tables whose fixed columns have no minimum width
    pub fixed_divider_default: i64,

    /// Save changed layouts when a view closes
    pub save_on_close: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Layout file location, defaults to the application data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fixed_divider_default: 60,
            save_on_close: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("column-layout").join("config.toml"))
    }

    /// Layout file to use: the configured path or the default data location
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => crate::utils::app_paths::AppPaths::layouts_file(),
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Column layout configuration
# Location: ~/.config/column-layout/config.toml (Linux)
#           ~/Library/Application Support/column-layout/config.toml (macOS)
#           %APPDATA%\column-layout\config.toml (Windows)

[layout]
# Divider position (pixels) of split tables when the fixed columns
# define no minimum width
fixed_divider_default = 60

# Save changed column layouts when a view is closed
save_on_close = true

[store]
# Layout file (leave commented to use the data directory)
# path = "/path/to/layouts.json"

[logging]
# tracing filter, e.g. "debug" or "info,reconciler=trace"
filter = "info"
"#
        .to_string()
    }
}
