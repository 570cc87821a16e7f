use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::store::{SeedCatalog, Store};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the JSON data file
    pub data_path: ConfigValue<PathBuf>,
    /// Seed catalog replacing the built-in one on first run
    pub catalog_path: ConfigValue<Option<PathBuf>>,
    /// Port the HTTP server listens on
    pub port: ConfigValue<u16>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    port: Option<u16>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_path = ConfigValue::new(
            Self::default_data_dir().join("db.json"),
            ConfigSource::Default,
        );
        let mut catalog_path = ConfigValue::new(None, ConfigSource::Default);
        let mut port = ConfigValue::new(8080, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(p) = file_config.data_path {
                data_path = ConfigValue::new(resolve_relative(&path, p), ConfigSource::File);
            }
            if let Some(p) = file_config.catalog_path {
                catalog_path =
                    ConfigValue::new(Some(resolve_relative(&path, p)), ConfigSource::File);
            }
            if let Some(p) = file_config.port {
                port = ConfigValue::new(p, ConfigSource::File);
            }

            config_file = Some(path);
        }

        // Apply environment variable overrides
        if let Ok(p) = std::env::var("WASTETRACK_DATA_PATH") {
            data_path = ConfigValue::new(PathBuf::from(p), ConfigSource::Environment);
        }
        if let Ok(p) = std::env::var("WASTETRACK_CATALOG_PATH") {
            catalog_path = ConfigValue::new(Some(PathBuf::from(p)), ConfigSource::Environment);
        }
        if let Ok(p) = std::env::var("WASTETRACK_PORT") {
            let parsed = p
                .parse()
                .map_err(|_| ConfigError::InvalidValue("WASTETRACK_PORT".to_string(), p))?;
            port = ConfigValue::new(parsed, ConfigSource::Environment);
        }

        Ok(Self {
            data_path,
            catalog_path,
            port,
            config_file,
        })
    }

    /// Opens the store described by this configuration.
    pub fn open_store(&self) -> Result<Store, StoreError> {
        let catalog = match &self.catalog_path.value {
            Some(path) => SeedCatalog::from_path(path)?,
            None => SeedCatalog::builtin()?,
        };
        Ok(Store::with_catalog(self.data_path.value.clone(), catalog))
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/wastetrack
    /// - macOS: ~/Library/Application Support/wastetrack
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wastetrack")
    }

    /// Default config file path: <config_dir>/wastetrack/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wastetrack")
            .join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path
            .parent()
            .map(|dir| dir.join(&value))
            .unwrap_or(value)
    } else {
        value
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Tests touching WASTETRACK_* variables must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config
            .data_path
            .value
            .to_string_lossy()
            .contains("db.json"));
        assert_eq!(config.data_path.source, ConfigSource::Default);
        assert_eq!(config.port.value, 8080);
        assert!(config.catalog_path.value.is_none());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_path: /custom/path/db.json").unwrap();
        writeln!(file, "catalog_path: catalog.yaml").unwrap();
        writeln!(file, "port: 9090").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.data_path.value, PathBuf::from("/custom/path/db.json"));
        assert_eq!(config.data_path.source, ConfigSource::File);
        assert_eq!(
            config.catalog_path.value,
            Some(temp_dir.path().join("catalog.yaml"))
        );
        assert_eq!(config.port.value, 9090);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_path: fromfile.json").unwrap();

        std::env::set_var("WASTETRACK_DATA_PATH", "/from/env.json");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_path.value, PathBuf::from("/from/env.json"));
        assert_eq!(config.data_path.source, ConfigSource::Environment);

        // Clean up
        std::env::remove_var("WASTETRACK_DATA_PATH");
    }

    #[test]
    fn test_invalid_port_env() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        std::env::set_var("WASTETRACK_PORT", "eighty");

        let result = Config::load(Some(temp_dir.path().join("none.yaml")));
        std::env::remove_var("WASTETRACK_PORT");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("WASTETRACK_PORT"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_open_store_with_catalog_file() {
        let _env = env_guard();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(
            temp_dir.path().join("catalog.yaml"),
            "- category: fruits\n  products:\n    - { name: Kiwi, price: 0.01, unit: g }\n",
        )
        .unwrap();
        std::fs::write(&config_path, "data_path: data/db.json\ncatalog_path: catalog.yaml\n")
            .unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        let store = config.open_store().unwrap();
        assert_eq!(store.path(), temp_dir.path().join("data").join("db.json"));

        let doc = store.load().unwrap();
        assert_eq!(doc.products.len(), 1);
        assert!(doc.products[0].matches("fruits", "Kiwi"));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(ConfigSource::Default.to_string(), "default");
        assert_eq!(ConfigSource::File.to_string(), "file");
        assert_eq!(ConfigSource::Environment.to_string(), "environment");
    }
}
