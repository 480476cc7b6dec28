// Settings management for the superposition flag visualizer

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::FileFormat;
pub use settings::QuantumSettings;
pub use validation::{ConfigValidator, Validate};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Layers settings sources and deserializes the result.
///
/// Later layers win: files in the order they were added, then prefixed
/// environment variables, then explicit overrides.
pub struct SettingsLoader {
    env: Option<EnvLoader>,
    dotenv: Option<Option<String>>,
    files: Vec<String>,
    overrides: Map<String, Value>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            env: None,
            dotenv: None,
            files: Vec::new(),
            overrides: Map::new(),
        }
    }

    /// Read environment variables carrying `prefix` (e.g. `QUANTUM`)
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env = Some(EnvLoader::new(prefix));
        self
    }

    /// Populate the process environment from a `.env` file before reading it.
    /// With no path, a missing `.env` in the working directory is ignored.
    pub fn load_dotenv(mut self, path: Option<String>) -> Self {
        self.dotenv = Some(path);
        self
    }

    pub fn add_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Set one key explicitly
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        self.overrides.insert(key.to_string(), value);
        Ok(self)
    }

    /// Merge every layer into one document without interpreting it
    pub fn merged(&self) -> Result<Map<String, Value>> {
        match &self.dotenv {
            Some(Some(path)) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            }
            Some(None) => {
                dotenvy::dotenv().ok();
            }
            None => {}
        }

        let mut merged = Map::new();

        for path in &self.files {
            if let Value::Object(map) = loader::load_file(path)? {
                merged.extend(map);
            }
        }

        if let Some(env) = &self.env {
            merged.extend(env.load());
        }

        merged.extend(self.overrides.clone());
        Ok(merged)
    }

    /// Deserialize and validate the merged document
    pub fn load<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let merged = self.merged()?;
        let settings: T = serde_json::from_value(Value::Object(merged))
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumSettings {
    /// Defaults overlaid with `.env` and `QUANTUM_*` variables
    pub fn from_env() -> Result<Self> {
        SettingsLoader::new()
            .load_dotenv(None)
            .with_env_prefix("QUANTUM")
            .load()
    }
}
