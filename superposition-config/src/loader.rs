// Settings file parsing

use crate::{ConfigError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }

    /// Detect the format from a path's extension
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::Load(format!("{} has no extension", path.display())))?;

        Self::from_extension(ext)
            .ok_or_else(|| ConfigError::Load(format!("Unsupported settings format: {}", ext)))
    }

    /// Parse a document into a JSON object tree
    pub fn parse(self, content: &str) -> Result<Value> {
        match self {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e))),
            FileFormat::Toml => {
                let table: toml::Value = toml::from_str(content)
                    .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
                serde_json::to_value(table)
                    .map_err(|e| ConfigError::Parse(format!("TOML conversion error: {}", e)))
            }
        }
    }
}

/// Read and parse a settings file, choosing the format from its extension
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let format = FileFormat::detect(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("Failed to read {}: {}", path.display(), e)))?;

    let value = format.parse(&content)?;
    if !value.is_object() {
        return Err(ConfigError::Parse(format!(
            "{} must contain a table at the top level",
            path.display()
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let value = FileFormat::Json
            .parse(r#"{"sdk_key": "dvc_client_abc", "animation_tick_ms": 40}"#)
            .unwrap();
        assert_eq!(value["animation_tick_ms"], 40);
    }

    #[test]
    fn test_parse_toml() {
        let value = FileFormat::Toml
            .parse(
                r#"
                sdk_key = "dvc_client_abc"
                animation_amplitude = 12.5
            "#,
            )
            .unwrap();
        assert_eq!(value["sdk_key"], "dvc_client_abc");
        assert_eq!(value["animation_amplitude"], 12.5);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            FileFormat::Json.parse("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::detect("quantum.toml").unwrap(), FileFormat::Toml);
        assert_eq!(FileFormat::detect("QUANTUM.JSON").unwrap(), FileFormat::Json);
        assert!(FileFormat::detect("quantum.yaml").is_err());
        assert!(FileFormat::detect("quantum").is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_file("/nonexistent/quantum.toml"),
            Err(ConfigError::Load(_))
        ));
    }
}
