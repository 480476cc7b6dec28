// Environment variable overlay

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::env;

/// Collects prefixed environment variables into settings keys.
///
/// `QUANTUM_ANIMATION_TICK_MS=40` becomes `animation_tick_ms = "40"`. Values
/// stay strings; typed settings parse them on deserialization.
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load every variable carrying the prefix
    pub fn load(&self) -> Map<String, Value> {
        self.collect(env::vars())
    }

    /// Read one variable, e.g. `load_var("sdk_key")` reads `QUANTUM_SDK_KEY`
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = format!("{}_{}", self.prefix, key.to_uppercase());
        env::var(&full_key).map_err(ConfigError::Env)
    }

    fn collect(&self, vars: impl IntoIterator<Item = (String, String)>) -> Map<String, Value> {
        let marker = format!("{}_", self.prefix);
        vars.into_iter()
            .filter_map(|(key, value)| {
                let key = key.strip_prefix(&marker)?;
                (!key.is_empty()).then(|| (key.to_lowercase(), Value::String(value)))
            })
            .collect()
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new("QUANTUM")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prefix_is_stripped_and_lowercased() {
        let loader = EnvLoader::default();
        let map = loader.collect(vars(&[
            ("QUANTUM_SDK_KEY", "dvc_client_abc"),
            ("PATH", "/usr/bin"),
            ("QUANTUMX_OTHER", "ignored"),
        ]));

        assert_eq!(map.len(), 1);
        assert_eq!(map["sdk_key"], "dvc_client_abc");
    }

    #[test]
    fn test_values_stay_strings() {
        let loader = EnvLoader::default();
        let map = loader.collect(vars(&[
            ("QUANTUM_SDK_KEY", "12345"),
            ("QUANTUM_ANIMATION_TICK_MS", "40"),
            ("QUANTUM_FLAG", "true"),
        ]));

        assert_eq!(map["sdk_key"], "12345");
        assert_eq!(map["animation_tick_ms"], "40");
        assert_eq!(map["flag"], "true");
    }

    #[test]
    fn test_missing_var() {
        let loader = EnvLoader::new("QUANTUM_TEST_MISSING");
        assert!(loader.load_var("NOPE_12345").is_err());
    }
}
