//! Flag descriptors and the registry they are collected into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flag as reported by the flag service.
///
/// Only `value` matters here; anything else the service sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagDescriptor {
    /// Flag name. Filled from the registry key when the payload omits it.
    #[serde(default)]
    pub key: String,

    /// Resolved value. Missing values deserialize as `null`.
    #[serde(default)]
    pub value: Variation,
}

impl FlagDescriptor {
    /// Create a boolean flag
    ///
    /// # Examples
    ///
    /// ```
    /// use superposition_features::FlagDescriptor;
    ///
    /// let flag = FlagDescriptor::boolean("dark_mode", true);
    /// assert_eq!(flag.resolved(), Some(true));
    /// ```
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: Variation::Boolean(value),
        }
    }

    pub fn new(key: impl Into<String>, value: Variation) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// The boolean this flag resolves to, if it is a boolean flag.
    pub fn resolved(&self) -> Option<bool> {
        self.value.as_bool()
    }
}

/// Flag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variation {
    Boolean(bool),
    String(String),
    Number(f64),
    Json(serde_json::Value),
}

impl Default for Variation {
    fn default() -> Self {
        Self::Json(serde_json::Value::Null)
    }
}

impl Variation {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Every flag known to the session, keyed by name.
///
/// Ordered by name so that listing and seeded collapse are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, FlagDescriptor>", into = "BTreeMap<String, FlagDescriptor>")]
pub struct FlagRegistry {
    flags: BTreeMap<String, FlagDescriptor>,
}

impl FlagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag under its own key, replacing any flag of the same name.
    pub fn with_flag(mut self, descriptor: FlagDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn insert(&mut self, descriptor: FlagDescriptor) {
        self.flags.insert(descriptor.key.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&FlagDescriptor> {
        self.flags.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagDescriptor)> {
        self.flags.iter().map(|(name, flag)| (name.as_str(), flag))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl From<BTreeMap<String, FlagDescriptor>> for FlagRegistry {
    fn from(map: BTreeMap<String, FlagDescriptor>) -> Self {
        let flags = map
            .into_iter()
            .map(|(name, mut descriptor)| {
                descriptor.key = name.clone();
                (name, descriptor)
            })
            .collect();
        Self { flags }
    }
}

impl From<FlagRegistry> for BTreeMap<String, FlagDescriptor> {
    fn from(registry: FlagRegistry) -> Self {
        registry.flags
    }
}

impl FromIterator<FlagDescriptor> for FlagRegistry {
    fn from_iter<I: IntoIterator<Item = FlagDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for descriptor in iter {
            registry.insert(descriptor);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_descriptor() {
        let flag = FlagDescriptor::boolean("new_ui", false);
        assert_eq!(flag.resolved(), Some(false));
    }

    #[test]
    fn test_non_boolean_descriptor_does_not_resolve() {
        let flag = FlagDescriptor::new("theme", Variation::String("dark".into()));
        assert_eq!(flag.resolved(), None);
        assert_eq!(flag.value.as_bool(), None);
    }

    #[test]
    fn test_registry_is_ordered_by_name() {
        let registry: FlagRegistry = vec![
            FlagDescriptor::boolean("zeta", true),
            FlagDescriptor::boolean("alpha", false),
            FlagDescriptor::boolean("mid", true),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_registry_from_service_payload() {
        let payload = r#"{
            "quantum_mode": {"_id": "f1", "type": "release", "value": true},
            "beta_banner": {"key": "ignored", "value": false},
            "broken": {"type": "release"},
            "rollout": {"value": 0.25}
        }"#;

        let registry: FlagRegistry = serde_json::from_str(payload).unwrap();

        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get("quantum_mode").unwrap().resolved(), Some(true));
        assert_eq!(registry.get("beta_banner").unwrap().key, "beta_banner");
        assert_eq!(registry.get("broken").unwrap().value, Variation::default());
        assert_eq!(registry.get("rollout").unwrap().value, Variation::Number(0.25));
    }
}
