// Session settings

use crate::{ConfigValidator, Result, Validate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Everything a visualizer session needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumSettings {
    /// Client key handed to the flag service
    pub sdk_key: String,

    /// Prefix of the generated anonymous user id
    pub user_id_prefix: String,

    pub user_email: String,

    /// Period of each flag's animation timer, in milliseconds
    #[serde(deserialize_with = "number")]
    pub animation_tick_ms: u64,

    /// Peak oscillation offset in pixels
    #[serde(deserialize_with = "number")]
    pub animation_amplitude: f64,

    /// Seed for bulk collapse; `None` draws from OS entropy
    #[serde(deserialize_with = "optional_number")]
    pub collapse_seed: Option<u64>,

    /// JSON file to read flags from instead of a live service
    pub flags_file: Option<String>,
}

impl Default for QuantumSettings {
    fn default() -> Self {
        Self {
            sdk_key: String::new(),
            user_id_prefix: "quantum-user-".to_string(),
            user_email: "quantum@example.com".to_string(),
            animation_tick_ms: 50,
            animation_amplitude: 10.0,
            collapse_seed: None,
            flags_file: None,
        }
    }
}

impl QuantumSettings {
    pub fn animation_tick(&self) -> Duration {
        Duration::from_millis(self.animation_tick_ms)
    }
}

// Environment overlays arrive as strings, files as typed values.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    String(String),
}

impl<T> NumberOrString<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn parse<E: de::Error>(self) -> std::result::Result<T, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::String(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

fn number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    NumberOrString::<T>::deserialize(deserializer)?.parse()
}

fn optional_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    Option::<NumberOrString<T>>::deserialize(deserializer)?
        .map(NumberOrString::parse)
        .transpose()
}

impl Validate for QuantumSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.user_id_prefix, "user_id_prefix")?;
        ConfigValidator::is_email(&self.user_email, "user_email")?;
        ConfigValidator::in_range(self.animation_tick_ms, 1, 10_000, "animation_tick_ms")?;
        ConfigValidator::non_negative_finite(self.animation_amplitude, "animation_amplitude")?;
        Ok(())
    }
}
