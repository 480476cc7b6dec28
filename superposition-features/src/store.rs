//! Flag State Store
//!
//! Holds the registry and which flags have collapsed to a definite value.
//! A flag with no entry in the state map is still in superposition.

use crate::coin::CoinFlip;
use crate::error::{FlagError, FlagResult, ObservationIssue};
use crate::flag::FlagRegistry;
use std::collections::BTreeMap;
use superposition_log::{debug, trace};

/// Outcome of observing a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The flag now holds its service value
    Resolved(bool),
    /// Everything was already bulk-collapsed; nothing changed
    Suppressed,
}

/// Registry plus per-flag collapse state for one session.
#[derive(Debug, Clone, Default)]
pub struct FlagStateStore {
    registry: Option<FlagRegistry>,
    states: BTreeMap<String, bool>,
    all_collapsed: bool,
}

impl FlagStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the registry and put every flag into superposition.
    pub fn initialize(&mut self, registry: FlagRegistry) {
        debug!("Store initialized with {} flags", registry.len());
        self.registry = Some(registry);
        self.states.clear();
        self.all_collapsed = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_some()
    }

    pub fn registry(&self) -> Option<&FlagRegistry> {
        self.registry.as_ref()
    }

    /// Resolved value, or `None` while the flag is in superposition.
    pub fn state(&self, name: &str) -> Option<bool> {
        self.states.get(name).copied()
    }

    pub fn is_observed(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn states(&self) -> &BTreeMap<String, bool> {
        &self.states
    }

    pub fn is_all_collapsed(&self) -> bool {
        self.all_collapsed
    }

    /// Resolve one flag to the value the service reported.
    ///
    /// Does nothing once a bulk collapse has happened. Unknown flags and
    /// non-boolean values fail without touching state.
    pub fn observe(&mut self, name: &str) -> FlagResult<Observation> {
        if self.all_collapsed {
            trace!("Ignoring observation of {} after bulk collapse", name);
            return Ok(Observation::Suppressed);
        }

        let failure = |issue| FlagError::Observation {
            flag: name.to_string(),
            issue,
        };

        let descriptor = self
            .registry
            .as_ref()
            .and_then(|registry| registry.get(name))
            .ok_or_else(|| failure(ObservationIssue::UnknownFlag))?;
        let value = descriptor
            .resolved()
            .ok_or_else(|| failure(ObservationIssue::NotBoolean))?;

        self.states.insert(name.to_string(), value);
        debug!("Observed {} = {}", name, value);
        Ok(Observation::Resolved(value))
    }

    /// Give every registered flag an independent fair coin flip.
    ///
    /// The service values are deliberately ignored here. Returns `false`
    /// without drawing when already collapsed, so collapsed values hold
    /// until [`reset`](Self::reset).
    pub fn collapse_all(&mut self, coin: &mut dyn CoinFlip) -> FlagResult<bool> {
        let registry = self
            .registry
            .as_ref()
            .ok_or_else(|| FlagError::Collapse("flag registry is not loaded".to_string()))?;

        if registry.is_empty() {
            return Err(FlagError::Collapse("flag registry is empty".to_string()));
        }

        if self.all_collapsed {
            return Ok(false);
        }

        let drawn: BTreeMap<String, bool> = registry
            .names()
            .map(|name| (name.to_string(), coin.flip()))
            .collect();

        debug!(
            "Collapsed {} flags, {} enabled",
            drawn.len(),
            drawn.values().filter(|v| **v).count()
        );
        self.states = drawn;
        self.all_collapsed = true;
        Ok(true)
    }

    /// Return every flag to superposition. The registry is kept.
    pub fn reset(&mut self) {
        self.states.clear();
        self.all_collapsed = false;
    }
}
