//! Render-ready snapshot of a session.

use crate::store::FlagStateStore;
use serde::Serialize;

pub const LOADING_TEXT: &str = "Initializing quantum system...";
pub const SUPERPOSITION_TEXT: &str = "Feature flags are in quantum superposition";
pub const COLLAPSED_TEXT: &str = "All feature flags have collapsed to definite states";

/// How a single flag should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Superposition,
    Enabled,
    Disabled,
}

impl FlagStatus {
    fn of(state: Option<bool>) -> Self {
        match state {
            None => Self::Superposition,
            Some(true) => Self::Enabled,
            Some(false) => Self::Disabled,
        }
    }

    pub fn is_observed(&self) -> bool {
        *self != Self::Superposition
    }

    /// Badge text on the flag tile; nothing while in superposition.
    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Self::Superposition => None,
            Self::Enabled => Some("ENABLED"),
            Self::Disabled => Some("DISABLED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagView {
    pub name: String,
    /// Name with underscores shown as spaces
    pub label: String,
    pub status: FlagStatus,
}

/// One line of the "Final Flag States" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalState {
    pub label: String,
    pub enabled: bool,
}

impl std::fmt::Display for FinalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.enabled { "Enabled" } else { "Disabled" };
        write!(f, "{}: {}", self.label, state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub loading: bool,
    pub error: Option<String>,
    pub all_collapsed: bool,
    pub can_collapse: bool,
    pub flags: Vec<FlagView>,
    pub status_line: &'static str,
    /// Filled only after a bulk collapse
    pub final_states: Vec<FinalState>,
}

pub fn label(name: &str) -> String {
    name.replace('_', " ")
}

impl SessionView {
    pub(crate) fn capture(
        store: &FlagStateStore,
        loading: bool,
        can_collapse: bool,
        error: Option<String>,
    ) -> Self {
        let flags = store
            .registry()
            .map(|registry| {
                registry
                    .names()
                    .map(|name| FlagView {
                        name: name.to_string(),
                        label: label(name),
                        status: FlagStatus::of(store.state(name)),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let all_collapsed = store.is_all_collapsed();
        let final_states = if all_collapsed {
            store
                .states()
                .iter()
                .map(|(name, enabled)| FinalState {
                    label: label(name),
                    enabled: *enabled,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            loading,
            error,
            all_collapsed,
            can_collapse,
            flags,
            status_line: if loading {
                LOADING_TEXT
            } else if all_collapsed {
                COLLAPSED_TEXT
            } else {
                SUPERPOSITION_TEXT
            },
            final_states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin::ScriptedCoin;
    use crate::flag::{FlagDescriptor, FlagRegistry};

    fn store() -> FlagStateStore {
        let mut store = FlagStateStore::new();
        store.initialize(
            FlagRegistry::new()
                .with_flag(FlagDescriptor::boolean("dark_mode", true))
                .with_flag(FlagDescriptor::boolean("new_checkout_flow", false)),
        );
        store
    }

    #[test]
    fn test_label() {
        assert_eq!(label("new_checkout_flow"), "new checkout flow");
        assert_eq!(label("plain"), "plain");
    }

    #[test]
    fn test_partial_observation_view() {
        let mut store = store();
        store.observe("dark_mode").unwrap();

        let view = SessionView::capture(&store, false, true, None);
        assert_eq!(view.flags.len(), 2);
        assert_eq!(view.flags[0].status, FlagStatus::Enabled);
        assert_eq!(view.flags[0].status.badge(), Some("ENABLED"));
        assert_eq!(view.flags[1].label, "new checkout flow");
        assert!(!view.flags[1].status.is_observed());
        assert_eq!(view.status_line, SUPERPOSITION_TEXT);
        assert!(view.final_states.is_empty());
    }

    #[test]
    fn test_collapsed_view_lists_final_states() {
        let mut store = store();
        store.collapse_all(&mut ScriptedCoin::new([false, true])).unwrap();

        let view = SessionView::capture(&store, false, false, None);
        assert_eq!(view.status_line, COLLAPSED_TEXT);
        let lines: Vec<String> = view.final_states.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["dark mode: Disabled", "new checkout flow: Enabled"]
        );
    }

    #[test]
    fn test_loading_view() {
        let view = SessionView::capture(&FlagStateStore::new(), true, false, None);
        assert!(view.flags.is_empty());
        assert_eq!(view.status_line, LOADING_TEXT);
    }
}
