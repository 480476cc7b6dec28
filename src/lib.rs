// Superposition - feature flags visualized as quantum states
//
// Flags start in superposition, resolve to their service value when observed
// one at a time, collapse to random values all at once, and can be reset.

pub mod session;

pub use session::{QuantumSession, SessionError};

pub use superposition_config as config;
pub use superposition_features as features;
pub use superposition_log as logging;

// Prelude for common imports
pub mod prelude {
    pub use crate::session::{QuantumSession, SessionError};
    pub use superposition_config::{QuantumSettings, SettingsLoader};
    pub use superposition_features::{
        CoinFlip, FlagDescriptor, FlagError, FlagRegistry, FlagSource, FlagStatus, JsonFlagSource,
        ObservationController, Phase, RandomCoin, SessionView, StaticFlagSource,
    };
}
