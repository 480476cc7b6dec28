//! Feature flags in superposition
//!
//! Flags fetched from a flag service start out unobserved. Observing one
//! flag resolves it to the value the service reported; collapsing all of
//! them at once assigns each an independent fair coin flip instead. A reset
//! returns everything to superposition.
//!
//! # Quick Start
//!
//! ```
//! use superposition_features::*;
//!
//! # tokio_test::block_on(async {
//! let registry = FlagRegistry::new()
//!     .with_flag(FlagDescriptor::boolean("dark_mode", true))
//!     .with_flag(FlagDescriptor::boolean("new_checkout", false));
//!
//! let mut controller =
//!     ObservationController::new(StaticFlagSource::new(registry), RandomCoin::seeded(7));
//! controller.initialize().await;
//!
//! controller.observe("dark_mode");
//! assert_eq!(controller.store().state("dark_mode"), Some(true));
//! assert_eq!(controller.store().state("new_checkout"), None);
//!
//! controller.collapse_all();
//! assert!(controller.store().is_all_collapsed());
//!
//! controller.reset();
//! assert_eq!(controller.phase(), Phase::Superposition);
//! # });
//! ```
//!
//! # Sources
//!
//! Anything implementing [`FlagSource`] can feed a controller. The crate
//! ships [`StaticFlagSource`], [`JsonFlagSource`] for the service's
//! `allFeatures` JSON shape, and [`MockFlagSource`] for tests.

pub mod animation;
pub mod coin;
pub mod controller;
pub mod error;
pub mod flag;
pub mod source;
pub mod store;
pub mod view;

pub use animation::{AnimationSet, AnimationTimer, Offset, Oscillation};
pub use coin::{CoinFlip, RandomCoin, ScriptedCoin};
pub use controller::{ObservationController, Phase};
pub use error::{FlagError, FlagResult, ObservationIssue, SourceError};
pub use flag::{FlagDescriptor, FlagRegistry, Variation};
pub use source::{
    ClientContext, FlagSource, JsonFlagSource, MockFlagSource, StaticFlagSource, UserContext,
};
pub use store::{FlagStateStore, Observation};
pub use view::{FinalState, FlagStatus, FlagView, SessionView};
