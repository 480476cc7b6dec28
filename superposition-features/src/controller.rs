//! Observation Controller
//!
//! Mediates user intents (observe one flag, collapse all, reset) onto a
//! [`FlagStateStore`] and keeps the single error message the banner shows.

use crate::coin::{CoinFlip, RandomCoin};
use crate::error::FlagError;
use crate::source::{ClientContext, FlagSource};
use crate::store::{FlagStateStore, Observation};
use crate::view::SessionView;
use superposition_log::{debug, info, warn};

/// Where the session is in its lifecycle.
///
/// Errors are not a phase: they overlay whatever phase the session is in,
/// except for a failed fetch which leaves the session in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the registry
    Loading,
    /// Registry loaded, no flag observed
    Superposition,
    /// Some flags observed one at a time
    PartiallyObserved,
    /// Bulk collapse happened
    Collapsed,
    /// The registry fetch failed; no further fetch is attempted
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Load {
    Pending,
    Ready,
    Failed,
}

/// Drives one visualizer session.
pub struct ObservationController<S, C = RandomCoin> {
    source: S,
    client: ClientContext,
    coin: C,
    store: FlagStateStore,
    load: Load,
    error: Option<FlagError>,
}

impl<S: FlagSource, C: CoinFlip> ObservationController<S, C> {
    /// A controller fetching as an anonymous client; see [`Self::with_client`].
    pub fn new(source: S, coin: C) -> Self {
        Self {
            source,
            client: ClientContext::default(),
            coin,
            store: FlagStateStore::new(),
            load: Load::Pending,
            error: None,
        }
    }

    /// Identify the session to the flag service on fetch.
    pub fn with_client(mut self, client: ClientContext) -> Self {
        self.client = client;
        self
    }

    /// Fetch the registry once. Later calls do nothing, whether the first
    /// fetch succeeded or failed.
    pub async fn initialize(&mut self) {
        if self.load != Load::Pending {
            debug!("Flag registry already fetched, skipping");
            return;
        }

        match self.source.all_flags(&self.client).await {
            Ok(registry) => {
                info!("Loaded {} feature flags", registry.len());
                self.store.initialize(registry);
                self.load = Load::Ready;
            }
            Err(source) => {
                self.load = Load::Failed;
                self.fail(FlagError::Retrieval(source));
            }
        }
    }

    /// Resolve one flag to its service value.
    pub fn observe(&mut self, name: &str) {
        match self.store.observe(name) {
            Ok(Observation::Resolved(_)) => self.error = None,
            Ok(Observation::Suppressed) => {}
            Err(err) => self.fail(err),
        }
    }

    /// Collapse every flag to a random value.
    pub fn collapse_all(&mut self) {
        match self.store.collapse_all(&mut self.coin) {
            Ok(_) => self.error = None,
            Err(err) => self.fail(err),
        }
    }

    /// Back to superposition, with the banner cleared.
    pub fn reset(&mut self) {
        self.store.reset();
        self.error = None;
        debug!("Reset all flags to superposition");
    }

    fn fail(&mut self, err: FlagError) {
        warn!("{} ({})", err, err.reason());
        self.error = Some(err);
    }
}

impl<S, C> ObservationController<S, C> {
    pub fn phase(&self) -> Phase {
        match self.load {
            Load::Pending => Phase::Loading,
            Load::Failed => Phase::Failed,
            Load::Ready if self.store.is_all_collapsed() => Phase::Collapsed,
            Load::Ready if self.store.states().is_empty() => Phase::Superposition,
            Load::Ready => Phase::PartiallyObserved,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load == Load::Pending
    }

    pub fn client(&self) -> &ClientContext {
        &self.client
    }

    pub fn store(&self) -> &FlagStateStore {
        &self.store
    }

    pub fn error(&self) -> Option<&FlagError> {
        self.error.as_ref()
    }

    /// Banner text, if an error is showing.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Bulk collapse is offered only once flags are loaded and not yet collapsed.
    pub fn can_collapse(&self) -> bool {
        self.load == Load::Ready && !self.store.is_all_collapsed()
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        SessionView::capture(
            &self.store,
            self.is_loading(),
            self.can_collapse(),
            self.error_message(),
        )
    }
}
