//! A visualizer session: settings, flag source, controller, and timers
//! wired together.

use rand::SeedableRng;
use rand::rngs::StdRng;
use superposition_config::{ConfigError, QuantumSettings, Validate};
use superposition_features::{
    AnimationSet, ClientContext, FlagSource, JsonFlagSource, ObservationController, Oscillation,
    Phase, RandomCoin, SessionView, SourceError, UserContext,
};
use superposition_log::{debug, info};
use thiserror::Error;

/// Failures while assembling a session. Failures during the session are
/// shown on the banner instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("No flags_file configured")]
    NoFlagsFile,

    #[error("Failed to render session view: {0}")]
    Render(#[from] serde_json::Error),
}

/// One user's session with the visualizer.
///
/// Interaction methods keep the per-flag animation timers in step with the
/// store, so they must run inside a Tokio runtime.
pub struct QuantumSession<S> {
    settings: QuantumSettings,
    controller: ObservationController<S, RandomCoin>,
    animations: AnimationSet,
}

impl<S: FlagSource> QuantumSession<S> {
    pub fn new(settings: QuantumSettings, source: S) -> Result<Self, SessionError> {
        settings.validate()?;

        let user = UserContext::anonymous(
            &settings.user_id_prefix,
            &settings.user_email,
            &mut StdRng::from_os_rng(),
        );
        let coin = RandomCoin::from_seed_option(settings.collapse_seed);
        let oscillation = Oscillation::new(settings.animation_tick(), settings.animation_amplitude);

        debug!(
            "Session for {} (seeded: {})",
            user.user_id,
            settings.collapse_seed.is_some()
        );

        let client = ClientContext::new(settings.sdk_key.clone(), user);

        Ok(Self {
            controller: ObservationController::new(source, coin).with_client(client),
            animations: AnimationSet::new(oscillation),
            settings,
        })
    }

    /// Fetch flags and start animating the ones in superposition.
    pub async fn start(&mut self) {
        self.controller.initialize().await;
        self.animations.sync(self.controller.store());
        info!(
            "Session {} started in phase {:?}",
            self.user().user_id,
            self.controller.phase()
        );
    }

    pub fn observe(&mut self, name: &str) {
        self.controller.observe(name);
        self.animations.sync(self.controller.store());
    }

    pub fn collapse_all(&mut self) {
        self.controller.collapse_all();
        self.animations.sync(self.controller.store());
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        self.animations.sync(self.controller.store());
    }
}

impl QuantumSession<JsonFlagSource> {
    /// Session backed by the JSON file named in `flags_file`.
    pub fn from_flags_file(settings: QuantumSettings) -> Result<Self, SessionError> {
        let path = settings
            .flags_file
            .clone()
            .ok_or(SessionError::NoFlagsFile)?;
        let source = JsonFlagSource::from_file(&path)?;
        Self::new(settings, source)
    }
}

impl<S> QuantumSession<S> {
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn view(&self) -> SessionView {
        self.controller.view()
    }

    pub fn view_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(&self.view())?)
    }

    pub fn controller(&self) -> &ObservationController<S, RandomCoin> {
        &self.controller
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn user(&self) -> &UserContext {
        &self.controller.client().user
    }

    pub fn settings(&self) -> &QuantumSettings {
        &self.settings
    }
}
