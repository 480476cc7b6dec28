//! Cosmetic drift for flags that are still in superposition.
//!
//! Each unobserved flag owns one [`AnimationTimer`]. The timer lives exactly
//! as long as the flag stays unobserved: [`AnimationSet::sync`] starts and
//! drops timers to match the store, and dropping a timer aborts its task.

use crate::store::FlagStateStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use superposition_log::trace;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Displacement of a flag tile from its resting position, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Circular drift shared by every flag; the name length shifts the phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub period: Duration,
    pub amplitude: f64,
}

impl Default for Oscillation {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(50),
            amplitude: 10.0,
        }
    }
}

impl Oscillation {
    pub fn new(period: Duration, amplitude: f64) -> Self {
        Self { period, amplitude }
    }

    /// Offset of flag `name` at `t` seconds.
    pub fn offset(&self, name: &str, t: f64) -> Offset {
        let phase = t + name.len() as f64;
        Offset {
            x: phase.sin() * self.amplitude,
            y: phase.cos() * self.amplitude,
        }
    }
}

/// Repeating timer publishing one flag's offset.
///
/// Must be started inside a Tokio runtime.
pub struct AnimationTimer {
    offset: watch::Receiver<Offset>,
    task: Option<JoinHandle<()>>,
}

impl AnimationTimer {
    pub fn start(name: impl Into<String>, oscillation: Oscillation) -> Self {
        let name = name.into();
        let (tx, rx) = watch::channel(Offset::default());
        let started = Instant::now();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(oscillation.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let offset = oscillation.offset(&name, started.elapsed().as_secs_f64());
                if tx.send(offset).is_err() {
                    break;
                }
            }
        });

        Self {
            offset: rx,
            task: Some(task),
        }
    }

    /// Latest published offset; frozen once stopped.
    pub fn offset(&self) -> Offset {
        *self.offset.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Offset> {
        self.offset.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AnimationTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Timers for every flag currently in superposition.
pub struct AnimationSet {
    oscillation: Oscillation,
    timers: BTreeMap<String, AnimationTimer>,
}

impl AnimationSet {
    pub fn new(oscillation: Oscillation) -> Self {
        Self {
            oscillation,
            timers: BTreeMap::new(),
        }
    }

    /// Start timers for unobserved flags and drop the rest.
    pub fn sync(&mut self, store: &FlagStateStore) {
        let Some(registry) = store.registry() else {
            self.clear();
            return;
        };

        self.timers.retain(|name, _| {
            let keep = registry.contains(name) && !store.is_observed(name);
            if !keep {
                trace!("Stopping animation for {}", name);
            }
            keep
        });

        for name in registry.names() {
            if !store.is_observed(name) && !self.timers.contains_key(name) {
                trace!("Starting animation for {}", name);
                self.timers
                    .insert(name.to_string(), AnimationTimer::start(name, self.oscillation));
            }
        }
    }

    /// Current offset of a flag; `None` when it has no timer.
    pub fn offset(&self, name: &str) -> Option<Offset> {
        self.timers.get(name).map(AnimationTimer::offset)
    }

    pub fn is_animating(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self::new(Oscillation::default())
    }
}
