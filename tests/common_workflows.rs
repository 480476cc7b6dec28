//! Integration tests for common superposition workflows.
//!
//! These walk a session through loading, observation, bulk collapse, and
//! reset the way a user clicking through the visualizer would.

use std::collections::BTreeSet;
use std::io::Write;
use superposition::prelude::*;
use superposition_features::{MockFlagSource, ObservationIssue, ScriptedCoin, SourceError};

fn two_flags() -> FlagRegistry {
    FlagRegistry::new()
        .with_flag(FlagDescriptor::boolean("A", true))
        .with_flag(FlagDescriptor::boolean("B", false))
}

async fn controller_with<C: CoinFlip>(coin: C) -> ObservationController<StaticFlagSource, C> {
    let mut controller = ObservationController::new(StaticFlagSource::new(two_flags()), coin);
    controller.initialize().await;
    controller
}

// =============================================================================
// Worked example
// =============================================================================

#[tokio::test]
async fn test_observe_single_flag() {
    let mut controller = controller_with(RandomCoin::seeded(1)).await;

    controller.observe("A");

    let states = controller.store().states();
    assert_eq!(states.len(), 1);
    assert_eq!(states.get("A"), Some(&true));
    assert!(!controller.store().is_all_collapsed());
}

#[tokio::test]
async fn test_observe_unknown_flag_reports_error() {
    let mut controller = controller_with(RandomCoin::seeded(1)).await;
    controller.observe("A");

    controller.observe("Z");

    assert_eq!(controller.store().states().len(), 1);
    match controller.error() {
        Some(FlagError::Observation { flag, issue }) => {
            assert_eq!(flag, "Z");
            assert_eq!(*issue, ObservationIssue::UnknownFlag);
        }
        other => panic!("expected observation failure, got {:?}", other),
    }
    assert!(controller.error_message().unwrap().contains('Z'));
}

#[tokio::test]
async fn test_collapse_then_observe_is_noop() {
    let mut controller = controller_with(RandomCoin::seeded(99)).await;

    controller.collapse_all();

    let keys: BTreeSet<&str> = controller
        .store()
        .states()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, BTreeSet::from(["A", "B"]));
    assert!(controller.store().is_all_collapsed());

    let before = controller.store().states().clone();
    controller.observe("A");
    assert_eq!(controller.store().states(), &before);
}

#[tokio::test]
async fn test_reset_returns_to_superposition() {
    let mut controller = controller_with(RandomCoin::seeded(3)).await;
    controller.observe("A");
    controller.observe("Z");
    assert!(controller.error().is_some());

    controller.reset();
    assert!(controller.store().states().is_empty());
    assert!(controller.error().is_none());

    controller.collapse_all();
    assert!(controller.store().is_all_collapsed());

    controller.reset();
    assert!(controller.store().states().is_empty());
    assert!(!controller.store().is_all_collapsed());
    assert_eq!(controller.phase(), Phase::Superposition);
}

// =============================================================================
// Properties
// =============================================================================

#[tokio::test]
async fn test_observe_matches_service_for_every_flag() {
    let registry: FlagRegistry = (0..20)
        .map(|i| FlagDescriptor::boolean(format!("flag_{i}"), i % 3 == 0))
        .collect();
    let mut controller =
        ObservationController::new(StaticFlagSource::new(registry.clone()), RandomCoin::seeded(5));
    controller.initialize().await;

    for (name, descriptor) in registry.iter() {
        controller.observe(name);
        assert_eq!(controller.store().state(name), descriptor.resolved());
    }
    assert!(!controller.store().is_all_collapsed());
}

#[tokio::test]
async fn test_collapse_uses_coin_not_service() {
    let mut controller = controller_with(ScriptedCoin::new([false, true])).await;

    controller.collapse_all();

    assert_eq!(controller.store().state("A"), Some(false));
    assert_eq!(controller.store().state("B"), Some(true));
}

#[tokio::test]
async fn test_seeded_collapse_is_reproducible() {
    let mut first = controller_with(RandomCoin::seeded(2024)).await;
    let mut second = controller_with(RandomCoin::seeded(2024)).await;

    first.collapse_all();
    second.collapse_all();

    assert_eq!(first.store().states(), second.store().states());
}

#[tokio::test]
async fn test_collapse_fairness() {
    const TRIALS: usize = 10_000;
    let single = FlagRegistry::new().with_flag(FlagDescriptor::boolean("only", true));
    let mut controller =
        ObservationController::new(StaticFlagSource::new(single), RandomCoin::seeded(0xC0FFEE));
    controller.initialize().await;

    let mut enabled = 0usize;
    for _ in 0..TRIALS {
        controller.collapse_all();
        if controller.store().state("only") == Some(true) {
            enabled += 1;
        }
        controller.reset();
    }

    // Five standard deviations is 250 at n = 10_000.
    let proportion = enabled as f64 / TRIALS as f64;
    assert!((proportion - 0.5).abs() < 0.025, "proportion was {proportion}");
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_retrieval_failure_is_shown_and_not_retried() {
    let source = MockFlagSource::failing(SourceError::Unavailable("connection refused".into()));
    let mut controller = ObservationController::new(source.clone(), RandomCoin::seeded(1));

    assert_eq!(controller.phase(), Phase::Loading);
    assert!(controller.view().loading);

    controller.initialize().await;
    controller.initialize().await;

    assert_eq!(source.call_count(), 1);
    assert_eq!(controller.phase(), Phase::Failed);
    let view = controller.view();
    assert!(!view.loading);
    assert!(view.flags.is_empty());
    assert_eq!(view.error.as_deref(), Some("Failed to fetch features"));
}

#[tokio::test]
async fn test_malformed_descriptor_from_json() {
    let source = JsonFlagSource::from_json(r#"{"A": {"value": true}, "theme": {"value": "dark"}}"#);
    let mut controller = ObservationController::new(source, RandomCoin::seeded(1));
    controller.initialize().await;

    controller.observe("theme");
    assert_eq!(
        controller.error_message().as_deref(),
        Some("Failed to observe state for theme")
    );

    controller.observe("A");
    assert!(controller.error().is_none());
}

// =============================================================================
// Full session
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_session_from_settings_file() {
    let dir = std::env::temp_dir();
    let flags_path = dir.join(format!("superposition-flags-{}.json", std::process::id()));
    let settings_path = dir.join(format!("superposition-settings-{}.toml", std::process::id()));

    std::fs::File::create(&flags_path)
        .unwrap()
        .write_all(br#"{"dark_mode": {"value": true}, "new_checkout_flow": {"value": false}}"#)
        .unwrap();
    std::fs::write(
        &settings_path,
        format!(
            "collapse_seed = 11\nanimation_tick_ms = 20\nflags_file = {:?}\n",
            flags_path.to_string_lossy()
        ),
    )
    .unwrap();

    let settings: QuantumSettings = SettingsLoader::new()
        .add_file(settings_path.to_string_lossy())
        .load()
        .unwrap();
    assert_eq!(settings.collapse_seed, Some(11));

    let mut session = QuantumSession::from_flags_file(settings).unwrap();
    session.start().await;
    assert_eq!(session.phase(), Phase::Superposition);
    assert_eq!(session.animations().len(), 2);

    session.observe("dark_mode");
    let view = session.view();
    assert_eq!(view.flags[0].status, FlagStatus::Enabled);
    assert_eq!(view.flags[1].label, "new checkout flow");
    assert!(view.can_collapse);

    session.collapse_all();
    let view = session.view();
    assert!(view.all_collapsed);
    assert!(!view.can_collapse);
    assert_eq!(view.final_states.len(), 2);
    assert!(session.animations().is_empty());

    session.reset();
    assert_eq!(session.phase(), Phase::Superposition);
    assert_eq!(session.animations().len(), 2);

    let _ = std::fs::remove_file(flags_path);
    let _ = std::fs::remove_file(settings_path);
}
