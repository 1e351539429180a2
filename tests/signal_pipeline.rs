//! End-to-end signal translation tests.
//!
//! Feeds text through a lattice and a translator together, and drives the
//! translator from hand-built views to pin down trend and nudge behaviour.

use tidal_lattice::{
    BleedEvent, BleedKind, Lattice, LatticeConfig, LatticeView, Nudge, Signal, SignalScores,
    SignalTranslator, TranslatorConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A view with fixed node values and bleed events.
struct FixedView {
    nodes: Vec<(String, f32)>,
    events: Vec<BleedEvent>,
}

impl FixedView {
    fn uniform(value: f32) -> Self {
        Self {
            nodes: vec![("a".into(), value), ("b".into(), value)],
            events: Vec::new(),
        }
    }
}

impl LatticeView for FixedView {
    fn node_values(&self) -> Vec<(&str, f32)> {
        self.nodes.iter().map(|(n, v)| (n.as_str(), *v)).collect()
    }

    fn bleed_events_above(&self, threshold: f32) -> Vec<BleedEvent> {
        self.events
            .iter()
            .filter(|e| e.strength > threshold)
            .cloned()
            .collect()
    }
}

fn fingerprint(l: &Lattice) -> Vec<(String, f32, u32, usize)> {
    l.iter()
        .map(|(n, node)| (n.to_string(), node.value, node.decay_counter, node.edges.len()))
        .collect()
}

// ─── test 1: angry input routes to venting ───────────────────────────────────

#[test]
fn test_angry_input_primary_is_vent_energy() {
    let mut lattice = Lattice::new();
    let mut translator = SignalTranslator::new();
    let text = "I am so angry and frustrated, need to vent";

    lattice.process_input(text);
    let out = translator.translate(&lattice, text);

    assert_eq!(out.primary, Signal::VentEnergy);
    assert!(
        out.signals[Signal::VentEnergy] >= 1.8,
        "vent cue alone is 1.8, got {}",
        out.signals[Signal::VentEnergy]
    );
    for s in Signal::ALL {
        assert!(out.signals[s] >= 0.0, "{} negative", s);
    }
    assert_eq!(out.nudge, None, "no trend on the first turn");
    assert!(out.is_actionable(1.0));
}

// ─── test 2: empty lattice, empty text ───────────────────────────────────────

#[test]
fn test_empty_lattice_and_text_scores_zero() {
    let lattice = Lattice::empty(LatticeConfig::default());
    let mut translator = SignalTranslator::new();
    let out = translator.translate(&lattice, "");

    assert_eq!(out.signals, SignalScores::zeroed());
    assert_eq!(out.primary, Signal::VentEnergy, "ties go to the first signal");
    assert_eq!(out.nudge, None);
    assert!(out.emotional_context.top_nodes.is_empty());
    assert_eq!(out.emotional_context.value_average, 0.0);
    assert!(!out.is_actionable(0.1));
}

// ─── test 3: strong bleed event ──────────────────────────────────────────────

#[test]
fn test_rage_calm_bleed_event_boosts_vent() {
    let view = FixedView {
        nodes: Vec::new(),
        events: vec![BleedEvent::new("rage", "calm", 0.8, BleedKind::Opposite)],
    };
    let mut translator = SignalTranslator::new();
    let out = translator.translate(&view, "");
    assert!(
        (out.signals[Signal::VentEnergy] - 1.04).abs() < 1e-5,
        "vent={}",
        out.signals[Signal::VentEnergy]
    );
    assert_eq!(out.primary, Signal::VentEnergy);
}

// ─── test 4: trend ───────────────────────────────────────────────────────────

/// Two snapshots averaging 0.75 then 0.25 spike `reflect_need` on the third call.
#[test]
fn test_falling_average_spikes_reflection() {
    let mut translator = SignalTranslator::new();
    translator.translate(&FixedView::uniform(0.75), "");
    translator.translate(&FixedView::uniform(0.25), "");

    let out = translator.translate(&FixedView::uniform(0.25), "why");
    assert_eq!(out.trend.spike, Some(1.6));
    assert!((out.trend.multiplier(Signal::ReflectNeed) - 1.6 * 1.4).abs() < 1e-5);
    assert!((out.signals[Signal::ReflectNeed] - 1.2 * 1.6 * 1.4).abs() < 1e-4);
    assert_eq!(out.primary, Signal::ReflectNeed);
    assert_eq!(out.nudge, Some(Nudge::SpikeReflection));
}

/// A steady rise with no vector movement boosts pinning, but a multiplier of
/// exactly 1.4 does not exceed the spark cutoff.
#[test]
fn test_rising_average_boosts_pin_without_nudge() {
    let mut translator = SignalTranslator::new();
    translator.translate(&FixedView::uniform(0.3), "");
    translator.translate(&FixedView::uniform(0.5), "");

    let out = translator.translate(&FixedView::uniform(0.5), "keep this idea");
    assert_eq!(out.trend.spike, None);
    assert!((out.trend.multiplier(Signal::PinSpark) - 1.4).abs() < 1e-6);
    assert!((out.trend.multiplier(Signal::ProjectForward) - 1.3).abs() < 1e-6);
    assert_eq!(out.primary, Signal::PinSpark);
    assert_eq!(out.nudge, None);
}

/// With the cutoff below the converging multiplier the same rise suggests a pin.
#[test]
fn test_spark_nudge_fires_above_cutoff() {
    let config = TranslatorConfig {
        spark_nudge_above: 1.35,
        ..TranslatorConfig::default()
    };
    let mut translator: SignalTranslator = SignalTranslator::with_config(config);
    translator.translate(&FixedView::uniform(0.3), "");
    translator.translate(&FixedView::uniform(0.5), "");

    let out = translator.translate(&FixedView::uniform(0.5), "keep this idea");
    assert!(out.trend.multiplier(Signal::PinSpark) > 1.35);
    assert_eq!(out.nudge, Some(Nudge::SparkRising));
}

/// The trend looks at the two entries before the current call, not including it.
#[test]
fn test_trend_excludes_current_snapshot() {
    let mut translator = SignalTranslator::new();
    translator.translate(&FixedView::uniform(0.4), "");
    translator.translate(&FixedView::uniform(0.4), "");
    let out = translator.translate(&FixedView::uniform(0.95), "");
    assert_eq!(out.trend.spike, None);
    assert_eq!(out.nudge, None);
}

// ─── test 5: history window ──────────────────────────────────────────────────

#[test]
fn test_history_holds_last_five() {
    let mut translator = SignalTranslator::new();
    for i in 0..8 {
        translator.translate(&FixedView::uniform(i as f32 / 10.0), "");
    }
    assert_eq!(translator.history_len(), 5);
    let averages: Vec<f32> = translator
        .history()
        .map(|e| e.snapshot.value_average)
        .collect();
    assert!((averages[0] - 0.3).abs() < 1e-6, "oldest kept is the 4th call");
    assert!((averages[4] - 0.7).abs() < 1e-6);
}

// ─── test 6: read-only ───────────────────────────────────────────────────────

#[test]
fn test_translate_never_mutates_lattice() {
    let mut lattice = Lattice::new();
    lattice.process_input("hope and joy and a spark of an idea");
    lattice.add_node("rage", 0.9);
    let before = fingerprint(&lattice);
    let pairs_before: Vec<(String, String)> = lattice
        .opposite_pairs()
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    let turn = lattice.turn();

    let mut translator = SignalTranslator::new();
    for _ in 0..4 {
        translator.translate(&lattice, "remember this, plan the next step");
    }

    assert_eq!(fingerprint(&lattice), before);
    let pairs_after: Vec<(String, String)> = lattice
        .opposite_pairs()
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    assert_eq!(pairs_after, pairs_before);
    assert_eq!(lattice.turn(), turn);
}

// ─── test 7: determinism ─────────────────────────────────────────────────────

#[test]
fn test_identical_runs_give_identical_translations() {
    let run = || {
        let mut lattice = Lattice::new();
        let mut translator = SignalTranslator::new();
        let mut outs = Vec::new();
        for text in ["so much doubt today", "a spark of joy", "I need to vent, gutted"] {
            lattice.process_input(text);
            lattice.propagate_bleed();
            lattice.tidal_cycle();
            outs.push(translator.translate(&lattice, text));
        }
        outs
    };
    assert_eq!(run(), run());
}
