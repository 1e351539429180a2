/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Lattice-first intent translation.
//!
//! [`SignalTranslator::translate`] turns a lattice view plus raw text into the
//! five intent scores, a primary signal and an optional nudge:
//!
//! ```text
//! view ──capture──► SignalSnapshot ──► emotional boosts ─┐
//! text ───────────────────────────────► language boosts ─┼─► (emo + lang) × trend ─► primary, nudge
//! history[-2], history[-1] ───────────► trend multipliers ┘
//! ```
//!
//! The translator never mutates the lattice. Its only state is a bounded FIFO
//! of recent snapshots (`H` entries, default [`DEFAULT_HISTORY_WINDOW`]).
//!
//! # Invariants
//!
//! - Deterministic: identical view, history and text give identical output.
//! - Trend multipliers stay at 1.0 until two history entries exist.
//! - The trend is read *before* the current snapshot joins the history.

use heapless::Deque;

use crate::config::TranslatorConfig;
use crate::patterns::{any_marker, LANGUAGE_CUES, PATTERN_WEIGHTS, REFLECT_BLEED_MARKERS, VENT_BLEED_MARKERS};
use crate::signal::{Nudge, Signal, SignalScores};
use crate::snapshot::{LatticeView, SignalSnapshot};

/// Rolling history length used when none is given.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

/// `reflect_need` factor on a downward spike.
const SPIKE_DOWN: f32 = 1.6;
/// `reflect_need` factor on an upward spike.
const SPIKE_UP: f32 = 1.2;
/// Converging and intensifying.
const CONVERGE_PIN: f32 = 1.4;
const CONVERGE_PROJECT: f32 = 1.3;
/// Diverging or declining.
const DIVERGE_REFLECT: f32 = 1.4;
const DIVERGE_LEARN: f32 = 1.5;

// ─── TrendAdjustment ────────────────────────────────────────────────────────

/// Per-signal multipliers derived from the two most recent snapshots.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendAdjustment {
    /// One multiplier per signal (1.0 = no adjustment).
    pub multipliers: SignalScores,
    /// Distance between the two vector averages.
    pub vector_distance: f32,
    /// `current.value_average − previous.value_average`.
    pub value_delta: f32,
    /// The `reflect_need` spike factor, when the value delta spiked.
    ///
    /// This is 1.6 for a fall and 1.2 for a rise, before any converge/diverge
    /// factor. A drop of 0.5 reads `Some(1.6)` here even though the
    /// `reflect_need` multiplier is 1.6 × 1.4 once the decline branch applies.
    pub spike: Option<f32>,
}

impl TrendAdjustment {
    /// All multipliers at 1.0.
    pub fn neutral() -> Self {
        Self {
            multipliers: SignalScores::filled(1.0),
            vector_distance: 0.0,
            value_delta: 0.0,
            spike: None,
        }
    }

    /// Compare `previous` with `current`.
    ///
    /// - `|value_delta|` above `spike_threshold` scales `reflect_need` by 1.6
    ///   (falling) or 1.2 (rising).
    /// - Converging and intensifying (small distance, rising value) scales
    ///   `pin_spark` ×1.4 and `project_forward` ×1.3; otherwise diverging or
    ///   declining scales `reflect_need` ×1.4 and `learn_clarity` ×1.5.
    ///
    /// The spike applies independently of the converge/diverge branch.
    pub fn between(previous: &SignalSnapshot, current: &SignalSnapshot, config: &TranslatorConfig) -> Self {
        let vector_distance = previous.vector_distance(current);
        let value_delta = current.value_average - previous.value_average;
        let mut multipliers = SignalScores::filled(1.0);

        let spike = (value_delta.abs() > config.spike_threshold)
            .then(|| if value_delta < 0.0 { SPIKE_DOWN } else { SPIKE_UP });
        if let Some(factor) = spike {
            multipliers.scale(Signal::ReflectNeed, factor);
        }

        if vector_distance < config.converge_distance && value_delta > config.converge_delta {
            multipliers.scale(Signal::PinSpark, CONVERGE_PIN);
            multipliers.scale(Signal::ProjectForward, CONVERGE_PROJECT);
        } else if vector_distance > config.diverge_distance || value_delta < config.diverge_delta {
            multipliers.scale(Signal::ReflectNeed, DIVERGE_REFLECT);
            multipliers.scale(Signal::LearnClarity, DIVERGE_LEARN);
        }

        Self {
            multipliers,
            vector_distance,
            value_delta,
            spike,
        }
    }

    /// Multiplier for `signal`.
    pub fn multiplier(&self, signal: Signal) -> f32 {
        self.multipliers[signal]
    }

    /// The nudge these multipliers call for, if any. Spike beats spark.
    pub fn nudge(&self, config: &TranslatorConfig) -> Option<Nudge> {
        if self.multiplier(Signal::ReflectNeed) > config.reflect_nudge_above {
            Some(Nudge::SpikeReflection)
        } else if self.multiplier(Signal::PinSpark) > config.spark_nudge_above {
            Some(Nudge::SparkRising)
        } else {
            None
        }
    }
}

impl Default for TrendAdjustment {
    fn default() -> Self {
        Self::neutral()
    }
}

// ─── Translation ────────────────────────────────────────────────────────────

/// Everything one [`SignalTranslator::translate`] call produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Translation {
    /// Final per-signal scores.
    pub signals: SignalScores,
    /// Highest-scoring signal (first in vocabulary order on ties).
    pub primary: Signal,
    /// Optional prompt for the user.
    pub nudge: Option<Nudge>,
    /// The snapshot the scores were derived from.
    pub emotional_context: SignalSnapshot,
    /// Trend multipliers that were applied.
    pub trend: TrendAdjustment,
}

impl Translation {
    /// Score of the primary signal.
    pub fn strength(&self) -> f32 {
        self.signals[self.primary]
    }

    /// Whether the primary signal reaches a router's action threshold.
    ///
    /// A `false` here is the "signal too weak" condition; the router decides
    /// what to do about it.
    pub fn is_actionable(&self, threshold: f32) -> bool {
        self.strength() >= threshold
    }
}

// ─── Scoring ────────────────────────────────────────────────────────────────

/// Boosts from top node names and strong bleed events.
pub fn emotional_signals(snapshot: &SignalSnapshot, config: &TranslatorConfig) -> SignalScores {
    let mut signals = SignalScores::zeroed();

    for (node, value) in &snapshot.top_nodes {
        let name = node.to_lowercase();
        for (pattern, boosts) in PATTERN_WEIGHTS {
            if name.contains(pattern) {
                for &(signal, weight) in *boosts {
                    signals.add(signal, value * weight);
                }
            }
        }
    }

    for event in &snapshot.bleed_events {
        if event.strength <= config.bleed_boost_min {
            continue;
        }
        let joined = event.joined_name();
        let boost = event.strength * config.bleed_boost_scale;
        if any_marker(&joined, VENT_BLEED_MARKERS) {
            signals.add(Signal::VentEnergy, boost);
        }
        if any_marker(&joined, REFLECT_BLEED_MARKERS) {
            signals.add(Signal::ReflectNeed, boost);
        }
    }

    signals
}

/// Fixed bumps from keyword cues in the raw text.
pub fn language_signals(text: &str) -> SignalScores {
    let lowered = text.to_lowercase();
    let mut signals = SignalScores::zeroed();
    for cue in LANGUAGE_CUES {
        if any_marker(&lowered, cue.keywords) {
            signals.add(cue.signal, cue.bump);
        }
    }
    signals
}

// ─── SignalTranslator ───────────────────────────────────────────────────────

/// One rolling-history entry.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    /// Turn reported by the view at capture time.
    pub turn: u64,
    /// The snapshot captured.
    pub snapshot: SignalSnapshot,
}

/// Lattice view + text → intent signals, with an `H`-entry rolling history.
pub struct SignalTranslator<const H: usize = DEFAULT_HISTORY_WINDOW> {
    config: TranslatorConfig,
    history: Deque<HistoryEntry, H>,
}

impl SignalTranslator {
    /// Default configuration and history window.
    pub fn new() -> Self {
        Self::with_config(TranslatorConfig::default())
    }
}

impl Default for SignalTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl<const H: usize> SignalTranslator<H> {
    /// Translator with `config` and an empty history.
    pub fn with_config(config: TranslatorConfig) -> Self {
        Self {
            config,
            history: Deque::new(),
        }
    }

    /// Score `text` against a fresh snapshot of `view`.
    pub fn translate<L: LatticeView + ?Sized>(&mut self, view: &L, text: &str) -> Translation {
        let snapshot = SignalSnapshot::capture(view, &self.config);
        let emotional = emotional_signals(&snapshot, &self.config);
        let language = language_signals(text);
        let trend = self.trend();

        let signals = emotional.combine(&language, &trend.multipliers);
        let primary = signals.primary();
        let nudge = trend.nudge(&self.config);

        tracing::trace!(
            primary = primary.name(),
            strength = signals[primary],
            nudge = nudge.map(Nudge::message),
            "translated input"
        );

        self.remember(HistoryEntry {
            turn: view.turn(),
            snapshot: snapshot.clone(),
        });

        Translation {
            signals,
            primary,
            nudge,
            emotional_context: snapshot,
            trend,
        }
    }

    /// Trend over the two most recent history entries; neutral with fewer.
    pub fn trend(&self) -> TrendAdjustment {
        let len = self.history.len();
        if len < 2 {
            return TrendAdjustment::neutral();
        }
        let mut recent = self.history.iter().skip(len - 2);
        match (recent.next(), recent.next()) {
            (Some(prev), Some(curr)) => {
                TrendAdjustment::between(&prev.snapshot, &curr.snapshot, &self.config)
            }
            _ => TrendAdjustment::neutral(),
        }
    }

    fn remember(&mut self, entry: HistoryEntry) {
        if H == 0 {
            return;
        }
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.history.push_back(entry);
    }

    /// History entries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    /// Number of history entries held.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Forget all history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The active configuration.
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }
}

impl<const H: usize> core::fmt::Debug for SignalTranslator<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignalTranslator")
            .field("window", &H)
            .field("history_len", &self.history.len())
            .finish()
    }
}
