/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! The fixed intent-signal vocabulary and per-signal score vectors.
//!
//! - [`Signal`]: exactly five intent categories, in a fixed order.
//! - [`SignalScores`]: one `f32` per signal, always fully populated.
//! - [`Nudge`]: the optional one-line prompt a translation may carry.
//!
//! # Invariants
//!
//! - Every score vector holds all five signals (default 0.0).
//! - [`SignalScores::primary`] breaks ties by vocabulary order: first seen wins.

use core::ops::{Index, IndexMut};

// ─── Signal ─────────────────────────────────────────────────────────────────

/// Intent categories an external router acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Signal {
    /// Raw energy that wants out.
    VentEnergy,
    /// Doubt or spike that calls for reflection.
    ReflectNeed,
    /// Something worth pinning and keeping.
    PinSpark,
    /// A wish to understand or clarify.
    LearnClarity,
    /// Forward planning and evolution.
    ProjectForward,
}

impl Signal {
    /// The vocabulary in its fixed order.
    pub const ALL: [Signal; 5] = [
        Signal::VentEnergy,
        Signal::ReflectNeed,
        Signal::PinSpark,
        Signal::LearnClarity,
        Signal::ProjectForward,
    ];

    /// Position in [`Signal::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name, e.g. `"vent_energy"`.
    pub const fn name(self) -> &'static str {
        match self {
            Signal::VentEnergy => "vent_energy",
            Signal::ReflectNeed => "reflect_need",
            Signal::PinSpark => "pin_spark",
            Signal::LearnClarity => "learn_clarity",
            Signal::ProjectForward => "project_forward",
        }
    }

    /// Inverse of [`Signal::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl core::fmt::Display for Signal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── SignalScores ───────────────────────────────────────────────────────────

/// One score per [`Signal`], indexed by signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalScores([f32; 5]);

impl SignalScores {
    /// All scores at 0.0.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// All scores at `value`.
    pub fn filled(value: f32) -> Self {
        Self([value; 5])
    }

    /// Score for `signal`.
    pub fn get(&self, signal: Signal) -> f32 {
        self.0[signal.index()]
    }

    /// Add `amount` to `signal`.
    pub fn add(&mut self, signal: Signal, amount: f32) {
        self.0[signal.index()] += amount;
    }

    /// Multiply `signal` by `factor`.
    pub fn scale(&mut self, signal: Signal, factor: f32) {
        self.0[signal.index()] *= factor;
    }

    /// `(self + other) × weights`, per signal.
    pub fn combine(&self, other: &Self, weights: &Self) -> Self {
        let mut out = Self::zeroed();
        for s in Signal::ALL {
            out[s] = (self[s] + other[s]) * weights[s];
        }
        out
    }

    /// The highest-scoring signal; ties go to the earliest in [`Signal::ALL`].
    pub fn primary(&self) -> Signal {
        let mut best = Signal::ALL[0];
        for s in Signal::ALL {
            if self[s] > self[best] {
                best = s;
            }
        }
        best
    }

    /// `(signal, score)` in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, f32)> + '_ {
        Signal::ALL.into_iter().map(move |s| (s, self[s]))
    }
}

impl Index<Signal> for SignalScores {
    type Output = f32;

    fn index(&self, signal: Signal) -> &f32 {
        &self.0[signal.index()]
    }
}

impl IndexMut<Signal> for SignalScores {
    fn index_mut(&mut self, signal: Signal) -> &mut f32 {
        &mut self.0[signal.index()]
    }
}

// ─── Nudge ──────────────────────────────────────────────────────────────────

/// Optional prompt attached to a translation. At most one per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nudge {
    /// `reflect_need` trend spiked.
    SpikeReflection,
    /// `pin_spark` trend is rising.
    SparkRising,
}

impl Nudge {
    /// Text shown to the user.
    pub const fn message(self) -> &'static str {
        match self {
            Nudge::SpikeReflection => "emotional spike detected: reflection? vent or clarify?",
            Nudge::SparkRising => "spark rising: pin this?",
        }
    }
}

impl core::fmt::Display for Nudge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
