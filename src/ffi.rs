/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Python FFI bindings via PyO3.
//!
//! Exposes the lattice and the signal translator with the default
//! configuration and [`SequenceRatio`](crate::similarity::SequenceRatio)
//! matching. For custom similarity functions, use the Rust API directly.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from tidal_lattice import Lattice, SignalTranslator
//!
//! lattice = Lattice()
//! translator = SignalTranslator()
//!
//! text = "I am so angry and frustrated, need to vent"
//! lattice.process_input(text)
//! lattice.propagate_bleed()
//! lattice.tidal_cycle()
//!
//! out = translator.translate(lattice, text)
//! print(out.primary)   # "vent_energy"
//! print(out.signals)   # {"vent_energy": ..., "reflect_need": ..., ...}
//! print(out.nudge)     # None or a one-line prompt
//! ```

use std::collections::HashMap;

use pyo3::prelude::*;

use crate::config::LatticeConfig;
use crate::lattice::Lattice;
use crate::translator::{SignalTranslator, Translation};

// ── Lattice ──────────────────────────────────────────────────────────────────

/// Emotional lattice: bounded node values, bleed edges, opposite pairs, tidal decay.
#[pyclass(name = "Lattice")]
pub struct PyLattice {
    inner: Lattice,
}

#[pymethods]
impl PyLattice {
    /// Create a lattice seeded with the standard opposite pairs.
    ///
    /// Args:
    ///     seeded: set False for an empty lattice (default True)
    #[new]
    #[pyo3(signature = (seeded=true))]
    pub fn new(seeded: bool) -> Self {
        let inner = if seeded {
            Lattice::new()
        } else {
            Lattice::empty(LatticeConfig::default())
        };
        Self { inner }
    }

    /// Boost, spawn and blend nodes from free text. Returns boosted node names.
    pub fn process_input(&mut self, text: &str) -> Vec<String> {
        self.inner.process_input(text).into_iter().collect()
    }

    /// Leak values along bleed edges. Returns the number of nodes updated.
    pub fn propagate_bleed(&mut self) -> usize {
        self.inner.propagate_bleed()
    }

    /// Advance the tidal clock.
    ///
    /// Returns None on idle calls, else (call, decayed, nudged, pruned_names).
    pub fn tidal_cycle(&mut self) -> Option<(u64, usize, usize, Vec<String>)> {
        self.inner
            .tidal_cycle()
            .map(|o| (o.call, o.decayed, o.nudged, o.pruned))
    }

    /// Largest value gap across present opposite pairs.
    pub fn get_bleed_score(&self) -> f32 {
        self.inner.get_bleed_score()
    }

    /// (node_count, active_count, bleed_score).
    pub fn summary(&self) -> (usize, usize, f32) {
        let s = self.inner.summary();
        (s.node_count, s.active_count, s.bleed_score)
    }

    /// Enable or disable full (uncapped, no pruning) mode.
    pub fn toggle_full_mode(&mut self, enable: bool) {
        self.inner.toggle_full_mode(enable);
    }

    /// Add a node at `value` (clamped to [0.0, 1.0]).
    ///
    /// Returns False if it exists or the cap is reached.
    pub fn add_node(&mut self, name: &str, value: f32) -> bool {
        self.inner.add_node(name, value)
    }

    /// Add `delta` to a node, creating it if needed. Result is clamped;
    /// a non-finite delta is ignored.
    pub fn update_node(&mut self, name: &str, delta: f32) {
        self.inner.update_node(name, delta);
    }

    /// Add a directed bleed edge, rate clamped. Returns False if either node is missing.
    pub fn add_bleed_edge(&mut self, source: &str, target: &str, rate: f32) -> bool {
        self.inner.add_bleed_edge(source, target, rate)
    }

    /// Pair two names as opposites.
    pub fn add_opposite_pair(&mut self, a: &str, b: &str) -> bool {
        self.inner.add_opposite_pair(a, b)
    }

    /// Current value of a node, or None.
    pub fn node_value(&self, name: &str) -> Option<f32> {
        self.inner.node_value(name)
    }

    /// Python len(): number of nodes.
    pub fn __len__(&self) -> usize {
        self.inner.node_count()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        self.inner.summary().to_string()
    }
}

// ── Translation ──────────────────────────────────────────────────────────────

/// Result of one translate() call.
#[pyclass(name = "Translation")]
#[derive(Clone)]
pub struct PyTranslation {
    /// Signal name → score.
    #[pyo3(get)]
    pub signals: HashMap<String, f32>,
    /// Name of the highest-scoring signal.
    #[pyo3(get)]
    pub primary: String,
    /// Score of the primary signal.
    #[pyo3(get)]
    pub strength: f32,
    /// Optional one-line prompt.
    #[pyo3(get)]
    pub nudge: Option<String>,
}

impl From<&Translation> for PyTranslation {
    fn from(t: &Translation) -> Self {
        Self {
            signals: t
                .signals
                .iter()
                .map(|(s, v)| (s.name().to_owned(), v))
                .collect(),
            primary: t.primary.name().to_owned(),
            strength: t.strength(),
            nudge: t.nudge.map(|n| n.message().to_owned()),
        }
    }
}

#[pymethods]
impl PyTranslation {
    /// Whether the primary signal reaches `threshold`.
    pub fn is_actionable(&self, threshold: f32) -> bool {
        self.strength >= threshold
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Translation(primary={}, strength={:.2}, nudge={:?})",
            self.primary, self.strength, self.nudge
        )
    }
}

// ── SignalTranslator ─────────────────────────────────────────────────────────

/// Lattice + text → intent signals, with a five-entry rolling history.
#[pyclass(name = "SignalTranslator")]
pub struct PySignalTranslator {
    inner: SignalTranslator,
}

#[pymethods]
impl PySignalTranslator {
    /// Create a translator with default thresholds and an empty history.
    #[new]
    pub fn new() -> Self {
        Self {
            inner: SignalTranslator::new(),
        }
    }

    /// Score `text` against the current state of `lattice`. Never mutates the lattice.
    pub fn translate(&mut self, lattice: &PyLattice, text: &str) -> PyTranslation {
        PyTranslation::from(&self.inner.translate(&lattice.inner, text))
    }

    /// Number of snapshots held in the rolling history.
    pub fn history_len(&self) -> usize {
        self.inner.history_len()
    }

    /// Forget the rolling history.
    pub fn clear_history(&mut self) {
        self.inner.clear_history();
    }
}

// ── Module ───────────────────────────────────────────────────────────────────

/// Python module entry point.
#[pymodule]
pub fn tidal_lattice(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLattice>()?;
    m.add_class::<PyTranslation>()?;
    m.add_class::<PySignalTranslator>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add(
        "SIGNALS",
        crate::signal::Signal::ALL.map(|s| s.name()).to_vec(),
    )?;
    Ok(())
}
