/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Read-only lattice views and the point-in-time snapshot built from them.
//!
//! The translator never touches a [`Lattice`] directly; it reads through
//! [`LatticeView`]. Anything that can list node values and bleed events can
//! drive signal translation.

use crate::bleed::BleedEvent;
use crate::config::TranslatorConfig;
use crate::lattice::Lattice;
use crate::similarity::Similarity;

/// Dimension of vector-valued node statistics.
pub const VECTOR_DIM: usize = 3;

/// Read accessors sufficient to build a [`SignalSnapshot`].
pub trait LatticeView {
    /// Every node as `(name, value)`.
    fn node_values(&self) -> Vec<(&str, f32)>;

    /// Bleed events strictly above `threshold`, strongest first.
    fn bleed_events_above(&self, threshold: f32) -> Vec<BleedEvent>;

    /// Mean of vector-valued node attributes, if the view has any.
    fn vector_average(&self) -> Option<[f32; VECTOR_DIM]> {
        None
    }

    /// Conversational turn the view belongs to.
    fn turn(&self) -> u64 {
        0
    }
}

impl<S: Similarity> LatticeView for Lattice<S> {
    fn node_values(&self) -> Vec<(&str, f32)> {
        self.iter().map(|(name, node)| (name, node.value)).collect()
    }

    fn bleed_events_above(&self, threshold: f32) -> Vec<BleedEvent> {
        self.bleed_events(threshold)
    }

    fn turn(&self) -> u64 {
        self.turn
    }
}

/// Immutable point-in-time read of a lattice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSnapshot {
    /// Up to `top_k` nodes at or above `top_floor`, highest first (ties by name).
    pub top_nodes: Vec<(String, f32)>,
    /// Bleed events above `bleed_floor`.
    pub bleed_events: Vec<BleedEvent>,
    /// Mean value across all nodes; 0.0 for an empty view.
    pub value_average: f32,
    /// Mean vector attribute; zero when the view has none.
    pub vector_average: [f32; VECTOR_DIM],
}

impl SignalSnapshot {
    /// Snapshot with no nodes, no events and zeroed statistics.
    pub fn empty() -> Self {
        Self {
            top_nodes: Vec::new(),
            bleed_events: Vec::new(),
            value_average: 0.0,
            vector_average: [0.0; VECTOR_DIM],
        }
    }

    /// Read `view` under `config`.
    pub fn capture<L: LatticeView + ?Sized>(view: &L, config: &TranslatorConfig) -> Self {
        let values = view.node_values();
        let value_average = if values.is_empty() {
            0.0
        } else {
            values.iter().map(|(_, v)| v).sum::<f32>() / values.len() as f32
        };

        let mut top: Vec<(&str, f32)> = values
            .into_iter()
            .filter(|(_, v)| *v >= config.top_floor)
            .collect();
        top.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        top.truncate(config.top_k);

        Self {
            top_nodes: top.into_iter().map(|(n, v)| (n.to_owned(), v)).collect(),
            bleed_events: view.bleed_events_above(config.bleed_floor),
            value_average,
            vector_average: view.vector_average().unwrap_or([0.0; VECTOR_DIM]),
        }
    }

    /// Euclidean distance between the vector averages of two snapshots.
    pub fn vector_distance(&self, other: &Self) -> f32 {
        self.vector_average
            .iter()
            .zip(other.vector_average.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt()
    }
}

impl Default for SignalSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
