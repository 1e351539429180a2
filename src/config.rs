/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Tunable constants for the lattice and the signal translator.
//!
//! Several incompatible variants of these numbers circulated; the defaults
//! below are the authoritative set. Override individual fields with struct
//! update syntax:
//!
//! ```rust
//! use tidal_lattice::config::LatticeConfig;
//!
//! let slow_decay = LatticeConfig { damping: 1.5, ..LatticeConfig::default() };
//! assert_eq!(slow_decay.tidal_cadence, 3);
//! ```

// ─── LatticeConfig ──────────────────────────────────────────────────────────

/// Growth, decay and pruning constants for [`crate::lattice::Lattice`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeConfig {
    /// Node cap in normal (compressed) mode.
    pub max_nodes_sim: usize,
    /// Advisory node cap reported in full mode. Full mode never refuses nodes.
    pub max_nodes_full: usize,
    /// An update whose `|delta|` exceeds this resets the node's decay counter.
    pub meaningful_change: f32,
    /// Boost for nodes named (whole word) in the input, or containing a token.
    pub input_boost: f32,
    /// Boost for the best fuzzy match of a token.
    pub fuzzy_boost: f32,
    /// Minimum similarity (inclusive) for a token to resolve to a node.
    pub fuzzy_cutoff: f32,
    /// Initial value of a node spawned from an unresolved token.
    pub spawn_value: f32,
    /// Boosted nodes strictly above this value are blended pairwise.
    pub blend_threshold: f32,
    /// Blend value = mean of the two source values × this factor.
    pub blend_scale: f32,
    /// Bleed rate of the edges from each source into its blend node.
    pub blend_edge_rate: f32,
    /// Rate used by [`crate::lattice::Lattice::add_default_bleed_edge`].
    pub default_bleed_rate: f32,
    /// Only every `tidal_cadence`-th call to `tidal_cycle` does any work.
    pub tidal_cadence: u64,
    /// Nodes strictly below this value decay on a working tidal call.
    pub low_value_threshold: f32,
    /// Divisor applied to decaying nodes (must be > 1).
    pub damping: f32,
    /// Opposite nudge: `opposite += opposite_nudge × (1 − value)`.
    pub opposite_nudge: f32,
    /// Nodes whose decay counter exceeds this are pruned (outside full mode).
    pub prune_limit: u32,
    /// Nodes strictly above this value count as active in the summary.
    pub active_threshold: f32,
}

impl LatticeConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            max_nodes_sim: 100,
            max_nodes_full: 500,
            meaningful_change: 0.05,
            input_boost: 0.2,
            fuzzy_boost: 0.15,
            fuzzy_cutoff: 0.7,
            spawn_value: 0.3,
            blend_threshold: 0.5,
            blend_scale: 1.2,
            blend_edge_rate: 0.1,
            default_bleed_rate: 0.1,
            tidal_cadence: 3,
            low_value_threshold: 0.15,
            damping: 2.2,
            opposite_nudge: 0.09,
            prune_limit: 6,
            active_threshold: 0.1,
        }
    }
}

// ─── TranslatorConfig ───────────────────────────────────────────────────────

/// Snapshot, boost and trend constants for [`crate::translator::SignalTranslator`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranslatorConfig {
    /// Maximum number of top nodes in a snapshot.
    pub top_k: usize,
    /// Minimum value (inclusive) for a node to appear among the top nodes.
    pub top_floor: f32,
    /// Bleed events must be strictly stronger than this to enter a snapshot.
    pub bleed_floor: f32,
    /// Bleed events strictly stronger than this boost signals.
    pub bleed_boost_min: f32,
    /// Signal boost per unit of bleed strength.
    pub bleed_boost_scale: f32,
    /// `|value_delta|` strictly above this counts as a spike.
    pub spike_threshold: f32,
    /// Vector distance strictly below this (with a rising value) means converging.
    pub converge_distance: f32,
    /// Value delta strictly above this (with a small distance) means intensifying.
    pub converge_delta: f32,
    /// Vector distance strictly above this means diverging.
    pub diverge_distance: f32,
    /// Value delta strictly below this means declining.
    pub diverge_delta: f32,
    /// `reflect_need` multiplier strictly above this emits the spike nudge.
    pub reflect_nudge_above: f32,
    /// `pin_spark` multiplier strictly above this emits the spark nudge.
    pub spark_nudge_above: f32,
}

impl TranslatorConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            top_k: 7,
            top_floor: 0.35,
            bleed_floor: 0.5,
            bleed_boost_min: 0.6,
            bleed_boost_scale: 1.3,
            spike_threshold: 0.4,
            converge_distance: 0.5,
            converge_delta: 0.1,
            diverge_distance: 0.8,
            diverge_delta: -0.1,
            reflect_nudge_above: 1.5,
            spark_nudge_above: 1.4,
        }
    }
}
