/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! The emotional lattice: a bounded, decaying, self-extending weighted graph.
//!
//! - [`Node`]: a named charge in [0.0, 1.0] with a decay counter and outgoing bleed edges.
//! - [`Lattice`]: node map, opposite-pair relation, growth from text, bleed propagation
//!   and the tidal aging cycle.
//! - [`LatticeSummary`]: read-only diagnostic (node count, active count, bleed score).
//!
//! # Invariants
//!
//! - **Bounded values**: every node value stays in [0.0, 1.0] after any mutation.
//! - **Advisory cap**: node count never exceeds `max_nodes_sim` outside full mode.
//! - **Symmetric opposites**: if `opposite(a) == Some(b)` then `opposite(b) == Some(a)`.
//! - **Tidal cadence**: decay, opposite nudging and pruning happen only on every
//!   `tidal_cadence`-th call to [`Lattice::tidal_cycle`].
//! - **Batch bleed**: one [`Lattice::propagate_bleed`] pass reads pre-pass values only.
//!
//! All mutating methods take `&mut self`, so a host sharing a lattice across threads
//! must serialise them (for example behind a single-writer lock).

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashMap;

use crate::config::LatticeConfig;
use crate::similarity::{contains_word, tokenize, SequenceRatio, Similarity};

/// Opposite pairs seeded into every new lattice, applied in order.
///
/// `courage/fear` re-pairs `fear`, which unlinks `anger`.
pub const SEED_OPPOSITES: [(&str, &str); 15] = [
    ("joy", "sadness"),
    ("trust", "disgust"),
    ("fear", "anger"),
    ("surprise", "anticipation"),
    ("calm", "frustr"),
    ("relief", "ache"),
    ("spark", "despair"),
    ("meaning", "void"),
    ("courage", "fear"),
    ("hope", "dread"),
    ("pride", "shame"),
    ("excitement", "boredom"),
    ("satisfaction", "frustration"),
    ("acceptance", "rejection"),
    ("interest", "apathy"),
];

/// Clamp into [0.0, 1.0], mapping NaN to 0.0.
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Whether `a`/`b` is one of [`SEED_OPPOSITES`], in either orientation.
pub(crate) fn is_seed_pair(a: &str, b: &str) -> bool {
    SEED_OPPOSITES
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Normalised node key: trimmed and lowercased.
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// ─── Node ───────────────────────────────────────────────────────────────────

/// A named charge in the lattice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Accumulated charge [0.0, 1.0].
    pub value: f32,
    /// Working tidal passes spent below the low-value threshold.
    /// Reset by any meaningful update.
    pub decay_counter: u32,
    /// Outgoing bleed edges: target name → rate [0.0, 1.0].
    pub edges: BTreeMap<String, f32>,
}

impl Node {
    /// Construct a node at `initial` (clamped) with no edges.
    pub fn new(initial: f32) -> Self {
        Self {
            value: clamp_unit(initial),
            decay_counter: 0,
            edges: BTreeMap::new(),
        }
    }
}

// ─── Summaries ──────────────────────────────────────────────────────────────

/// Read-only diagnostic returned by [`Lattice::summary`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeSummary {
    /// Total nodes.
    pub node_count: usize,
    /// Nodes above the active threshold.
    pub active_count: usize,
    /// Current [`Lattice::get_bleed_score`].
    pub bleed_score: f32,
}

impl core::fmt::Display for LatticeSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Lattice: {} nodes ({} active), bleed {:.2}",
            self.node_count, self.active_count, self.bleed_score
        )
    }
}

/// What a working tidal pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TidalOutcome {
    /// Raw call count at which this pass ran (a multiple of the cadence).
    pub call: u64,
    /// Nodes that were below the low-value threshold and decayed.
    pub decayed: usize,
    /// Opposite nodes that received a nudge.
    pub nudged: usize,
    /// Nodes removed by this pass, in name order.
    pub pruned: Vec<String>,
}

// ─── Lattice ────────────────────────────────────────────────────────────────

/// The emotional lattice.
///
/// Generic over the [`Similarity`] used to resolve input tokens against node
/// names; [`SequenceRatio`] by default. Nodes live in an ordered map so every
/// pass visits them in name order and the lattice is fully deterministic.
///
/// Seed opposite pairs outlive their nodes. Any other pair is released when a
/// pruning pass removes one of its members, and a pair added by
/// [`Lattice::detect_bleed`] is released when either node it was derived from
/// is pruned.
pub struct Lattice<S: Similarity = SequenceRatio> {
    pub(crate) config: LatticeConfig,
    pub(crate) nodes: BTreeMap<String, Node>,
    /// Stored in both directions.
    pub(crate) opposites: HashMap<String, String>,
    /// Pairs added by bleed detection: pair name → the two source nodes.
    pub(crate) derived: BTreeMap<String, (String, String)>,
    pub(crate) full_mode: bool,
    pub(crate) tidal_counter: u64,
    pub(crate) turn: u64,
    similarity: S,
}

impl Lattice {
    /// Default configuration, seeded opposites, [`SequenceRatio`] matching.
    pub fn new() -> Self {
        Self::with_config(LatticeConfig::default())
    }

    /// Seeded lattice with the given configuration.
    pub fn with_config(config: LatticeConfig) -> Self {
        Self::with_similarity(config, SequenceRatio)
    }

    /// Lattice with no nodes and no opposite pairs.
    pub fn empty(config: LatticeConfig) -> Self {
        Self::unseeded(config, SequenceRatio)
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Similarity> Lattice<S> {
    /// Seeded lattice with a custom similarity function.
    pub fn with_similarity(config: LatticeConfig, similarity: S) -> Self {
        let mut lattice = Self::unseeded(config, similarity);
        lattice.seed_opposites();
        lattice
    }

    /// Empty lattice with a custom similarity function.
    pub fn unseeded(config: LatticeConfig, similarity: S) -> Self {
        Self {
            config,
            nodes: BTreeMap::new(),
            opposites: HashMap::new(),
            derived: BTreeMap::new(),
            full_mode: false,
            tidal_counter: 0,
            turn: 0,
            similarity,
        }
    }

    fn seed_opposites(&mut self) {
        for (pos, neg) in SEED_OPPOSITES {
            self.add_node(pos, 0.0);
            self.add_node(neg, 0.0);
            self.add_opposite_pair(pos, neg);
        }
    }

    // ── Mode ───────────────────────────────────────────────────────────────

    /// Switch full (uncapped calibration) mode on or off.
    ///
    /// Full mode lifts the node cap and suppresses pruning. Turning it off
    /// does not restore anything pruned before, nor trim the excess.
    pub fn toggle_full_mode(&mut self, enable: bool) {
        if self.full_mode != enable {
            tracing::info!(enable, capacity = self.capacity_for(enable), "lattice full mode toggled");
        }
        self.full_mode = enable;
    }

    /// Whether full mode is active.
    pub fn is_full_mode(&self) -> bool {
        self.full_mode
    }

    /// The node cap for the current mode (advisory in full mode).
    pub fn capacity(&self) -> usize {
        self.capacity_for(self.full_mode)
    }

    fn capacity_for(&self, full: bool) -> usize {
        if full {
            self.config.max_nodes_full
        } else {
            self.config.max_nodes_sim
        }
    }

    // ── Node mutation ──────────────────────────────────────────────────────

    /// Create `name` at `initial_value` (clamped) if it does not exist.
    ///
    /// Returns `true` when a node was created. Existing names, empty names and
    /// a full lattice (outside full mode) are silent no-ops.
    pub fn add_node(&mut self, name: &str, initial_value: f32) -> bool {
        let key = normalize(name);
        if key.is_empty() || self.nodes.contains_key(&key) {
            return false;
        }
        if !self.full_mode && self.nodes.len() >= self.config.max_nodes_sim {
            return false;
        }
        self.nodes.insert(key, Node::new(initial_value));
        true
    }

    /// Add `delta` to `name`, creating it at 0.0 first if needed. Clamps to [0.0, 1.0].
    ///
    /// A change with `|delta|` above `meaningful_change` resets the decay counter.
    pub fn update_node(&mut self, name: &str, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let key = normalize(name);
        if !self.nodes.contains_key(&key) && !self.add_node(&key, 0.0) {
            return;
        }
        let meaningful = self.config.meaningful_change;
        if let Some(node) = self.nodes.get_mut(&key) {
            node.value = clamp_unit(node.value + delta);
            if delta.abs() > meaningful {
                node.decay_counter = 0;
            }
        }
    }

    /// Set the directed bleed edge `from → to` to `rate` (clamped).
    ///
    /// Returns `false` and changes nothing unless both nodes exist.
    pub fn add_bleed_edge(&mut self, from: &str, to: &str, rate: f32) -> bool {
        let (from, to) = (normalize(from), normalize(to));
        if !self.nodes.contains_key(&to) {
            return false;
        }
        match self.nodes.get_mut(&from) {
            Some(node) => {
                node.edges.insert(to, clamp_unit(rate));
                true
            }
            None => false,
        }
    }

    /// [`Lattice::add_bleed_edge`] at the configured default rate.
    pub fn add_default_bleed_edge(&mut self, from: &str, to: &str) -> bool {
        let rate = self.config.default_bleed_rate;
        self.add_bleed_edge(from, to, rate)
    }

    // ── Opposites ──────────────────────────────────────────────────────────

    /// Pair `a` and `b` as opposites, in both directions.
    ///
    /// A name already paired elsewhere is unlinked from its old partner first,
    /// keeping the relation symmetric. Nodes are not created.
    pub fn add_opposite_pair(&mut self, a: &str, b: &str) -> bool {
        let (a, b) = (normalize(a), normalize(b));
        if a.is_empty() || b.is_empty() || a == b {
            return false;
        }
        self.unlink_opposite(&a, &b);
        self.unlink_opposite(&b, &a);
        self.opposites.insert(a.clone(), b.clone());
        self.opposites.insert(b, a);
        true
    }

    /// Drop `name`'s current partner unless it is `keep`.
    fn unlink_opposite(&mut self, name: &str, keep: &str) {
        if let Some(old) = self.opposites.get(name).cloned() {
            if old != keep {
                self.opposites.remove(name);
                if self.opposites.get(&old).map(String::as_str) == Some(name) {
                    self.opposites.remove(&old);
                }
            }
        }
    }

    /// Remove `name` and its partner from the relation.
    fn remove_pair(&mut self, name: &str) {
        if let Some(partner) = self.opposites.remove(name) {
            if self.opposites.get(&partner).map(String::as_str) == Some(name) {
                self.opposites.remove(&partner);
            }
        }
    }

    /// Drop pairs that no longer describe anything after `pruned` left.
    fn release_opposites(&mut self, pruned: &[String]) {
        let gone = |n: &str| pruned.iter().any(|p| p == n);
        let mut stale: Vec<String> = self
            .derived
            .iter()
            .filter(|(_, (a, b))| gone(a) || gone(b))
            .map(|(pair, _)| pair.clone())
            .collect();
        for name in pruned {
            if let Some(partner) = self.opposites.get(name) {
                if !is_seed_pair(name, partner) {
                    stale.push(name.clone());
                }
            }
        }
        for name in &stale {
            self.remove_pair(name);
        }
        let opposites = &self.opposites;
        self.derived.retain(|pair, _| opposites.contains_key(pair));
        if !stale.is_empty() {
            tracing::debug!(released = ?stale, "opposite pairs released");
        }
    }

    /// The opposite of `name`, if paired.
    pub fn opposite(&self, name: &str) -> Option<&str> {
        self.opposites.get(&normalize(name)).map(String::as_str)
    }

    /// Every opposite pair once, as `(a, b)` with `a < b`, sorted.
    pub fn opposite_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .opposites
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    // ── Dynamics ───────────────────────────────────────────────────────────

    /// Leak `source.value × rate` along every edge, summed per target and
    /// applied once per target. Returns the number of targets updated.
    pub fn propagate_bleed(&mut self) -> usize {
        let mut leaks: HashMap<String, f32> = HashMap::new();
        for node in self.nodes.values() {
            for (target, rate) in &node.edges {
                *leaks.entry(target.clone()).or_insert(0.0) += node.value * rate;
            }
        }
        let touched = leaks.len();
        for (target, amount) in leaks {
            self.update_node(&target, amount);
        }
        touched
    }

    /// Grow the lattice from a line of text.
    ///
    /// 1. Every node named (whole word) in the text, or containing one of its
    ///    tokens, gains `input_boost`.
    /// 2. Every token resolves to its best fuzzy match (`fuzzy_boost`) or, if
    ///    nothing reaches `fuzzy_cutoff`, spawns a node at `spawn_value`.
    /// 3. Every pair of boosted nodes above `blend_threshold` gets a blend
    ///    node `"{a}-{b}"` fed by edges from both sources.
    ///
    /// Returns the boosted node names.
    pub fn process_input(&mut self, text: &str) -> BTreeSet<String> {
        let tokens = tokenize(text);
        let mut boosted = BTreeSet::new();

        let names: Vec<String> = self.nodes.keys().cloned().collect();
        for name in names {
            let named = contains_word(text, &name);
            if named || tokens.iter().any(|t| name.contains(t.as_str())) {
                self.update_node(&name, self.config.input_boost);
                boosted.insert(name);
            }
        }

        for token in &tokens {
            match self.best_match(token) {
                Some(name) => {
                    self.update_node(&name, self.config.fuzzy_boost);
                    boosted.insert(name);
                }
                None => {
                    if self.add_node(token, self.config.spawn_value) {
                        tracing::debug!(node = %token, "spawned node from input");
                        boosted.insert(token.clone());
                    }
                }
            }
        }

        let high: Vec<(String, f32)> = boosted
            .iter()
            .filter_map(|n| self.nodes.get(n).map(|node| (n.clone(), node.value)))
            .filter(|(_, v)| *v > self.config.blend_threshold)
            .collect();
        for i in 0..high.len() {
            for j in (i + 1)..high.len() {
                self.blend(&high[i], &high[j]);
            }
        }

        self.turn += 1;
        boosted
    }

    /// Best node for `token`: highest ratio at or above the cutoff, first in name order on ties.
    fn best_match(&self, token: &str) -> Option<String> {
        let mut best: Option<(&String, f32)> = None;
        for name in self.nodes.keys() {
            let ratio = self.similarity.ratio(token, name);
            if ratio >= self.config.fuzzy_cutoff && best.map_or(true, |(_, b)| ratio > b) {
                best = Some((name, ratio));
            }
        }
        best.map(|(name, _)| name.clone())
    }

    /// Create or refresh the blend node of two co-active nodes.
    fn blend(&mut self, (a, va): &(String, f32), (b, vb): &(String, f32)) {
        let value = clamp_unit((va + vb) / 2.0 * self.config.blend_scale);
        let name = format!("{a}-{b}");
        if let Some(node) = self.nodes.get_mut(&name) {
            node.value = node.value.max(value);
            node.decay_counter = 0;
        } else if self.add_node(&name, value) {
            tracing::debug!(blend = %name, value, "blend node created");
        } else {
            return;
        }
        let rate = self.config.blend_edge_rate;
        self.add_bleed_edge(a, &name, rate);
        self.add_bleed_edge(b, &name, rate);
    }

    /// Age the lattice. Only every `tidal_cadence`-th call does work.
    ///
    /// On a working call, in name order: nodes below `low_value_threshold`
    /// are divided by `damping` and their decay counter increments (others
    /// reset to 0); each node then nudges its opposite up by
    /// `opposite_nudge × (1 − value)`. Finally nodes whose counter exceeds
    /// `prune_limit` are removed, unless full mode is active.
    ///
    /// Returns `None` on idle calls.
    pub fn tidal_cycle(&mut self) -> Option<TidalOutcome> {
        self.tidal_counter += 1;
        let cadence = self.config.tidal_cadence.max(1);
        if self.tidal_counter % cadence != 0 {
            return None;
        }

        let mut outcome = TidalOutcome {
            call: self.tidal_counter,
            ..TidalOutcome::default()
        };
        let names: Vec<String> = self.nodes.keys().cloned().collect();
        for name in &names {
            let value = match self.nodes.get_mut(name) {
                Some(node) => {
                    let value = node.value;
                    if value < self.config.low_value_threshold {
                        node.value = clamp_unit(value / self.config.damping);
                        node.decay_counter = node.decay_counter.saturating_add(1);
                        outcome.decayed += 1;
                    } else {
                        node.decay_counter = 0;
                    }
                    value
                }
                None => continue,
            };
            let nudge = self.config.opposite_nudge * (1.0 - value);
            if let Some(opposite) = self.opposites.get(name) {
                if let Some(node) = self.nodes.get_mut(opposite) {
                    node.value = clamp_unit(node.value + nudge);
                    outcome.nudged += 1;
                }
            }
        }

        if !self.full_mode {
            let limit = self.config.prune_limit;
            outcome.pruned = self
                .nodes
                .iter()
                .filter(|(_, node)| node.decay_counter > limit)
                .map(|(name, _)| name.clone())
                .collect();
            for name in &outcome.pruned {
                self.nodes.remove(name);
            }
            if !outcome.pruned.is_empty() {
                for node in self.nodes.values_mut() {
                    node.edges.retain(|target, _| !outcome.pruned.contains(target));
                }
                self.release_opposites(&outcome.pruned);
                tracing::debug!(pruned = ?outcome.pruned, "tidal pass pruned nodes");
            }
        }

        tracing::trace!(
            call = outcome.call,
            decayed = outcome.decayed,
            nudged = outcome.nudged,
            "tidal pass"
        );
        Some(outcome)
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Largest `|a − b|` over opposite pairs with both nodes present; 0.0 if none.
    pub fn get_bleed_score(&self) -> f32 {
        self.opposites
            .iter()
            .filter_map(|(a, b)| {
                let va = self.nodes.get(a)?.value;
                let vb = self.nodes.get(b)?.value;
                Some((va - vb).abs())
            })
            .fold(0.0, f32::max)
    }

    /// Node count, active count and bleed score.
    pub fn summary(&self) -> LatticeSummary {
        LatticeSummary {
            node_count: self.nodes.len(),
            active_count: self
                .nodes
                .values()
                .filter(|n| n.value > self.config.active_threshold)
                .count(),
            bleed_score: self.get_bleed_score(),
        }
    }

    /// The node called `name`, if present.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(&normalize(name))
    }

    /// Value of `name`, if present.
    pub fn node_value(&self, name: &str) -> Option<f32> {
        self.node(name).map(|n| n.value)
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(&normalize(name))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the lattice has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate `(name, node)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// Iterate every bleed edge as `(from, to, rate)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f32)> {
        self.nodes.iter().flat_map(|(from, node)| {
            node.edges
                .iter()
                .map(move |(to, rate)| (from.as_str(), to.as_str(), *rate))
        })
    }

    /// Number of `process_input` calls so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Raw `tidal_cycle` call count.
    pub fn tidal_counter(&self) -> u64 {
        self.tidal_counter
    }

    /// The active configuration.
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }
}

impl<S: Similarity> core::fmt::Debug for Lattice<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lattice")
            .field("node_count", &self.nodes.len())
            .field("opposite_links", &self.opposites.len())
            .field("derived_pairs", &self.derived.len())
            .field("full_mode", &self.full_mode)
            .field("tidal_counter", &self.tidal_counter)
            .field("turn", &self.turn)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Lattice {
        Lattice::empty(LatticeConfig::default())
    }

    // ── Node mutation ─────────────────────────────────────────────────────

    #[test]
    fn test_add_node_is_idempotent() {
        let mut l = bare();
        assert!(l.add_node("hope", 0.4));
        assert!(!l.add_node("hope", 0.9));
        assert!((l.node_value("hope").unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(l.node_count(), 1);
    }

    #[test]
    fn test_add_node_clamps_and_normalises() {
        let mut l = bare();
        l.add_node("  Hope ", 3.0);
        l.add_node("dread", -1.0);
        assert_eq!(l.node_value("hope"), Some(1.0));
        assert_eq!(l.node_value("DREAD"), Some(0.0));
        assert!(!l.add_node("   ", 0.5), "empty names are refused");
    }

    #[test]
    fn test_add_node_respects_cap() {
        let mut l = Lattice::empty(LatticeConfig { max_nodes_sim: 2, ..LatticeConfig::default() });
        assert!(l.add_node("a", 0.1));
        assert!(l.add_node("b", 0.1));
        assert!(!l.add_node("c", 0.1));
        assert_eq!(l.node_count(), 2);

        l.toggle_full_mode(true);
        assert!(l.add_node("c", 0.1), "full mode lifts the cap");
        assert_eq!(l.capacity(), 500);
    }

    #[test]
    fn test_update_node_creates_and_clamps() {
        let mut l = bare();
        l.update_node("spark", 0.7);
        assert!((l.node_value("spark").unwrap() - 0.7).abs() < 1e-6);
        l.update_node("spark", 0.7);
        assert_eq!(l.node_value("spark"), Some(1.0));
        l.update_node("spark", -5.0);
        assert_eq!(l.node_value("spark"), Some(0.0));
    }

    #[test]
    fn test_update_node_ignores_non_finite_delta() {
        let mut l = bare();
        l.add_node("calm", 0.5);
        l.update_node("calm", f32::NAN);
        assert_eq!(l.node_value("calm"), Some(0.5));
    }

    #[test]
    fn test_malformed_numbers_are_clamped_not_rejected() {
        let mut l = bare();
        assert!(l.add_node("x", 1.5));
        assert!(l.add_node("y", f32::NAN));
        assert_eq!(l.node_value("x"), Some(1.0));
        assert_eq!(l.node_value("y"), Some(0.0));

        assert!(l.add_bleed_edge("x", "y", 1.5));
        assert!(l.add_bleed_edge("y", "x", -0.3));
        let edges: Vec<_> = l.edges().collect();
        assert_eq!(edges, vec![("x", "y", 1.0), ("y", "x", 0.0)]);
        assert!(l.add_bleed_edge("x", "y", f32::NAN));
        assert_eq!(l.node("x").unwrap().edges.get("y"), Some(&0.0));

        l.update_node("x", f32::INFINITY);
        l.update_node("x", f32::NEG_INFINITY);
        assert_eq!(l.node_value("x"), Some(1.0));
    }

    #[test]
    fn test_small_update_keeps_decay_counter() {
        let mut l = bare();
        l.add_node("void", 0.1);
        for _ in 0..3 {
            l.tidal_cycle();
        }
        assert_eq!(l.node("void").unwrap().decay_counter, 1);

        l.update_node("void", 0.01);
        assert_eq!(l.node("void").unwrap().decay_counter, 1);
        l.update_node("void", 0.06);
        assert_eq!(l.node("void").unwrap().decay_counter, 0);
    }

    #[test]
    fn test_bleed_edge_requires_both_nodes() {
        let mut l = bare();
        l.add_node("ache", 0.5);
        assert!(!l.add_bleed_edge("ache", "relief", 0.3));
        assert!(!l.add_bleed_edge("relief", "ache", 0.3));
        assert!(!l.contains("relief"), "edges never create nodes");

        l.add_node("relief", 0.0);
        assert!(l.add_bleed_edge("ache", "relief", 0.3));
        assert!(l.add_bleed_edge("ache", "relief", 0.6), "overwrite");
        let edges: Vec<_> = l.edges().collect();
        assert_eq!(edges, vec![("ache", "relief", 0.6)]);
    }

    // ── Opposites ─────────────────────────────────────────────────────────

    #[test]
    fn test_seeded_opposites_are_symmetric() {
        let l = Lattice::new();
        for (a, b) in l.opposite_pairs() {
            assert_eq!(l.opposite(a), Some(b));
            assert_eq!(l.opposite(b), Some(a));
        }
        assert_eq!(l.opposite("fear"), Some("courage"));
        assert_eq!(l.opposite("anger"), None, "courage/fear unlinks anger");
        assert_eq!(l.opposite("joy"), Some("sadness"));
    }

    #[test]
    fn test_seeding_creates_zeroed_nodes() {
        let l = Lattice::new();
        // 15 pairs over 29 distinct names (fear appears twice)
        assert_eq!(l.node_count(), 29);
        assert!(l.iter().all(|(_, n)| n.value == 0.0));
        assert_eq!(l.opposite_pairs().len(), 14);
    }

    #[test]
    fn test_repairing_keeps_relation_symmetric() {
        let mut l = bare();
        l.add_opposite_pair("a", "b");
        l.add_opposite_pair("c", "d");
        l.add_opposite_pair("a", "d");
        assert_eq!(l.opposite("a"), Some("d"));
        assert_eq!(l.opposite("d"), Some("a"));
        assert_eq!(l.opposite("b"), None);
        assert_eq!(l.opposite("c"), None);
        assert!(!l.add_opposite_pair("x", "X"), "self pairs are refused");
    }

    #[test]
    fn test_bleed_score_uses_present_pairs_only() {
        let mut l = bare();
        assert_eq!(l.get_bleed_score(), 0.0);
        l.add_opposite_pair("hope", "dread");
        l.add_node("hope", 0.9);
        assert_eq!(l.get_bleed_score(), 0.0, "dread absent");
        l.add_node("dread", 0.2);
        assert!((l.get_bleed_score() - 0.7).abs() < 1e-6);
    }

    // ── Bleed propagation ─────────────────────────────────────────────────

    #[test]
    fn test_propagate_sums_incoming_leaks() {
        let mut l = bare();
        l.add_node("a", 0.5);
        l.add_node("b", 0.5);
        l.add_node("t", 0.0);
        l.add_bleed_edge("a", "t", 0.2);
        l.add_bleed_edge("b", "t", 0.2);
        assert_eq!(l.propagate_bleed(), 1);
        assert!((l.node_value("t").unwrap() - 0.2).abs() < 1e-6);
        // sources are not drained
        assert!((l.node_value("a").unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_propagate_does_not_cascade() {
        let mut l = bare();
        l.add_node("a", 1.0);
        l.add_node("b", 0.0);
        l.add_node("c", 0.0);
        l.add_bleed_edge("a", "b", 0.5);
        l.add_bleed_edge("b", "c", 0.5);
        l.propagate_bleed();
        assert!((l.node_value("b").unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(l.node_value("c"), Some(0.0), "c reads b's pre-pass value");
    }

    // ── Input ─────────────────────────────────────────────────────────────

    #[test]
    fn test_process_input_spawns_unknown_tokens() {
        let mut l = bare();
        let boosted = l.process_input("Lighthouse");
        assert!(boosted.contains("lighthouse"));
        assert!((l.node_value("lighthouse").unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(l.turn(), 1);
    }

    #[test]
    fn test_process_input_fuzzy_boosts_near_match() {
        let mut l = bare();
        l.add_node("anger", 0.0);
        l.process_input("angry");
        // ratio(angry, anger) = 0.8 → fuzzy boost only, no spawn
        assert!((l.node_value("anger").unwrap() - 0.15).abs() < 1e-6);
        assert!(!l.contains("angry"));
    }

    #[test]
    fn test_process_input_whole_word_and_fuzzy_stack() {
        let mut l = bare();
        l.add_node("hope", 0.0);
        l.process_input("some hope");
        // whole word (0.2) + exact fuzzy match (0.15)
        assert!((l.node_value("hope").unwrap() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_process_input_blends_co_active_nodes() {
        let mut l = bare();
        l.add_node("joy", 0.45);
        l.add_node("hope", 0.45);
        l.process_input("joy hope");
        let blend = l.node_value("hope-joy").expect("blend node");
        assert!((blend - 0.96).abs() < 1e-4, "blend={}", blend);
        let edges: Vec<_> = l.edges().collect();
        assert!(edges.contains(&("hope", "hope-joy", 0.1)));
        assert!(edges.contains(&("joy", "hope-joy", 0.1)));
    }

    #[test]
    fn test_blend_refresh_raises_value() {
        let mut l = bare();
        l.add_node("joy", 0.45);
        l.add_node("hope", 0.45);
        l.add_node("hope-joy", 0.2);
        l.process_input("joy hope");
        assert!(l.node_value("hope-joy").unwrap() > 0.9);
    }

    // ── Tidal cycle ───────────────────────────────────────────────────────

    #[test]
    fn test_tidal_cycle_cadence() {
        let mut l = bare();
        l.add_node("dim", 0.1);
        assert!(l.tidal_cycle().is_none());
        assert!(l.tidal_cycle().is_none());
        assert_eq!(l.node_value("dim"), Some(0.1));
        let outcome = l.tidal_cycle().expect("third call works");
        assert_eq!(outcome.call, 3);
        assert_eq!(outcome.decayed, 1);
        assert!((l.node_value("dim").unwrap() - 0.1 / 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_tidal_cycle_resets_counter_above_threshold() {
        let mut l = bare();
        l.add_node("bright", 0.5);
        for _ in 0..9 {
            l.tidal_cycle();
        }
        assert_eq!(l.node("bright").unwrap().decay_counter, 0);
        assert_eq!(l.node_value("bright"), Some(0.5));
    }

    #[test]
    fn test_tidal_cycle_nudges_opposite() {
        let mut l = bare();
        l.add_node("hope", 0.9);
        l.add_node("dread", 0.2);
        l.add_opposite_pair("hope", "dread");
        for _ in 0..3 {
            l.tidal_cycle();
        }
        // visit order: dread (0.2) nudges hope by 0.09 × 0.8, then hope (now 0.972)
        // nudges dread by 0.09 × 0.028
        let hope = l.node_value("hope").unwrap();
        let dread = l.node_value("dread").unwrap();
        assert!((hope - 0.972).abs() < 1e-5, "hope={}", hope);
        assert!((dread - (0.2 + 0.09 * 0.028)).abs() < 1e-5, "dread={}", dread);
    }

    #[test]
    fn test_tidal_cycle_prunes_after_limit() {
        let mut l = bare();
        l.add_node("ghost", 0.1);
        l.add_node("anchor", 0.8);
        l.add_bleed_edge("anchor", "ghost", 0.01);
        for _ in 0..20 {
            l.tidal_cycle();
        }
        assert!(l.contains("ghost"));
        let outcome = l.tidal_cycle().expect("call 21 works");
        assert_eq!(outcome.pruned, vec!["ghost".to_string()]);
        assert!(!l.contains("ghost"));
        assert_eq!(l.edges().count(), 0, "edges into pruned nodes are dropped");
        l.propagate_bleed();
        assert!(!l.contains("ghost"), "no resurrection through stale edges");
    }

    #[test]
    fn test_full_mode_suppresses_pruning() {
        let mut l = bare();
        l.add_node("ghost", 0.1);
        l.toggle_full_mode(true);
        for _ in 0..30 {
            l.tidal_cycle();
        }
        assert!(l.contains("ghost"));
        assert!(l.node("ghost").unwrap().decay_counter > 6);

        l.toggle_full_mode(false);
        for _ in 0..3 {
            l.tidal_cycle();
        }
        assert!(!l.contains("ghost"));
    }

    // ── Summary ───────────────────────────────────────────────────────────

    #[test]
    fn test_summary_counts_and_display() {
        let mut l = bare();
        l.add_node("hope", 0.8);
        l.add_node("dread", 0.05);
        l.add_opposite_pair("hope", "dread");
        let s = l.summary();
        assert_eq!(s.node_count, 2);
        assert_eq!(s.active_count, 1);
        assert!((s.bleed_score - 0.75).abs() < 1e-6);
        assert_eq!(s.to_string(), "Lattice: 2 nodes (1 active), bleed 0.75");
    }
}
