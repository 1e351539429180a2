/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! LATTICE_SEG: portable image of a [`Lattice`] for persistence and transport.
//!
//! The image captures everything the lattice dynamics depend on: node values,
//! decay counters, bleed edges, opposite pairs, the tidal call counter, the
//! turn counter and full mode. Configuration and the similarity function are
//! not stored; the caller supplies them on restore.
//!
//! ```rust,ignore
//! use tidal_lattice::seg::LatticeSeg;
//!
//! let seg = LatticeSeg::from_lattice(&lattice);
//! let json = serde_json::to_string(&seg)?;
//! let restored = serde_json::from_str::<LatticeSeg>(&json)?.restore(config)?;
//! ```
//!
//! # Invariants
//!
//! - Nodes and edges appear in name order; opposite pairs as `(a, b)` with `a < b`.
//! - [`LatticeSeg::restore`] either rebuilds a lattice that upholds every
//!   lattice invariant or returns a [`SegError`]; it never clamps silently.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::LatticeConfig;
use crate::lattice::{normalize, Lattice, Node};
use crate::similarity::{SequenceRatio, Similarity};

/// Current LATTICE_SEG format version.
pub const LATTICE_SEG_VERSION: u16 = 1;

/// Why an image could not be restored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegError {
    /// Image written by an unknown format version.
    #[error("unsupported LATTICE_SEG version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the image.
        found: u16,
        /// Version this build reads.
        expected: u16,
    },
    /// A node value or edge rate outside [0.0, 1.0], or not finite.
    #[error("value {value} for `{name}` is outside [0.0, 1.0]")]
    ValueOutOfRange {
        /// Node name, or `"from->to"` for an edge.
        name: String,
        /// Offending value.
        value: f32,
    },
    /// The same (normalised) node name appears twice.
    #[error("duplicate node `{0}`")]
    DuplicateNode(String),
    /// An edge points at a node the image does not contain.
    #[error("edge `{from}` -> `{to}` targets a missing node")]
    DanglingEdge {
        /// Source node.
        from: String,
        /// Missing target.
        to: String,
    },
    /// A name is paired with more than one opposite, or with itself.
    #[error("opposite relation for `{0}` is not one-to-one")]
    AsymmetricOpposite(String),
}

/// One outgoing bleed edge.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    /// Target node name.
    pub target: String,
    /// Bleed rate [0.0, 1.0].
    pub rate: f32,
}

/// One node and its outgoing edges.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct NodeRecord {
    /// Normalised node name.
    pub name: String,
    /// Value [0.0, 1.0].
    pub value: f32,
    /// Low-value tidal passes so far.
    pub decay_counter: u32,
    /// Outgoing edges, in target order.
    pub edges: Vec<EdgeRecord>,
}

/// An opposite pair added by bleed detection, with the nodes it came from.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct DerivedPairRecord {
    /// Pair name, `"{a}-{b}"`.
    pub pair: String,
    /// First source node.
    pub a: String,
    /// Second source node.
    pub b: String,
}

/// A serialisable image of a [`Lattice`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct LatticeSeg {
    /// Format version, [`LATTICE_SEG_VERSION`] for new images.
    pub version: u16,
    /// Conversational turn counter.
    pub turn: u64,
    /// Raw tidal call counter (cadence position is preserved).
    pub tidal_counter: u64,
    /// Whether full mode was on.
    pub full_mode: bool,
    /// Every node, in name order.
    pub nodes: Vec<NodeRecord>,
    /// Every opposite pair once, `(a, b)` with `a < b`.
    pub opposites: Vec<(String, String)>,
    /// Bleed-derived pairs, in pair-name order. Entries naming a pair that is
    /// not in `opposites` are ignored on restore.
    #[serde(default)]
    pub derived: Vec<DerivedPairRecord>,
}

impl LatticeSeg {
    /// Capture `lattice`.
    pub fn from_lattice<S: Similarity>(lattice: &Lattice<S>) -> Self {
        let nodes = lattice
            .iter()
            .map(|(name, node)| NodeRecord {
                name: name.to_owned(),
                value: node.value,
                decay_counter: node.decay_counter,
                edges: node
                    .edges
                    .iter()
                    .map(|(target, &rate)| EdgeRecord { target: target.clone(), rate })
                    .collect(),
            })
            .collect();

        Self {
            version: LATTICE_SEG_VERSION,
            turn: lattice.turn,
            tidal_counter: lattice.tidal_counter,
            full_mode: lattice.full_mode,
            nodes,
            opposites: lattice
                .opposite_pairs()
                .into_iter()
                .map(|(a, b)| (a.to_owned(), b.to_owned()))
                .collect(),
            derived: lattice
                .derived
                .iter()
                .map(|(pair, (a, b))| DerivedPairRecord {
                    pair: pair.clone(),
                    a: a.clone(),
                    b: b.clone(),
                })
                .collect(),
        }
    }

    /// Number of node records.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node record by name.
    pub fn find_node(&self, name: &str) -> Option<&NodeRecord> {
        let name = normalize(name);
        self.nodes.iter().find(|r| r.name == name)
    }

    /// Rebuild a [`Lattice`] with `config` and [`SequenceRatio`] matching.
    pub fn restore(&self, config: LatticeConfig) -> Result<Lattice, SegError> {
        self.restore_with(config, SequenceRatio)
    }

    /// Rebuild a [`Lattice`] with `config` and a custom similarity function.
    ///
    /// The node cap is not enforced on restore: an image taken in full mode
    /// may hold more nodes than the simulation cap.
    pub fn restore_with<S: Similarity>(
        &self,
        config: LatticeConfig,
        similarity: S,
    ) -> Result<Lattice<S>, SegError> {
        if self.version != LATTICE_SEG_VERSION {
            return Err(SegError::UnsupportedVersion {
                found: self.version,
                expected: LATTICE_SEG_VERSION,
            });
        }

        let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
        for record in &self.nodes {
            let name = normalize(&record.name);
            check_unit(&name, record.value)?;
            if nodes.contains_key(&name) {
                return Err(SegError::DuplicateNode(name));
            }
            let mut node = Node::new(record.value);
            node.decay_counter = record.decay_counter;
            nodes.insert(name, node);
        }

        let names: BTreeSet<String> = nodes.keys().cloned().collect();
        for record in &self.nodes {
            let from = normalize(&record.name);
            for edge in &record.edges {
                let to = normalize(&edge.target);
                check_unit(&format!("{from}->{to}"), edge.rate)?;
                if !names.contains(&to) {
                    return Err(SegError::DanglingEdge { from, to });
                }
                if let Some(node) = nodes.get_mut(&from) {
                    node.edges.insert(to, edge.rate);
                }
            }
        }

        let mut lattice = Lattice::unseeded(config, similarity);
        let mut paired: BTreeSet<String> = BTreeSet::new();
        for (a, b) in &self.opposites {
            let (a, b) = (normalize(a), normalize(b));
            if a == b {
                return Err(SegError::AsymmetricOpposite(a));
            }
            for name in [&a, &b] {
                if !paired.insert(name.clone()) {
                    return Err(SegError::AsymmetricOpposite(name.clone()));
                }
            }
            lattice.add_opposite_pair(&a, &b);
        }
        for record in &self.derived {
            let pair = normalize(&record.pair);
            if lattice.opposites.contains_key(&pair) {
                lattice
                    .derived
                    .insert(pair, (normalize(&record.a), normalize(&record.b)));
            }
        }

        lattice.nodes = nodes;
        lattice.turn = self.turn;
        lattice.tidal_counter = self.tidal_counter;
        lattice.full_mode = self.full_mode;

        tracing::debug!(nodes = lattice.node_count(), turn = self.turn, "lattice restored");
        Ok(lattice)
    }
}

fn check_unit(name: &str, value: f32) -> Result<(), SegError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SegError::ValueOutOfRange { name: name.to_owned(), value })
    }
}
