/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! # tidal-lattice
//!
//! An emotional state lattice for conversational systems, and a translator that
//! reads it to classify intent.
//!
//! ---
//!
//! ## Two halves, one seam
//!
//! **The lattice** is a small, bounded graph of named emotional nodes. Every
//! value lives in [0.0, 1.0]. Free text boosts the nodes it names, spawns nodes
//! for words it has never seen, and blends co-active nodes into compound nodes.
//! Values leak along directed bleed edges. Opposite pairs (joy ↔ sadness,
//! hope ↔ dread, ...) pull on each other. A tidal clock decays quiet nodes and
//! prunes the ones that stay quiet.
//!
//! **The translator** never touches the lattice. It reads a snapshot through
//! [`LatticeView`], combines what the lattice feels with keyword cues in the
//! text, scales the result by the recent trend, and names one of five intents
//! for a router to act on.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! text ─► Lattice::process_input ─► propagate_bleed ─► tidal_cycle
//!                     │
//!                     ▼ LatticeView (read-only)
//! text ─► SignalTranslator::translate ─► Translation { signals, primary, nudge }
//!                     ▲
//!              rolling history (5 snapshots)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`similarity`] | [`Similarity`], [`SequenceRatio`] | Fuzzy string ratio and tokenising |
//! | [`config`] | [`LatticeConfig`], [`TranslatorConfig`] | Every tunable constant, with defaults |
//! | [`lattice`] | [`Lattice`], [`Node`] | Nodes, bleed edges, opposites, input handling, tidal decay |
//! | [`bleed`] | [`BleedEvent`] | Opposite and co-activation bleed detection |
//! | [`signal`] | [`Signal`], [`SignalScores`], [`Nudge`] | The five-intent vocabulary |
//! | [`patterns`] | [`patterns::LANGUAGE_CUES`] | Keyword and node-name weight tables |
//! | [`snapshot`] | [`LatticeView`], [`SignalSnapshot`] | Read-only seam and point-in-time capture |
//! | [`translator`] | [`SignalTranslator`], [`Translation`] | Scoring, trend multipliers, nudges |
//! | [`seg`] | `seg::LatticeSeg` | Serialisable lattice image (requires `serde` feature) |
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` on public data types and
//!   enables [`seg`](crate::seg) persistence.
//! - `python-ffi`: PyO3 bindings (`Lattice`, `SignalTranslator`, `Translation`).
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber. Node spawns,
//! blends, prunes and opposite extensions log at `debug`; full-mode switches at
//! `info`; every tidal pass and translation at `trace`.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.
//! Change date: 23 February 2032, then Apache License 2.0.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod similarity;
pub mod config;
pub mod lattice;
pub mod bleed;
pub mod signal;
pub mod patterns;
pub mod snapshot;
pub mod translator;
#[cfg(feature = "serde")]
pub mod seg;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use bleed::{stabilization_hint, BleedEvent, BleedKind};
pub use config::{LatticeConfig, TranslatorConfig};
pub use lattice::{Lattice, LatticeSummary, Node, TidalOutcome, SEED_OPPOSITES};
pub use signal::{Nudge, Signal, SignalScores};
pub use similarity::{SequenceRatio, Similarity};
pub use snapshot::{LatticeView, SignalSnapshot};
pub use translator::{SignalTranslator, TrendAdjustment, Translation};
