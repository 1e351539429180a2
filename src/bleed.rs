/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Cross-node bleed detection.
//!
//! Two kinds of bleed are reported:
//!
//! - **Opposite**: a present opposite pair whose values differ by more than the threshold.
//! - **Co-activation**: two nodes both above 0.5, neither in any opposite pair,
//!   differing by more than the threshold.
//!
//! [`Lattice::bleed_events`] only reads. [`Lattice::detect_bleed`] also grows the
//! opposite relation: every co-activation pair `(a, b)` becomes the pair
//! `"{a}-{b}"` ↔ `"anti-{a}-{b}"`. Such a pair is released again once a
//! pruning pass removes `a` or `b`.

use crate::lattice::Lattice;
use crate::similarity::Similarity;

/// Co-activation only considers nodes strictly above this value.
pub const CO_ACTIVATION_FLOOR: f32 = 0.5;

/// Where a bleed event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BleedKind {
    /// Imbalance across an opposite pair.
    Opposite,
    /// Two unrelated nodes active at once.
    CoActivation,
}

/// A node pair whose values have pulled apart.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BleedEvent {
    /// First node (lexically smaller name).
    pub a: String,
    /// Second node.
    pub b: String,
    /// Absolute value difference.
    pub strength: f32,
    /// Opposite or co-activation.
    pub kind: BleedKind,
}

impl BleedEvent {
    /// Construct an event.
    pub fn new(a: impl Into<String>, b: impl Into<String>, strength: f32, kind: BleedKind) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            strength,
            kind,
        }
    }

    /// `"{a}-{b}"`, lowercased.
    pub fn joined_name(&self) -> String {
        format!("{}-{}", self.a, self.b).to_lowercase()
    }
}

impl<S: Similarity> Lattice<S> {
    /// All bleed events strictly above `threshold`, strongest first.
    pub fn bleed_events(&self, threshold: f32) -> Vec<BleedEvent> {
        let mut events: Vec<BleedEvent> = self
            .opposite_pairs()
            .into_iter()
            .filter_map(|(a, b)| {
                let delta = (self.nodes.get(a)?.value - self.nodes.get(b)?.value).abs();
                (delta > threshold).then(|| BleedEvent::new(a, b, delta, BleedKind::Opposite))
            })
            .collect();

        let high: Vec<(&str, f32)> = self
            .nodes
            .iter()
            .filter(|(name, node)| {
                node.value > CO_ACTIVATION_FLOOR && !self.opposites.contains_key(name.as_str())
            })
            .map(|(name, node)| (name.as_str(), node.value))
            .collect();
        for (i, (a, va)) in high.iter().enumerate() {
            for (b, vb) in &high[i + 1..] {
                let delta = (va - vb).abs();
                if delta > threshold {
                    events.push(BleedEvent::new(*a, *b, delta, BleedKind::CoActivation));
                }
            }
        }

        events.sort_by(|x, y| {
            y.strength
                .total_cmp(&x.strength)
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });
        events
    }

    /// [`Lattice::bleed_events`], then pair every co-activation `(a, b)` as
    /// opposites `"{a}-{b}"` ↔ `"anti-{a}-{b}"`.
    pub fn detect_bleed(&mut self, threshold: f32) -> Vec<BleedEvent> {
        let events = self.bleed_events(threshold);
        for event in events.iter().filter(|e| e.kind == BleedKind::CoActivation) {
            let pair = format!("{}-{}", event.a, event.b);
            let anti = format!("anti-{pair}");
            if self.opposite(&pair).is_none() && self.add_opposite_pair(&pair, &anti) {
                tracing::debug!(%pair, %anti, strength = event.strength, "opposite relation extended");
                self.derived
                    .insert(pair, (event.a.clone(), event.b.clone()));
            }
        }
        events
    }
}

/// One-line stabilisation suggestion naming the strongest event, or `None` when stable.
pub fn stabilization_hint(events: &[BleedEvent]) -> Option<String> {
    let strongest = events
        .iter()
        .max_by(|x, y| x.strength.total_cmp(&y.strength))?;
    Some(format!(
        "Bleed detected ({} → {}, {:.2}): thread split? vent? clarity?",
        strongest.a, strongest.b, strongest.strength
    ))
}
