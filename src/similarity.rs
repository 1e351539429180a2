/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Pluggable string similarity and the text helpers the lattice matches with.
//!
//! The lattice resolves free text against node names through the
//! [`Similarity`] trait, so the matching algorithm can be swapped without
//! touching lattice logic. [`SequenceRatio`] is the default: the
//! Ratcliff/Obershelp "gestalt" ratio, `2·M / (|a| + |b|)` where `M` is the
//! number of characters in recursively found longest common blocks.
//!
//! # Implementing a custom matcher
//!
//! ```rust
//! use tidal_lattice::similarity::Similarity;
//!
//! /// Exact-prefix matcher: 1.0 when one string starts with the other.
//! #[derive(Clone, Debug, Default)]
//! struct PrefixMatch;
//!
//! impl Similarity for PrefixMatch {
//!     fn ratio(&self, a: &str, b: &str) -> f32 {
//!         if a.starts_with(b) || b.starts_with(a) { 1.0 } else { 0.0 }
//!     }
//! }
//! ```
//!
//! # Invariants
//! - `ratio` returns a value in [0.0, 1.0].
//! - `ratio(a, a) == 1.0` for every `a`, including the empty string.

use std::collections::BTreeSet;

/// String similarity used to resolve input tokens against node names.
///
/// Implementations must be deterministic and return a value in [0.0, 1.0].
pub trait Similarity {
    /// Similarity between `a` and `b` in [0.0, 1.0]; 1.0 means identical.
    fn ratio(&self, a: &str, b: &str) -> f32;
}

/// Ratcliff/Obershelp matching ratio over Unicode scalar values.
///
/// Finds the longest common block, then recurses into the unmatched text to
/// its left and right. Among equally long blocks the one starting earliest in
/// `a` (then earliest in `b`) wins, which keeps the ratio deterministic.
///
/// ```text
/// ratio("frustrated", "frustr")      = 2·6 / 16 = 0.75
/// ratio("frustrated", "frustration") = 2·8 / 21 ≈ 0.762
/// ratio("angry", "anger")            = 2·4 / 10 = 0.80
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceRatio;

impl SequenceRatio {
    /// Total characters covered by matching blocks between `a` and `b`.
    pub fn matching_chars(a: &[char], b: &[char]) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, a.len(), 0, b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = longest_block(a, b, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}

impl Similarity for SequenceRatio {
    fn ratio(&self, a: &str, b: &str) -> f32 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let len = a.len() + b.len();
        if len == 0 {
            return 1.0;
        }
        2.0 * Self::matching_chars(&a, &b) as f32 / len as f32
    }
}

/// Longest common block inside `a[alo..ahi]` × `b[blo..bhi]`.
///
/// Returns `(start_a, start_b, length)`; length 0 when nothing matches.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    // run[j] = length of the common run ending at (i - 1, blo + j - 1)
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            curr[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            if curr[col] > best_k {
                best_k = curr[col];
                best_i = i + 1 - best_k;
                best_j = j + 1 - best_k;
            }
        }
        core::mem::swap(&mut prev, &mut curr);
    }
    (best_i, best_j, best_k)
}

/// Word character in the regex `\w` sense: alphanumeric or underscore.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split lowercased text into its distinct `\w+` tokens, in sorted order.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Whole-word, case-insensitive occurrence of `needle` in `haystack`.
///
/// Mirrors a `\bneedle\b` search: a boundary holds where word-ness changes,
/// so needles that start or end with punctuation (`"frustr-rage"`) still
/// match sensibly.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let hay = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().last()) else {
        return false;
    };
    hay.match_indices(needle.as_str()).any(|(start, _)| {
        let before = hay[..start].chars().next_back();
        let after = hay[start + needle.len()..].chars().next();
        let left = before.map_or(false, is_word_char) != is_word_char(first);
        let right = after.map_or(false, is_word_char) != is_word_char(last);
        left && right
    })
}
