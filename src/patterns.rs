/*
 * This source code is licensed under the Business Source License 1.1.
 */

//! Fixed keyword tables the translator scores against.
//!
//! Three tables, all matched as lowercase substrings:
//!
//! | Table | Matched against | Effect |
//! |-------|-----------------|--------|
//! | [`PATTERN_WEIGHTS`] | top node names | `signal += node value × weight` per matching pattern |
//! | [`VENT_BLEED_MARKERS`], [`REFLECT_BLEED_MARKERS`] | `"{a}-{b}"` of strong bleed events | `signal += strength × scale` |
//! | [`LANGUAGE_CUES`] | raw input text | fixed bump when any keyword of a set appears |

use crate::signal::Signal;

/// Node-name pattern → weighted signal boosts.
pub const PATTERN_WEIGHTS: &[(&str, &[(Signal, f32)])] = &[
    ("rage", &[(Signal::VentEnergy, 1.5), (Signal::ReflectNeed, 0.9)]),
    ("frustr", &[(Signal::VentEnergy, 1.4), (Signal::ReflectNeed, 1.2)]),
    ("ache", &[(Signal::LearnClarity, 1.5), (Signal::VentEnergy, 1.1)]),
    ("doubt", &[(Signal::ReflectNeed, 1.6), (Signal::LearnClarity, 1.3)]),
    ("spark", &[(Signal::PinSpark, 1.5), (Signal::ProjectForward, 1.4)]),
    ("joy", &[(Signal::PinSpark, 1.3), (Signal::ProjectForward, 1.2)]),
    ("awe", &[(Signal::LearnClarity, 1.2), (Signal::ProjectForward, 1.1)]),
    ("dread", &[(Signal::ReflectNeed, 1.3), (Signal::LearnClarity, 1.4)]),
];

/// Bleed pair substrings that feed `vent_energy`.
pub const VENT_BLEED_MARKERS: &[&str] = &["rage", "frustr", "ache"];

/// Bleed pair substrings that feed `reflect_need`.
pub const REFLECT_BLEED_MARKERS: &[&str] = &["doubt", "conf", "drift"];

/// A keyword set that bumps one signal when any member appears in the text.
#[derive(Clone, Copy, Debug)]
pub struct LanguageCue {
    /// Signal receiving the bump.
    pub signal: Signal,
    /// Lowercase substrings; any one suffices.
    pub keywords: &'static [&'static str],
    /// Fixed additive bump.
    pub bump: f32,
}

/// One cue per signal, checked independently.
pub const LANGUAGE_CUES: [LanguageCue; 5] = [
    LanguageCue {
        signal: Signal::VentEnergy,
        keywords: &["vent", "swear", "fuck", "shit", "wanker", "gutted", "knackered", "pissed"],
        bump: 1.8,
    },
    LanguageCue {
        signal: Signal::ReflectNeed,
        keywords: &["why", "how", "truth", "check", "doubt", "confused", "drift"],
        bump: 1.2,
    },
    LanguageCue {
        signal: Signal::PinSpark,
        keywords: &["remember", "idea", "keep", "save", "project", "spark"],
        bump: 1.4,
    },
    LanguageCue {
        signal: Signal::LearnClarity,
        keywords: &["learn", "clarify", "nudge", "understand"],
        bump: 1.3,
    },
    LanguageCue {
        signal: Signal::ProjectForward,
        keywords: &["meta", "tweak", "evolve", "upgrade", "next", "plan"],
        bump: 1.2,
    },
];

/// Whether any of `markers` occurs in `text`.
pub fn any_marker(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_signal_has_one_language_cue() {
        for s in Signal::ALL {
            assert_eq!(LANGUAGE_CUES.iter().filter(|c| c.signal == s).count(), 1, "{s}");
        }
    }

    #[test]
    fn test_tables_are_lowercase() {
        for (pattern, _) in PATTERN_WEIGHTS {
            assert_eq!(*pattern, pattern.to_lowercase());
        }
        for cue in LANGUAGE_CUES {
            assert!(cue.keywords.iter().all(|k| *k == k.to_lowercase()));
        }
    }

    #[test]
    fn test_any_marker() {
        assert!(any_marker("rage-calm", VENT_BLEED_MARKERS));
        assert!(!any_marker("rage-calm", REFLECT_BLEED_MARKERS));
        assert!(any_marker("self-confidence", REFLECT_BLEED_MARKERS));
    }
}
