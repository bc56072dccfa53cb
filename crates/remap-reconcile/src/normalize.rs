//! Key normalization for superficial-rename matching.
//!
//! Normalization is a policy choice, not a constant: different categories
//! warrant different aggressiveness, so the profile is configuration
//! threaded through the engine. A stateful identifier's bracketed property
//! suffix is never normalized: property sets are machine-generated and
//! collapsing them would invent matches that do not exist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use remap_registry::Registry;

/// Characters removed by punctuation stripping.
const PUNCTUATION: &[char] = &['-', '_', '.', ' '];

/// Normalization profile for one category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    /// Lowercase the base name.
    pub case_fold: bool,
    /// Remove `-`, `_`, `.`, and spaces from the base name.
    pub strip_punctuation: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            case_fold: true,
            strip_punctuation: true,
        }
    }
}

impl Normalization {
    /// A profile that disables normalized matching entirely.
    pub fn none() -> Self {
        Self {
            case_fold: false,
            strip_punctuation: false,
        }
    }

    /// Returns `true` if normalization would never change any key.
    pub fn is_noop(&self) -> bool {
        !self.case_fold && !self.strip_punctuation
    }

    /// Normalize a key. The bracketed property suffix, if any, is kept
    /// verbatim.
    pub fn apply(&self, key: &str) -> String {
        let (base, suffix) = match key.find('[') {
            Some(pos) => key.split_at(pos),
            None => (key, ""),
        };

        let mut normalized = String::with_capacity(base.len());
        for ch in base.chars() {
            if self.strip_punctuation && PUNCTUATION.contains(&ch) {
                continue;
            }
            if self.case_fold {
                normalized.extend(ch.to_lowercase());
            } else {
                normalized.push(ch);
            }
        }
        normalized.push_str(suffix);
        normalized
    }
}

/// A normalized key→index lookup over a target registry.
///
/// Forms that two or more target keys collapse onto are poisoned: a lookup
/// that lands on one yields the full candidate list instead of an index.
#[derive(Debug)]
pub struct NormalizedIndex {
    slots: BTreeMap<String, Slot>,
}

#[derive(Debug)]
enum Slot {
    Unique { index: u32 },
    Collided { keys: Vec<String> },
}

/// Outcome of a normalized lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NormalizedMatch {
    /// Exactly one target key has this normalized form.
    Unique(u32),
    /// The form is poisoned; all colliding target keys, in registry order.
    Collided(Vec<String>),
    /// No target key has this normalized form.
    None,
}

impl NormalizedIndex {
    /// Build the index for a target registry under a profile.
    pub fn build(target: &Registry, profile: &Normalization) -> Self {
        let mut slots: BTreeMap<String, Slot> = BTreeMap::new();
        for (index, key) in target.iter() {
            let form = profile.apply(key);
            match slots.get_mut(&form) {
                None => {
                    slots.insert(form, Slot::Unique { index });
                }
                Some(slot) => {
                    let keys = match slot {
                        Slot::Unique { index } => {
                            // Registry order keeps the candidate list stable.
                            let first = target.key(*index).unwrap_or_default().to_string();
                            vec![first, key.to_string()]
                        }
                        Slot::Collided { keys } => {
                            let mut keys = std::mem::take(keys);
                            keys.push(key.to_string());
                            keys
                        }
                    };
                    *slot = Slot::Collided { keys };
                }
            }
        }
        Self { slots }
    }

    /// Look up a normalized form.
    pub fn lookup(&self, form: &str) -> NormalizedMatch {
        match self.slots.get(form) {
            Some(Slot::Unique { index }) => NormalizedMatch::Unique(*index),
            Some(Slot::Collided { keys }) => NormalizedMatch::Collided(keys.clone()),
            None => NormalizedMatch::None,
        }
    }
}
