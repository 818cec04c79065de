//! Domain model that mirrors the persisted JSON layout and gets passed
//! throughout the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{COLUMN_STEPS, GLOBAL_STEPS, VARIANTS};

/// Sentinel assigned when a persisted record carries no `order` field so
/// malformed or legacy entries sort after every real one.
pub const ORDER_SENTINEL: i64 = 1_000_000_000;

/// The artist collection, keyed by artist id. A `BTreeMap` keeps the
/// serialized file deterministic, which is what makes the self-healing
/// normalize-then-save pass on load idempotent.
pub type Collection = BTreeMap<String, ArtistProgress>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Progress record for one artist: the 3 one-time global steps plus a
/// 6-step checklist per variant column (63 booleans total).
pub struct ArtistProgress {
    /// Opaque unique identifier, generated once at creation and never
    /// reassigned. Doubles as the storage key.
    pub id: String,
    /// Free-text display name. Uniqueness is only enforced approximately at
    /// creation time, never as a storage invariant.
    pub label: String,
    /// Global display position. Dense 1..N after a reorder normalizes it.
    pub order: i64,
    /// Exactly the 3 catalog keys after normalization.
    pub global_steps: BTreeMap<String, bool>,
    /// Exactly the 10 variant keys, each holding exactly the 6 column-step
    /// keys, after normalization.
    pub variants: BTreeMap<String, BTreeMap<String, bool>>,
}

/// All global-step keys mapped to false.
pub fn empty_global_steps() -> BTreeMap<String, bool> {
    GLOBAL_STEPS.iter().map(|s| (s.key.to_string(), false)).collect()
}

/// All column-step keys mapped to false, for one variant.
pub fn empty_variant_steps() -> BTreeMap<String, bool> {
    COLUMN_STEPS.iter().map(|s| (s.key.to_string(), false)).collect()
}

impl ArtistProgress {
    /// Create a fresh record with a random id, the trimmed label, the given
    /// order slot, and every step unchecked.
    pub fn new(label: &str, order: i64) -> Self {
        let variants = VARIANTS
            .iter()
            .map(|v| (v.key.to_string(), empty_variant_steps()))
            .collect();
        Self {
            id: Uuid::new_v4().simple().to_string(),
            label: label.trim().to_string(),
            order,
            global_steps: empty_global_steps(),
            variants,
        }
    }

    /// Read a step, treating absent keys as unchecked. `variant` is `None`
    /// for the artist-global steps.
    pub fn step(&self, variant: Option<&str>, step_key: &str) -> bool {
        match variant {
            None => self.global_steps.get(step_key).copied().unwrap_or(false),
            Some(vk) => self
                .variants
                .get(vk)
                .and_then(|steps| steps.get(step_key))
                .copied()
                .unwrap_or(false),
        }
    }

    /// Write a step. Unknown keys are ignored so a stale UI cannot grow the
    /// record beyond the catalogs.
    pub fn set_step(&mut self, variant: Option<&str>, step_key: &str, value: bool) {
        match variant {
            None => {
                if let Some(slot) = self.global_steps.get_mut(step_key) {
                    *slot = value;
                }
            }
            Some(vk) => {
                if let Some(slot) = self
                    .variants
                    .get_mut(vk)
                    .and_then(|steps| steps.get_mut(step_key))
                {
                    *slot = value;
                }
            }
        }
    }

    /// Set every one of the 63 steps to `value`. Backs the "check all" and
    /// "clear all" buttons.
    pub fn set_all_steps(&mut self, value: bool) {
        for slot in self.global_steps.values_mut() {
            *slot = value;
        }
        for steps in self.variants.values_mut() {
            for slot in steps.values_mut() {
                *slot = value;
            }
        }
    }
}

impl fmt::Display for ArtistProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Collapse whitespace runs, trim, and lowercase. Two labels that normalize
/// to the same string count as duplicates at creation time.
pub fn normalize_label(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TOTAL_STEPS;

    #[test]
    fn new_artist_starts_fully_unchecked() {
        let artist = ArtistProgress::new("  Claude Monet ", 1);
        assert_eq!(artist.label, "Claude Monet");
        assert_eq!(artist.order, 1);
        assert_eq!(artist.global_steps.len(), 3);
        assert_eq!(artist.variants.len(), 10);
        let checked = artist.global_steps.values().filter(|v| **v).count()
            + artist
                .variants
                .values()
                .flat_map(|steps| steps.values())
                .filter(|v| **v)
                .count();
        assert_eq!(checked, 0);
        let total: usize = artist.global_steps.len()
            + artist.variants.values().map(|steps| steps.len()).sum::<usize>();
        assert_eq!(total, TOTAL_STEPS);
    }

    #[test]
    fn set_step_ignores_unknown_keys() {
        let mut artist = ArtistProgress::new("Monet", 1);
        artist.set_step(None, "not_a_step", true);
        artist.set_step(Some("dikey"), "not_a_step", true);
        artist.set_step(Some("not_a_variant"), "etsy_yuklendi", true);
        assert!(artist.global_steps.values().all(|v| !v));
        assert!(artist.variants.values().flat_map(|s| s.values()).all(|v| !v));

        artist.set_step(Some("dikey"), "etsy_yuklendi", true);
        assert!(artist.step(Some("dikey"), "etsy_yuklendi"));
    }

    #[test]
    fn label_normalization_collapses_whitespace_and_case() {
        assert_eq!(normalize_label("  Claude   Monet "), "claude monet");
        assert_eq!(normalize_label("CLAUDE MONET"), "claude monet");
        assert_ne!(normalize_label("Claude Mone"), normalize_label("Claude Monet"));
    }
}
