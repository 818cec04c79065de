//! Transient per-session checkbox state. This is a presentation cache keyed
//! by `(artist_id, scope, step_key)`, never part of the durable record, and
//! it must be purged when an artist is deleted so stale entries cannot leak
//! onto a later artist sharing the same key namespace.

use std::collections::HashMap;

use crate::catalog::{COLUMN_STEPS, GLOBAL_STEPS, VARIANTS};

/// Cache key for one rendered checkbox. `variant` is `None` for the
/// artist-global steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ToggleKey {
    pub(crate) artist_id: String,
    pub(crate) variant: Option<String>,
    pub(crate) step_key: String,
}

impl ToggleKey {
    pub(crate) fn new(artist_id: &str, variant: Option<&str>, step_key: &str) -> Self {
        Self {
            artist_id: artist_id.to_string(),
            variant: variant.map(str::to_string),
            step_key: step_key.to_string(),
        }
    }
}

#[derive(Default)]
pub(crate) struct SessionToggles {
    states: HashMap<ToggleKey, bool>,
}

impl SessionToggles {
    pub(crate) fn get(&self, key: &ToggleKey) -> Option<bool> {
        self.states.get(key).copied()
    }

    pub(crate) fn set(&mut self, key: ToggleKey, value: bool) {
        self.states.insert(key, value);
    }

    /// Seed a key only if it has not been touched this session.
    pub(crate) fn ensure(&mut self, key: ToggleKey, default: bool) {
        self.states.entry(key).or_insert(default);
    }

    /// Mirror a bulk set/clear across all 63 keys of one artist.
    pub(crate) fn set_artist_all(&mut self, artist_id: &str, value: bool) {
        for gs in &GLOBAL_STEPS {
            self.set(ToggleKey::new(artist_id, None, gs.key), value);
        }
        for variant in &VARIANTS {
            for cs in &COLUMN_STEPS {
                self.set(ToggleKey::new(artist_id, Some(variant.key), cs.key), value);
            }
        }
    }

    /// Drop every cached entry belonging to one artist.
    pub(crate) fn purge_artist(&mut self, artist_id: &str) {
        self.states.retain(|key, _| key.artist_id != artist_id);
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}
