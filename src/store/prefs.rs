//! Persisted UI preferences: the active search query, completion filter, and
//! sort mode survive restarts. These are conveniences, never load-bearing
//! state, so every failure path silently falls back to defaults.

use std::fs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::progress::{CompletionFilter, SortMode};

use super::file::Store;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPrefs {
    pub query: String,
    pub filter: CompletionFilter,
    pub sort: SortMode,
}

impl Store {
    /// Load preferences, defaulting on a missing or unreadable file.
    pub fn load_prefs(&self) -> UiPrefs {
        let Ok(raw) = fs::read_to_string(self.prefs_path()) else {
            return UiPrefs::default();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Persist preferences beside the progress file.
    pub fn save_prefs(&self, prefs: &UiPrefs) -> Result<()> {
        let serialized =
            serde_json::to_string_pretty(prefs).context("failed to serialize preferences")?;
        fs::write(self.prefs_path(), serialized).context("failed to write preferences file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prefs_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let prefs = UiPrefs {
            query: "monet".to_string(),
            filter: CompletionFilter::CompleteOnly,
            sort: SortMode::Completion,
        };
        store.save_prefs(&prefs).unwrap();
        assert_eq!(store.load_prefs(), prefs);
    }

    #[test]
    fn missing_or_corrupt_prefs_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        assert_eq!(store.load_prefs(), UiPrefs::default());

        fs::write(dir.path().join("ui_prefs.json"), "not json").unwrap();
        assert_eq!(store.load_prefs(), UiPrefs::default());
    }

    #[test]
    fn partial_prefs_fill_in_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ui_prefs.json"), r#"{"query": "deg"}"#).unwrap();
        let prefs = Store::at(dir.path()).load_prefs();
        assert_eq!(prefs.query, "deg");
        assert_eq!(prefs.filter, CompletionFilter::All);
        assert_eq!(prefs.sort, SortMode::ListOrder);
    }
}
