//! Flat-file JSON store. The whole collection is rewritten on every mutation;
//! there is no locking or merging, the process is assumed to be the only
//! writer for the lifetime of a session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde_json::Value;

use crate::catalog::{COLUMN_STEPS, GLOBAL_STEPS, VARIANTS};
use crate::models::{empty_global_steps, ArtistProgress, Collection, ORDER_SENTINEL};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".listing-tracker";
/// Progress collection file inside the application data directory.
const DATA_FILE_NAME: &str = "progress.json";
/// Persisted filter/sort/search preferences, kept beside the data file.
const PREFS_FILE_NAME: &str = "ui_prefs.json";

/// Handle to the on-disk store. Holds resolved paths only; every operation
/// opens, rewrites, and closes the file synchronously.
pub struct Store {
    data_path: PathBuf,
    prefs_path: PathBuf,
}

impl Store {
    /// Resolve the store inside the user's home directory, creating the data
    /// directory if needed.
    pub fn open() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        let dir = base_dirs.home_dir().join(DATA_DIR_NAME);
        fs::create_dir_all(&dir).context("failed to create data directory")?;
        Ok(Self::at(&dir))
    }

    /// Store rooted at an explicit directory. Used by tests and useful for
    /// portable installs.
    pub fn at(dir: &Path) -> Self {
        Self {
            data_path: dir.join(DATA_FILE_NAME),
            prefs_path: dir.join(PREFS_FILE_NAME),
        }
    }

    pub(crate) fn prefs_path(&self) -> &Path {
        &self.prefs_path
    }

    /// Read the collection, normalizing every record against the fixed
    /// catalogs, then immediately persist the normalized form so old or
    /// hand-edited files heal themselves on first read. A missing file is an
    /// empty collection.
    pub fn load(&self) -> Result<Collection> {
        if !self.data_path.exists() {
            return Ok(Collection::new());
        }

        let raw_text =
            fs::read_to_string(&self.data_path).context("failed to read progress file")?;
        let raw: serde_json::Map<String, Value> =
            serde_json::from_str(&raw_text).context("progress file is not a JSON object")?;

        let mut data = Collection::new();
        for (key, value) in &raw {
            if let Some(artist) = normalize_record(key, value) {
                data.insert(artist.id.clone(), artist);
            }
        }

        self.save(&data)?;
        Ok(data)
    }

    /// Serialize and overwrite the whole collection. Last writer wins.
    pub fn save(&self, data: &Collection) -> Result<()> {
        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
        let serialized =
            serde_json::to_string_pretty(data).context("failed to serialize progress data")?;
        fs::write(&self.data_path, serialized).context("failed to write progress file")?;
        Ok(())
    }

    /// Delete the persisted collection outright.
    pub fn reset(&self) -> Result<()> {
        if self.data_path.exists() {
            fs::remove_file(&self.data_path).context("failed to delete progress file")?;
        }
        Ok(())
    }
}

/// Rebuild one artist record from an untyped persisted entry.
///
/// Missing or blank `id`/`label` fall back to the storage key, a missing
/// `order` gets the sort-last sentinel, step maps are rebuilt against the
/// catalogs (absent or non-boolean values become false, unknown keys are
/// dropped). Returns `None` when the entry is not an object at all.
pub fn normalize_record(storage_key: &str, raw: &Value) -> Option<ArtistProgress> {
    let obj = raw.as_object()?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| storage_key.trim())
        .to_string();
    let label = obj
        .get("label")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&id)
        .to_string();
    let order = obj.get("order").and_then(Value::as_i64).unwrap_or(ORDER_SENTINEL);

    let mut global_steps = empty_global_steps();
    for gs in &GLOBAL_STEPS {
        let checked = obj
            .get("global_steps")
            .and_then(|g| g.get(gs.key))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        global_steps.insert(gs.key.to_string(), checked);
    }

    let mut variants = std::collections::BTreeMap::new();
    for variant in &VARIANTS {
        let mut steps = std::collections::BTreeMap::new();
        for cs in &COLUMN_STEPS {
            let checked = obj
                .get("variants")
                .and_then(|v| v.get(variant.key))
                .and_then(|steps| steps.get(cs.key))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            steps.insert(cs.key.to_string(), checked);
        }
        variants.insert(variant.key.to_string(), steps);
    }

    Some(ArtistProgress {
        id,
        label,
        order,
        global_steps,
        variants,
    })
}
