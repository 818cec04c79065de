//! Collection-level mutations. Every function here follows the same shape:
//! validate, mutate the in-memory collection, persist the whole file, and
//! only then return. A returned error means nothing changed on disk.

use anyhow::Result;

use crate::error::TrackerError;
use crate::models::{normalize_label, ArtistProgress, Collection};
use crate::reorder::apply_subset_reorder;

use super::file::Store;

/// Create a new artist at the end of the list, returning the hydrated record
/// so the caller can focus it. Rejects blank labels and labels that collide
/// with an existing one after whitespace/case normalization.
pub fn create_artist(store: &Store, data: &mut Collection, label: &str) -> Result<ArtistProgress> {
    let label = label.trim();
    if label.is_empty() {
        return Err(TrackerError::BlankLabel.into());
    }

    let normalized = normalize_label(label);
    if data.values().any(|a| normalize_label(&a.label) == normalized) {
        return Err(TrackerError::DuplicateLabel(label.to_string()).into());
    }

    let max_order = data.values().map(|a| a.order).max().unwrap_or(0);
    let artist = ArtistProgress::new(label, max_order + 1);
    data.insert(artist.id.clone(), artist.clone());
    store.save(data)?;
    Ok(artist)
}

/// Remove an artist outright. No tombstone is kept and the id is never
/// reused, so re-adding the same label afterwards creates a fresh record.
pub fn delete_artist(store: &Store, data: &mut Collection, id: &str) -> Result<()> {
    if data.remove(id).is_none() {
        return Err(TrackerError::UnknownArtist.into());
    }
    store.save(data)?;
    Ok(())
}

/// Toggle-by-assignment for one step. `variant` is `None` for the global
/// steps.
pub fn set_step(
    store: &Store,
    data: &mut Collection,
    id: &str,
    variant: Option<&str>,
    step_key: &str,
    value: bool,
) -> Result<()> {
    let artist = data.get_mut(id).ok_or(TrackerError::UnknownArtist)?;
    artist.set_step(variant, step_key, value);
    store.save(data)?;
    Ok(())
}

/// Set or clear all 63 steps at once.
pub fn set_all_steps(store: &Store, data: &mut Collection, id: &str, value: bool) -> Result<()> {
    let artist = data.get_mut(id).ok_or(TrackerError::UnknownArtist)?;
    artist.set_all_steps(value);
    store.save(data)?;
    Ok(())
}

/// Splice a reordered visible subset into the full ordering and persist when
/// something actually moved. A stale subset is reported as "no change"
/// rather than an error.
pub fn commit_subset_reorder(
    store: &Store,
    data: &mut Collection,
    subset_ids_new_order: &[String],
) -> Result<bool> {
    let changed = apply_subset_reorder(data, subset_ids_new_order);
    if changed {
        store.save(data)?;
    }
    Ok(changed)
}

/// Wipe the persisted store and the in-memory collection.
pub fn reset_all(store: &Store, data: &mut Collection) -> Result<()> {
    store.reset()?;
    data.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_assigns_the_next_order_slot() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();

        let first = create_artist(&store, &mut data, "Monet").unwrap();
        let second = create_artist(&store, &mut data, "Degas").unwrap();
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_normalized_labels_are_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();

        create_artist(&store, &mut data, "Claude Monet").unwrap();
        let err = create_artist(&store, &mut data, "  claude   MONET ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::DuplicateLabel(_))
        ));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn blank_labels_are_rejected() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();
        let err = create_artist(&store, &mut data, "   ").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::BlankLabel)
        ));
    }

    #[test]
    fn delete_then_recreate_same_label_succeeds() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();

        let artist = create_artist(&store, &mut data, "Monet").unwrap();
        delete_artist(&store, &mut data, &artist.id).unwrap();
        assert!(store.load().unwrap().is_empty());

        let again = create_artist(&store, &mut data, "Monet").unwrap();
        assert_ne!(again.id, artist.id);
    }

    #[test]
    fn step_mutations_persist() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();
        let artist = create_artist(&store, &mut data, "Monet").unwrap();

        set_step(&store, &mut data, &artist.id, Some("dikey"), "etsy_yuklendi", true).unwrap();
        let reloaded = store.load().unwrap();
        assert!(reloaded[&artist.id].step(Some("dikey"), "etsy_yuklendi"));

        set_all_steps(&store, &mut data, &artist.id, true).unwrap();
        let reloaded = store.load().unwrap();
        assert!(crate::progress::is_completed(&reloaded[&artist.id]));
    }

    #[test]
    fn reorder_commit_only_saves_on_change() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();
        let a = create_artist(&store, &mut data, "A").unwrap();
        let b = create_artist(&store, &mut data, "B").unwrap();

        let unchanged = vec![a.id.clone(), b.id.clone()];
        assert!(!commit_subset_reorder(&store, &mut data, &unchanged).unwrap());

        let swapped = vec![b.id.clone(), a.id.clone()];
        assert!(commit_subset_reorder(&store, &mut data, &swapped).unwrap());
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded[&b.id].order, 1);
        assert_eq!(reloaded[&a.id].order, 2);
    }

    #[test]
    fn reset_clears_memory_and_disk() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        let mut data = Collection::new();
        create_artist(&store, &mut data, "Monet").unwrap();

        reset_all(&store, &mut data).unwrap();
        assert!(data.is_empty());
        assert!(store.load().unwrap().is_empty());
    }
}
