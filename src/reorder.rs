//! Reordering of a filtered view. The visible subset's slots within the full
//! ordering are fixed; a reorder only changes which artist occupies which of
//! those slots, so artists hidden by the active filter never move.

use std::collections::HashSet;

use crate::models::Collection;

/// Splice a reordered visible subset back into the full ordering.
///
/// `subset_ids_new_order` must contain exactly the ids of the slots being
/// reordered, in their new relative order. If any id is missing from the
/// collection (stale submission, e.g. a delete raced the reorder) the whole
/// operation is rejected and nothing changes.
///
/// Returns whether the full ordering changed. On change, every artist's
/// `order` is rewritten to its dense 1-based index and the caller is expected
/// to persist.
pub fn apply_subset_reorder(data: &mut Collection, subset_ids_new_order: &[String]) -> bool {
    let mut ordered: Vec<(i64, String)> =
        data.values().map(|a| (a.order, a.id.clone())).collect();
    ordered.sort_by_key(|(order, _)| *order);
    let full_ids: Vec<String> = ordered.into_iter().map(|(_, id)| id).collect();

    let subset: HashSet<&str> = subset_ids_new_order.iter().map(String::as_str).collect();
    let positions: Vec<usize> = full_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| subset.contains(id.as_str()))
        .map(|(idx, _)| idx)
        .collect();

    // Count mismatch means the subset drifted from the collection since it
    // was rendered. Reject rather than guess.
    if positions.len() != subset_ids_new_order.len() {
        return false;
    }

    let mut new_full = full_ids.clone();
    for (j, pos) in positions.into_iter().enumerate() {
        new_full[pos] = subset_ids_new_order[j].clone();
    }

    let changed = new_full != full_ids;
    if changed {
        for (idx, id) in new_full.iter().enumerate() {
            if let Some(artist) = data.get_mut(id) {
                artist.order = (idx + 1) as i64;
            }
        }
    }
    changed
}

/// Strategy seam between the two reorder interactions: the grab-and-move
/// commit and the plain adjacent swap. Selected once at startup from a
/// capability flag so rendering code never branches on it.
pub trait Reorderer {
    /// Whether the interactive grab mode is available.
    fn supports_grab(&self) -> bool;

    /// Move the artist at `from` (an index into `visible_ids`) to `to`,
    /// keeping everything outside the visible subset in place. Returns
    /// whether the full ordering changed.
    fn reorder(
        &self,
        data: &mut Collection,
        visible_ids: &[String],
        from: usize,
        to: usize,
    ) -> bool;
}

/// Commit a grab-and-move: the held artist is pulled out of the visible
/// sequence and reinserted at the drop position, then the whole subset is
/// spliced back into the full ordering.
pub struct GrabReorderer;

impl Reorderer for GrabReorderer {
    fn supports_grab(&self) -> bool {
        true
    }

    fn reorder(
        &self,
        data: &mut Collection,
        visible_ids: &[String],
        from: usize,
        to: usize,
    ) -> bool {
        if from >= visible_ids.len() || to >= visible_ids.len() || from == to {
            return false;
        }
        let mut new_ids = visible_ids.to_vec();
        let held = new_ids.remove(from);
        new_ids.insert(to, held);
        apply_subset_reorder(data, &new_ids)
    }
}

/// Fallback that only swaps an artist with its visible neighbor. Used when
/// the grab interaction is disabled.
pub struct SwapReorderer;

impl Reorderer for SwapReorderer {
    fn supports_grab(&self) -> bool {
        false
    }

    fn reorder(
        &self,
        data: &mut Collection,
        visible_ids: &[String],
        from: usize,
        to: usize,
    ) -> bool {
        if from >= visible_ids.len() || to >= visible_ids.len() {
            return false;
        }
        if from.abs_diff(to) != 1 {
            return false;
        }
        let mut new_ids = visible_ids.to_vec();
        new_ids.swap(from, to);
        apply_subset_reorder(data, &new_ids)
    }
}

/// Pick the reorder strategy from the capability flag checked at startup.
pub fn select_reorderer(swap_only: bool) -> &'static dyn Reorderer {
    if swap_only {
        &SwapReorderer
    } else {
        &GrabReorderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArtistProgress;

    /// Collection of artists labelled A..: ids equal the labels so the
    /// expected sequences read naturally.
    fn collection(labels: &[&str]) -> Collection {
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let mut artist = ArtistProgress::new(label, (idx + 1) as i64);
                artist.id = label.to_string();
                (artist.id.clone(), artist)
            })
            .collect()
    }

    fn full_order(data: &Collection) -> Vec<String> {
        let mut ordered: Vec<(i64, String)> =
            data.values().map(|a| (a.order, a.id.clone())).collect();
        ordered.sort_by_key(|(order, _)| *order);
        ordered.into_iter().map(|(_, id)| id).collect()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn subset_swap_preserves_hidden_slots() {
        let mut data = collection(&["A", "B", "C", "D", "E"]);
        assert!(apply_subset_reorder(&mut data, &ids(&["D", "B"])));
        assert_eq!(full_order(&data), ids(&["A", "D", "C", "B", "E"]));
        // Orders are renumbered densely.
        let orders: Vec<i64> = full_order(&data)
            .iter()
            .map(|id| data[id].order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn stale_subset_is_rejected_without_mutation() {
        let mut data = collection(&["A", "B", "C"]);
        let before = data.clone();
        assert!(!apply_subset_reorder(&mut data, &ids(&["B", "GONE"])));
        assert_eq!(data, before);
    }

    #[test]
    fn tiny_subsets_are_no_ops() {
        let mut data = collection(&["A", "B", "C"]);
        assert!(!apply_subset_reorder(&mut data, &[]));
        assert!(!apply_subset_reorder(&mut data, &ids(&["B"])));
        assert_eq!(full_order(&data), ids(&["A", "B", "C"]));
    }

    #[test]
    fn unchanged_subset_order_reports_no_change() {
        let mut data = collection(&["A", "B", "C"]);
        assert!(!apply_subset_reorder(&mut data, &ids(&["A", "C"])));
    }

    #[test]
    fn grab_moves_within_filtered_view_only() {
        // Visible subset {A, C, E}; move A to the end of the subset.
        let mut data = collection(&["A", "B", "C", "D", "E"]);
        let visible = ids(&["A", "C", "E"]);
        assert!(GrabReorderer.reorder(&mut data, &visible, 0, 2));
        assert_eq!(full_order(&data), ids(&["C", "B", "E", "D", "A"]));
    }

    #[test]
    fn swap_refuses_non_adjacent_moves() {
        let mut data = collection(&["A", "B", "C"]);
        let visible = ids(&["A", "B", "C"]);
        assert!(!SwapReorderer.reorder(&mut data, &visible, 0, 2));
        assert!(SwapReorderer.reorder(&mut data, &visible, 0, 1));
        assert_eq!(full_order(&data), ids(&["B", "A", "C"]));
    }
}
