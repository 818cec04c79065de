//! Completion math and the filter/sort engine for the artist list. All of it
//! is pure: the UI recomputes the visible list from the collection after
//! every mutation instead of caching derived state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::{COLUMN_STEPS, GLOBAL_STEPS, VARIANTS};
use crate::models::ArtistProgress;

/// Count checked steps and the checklist size by walking the catalogs, so an
/// un-normalized record still yields the fixed 63-step total and absent keys
/// count as unchecked.
pub fn calc_done_total(artist: &ArtistProgress) -> (usize, usize) {
    let mut done = 0;
    let mut total = 0;
    for gs in &GLOBAL_STEPS {
        total += 1;
        if artist.step(None, gs.key) {
            done += 1;
        }
    }
    for variant in &VARIANTS {
        for cs in &COLUMN_STEPS {
            total += 1;
            if artist.step(Some(variant.key), cs.key) {
                done += 1;
            }
        }
    }
    (done, total)
}

/// Completed means every single step is checked.
pub fn is_completed(artist: &ArtistProgress) -> bool {
    let (done, total) = calc_done_total(artist);
    total > 0 && done == total
}

/// Fraction of checked steps in 0.0..=1.0. The total can never actually be
/// zero given the fixed catalogs, but the guard stays.
pub fn completion_ratio(artist: &ArtistProgress) -> f64 {
    let (done, total) = calc_done_total(artist);
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    }
}

/// Completion-state filter applied after the text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionFilter {
    #[default]
    All,
    IncompleteOnly,
    CompleteOnly,
}

impl CompletionFilter {
    pub fn label(self) -> &'static str {
        match self {
            CompletionFilter::All => "All",
            CompletionFilter::IncompleteOnly => "Incomplete only",
            CompletionFilter::CompleteOnly => "Complete only",
        }
    }

    /// Cycle to the next filter, for a single-key toggle in the UI.
    pub fn next(self) -> Self {
        match self {
            CompletionFilter::All => CompletionFilter::IncompleteOnly,
            CompletionFilter::IncompleteOnly => CompletionFilter::CompleteOnly,
            CompletionFilter::CompleteOnly => CompletionFilter::All,
        }
    }
}

/// Display order of the filtered list, independent of the persisted `order`
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    ListOrder,
    Label,
    Completion,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::ListOrder => "List order",
            SortMode::Label => "Label (A-Z)",
            SortMode::Completion => "Progress (high-low)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortMode::ListOrder => SortMode::Label,
            SortMode::Label => SortMode::Completion,
            SortMode::Completion => SortMode::ListOrder,
        }
    }
}

/// Apply the text filter, then the completion filter. The text match is a
/// case-insensitive substring check against the label; a blank query matches
/// everything.
pub fn filter_artists<'a>(
    all: &[&'a ArtistProgress],
    query: &str,
    filter: CompletionFilter,
) -> Vec<&'a ArtistProgress> {
    let mut result: Vec<&ArtistProgress> = all.to_vec();

    let q = query.trim().to_lowercase();
    if !q.is_empty() {
        result.retain(|a| a.label.to_lowercase().contains(&q));
    }

    match filter {
        CompletionFilter::All => {}
        CompletionFilter::IncompleteOnly => result.retain(|a| !is_completed(a)),
        CompletionFilter::CompleteOnly => result.retain(|a| is_completed(a)),
    }

    result
}

/// Sort the filtered list in place. Every branch uses a stable sort so equal
/// keys keep their relative order from the input.
pub fn sort_artists(list: &mut [&ArtistProgress], mode: SortMode) {
    match mode {
        SortMode::ListOrder => list.sort_by_key(|a| a.order),
        SortMode::Label => list.sort_by_key(|a| a.label.to_lowercase()),
        SortMode::Completion => list.sort_by(|a, b| {
            completion_ratio(b)
                .partial_cmp(&completion_ratio(a))
                .unwrap_or(Ordering::Equal)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TOTAL_STEPS;

    fn artist(label: &str, order: i64) -> ArtistProgress {
        ArtistProgress::new(label, order)
    }

    fn completed(label: &str, order: i64) -> ArtistProgress {
        let mut a = artist(label, order);
        a.set_all_steps(true);
        a
    }

    #[test]
    fn fresh_artist_counts_zero_of_sixty_three() {
        let a = artist("Monet", 1);
        assert_eq!(calc_done_total(&a), (0, TOTAL_STEPS));
        assert!(!is_completed(&a));
        assert_eq!(completion_ratio(&a), 0.0);
    }

    #[test]
    fn fully_checked_artist_is_completed() {
        let a = completed("Monet", 1);
        assert_eq!(calc_done_total(&a), (TOTAL_STEPS, TOTAL_STEPS));
        assert!(is_completed(&a));
        assert_eq!(completion_ratio(&a), 1.0);
    }

    #[test]
    fn text_and_completion_filters_compose_by_intersection() {
        let monet = completed("Claude Monet", 1);
        let mondrian = artist("Piet Mondrian", 2);
        let degas = completed("Edgar Degas", 3);
        let all = [&monet, &mondrian, &degas];

        let hits = filter_artists(&all, "MON", CompletionFilter::CompleteOnly);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "Claude Monet");
    }

    #[test]
    fn blank_query_matches_everything() {
        let a = artist("A", 1);
        let b = artist("B", 2);
        let all = [&a, &b];
        assert_eq!(filter_artists(&all, "   ", CompletionFilter::All).len(), 2);
    }

    #[test]
    fn completion_sort_is_stable_on_ties() {
        let first = artist("First", 5);
        let second = artist("Second", 2);
        let done = completed("Done", 9);
        let mut list = vec![&first, &second, &done];
        sort_artists(&mut list, SortMode::Completion);
        assert_eq!(list[0].label, "Done");
        // Equal ratios keep their input order.
        assert_eq!(list[1].label, "First");
        assert_eq!(list[2].label, "Second");
    }

    #[test]
    fn label_sort_ignores_case() {
        let a = artist("renoir", 1);
        let b = artist("Degas", 2);
        let mut list = vec![&a, &b];
        sort_artists(&mut list, SortMode::Label);
        assert_eq!(list[0].label, "Degas");
    }
}
