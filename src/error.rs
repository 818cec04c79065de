//! Typed domain errors. Everything here is recoverable: the UI surfaces the
//! message in the footer and leaves the collection untouched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Creation-time soft uniqueness check failed. Comparison is against the
    /// whitespace-normalized, lowercased label, not a storage constraint.
    #[error("An artist named '{0}' is already on the list.")]
    DuplicateLabel(String),

    #[error("Artist name must not be empty.")]
    BlankLabel,

    /// The requested id is not in the collection, e.g. after a concurrent
    /// delete within the same session.
    #[error("Artist not found.")]
    UnknownArtist,
}
