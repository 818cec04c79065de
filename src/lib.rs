//! Core library surface for the artist progress tracker TUI.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the step catalogs, the progress records, the persistence layer,
//! and the interactive application.

pub mod catalog;
pub mod error;
pub mod models;
pub mod progress;
pub mod reorder;
pub mod store;
pub mod ui;

/// The primary domain types that other layers manipulate.
pub use models::{ArtistProgress, Collection};

/// Domain error cases surfaced to the user.
pub use error::TrackerError;

/// Ordering primitives, including the strategy picked at startup.
pub use reorder::{apply_subset_reorder, select_reorderer, Reorderer};

/// Persistence entry points used by `main.rs` to hydrate the app.
pub use store::{Store, UiPrefs};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
