//! Persistence module split across logical submodules.

mod artists;
mod file;
mod prefs;

pub use artists::{
    commit_subset_reorder, create_artist, delete_artist, reset_all, set_all_steps, set_step,
};
pub use file::{normalize_record, Store};
pub use prefs::UiPrefs;
