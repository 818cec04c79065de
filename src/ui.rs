//! Ratatui front-end for the artist progress tracker. The list screen shows
//! one card per artist with a progress gauge; the detail screen is the full
//! checklist. Modal dialogs handle creation, deletion, reset, and search.

mod app;
mod forms;
mod helpers;
mod screens;
mod session;
mod terminal;

pub use app::App;
pub use terminal::run_app;
