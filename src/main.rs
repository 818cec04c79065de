//! Binary entry point that glues the JSON-backed progress store to the TUI.
//! Bootstrapping is a straight line: open the data directory, load and heal
//! the progress file, restore the UI preferences, pick the reorder strategy,
//! and drive the Ratatui event loop until the user exits.

use listing_tracker::{run_app, select_reorderer, App, Store};

/// Initialize persistence, load cached data, and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let store = Store::open()?;
    let data = store.load()?;
    let prefs = store.load_prefs();

    let swap_only = std::env::var_os("LISTING_TRACKER_SWAP_ONLY").is_some();
    let reorderer = select_reorderer(swap_only);

    let mut app = App::new(store, data, prefs, reorderer);
    run_app(&mut app)
}
