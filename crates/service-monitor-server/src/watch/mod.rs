//! Roster file watching.
//!
//! The watcher polls the file's modification time and reloads only when it
//! changes. `bootstrap` prepares the file and the first roster at startup.

pub mod bootstrap;
pub mod watcher;

pub use bootstrap::{prepare_roster, Bootstrap};
pub use watcher::{read_roster, PollOutcome, RosterWatcher, WatchState};
