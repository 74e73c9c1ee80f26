//! Startup preparation of the roster file.
//!
//! Nothing here fails: a missing directory or file is created when possible,
//! and an unloadable roster falls back to [`Roster::fallback`].

use std::path::Path;

use service_monitor_core::{roster, Roster};

use super::watcher::WatchState;

pub struct Bootstrap {
    pub roster: Roster,
    pub watch_state: WatchState,
}

pub fn prepare_roster(path: &Path) -> Bootstrap {
    if let Err(e) = roster::ensure_parent_dir(path) {
        tracing::error!(code = e.kind().as_str(), error = %e, "creating config directory failed");
    }
    if let Err(e) = roster::write_default_if_missing(path) {
        tracing::error!(code = e.kind().as_str(), error = %e, "writing default config failed");
    }

    let roster = match roster::load_from_file(path) {
        Ok(r) => {
            tracing::info!(up = r.up.len(), down = r.down.len(), "loaded initial config");
            r
        }
        Err(e) => {
            tracing::warn!(code = e.kind().as_str(), error = %e, "initial config load failed, using fallback");
            Roster::fallback()
        }
    };

    Bootstrap {
        roster,
        watch_state: WatchState::observe(path),
    }
}
