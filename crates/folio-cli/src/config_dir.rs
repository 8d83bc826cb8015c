// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config file resolution.

use std::path::PathBuf;

use folio_core::config::CONFIG_FILE;

/// Default location of the config file.
///
/// `$XDG_CONFIG_HOME/folio/config.json`, falling back to
/// `~/.config/folio/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs_fallback().join("folio").join(CONFIG_FILE)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
