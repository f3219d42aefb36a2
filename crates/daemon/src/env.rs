// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: FDK_STATE_DIR > XDG_STATE_HOME/fdk > ~/.local/state/fdk
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("FDK_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("fdk"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/fdk"))
}

/// Run without a desktop notification (`FDK_NO_NOTIFY=1`), e.g. on headless hosts
pub fn notifications_disabled() -> bool {
    matches!(
        std::env::var("FDK_NO_NOTIFY").as_deref(),
        Ok("1") | Ok("true")
    )
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
