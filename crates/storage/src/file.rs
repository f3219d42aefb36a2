// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed desired-state store.
//!
//! Each namespace is one small JSON document. Saves are atomic and durable:
//! write to `.tmp`, fsync, rename over the target, then fsync the directory,
//! so a crash right after `save()` returns cannot lose the written intent.
//!
//! Reads never touch the file. A corrupt document reads as the default state
//! and is moved aside to `.bak` by the next `save()`.

use crate::store::{StateStore, StoreError};
use chrono::{DateTime, Utc};
use fdk_core::DesiredState;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

/// On-disk record: the desired state plus a diagnostic timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    #[serde(flatten)]
    state: DesiredState,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

enum Parsed {
    Missing,
    Valid(StoredState),
    Corrupt(serde_json::Error),
}

/// Desired-state store persisted at `<dir>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: &Path, namespace: &str) -> Self {
        Self {
            path: dir.join(format!("{namespace}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last committed write, if recorded.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.read()?.and_then(|stored| stored.updated_at))
    }

    fn read(&self) -> Result<Option<StoredState>, StoreError> {
        match self.parse()? {
            Parsed::Missing => Ok(None),
            Parsed::Valid(stored) => Ok(Some(stored)),
            Parsed::Corrupt(e) => {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    "corrupt desired state, reading as default",
                );
                Ok(None)
            }
        }
    }

    fn parse(&self) -> Result<Parsed, StoreError> {
        if !self.path.exists() {
            return Ok(Parsed::Missing);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        Ok(match serde_json::from_reader(reader) {
            Ok(stored) => Parsed::Valid(stored),
            Err(e) => Parsed::Corrupt(e),
        })
    }

    /// Keep a corrupt document for inspection before it is overwritten.
    fn set_aside_corrupt(&self) -> Result<(), StoreError> {
        if let Parsed::Corrupt(e) = self.parse()? {
            let bak_path = rotate_bak_path(&self.path);
            warn!(
                error = %e,
                path = %self.path.display(),
                bak = %bak_path.display(),
                "moving corrupt desired state to .bak",
            );
            fs::rename(&self.path, &bak_path)?;
        }
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<DesiredState, StoreError> {
        Ok(self.read()?.map(|stored| stored.state).unwrap_or_default())
    }

    fn save(&self, state: &DesiredState) -> Result<(), StoreError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        if let Some(ref parent) = parent {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let stored = StoredState {
            state: state.clone(),
            updated_at: Some(Utc::now()),
        };

        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &stored)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }

        self.set_aside_corrupt()?;
        fs::rename(&tmp_path, &self.path)?;

        if let Some(parent) = parent {
            File::open(parent)?.sync_all()?;
        }

        Ok(())
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
