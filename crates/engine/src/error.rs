// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the supervision engine

use fdk_adapters::ProcessError;
use fdk_core::ConfigError;
use fdk_storage::StoreError;
use thiserror::Error;

/// Errors surfaced by supervisor operations
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("invalid agent configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("no agent configuration has been persisted")]
    NotConfigured,
    #[error("agent spawn failed: {0}")]
    Spawn(#[from] ProcessError),
    #[error("desired state not persisted: {0}")]
    Persist(#[from] StoreError),
}
