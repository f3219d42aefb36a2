// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fdk trace` - print the tail of the agent's trace file

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use fdk_engine::trace::{read_tail, DEFAULT_TAIL_BYTES};
use fdk_storage::StateStore;

use crate::client::DaemonControl;

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Number of trailing bytes to print
    #[arg(long, default_value_t = DEFAULT_TAIL_BYTES)]
    pub bytes: u64,
}

pub async fn handle(args: TraceArgs) -> Result<()> {
    let control = DaemonControl::load()?;
    let Some(path) = control.store().load()?.trace_path else {
        bail!("no trace file configured; start the agent with --command first");
    };

    // Trace output is raw agent bytes, not necessarily UTF-8
    let tail = read_tail(Path::new(&path), args.bytes).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&tail)?;
    stdout.flush()?;
    Ok(())
}
