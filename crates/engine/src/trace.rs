// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trace capture: drains the agent's stdout into an append-only file.
//!
//! Every chunk is written and flushed as soon as it is read, so the trace can
//! be tailed live. Cancellation is raced against the read. Once a stop is
//! requested, output the agent has already produced is still drained until
//! end of stream or [`DRAIN_GRACE`] runs out, so stopping keeps the agent's
//! last words but never waits long on one that has gone quiet. Whatever way
//! the capture ends, both the stream and the file are closed before the task
//! completes.

use fdk_adapters::AgentOutput;
use fdk_core::{EventKind, InstanceId, SupervisorEvent, TraceEnd};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Read buffer size for a single burst
pub const TRACE_BUFFER_SIZE: usize = 2048;

/// Upper bound on draining pending output after a stop request
pub const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Default size of the trace tail shown to users
pub const DEFAULT_TAIL_BYTES: u64 = 20_000;

/// Errors from trace capture
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to open trace file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read agent output: {0}")]
    Read(std::io::Error),
    #[error("failed to write trace: {0}")]
    Write(std::io::Error),
    #[error("capture task failed: {0}")]
    Task(String),
}

/// How a capture ended
#[derive(Debug)]
pub enum TraceOutcome {
    /// Stopped on request
    Cancelled,
    /// The agent closed its output
    EndOfStream,
    Failed(TraceError),
}

/// Final report of a capture cycle
#[derive(Debug)]
pub struct TraceReport {
    pub outcome: TraceOutcome,
    /// Bytes appended to the trace file in this cycle
    pub bytes: u64,
}

/// A running capture cycle for one agent instance.
pub struct TraceCapture {
    path: PathBuf,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<TraceReport>,
}

impl TraceCapture {
    /// Start draining `output` into the file at `path` (append mode).
    ///
    /// If the capture ends without being stopped (end of stream or IO
    /// error), a `TraceEnded` event is reported on `events`.
    pub fn spawn(
        output: AgentOutput,
        path: PathBuf,
        instance: InstanceId,
        events: mpsc::Sender<SupervisorEvent>,
    ) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_capture(
            output,
            path.clone(),
            instance,
            cancel_rx,
            events,
        ));
        Self {
            path,
            cancel: Some(cancel_tx),
            task,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Signal the capture to stop and wait until it has fully exited.
    ///
    /// When this returns, the agent's stream and the trace file are both
    /// closed and no further bytes will be written.
    pub async fn stop(mut self) -> TraceReport {
        if let Some(cancel) = self.cancel.take() {
            // Err means the capture already finished on its own
            let _ = cancel.send(());
        }
        match self.task.await {
            Ok(report) => report,
            Err(e) => TraceReport {
                outcome: TraceOutcome::Failed(TraceError::Task(e.to_string())),
                bytes: 0,
            },
        }
    }
}

async fn run_capture(
    output: AgentOutput,
    path: PathBuf,
    instance: InstanceId,
    cancel: oneshot::Receiver<()>,
    events: mpsc::Sender<SupervisorEvent>,
) -> TraceReport {
    let report = capture(output, &path, cancel).await;

    let end = match &report.outcome {
        TraceOutcome::Cancelled => None,
        TraceOutcome::EndOfStream => Some(TraceEnd::EndOfStream),
        TraceOutcome::Failed(e) => Some(TraceEnd::Failed(e.to_string())),
    };
    if let Some(end) = end {
        let event = SupervisorEvent::new(
            instance,
            EventKind::TraceEnded {
                end,
                bytes: report.bytes,
            },
        );
        // Never block here: the supervisor may be waiting on this task.
        if let Err(e) = events.try_send(event) {
            debug!(%instance, error = %e, "trace end not delivered");
        }
    }
    report
}

async fn capture(
    mut output: AgentOutput,
    path: &Path,
    mut cancel: oneshot::Receiver<()>,
) -> TraceReport {
    let mut file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(source) => {
            warn!(path = %path.display(), error = %source, "failed to open trace file");
            return TraceReport {
                outcome: TraceOutcome::Failed(TraceError::Open {
                    path: path.to_path_buf(),
                    source,
                }),
                bytes: 0,
            };
        }
    };
    info!(path = %path.display(), "trace capture started");

    let mut buf = [0u8; TRACE_BUFFER_SIZE];
    let mut bytes: u64 = 0;
    let outcome = loop {
        tokio::select! {
            biased;
            // A dropped sender also counts as a stop request
            _ = &mut cancel => break drain(&mut output, &mut file, &mut buf, &mut bytes).await,
            read = output.read(&mut buf) => match read {
                Ok(0) => break TraceOutcome::EndOfStream,
                Ok(n) => {
                    if let Err(e) = write_chunk(&mut file, &buf[..n]).await {
                        break TraceOutcome::Failed(TraceError::Write(e));
                    }
                    bytes += n as u64;
                }
                Err(e) => break TraceOutcome::Failed(TraceError::Read(e)),
            },
        }
    };

    if let Err(e) = file.flush().await {
        warn!(path = %path.display(), error = %e, "failed to flush trace on close");
    }
    drop(file);
    drop(output);

    match &outcome {
        TraceOutcome::Failed(e) => warn!(path = %path.display(), bytes, error = %e, "trace capture failed"),
        _ => info!(path = %path.display(), bytes, outcome = ?outcome, "trace capture closed"),
    }
    TraceReport { outcome, bytes }
}

/// Copy what the agent still has in flight after a stop request.
///
/// Ends at end of stream (the agent was just terminated) or at the grace
/// deadline, whichever comes first.
async fn drain(
    output: &mut AgentOutput,
    file: &mut File,
    buf: &mut [u8],
    bytes: &mut u64,
) -> TraceOutcome {
    let deadline = Instant::now() + DRAIN_GRACE;
    loop {
        let read = tokio::time::timeout_at(deadline, output.read(buf)).await;
        match read {
            Err(_) => {
                debug!(bytes = *bytes, "drain grace elapsed before end of stream");
                return TraceOutcome::Cancelled;
            }
            Ok(Ok(0)) => return TraceOutcome::Cancelled,
            Ok(Ok(n)) => {
                if let Err(e) = write_chunk(file, &buf[..n]).await {
                    return TraceOutcome::Failed(TraceError::Write(e));
                }
                *bytes += n as u64;
            }
            Ok(Err(e)) => return TraceOutcome::Failed(TraceError::Read(e)),
        }
    }
}

async fn write_chunk(file: &mut File, chunk: &[u8]) -> std::io::Result<()> {
    file.write_all(chunk).await?;
    file.flush().await
}

/// Read the last `max_bytes` of a trace file.
///
/// Returns an empty buffer if the file does not exist yet.
pub async fn read_tail(path: &Path, max_bytes: u64) -> std::io::Result<Vec<u8>> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let len = file.metadata().await?.len();
    let start = len.saturating_sub(max_bytes);
    file.seek(SeekFrom::Start(start)).await?;

    let mut tail = Vec::with_capacity((len - start) as usize);
    file.read_to_end(&mut tail).await?;
    Ok(tail)
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
