// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use tempfile::tempdir;
use tokio::io::DuplexStream;

fn pipe() -> (AgentOutput, DuplexStream) {
    let (reader, writer) = tokio::io::duplex(4096);
    (Box::new(reader), writer)
}

fn events() -> (mpsc::Sender<SupervisorEvent>, mpsc::Receiver<SupervisorEvent>) {
    mpsc::channel(16)
}

/// Poll until the file reaches `len` bytes (the capture runs concurrently).
async fn wait_for_len(path: &Path, len: u64) {
    for _ in 0..200 {
        if std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) >= len {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("trace never reached {len} bytes");
}

#[tokio::test]
async fn chunks_are_written_immediately() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, mut writer) = pipe();
    let (tx, _rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);

    writer.write_all(b"first line\n").await.unwrap();
    wait_for_len(&path, 11).await;
    writer.write_all(b"second line\n").await.unwrap();
    wait_for_len(&path, 23).await;

    let report = capture.stop().await;
    assert!(matches!(report.outcome, TraceOutcome::Cancelled));
    assert_eq!(report.bytes, 23);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "first line\nsecond line\n"
    );
}

#[tokio::test]
async fn trace_file_is_appended_not_truncated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    std::fs::write(&path, b"previous run\n").unwrap();
    let (output, mut writer) = pipe();
    let (tx, _rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);
    writer.write_all(b"next run\n").await.unwrap();
    drop(writer);
    wait_for_len(&path, 22).await;

    let report = capture.stop().await;
    assert_eq!(report.bytes, 9);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "previous run\nnext run\n"
    );
}

#[tokio::test]
async fn no_bytes_are_written_after_stop_returns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, mut writer) = pipe();
    let (tx, _rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);
    writer.write_all(b"before stop\n").await.unwrap();
    wait_for_len(&path, 12).await;

    capture.stop().await;
    let len_at_stop = std::fs::metadata(&path).unwrap().len();

    // The slow producer keeps going; the stream is closed on our side.
    let late = writer.write_all(b"after stop\n").await;
    assert!(late.is_err(), "reader end should be closed");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(std::fs::metadata(&path).unwrap().len(), len_at_stop);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "before stop\n");
}

#[tokio::test]
async fn stop_keeps_output_already_in_the_pipe() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, mut writer) = pipe();
    let (tx, _rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);
    writer.write_all(b"started\n").await.unwrap();
    wait_for_len(&path, 8).await;

    // Written but not yet read when the stop request arrives
    writer.write_all(b"final shutdown diagnostics\n").await.unwrap();
    let report = capture.stop().await;

    assert!(matches!(report.outcome, TraceOutcome::Cancelled));
    assert_eq!(report.bytes, 35);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "started\nfinal shutdown diagnostics\n"
    );
}

#[tokio::test]
async fn stop_drains_until_the_agent_closes_its_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, mut writer) = pipe();
    let (tx, mut rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);
    for _ in 0..200 {
        if path.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(path.exists(), "trace file never opened");

    // The agent answers termination with a last line, then exits
    let agent = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        writer.write_all(b"terminating\n").await.unwrap();
        drop(writer);
    });
    let started = std::time::Instant::now();
    let report = capture.stop().await;
    agent.await.unwrap();

    assert!(started.elapsed() < DRAIN_GRACE);
    assert!(matches!(report.outcome, TraceOutcome::Cancelled));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "terminating\n");
    // Still a requested stop: no unsolicited end is reported
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn stop_does_not_wait_for_a_silent_agent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, _writer) = pipe();
    let (tx, _rx) = events();

    let capture = TraceCapture::spawn(output, path, InstanceId::new(1), tx);

    let report = tokio::time::timeout(Duration::from_secs(2), capture.stop())
        .await
        .expect("stop blocked on a silent stream");
    assert!(matches!(report.outcome, TraceOutcome::Cancelled));
    assert_eq!(report.bytes, 0);
}

#[tokio::test]
async fn end_of_stream_reports_trace_ended() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, mut writer) = pipe();
    let (tx, mut rx) = events();

    let capture = TraceCapture::spawn(output, path, InstanceId::new(4), tx);
    writer.write_all(b"bye\n").await.unwrap();
    drop(writer);

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.instance, InstanceId::new(4));
    assert_eq!(
        event.kind,
        EventKind::TraceEnded {
            end: TraceEnd::EndOfStream,
            bytes: 4
        }
    );
    assert!(matches!(capture.stop().await.outcome, TraceOutcome::EndOfStream));
}

#[tokio::test]
async fn open_failure_is_reported_not_raised() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("agent.trace");
    let (output, _writer) = pipe();
    let (tx, mut rx) = events();

    let capture = TraceCapture::spawn(output, path.clone(), InstanceId::new(1), tx);

    let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        event.kind,
        EventKind::TraceEnded {
            end: TraceEnd::Failed(_),
            bytes: 0
        }
    ));
    let report = capture.stop().await;
    assert!(matches!(
        report.outcome,
        TraceOutcome::Failed(TraceError::Open { .. })
    ));
    assert!(!path.exists());
}

#[tokio::test]
async fn cancelled_capture_sends_no_event() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    let (output, _writer) = pipe();
    let (tx, mut rx) = events();

    let capture = TraceCapture::spawn(output, path, InstanceId::new(1), tx);
    capture.stop().await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn read_tail_returns_last_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.trace");
    std::fs::write(&path, b"0123456789").unwrap();

    assert_eq!(read_tail(&path, 4).await.unwrap(), b"6789");
    assert_eq!(read_tail(&path, 100).await.unwrap(), b"0123456789");
}

#[tokio::test]
async fn read_tail_of_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let tail = read_tail(&dir.path().join("nope.trace"), DEFAULT_TAIL_BYTES)
        .await
        .unwrap();
    assert!(tail.is_empty());
}
