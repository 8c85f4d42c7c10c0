// crates/vidpress-media/src/runner.rs
//
// Launches the transcode child process and follows its stderr status stream.
//
// Stream handling: ffmpeg rewrites its status line in place using carriage
// returns, so a plain BufRead::lines() would sit on one giant "line" until
// the process exits. A dedicated reader thread reassembles lines on both
// `\r` and `\n` and forwards them over a channel; the main loop polls the
// child and the cancel flag between drains, which bounds how long a cancel
// can take regardless of how chatty the child is.
//
// Callback contract: on_progress fires serially from this thread, values are
// monotonically non-decreasing, the final call lands exactly on total_secs,
// and nothing fires after a failure or cancellation.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{ChildStderr, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Sender};

use vidpress_core::{Error, Result};

use crate::progress::{parse_progress_line, ProgressState};

/// How many trailing stderr lines are kept for failure reports.
const STDERR_TAIL_LINES: usize = 12;

/// Poll interval for child exit and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run `program` with `args` until it exits, reporting elapsed seconds.
///
/// Blocks the calling thread. The output file is whatever the child wrote;
/// on any `Err` the caller must not touch it.
pub fn run_transcode(
    program: &Path,
    args: &[String],
    total_secs: f64,
    cancel: &Arc<AtomicBool>,
    mut on_progress: impl FnMut(f64),
) -> Result<()> {
    let tool = program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string_lossy().into_owned());

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::SpawnFailed { tool: tool.clone(), source: e })?;

    tracing::debug!(%tool, pid = child.id(), "transcode child started");

    // Reader thread: owns the pipe, exits at EOF (which the kill on the
    // cancel path also produces). Dropping its sender ends the drain below.
    let (line_tx, line_rx) = unbounded::<String>();
    let reader = child.stderr.take().map(|stderr| {
        thread::spawn(move || drain_status_lines(stderr, line_tx))
    });

    let mut state = ProgressState::new(total_secs);
    let mut tail: VecDeque<String> = VecDeque::new();

    let status = loop {
        for line in line_rx.try_iter() {
            push_tail(&mut tail, line.clone());
            if let Some(secs) = parse_progress_line(&line) {
                if let Some(advanced) = state.observe(secs) {
                    on_progress(advanced);
                }
            }
        }

        if cancel.load(Ordering::Relaxed) {
            tracing::info!(%tool, "cancel requested, killing transcode child");
            let _ = child.kill();
            let _ = child.wait();
            if let Some(handle) = reader {
                let _ = handle.join();
            }
            return Err(Error::Cancelled);
        }

        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                if let Some(handle) = reader {
                    let _ = handle.join();
                }
                return Err(Error::SpawnFailed { tool, source: e });
            }
        }
    };

    // The child is gone; let the reader hit EOF, then drain what is left.
    if let Some(handle) = reader {
        let _ = handle.join();
    }
    for line in line_rx.try_iter() {
        push_tail(&mut tail, line.clone());
        if status.success() {
            if let Some(secs) = parse_progress_line(&line) {
                if let Some(advanced) = state.observe(secs) {
                    on_progress(advanced);
                }
            }
        }
    }

    if !status.success() {
        return Err(Error::ToolFailed {
            tool,
            code: status.code(),
            stderr_tail: tail.iter().cloned().collect::<Vec<_>>().join("\n"),
        });
    }

    // The last status line ffmpeg prints can be a fraction of a frame short
    // of the clip duration; force the indicator to 100% before returning.
    on_progress(state.finish());
    tracing::debug!(%tool, total_secs, "transcode child finished cleanly");
    Ok(())
}

/// Read the child's stderr byte stream, reassembling lines on `\r` or `\n`,
/// and forward each non-empty line. Runs until EOF or a read error.
fn drain_status_lines(stderr: ChildStderr, tx: Sender<String>) {
    let mut reader = std::io::BufReader::new(stderr);
    let mut line: Vec<u8> = Vec::new();
    let mut buf = [0u8; 512];

    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if byte == b'\r' || byte == b'\n' {
                        if !line.is_empty() {
                            let text = String::from_utf8_lossy(&line).into_owned();
                            line.clear();
                            if tx.send(text).is_err() {
                                return;
                            }
                        }
                    } else {
                        line.push(byte);
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    if !line.is_empty() {
        let _ = tx.send(String::from_utf8_lossy(&line).into_owned());
    }
}

fn push_tail(tail: &mut VecDeque<String>, line: String) {
    if tail.len() == STDERR_TAIL_LINES {
        tail.pop_front();
    }
    tail.push_back(line);
}
