// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Timeout-bounded subprocess execution shared by the shell-out probes.
//!
//! `std::process` has no wait-with-deadline, so the child is polled with
//! `try_wait` while a reader thread drains stdout. Draining on a separate
//! thread keeps a chatty child (speed-test progress bars) from blocking
//! on a full pipe before it exits.
//!
//! The deadline also bounds the read: a grandchild that inherited stdout
//! can hold the pipe open long after the child itself has exited.

use crate::ProbeError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

/// How often the child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Time left to collect stdout when the child exits right at its deadline.
const READ_GRACE: Duration = Duration::from_millis(100);

/// Captured result of a finished child process.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    /// Stdout decoded lossily as UTF-8.
    pub stdout: String,
    /// Whether the child exited with a success status.
    pub success: bool,
}

/// Runs `program args..` and returns its stdout, killing it after `timeout`.
pub(crate) fn run_with_timeout(
    probe: &'static str,
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ProcessOutput, ProbeError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ProbeError::ProcessFailure {
            probe,
            detail: format!("cannot spawn '{program}': {e}"),
        })?;

    let mut stdout = child.stdout.take().ok_or_else(|| ProbeError::ProcessFailure {
        probe,
        detail: "stdout was not captured".to_string(),
    })?;
    let (bytes_tx, bytes_rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        let _ = bytes_tx.send(buf);
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!("{probe}: killed '{program}' after {timeout:?}");
                return Err(ProbeError::Timeout {
                    probe,
                    after: timeout,
                });
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(ProbeError::ProcessFailure {
                    probe,
                    detail: format!("waiting on '{program}': {e}"),
                });
            }
        }
    };

    let remaining = deadline.saturating_duration_since(Instant::now()).max(READ_GRACE);
    let bytes = match bytes_rx.recv_timeout(remaining) {
        Ok(bytes) => bytes,
        Err(RecvTimeoutError::Timeout) => {
            tracing::debug!("{probe}: '{program}' exited but its stdout stayed open");
            return Err(ProbeError::Timeout {
                probe,
                after: timeout,
            });
        }
        Err(RecvTimeoutError::Disconnected) => {
            return Err(ProbeError::ProcessFailure {
                probe,
                detail: "stdout reader thread panicked".to_string(),
            })
        }
    };

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&bytes).into_owned(),
        success: status.success(),
    })
}
