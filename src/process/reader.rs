//! Output reader threads
//!
//! One thread per monitored process. It drains the merged output pipe line by line,
//! decoding lossily, and finishes by publishing the single termination event.

use crate::process::supervisor::{RecordTable, SharedChild};
use crate::process::{EndReason, ProcessEvent};
use crate::types::ProcessId;
use std::io::{self, BufRead, BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How long to wait for a child to exit once its output has closed.
const REAP_GRACE: Duration = Duration::from_secs(1);
const REAP_POLL: Duration = Duration::from_millis(20);

/// Start the reader thread for `id`.
pub(crate) fn spawn_reader<R>(
    id: ProcessId,
    output: R,
    child: SharedChild,
    table: RecordTable,
    sender: Sender<ProcessEvent>,
) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name(format!("launchpad-output-{}", id.0))
        .spawn(move || {
            let pumped = panic::catch_unwind(AssertUnwindSafe(|| {
                pump_lines(id, output, &table, &sender)
            }));
            let reason = match pumped {
                Ok(Ok(())) if table.kill_requested(id) => EndReason::Killed,
                Ok(Ok(())) => EndReason::Eof,
                Ok(Err(err)) => {
                    warn!(process = %id, error = %err, "Reading process output failed");
                    EndReason::ReadError(err.to_string())
                }
                Err(_) => {
                    warn!(process = %id, "Output reader panicked");
                    EndReason::ReadError("output reader panicked".to_string())
                }
            };
            let exit_code = reap(&child);
            table.mark_terminated(id, exit_code, reason.clone());
            debug!(process = %id, ?exit_code, ?reason, "Process output closed");
            // The receiver is gone once the supervisor is dropped.
            let _ = sender.send(ProcessEvent::Ended {
                id,
                exit_code,
                reason,
            });
        })
}

fn pump_lines<R: Read>(
    id: ProcessId,
    output: R,
    table: &RecordTable,
    sender: &Sender<ProcessEvent>,
) -> io::Result<()> {
    let mut reader = BufReader::new(output);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(());
        }
        let line = decode_line(&buffer);
        table.append_output(id, line.clone());
        // Keep draining after the receiver is gone so the child never blocks on a full pipe.
        let _ = sender.send(ProcessEvent::Output { id, line });
    }
}

/// Decode one raw line, dropping the terminator.
pub(crate) fn decode_line(raw: &[u8]) -> String {
    let trimmed = raw
        .strip_suffix(b"\n")
        .map(|rest| rest.strip_suffix(b"\r").unwrap_or(rest))
        .unwrap_or(raw);
    String::from_utf8_lossy(trimmed).into_owned()
}

fn reap(child: &SharedChild) -> Option<i32> {
    let mut waited = Duration::ZERO;
    loop {
        match child.lock().try_wait() {
            Ok(Some(status)) => return status.code(),
            Ok(None) if waited < REAP_GRACE => {}
            Ok(None) => return None,
            Err(err) => {
                debug!(error = %err, "Could not query process status");
                return None;
            }
        }
        thread::sleep(REAP_POLL);
        waited += REAP_POLL;
    }
}
