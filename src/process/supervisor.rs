//! Process Supervisor
//!
//! Owns the table of monitored processes and the receiving end of the event
//! channel. Reader threads write into the table and send events; the interactive
//! loop drains them with [`Supervisor::drain_events`] or [`Supervisor::next_event`].

use crate::error::LaunchError;
use crate::process::reader::spawn_reader;
use crate::process::spawn::{spawn, LaunchRequest, SpawnedProcess};
use crate::process::{EndReason, ProcessEvent, ProcessRecord};
use crate::types::{Environment, ProcessId};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::process::Child;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub(crate) type SharedChild = Arc<Mutex<Child>>;

struct ProcessEntry {
    record: ProcessRecord,
    child: SharedChild,
}

/// Process records shared between the supervisor and its reader threads.
#[derive(Clone, Default)]
pub(crate) struct RecordTable {
    entries: Arc<RwLock<BTreeMap<ProcessId, ProcessEntry>>>,
}

impl RecordTable {
    fn insert(&self, record: ProcessRecord, child: SharedChild) {
        self.entries
            .write()
            .insert(record.id, ProcessEntry { record, child });
    }

    fn remove(&self, id: ProcessId) -> Option<ProcessRecord> {
        self.entries.write().remove(&id).map(|entry| entry.record)
    }

    fn contains(&self, id: ProcessId) -> bool {
        self.entries.read().contains_key(&id)
    }

    fn child(&self, id: ProcessId) -> Option<SharedChild> {
        self.entries.read().get(&id).map(|entry| entry.child.clone())
    }

    fn snapshot(&self, id: ProcessId) -> Option<ProcessRecord> {
        self.entries.read().get(&id).map(|entry| entry.record.clone())
    }

    fn snapshots(&self) -> Vec<ProcessRecord> {
        self.entries
            .read()
            .values()
            .map(|entry| entry.record.clone())
            .collect()
    }

    fn update<F>(&self, id: ProcessId, apply: F) -> bool
    where
        F: FnOnce(&mut ProcessRecord),
    {
        match self.entries.write().get_mut(&id) {
            Some(entry) => {
                apply(&mut entry.record);
                true
            }
            None => false,
        }
    }

    /// Records of dismissed processes are gone; appending to them is a no-op.
    pub(crate) fn append_output(&self, id: ProcessId, line: String) {
        self.update(id, |record| record.push_output(line));
    }

    pub(crate) fn mark_terminated(&self, id: ProcessId, exit_code: Option<i32>, reason: EndReason) {
        self.update(id, |record| {
            record.terminated = true;
            record.exit_code = exit_code;
            record.end_reason = Some(reason);
        });
    }

    pub(crate) fn kill_requested(&self, id: ProcessId) -> bool {
        self.entries
            .read()
            .get(&id)
            .is_some_and(|entry| entry.record.kill_requested)
    }
}

pub struct Supervisor {
    os_environment: Environment,
    table: RecordTable,
    sender: Sender<ProcessEvent>,
    receiver: Receiver<ProcessEvent>,
    next_id: AtomicU64,
}

impl Supervisor {
    /// Supervisor expanding launch environments against the current OS environment.
    pub fn new() -> Self {
        Self::with_os_environment(std::env::vars().collect())
    }

    pub fn with_os_environment(os_environment: Environment) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            os_environment,
            table: RecordTable::default(),
            sender,
            receiver,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn os_environment(&self) -> &Environment {
        &self.os_environment
    }

    /// Spawn `request` and monitor its output.
    pub fn launch(&self, request: &LaunchRequest) -> Result<ProcessId, LaunchError> {
        let spawned = spawn(request, &self.os_environment)?;
        let executable = spawned.executable.clone();
        self.monitor(spawned)?.ok_or_else(|| LaunchError::SpawnError {
            executable,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "process has no output stream"),
        })
    }

    /// Start monitoring an already spawned process.
    ///
    /// Returns `None` without monitoring when the process has no readable output.
    pub fn monitor(&self, spawned: SpawnedProcess) -> Result<Option<ProcessId>, LaunchError> {
        let SpawnedProcess {
            label,
            executable,
            args,
            child,
            output,
        } = spawned;
        let Some(output) = output else {
            debug!(label = %label, "Process has no output stream, not monitoring");
            return Ok(None);
        };

        let id = ProcessId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = ProcessRecord {
            id,
            label: label.clone(),
            executable: executable.clone(),
            args,
            pid: child.id(),
            started_at: Utc::now(),
            output: VecDeque::new(),
            terminated: false,
            exit_code: None,
            end_reason: None,
            kill_requested: false,
        };
        let child = Arc::new(Mutex::new(child));
        self.table.insert(record, child.clone());

        if let Err(source) =
            spawn_reader(id, output, child, self.table.clone(), self.sender.clone())
        {
            self.table.remove(id);
            return Err(LaunchError::SpawnError { executable, source });
        }

        info!(process = %id, label = %label, "Monitoring process");
        Ok(Some(id))
    }

    /// All events published since the last drain, in arrival order.
    ///
    /// Events of dismissed processes are dropped.
    pub fn drain_events(&self) -> Vec<ProcessEvent> {
        self.receiver
            .try_iter()
            .filter(|event| self.table.contains(event.id()))
            .collect()
    }

    /// Wait up to `timeout` for the next event of a process that is still tracked.
    pub fn next_event(&self, timeout: Duration) -> Option<ProcessEvent> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(event) if self.table.contains(event.id()) => return Some(event),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    /// Request termination. Output keeps flowing until the stream closes.
    pub fn kill(&self, id: ProcessId) -> Result<(), LaunchError> {
        let child = self
            .table
            .child(id)
            .ok_or(LaunchError::ProcessNotFound(id))?;
        self.table.update(id, |record| record.kill_requested = true);

        let result = child.lock().kill();
        match result {
            Ok(()) => {
                info!(process = %id, "Kill requested");
                Ok(())
            }
            // Already exited.
            Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(source) => {
                warn!(process = %id, error = %source, "Kill failed");
                Err(LaunchError::Kill { id, source })
            }
        }
    }

    /// Forget a terminated process.
    pub fn dismiss(&self, id: ProcessId) -> Result<ProcessRecord, LaunchError> {
        let record = self
            .table
            .snapshot(id)
            .ok_or(LaunchError::ProcessNotFound(id))?;
        if !record.terminated {
            return Err(LaunchError::StillRunning(id));
        }
        self.table
            .remove(id)
            .ok_or(LaunchError::ProcessNotFound(id))
    }

    pub fn record(&self, id: ProcessId) -> Option<ProcessRecord> {
        self.table.snapshot(id)
    }

    /// Snapshots of every tracked process, ordered by id.
    pub fn records(&self) -> Vec<ProcessRecord> {
        self.table.snapshots()
    }

    /// Number of processes that have not terminated.
    pub fn running(&self) -> usize {
        self.records()
            .iter()
            .filter(|record| !record.terminated)
            .count()
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
