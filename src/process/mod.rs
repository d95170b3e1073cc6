//! Process Supervision
//!
//! Launches external executables and monitors them. Every monitored process gets one
//! reader thread that consumes its merged stdout/stderr line by line, appends to the
//! process record and publishes [`ProcessEvent`]s on a channel the interactive loop
//! drains. A process ends with exactly one [`ProcessEvent::Ended`].

pub mod reader;
pub mod spawn;
pub mod supervisor;
pub mod template;

pub use spawn::{spawn, LaunchRequest, SpawnedProcess};
pub use supervisor::Supervisor;
pub use template::expand_environment;

use crate::types::ProcessId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Lines kept per process; older lines are discarded first.
pub const MAX_OUTPUT_LINES: usize = 10_000;

/// Why a monitored process stopped producing output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Output stream reached end of file
    Eof,
    /// Output stream closed after a kill request
    Killed,
    /// Reading the stream failed
    ReadError(String),
}

/// Event published by a reader thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Output {
        id: ProcessId,
        line: String,
    },
    Ended {
        id: ProcessId,
        exit_code: Option<i32>,
        reason: EndReason,
    },
}

impl ProcessEvent {
    pub fn id(&self) -> ProcessId {
        match self {
            ProcessEvent::Output { id, .. } | ProcessEvent::Ended { id, .. } => *id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessEvent::Ended { .. })
    }
}

/// Record of a monitored process
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRecord {
    pub id: ProcessId,
    /// Action or app name the process was launched for
    pub label: String,
    pub executable: String,
    pub args: Vec<String>,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
    pub output: VecDeque<String>,
    pub terminated: bool,
    pub exit_code: Option<i32>,
    pub end_reason: Option<EndReason>,
    pub kill_requested: bool,
}

impl ProcessRecord {
    pub(crate) fn push_output(&mut self, line: String) {
        if self.output.len() == MAX_OUTPUT_LINES {
            self.output.pop_front();
        }
        self.output.push_back(line);
    }

    pub fn status(&self) -> &'static str {
        match (&self.end_reason, self.terminated) {
            (_, false) if self.kill_requested => "killing",
            (_, false) => "running",
            (Some(EndReason::Killed), true) => "killed",
            (Some(EndReason::ReadError(_)), true) => "failed",
            _ => "ended",
        }
    }
}
