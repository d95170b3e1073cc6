//! Spawning executables with a merged output pipe.

use crate::error::LaunchError;
use crate::process::template::expand_environment;
use crate::types::Environment;
use std::io::{self, PipeReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// What to launch and with which environment.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub executable: String,
    pub args: Vec<String>,
    /// Variables laid over the OS environment; values may hold `{VAR}` placeholders
    pub environment: Environment,
    /// Name shown for the process; defaults to the executable
    pub label: Option<String>,
}

impl LaunchRequest {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.executable)
    }
}

/// A started child and the read end of its output pipe.
#[derive(Debug)]
pub struct SpawnedProcess {
    pub label: String,
    pub executable: String,
    pub args: Vec<String>,
    pub child: Child,
    /// Merged stdout/stderr; `None` when the child has no readable stream
    pub output: Option<PipeReader>,
}

/// Locate `executable`: paths must exist, bare names are looked up on `PATH`.
pub fn resolve_executable(executable: &str, path_var: Option<&str>) -> Result<PathBuf, LaunchError> {
    let candidate = Path::new(executable);
    if executable.is_empty() {
        return Err(LaunchError::ExecutableNotFound(executable.to_string()));
    }
    if candidate.is_absolute() || candidate.components().count() > 1 {
        return if candidate.is_file() {
            Ok(candidate.to_path_buf())
        } else {
            Err(LaunchError::ExecutableNotFound(executable.to_string()))
        };
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(executable, path_var, cwd)
        .map_err(|_| LaunchError::ExecutableNotFound(executable.to_string()))
}

/// Start `request` with stdout and stderr merged into one pipe.
///
/// The child sees `os_environment` overlaid with the request's variables, each
/// expanded against `os_environment`. The parent's copies of the pipe's write end
/// are closed before returning, so the reader sees end of file once the child exits.
pub fn spawn(
    request: &LaunchRequest,
    os_environment: &Environment,
) -> Result<SpawnedProcess, LaunchError> {
    let mut environment = os_environment.clone();
    environment.extend(expand_environment(&request.environment, os_environment));
    let path_var = environment.get("PATH").map(String::as_str);
    let resolved = resolve_executable(&request.executable, path_var)?;

    let spawn_error = |source: io::Error| LaunchError::SpawnError {
        executable: request.executable.clone(),
        source,
    };
    let (reader, writer) = io::pipe().map_err(spawn_error)?;
    let error_writer = writer.try_clone().map_err(spawn_error)?;

    let mut command = Command::new(&resolved);
    command
        .args(&request.args)
        .env_clear()
        .envs(&environment)
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(error_writer);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x0800_0000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let child = command.spawn().map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LaunchError::ExecutableNotFound(request.executable.clone())
        } else {
            spawn_error(source)
        }
    })?;
    // Releases the parent's write ends held by the command.
    drop(command);

    debug!(
        executable = %resolved.display(),
        pid = child.id(),
        args = ?request.args,
        "Spawned process"
    );

    Ok(SpawnedProcess {
        label: request.label().to_string(),
        executable: request.executable.clone(),
        args: request.args.clone(),
        child,
        output: Some(reader),
    })
}
