//! Finding and running rclone.
//!
//! `rclone check --match=-` writes every file that has the same relative path and
//! content on both sides to stdout. It exits non-zero as soon as anything differs,
//! so a non-zero exit is a normal outcome here. Only a process that never started,
//! or one that died without an exit code, counts as a failure.

use crate::config::RcloneLocation;
use crate::error::{Result, SubtractError};
use crate::file::absolute;
use log::{debug, trace};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

pub const RCLONE: &str = "rclone";

/// Config file handed to rclone so no host configuration is picked up.
pub const DUMMY_CONFIG: &str = "dummy-rclone.conf";

/// Resolves the rclone executable for this run.
pub fn locate(location: &RcloneLocation, cwd: &Path) -> Result<PathBuf> {
    match location {
        RcloneLocation::Explicit(path) => check_explicit(path, cwd),
        RcloneLocation::Search => {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf));
            search(std::env::var_os("PATH"), exe_dir)
        }
    }
}

fn check_explicit(path: &Path, cwd: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(SubtractError::ToolNotFound("path is empty".into()));
    }
    let resolved = absolute(path, cwd);
    let metadata = std::fs::metadata(&resolved).map_err(|e| {
        SubtractError::ToolNotFound(format!("specified path {} is invalid: {e}", path.display()))
    })?;
    if metadata.is_dir() {
        return Err(SubtractError::ToolNotFound(format!(
            "specified path {} is a directory",
            path.display()
        )));
    }
    if !has_rclone_name(path) {
        return Err(SubtractError::ToolNotFound(format!(
            "specified path {} does not start with {RCLONE}",
            path.display()
        )));
    }
    Ok(resolved)
}

fn has_rclone_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.get(..RCLONE.len()))
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RCLONE))
}

/// Looks for rclone in every `PATH` entry, then next to the running binary.
/// Relative entries are skipped so the working directory is never searched.
fn search(path_var: Option<OsString>, exe_dir: Option<PathBuf>) -> Result<PathBuf> {
    let name = format!("{RCLONE}{}", std::env::consts::EXE_SUFFIX);
    let dirs = path_var
        .iter()
        .flat_map(std::env::split_paths)
        .chain(exe_dir);

    for dir in dirs {
        if !dir.is_absolute() {
            continue;
        }
        let candidate = dir.join(&name);
        trace!("looking for {} at {}", RCLONE, candidate.display());
        if is_executable(&candidate) {
            debug!("found {} at {}", RCLONE, candidate.display());
            return Ok(candidate);
        }
    }

    Err(SubtractError::ToolNotFound(format!(
        "{name} is not in PATH or next to this program"
    )))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// How the comparison process ended.
#[derive(Debug)]
pub enum Execution {
    /// rclone ran to completion. Non-zero only means some files differ.
    Completed { exit_code: i32 },
    /// rclone could not be spawned at all.
    FailedToStart { cause: std::io::Error },
    /// rclone started but died without an exit code (e.g. killed by a signal).
    Terminated { status: String },
}

#[derive(Debug)]
pub struct Invocation {
    pub execution: Execution,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Invocation {
    /// Hands back stdout for a finished comparison, or the fatal error otherwise.
    pub fn into_report(self) -> Result<Vec<u8>> {
        let stderr = String::from_utf8_lossy(&self.stderr).trim().to_string();
        match self.execution {
            Execution::Completed { exit_code } => {
                if exit_code != 0 {
                    debug!("{RCLONE} exited with {exit_code}, differences exist");
                }
                if !stderr.is_empty() {
                    debug!("{RCLONE} stderr:\n{stderr}");
                }
                Ok(self.stdout)
            }
            Execution::FailedToStart { cause } => Err(SubtractError::SubprocessStart(
                format!("failed to start: {cause}"),
            )),
            Execution::Terminated { status } => Err(SubtractError::SubprocessStart(format!(
                "terminated abnormally ({status}): {stderr}"
            ))),
        }
    }
}

pub fn check_args(target: &Path, minus: &Path) -> Vec<OsString> {
    vec![
        "check".into(),
        target.as_os_str().to_owned(),
        minus.as_os_str().to_owned(),
        "--match=-".into(),
        format!("--config={DUMMY_CONFIG}").into(),
    ]
}

/// Runs `rclone check` on the two directories and captures both output streams.
pub async fn check(rclone: &Path, target: &Path, minus: &Path) -> Invocation {
    let args = check_args(target, minus);
    debug!("running {} {:?}", rclone.display(), args);

    let output = Command::new(rclone)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) => {
            let execution = match output.status.code() {
                Some(exit_code) => Execution::Completed { exit_code },
                None => Execution::Terminated {
                    status: output.status.to_string(),
                },
            };
            Invocation {
                execution,
                stdout: output.stdout,
                stderr: output.stderr,
            }
        }
        Err(cause) => Invocation {
            execution: Execution::FailedToStart { cause },
            stdout: Vec::new(),
            stderr: Vec::new(),
        },
    }
}
