use crate::args::SubtractOpts;
use crate::error::{Result, SubtractError};
use crate::file::absolute;
use std::path::{Path, PathBuf};

/// Where to get the rclone executable from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcloneLocation {
    Explicit(PathBuf),
    Search,
}

/// Everything one run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute, cleaned directory files get removed from.
    pub target: PathBuf,
    /// Absolute, cleaned reference directory. Never modified.
    pub minus: PathBuf,
    pub rclone: RcloneLocation,
    pub dry_run: bool,
    /// Working directory at startup, used to resolve a relative rclone override.
    pub cwd: PathBuf,
}

impl Config {
    pub fn from_opts(opts: &SubtractOpts, cwd: &Path) -> Result<Self> {
        let target = resolve_dir(&opts.target, "target", cwd)?;
        let minus = resolve_dir(&opts.minus, "minus", cwd)?;
        if target == minus {
            return Err(SubtractError::InvalidArgument(format!(
                "same directory specified, target is minus: {}",
                target.display()
            )));
        }

        let rclone = match &opts.rclone {
            Some(path) => RcloneLocation::Explicit(path.clone()),
            None => RcloneLocation::Search,
        };

        Ok(Config {
            target,
            minus,
            rclone,
            dry_run: opts.dry_run,
            cwd: cwd.to_path_buf(),
        })
    }

    /// Whether removals actually hit the filesystem.
    pub fn commit(&self) -> bool {
        !self.dry_run
    }
}

fn resolve_dir(raw: &str, name: &str, cwd: &Path) -> Result<PathBuf> {
    if raw.is_empty() {
        return Err(SubtractError::InvalidArgument(format!("no {name} directory given")));
    }
    let path = Path::new(raw);
    if !path.is_absolute() && !cwd.is_absolute() {
        return Err(SubtractError::PathResolution(format!(
            "{name} {raw} (working directory {:?} is unusable)",
            cwd
        )));
    }
    Ok(absolute(path, cwd))
}
