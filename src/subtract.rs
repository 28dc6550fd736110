use crate::config::Config;
use crate::confirm::confirm;
use crate::error::Result;
use crate::file::{FileOps, join_within};
use crate::matches::parse_report;
use crate::rclone;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncWrite};

/// Tally of one pass over the match list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Entries rclone reported as identical.
    pub matched: usize,
    /// Files actually unlinked. Always zero in a dry run.
    pub removed: usize,
    /// Files whose removal failed.
    pub failed: usize,
    /// Entries pointing outside the target directory, left alone.
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// rclone found nothing identical, so there was nothing to ask about.
    NoMatches,
    /// The operator did not answer `ok`.
    Declined,
    Finished(Removal),
}

/// Removes every matched entry from `target`, or only lists it when `commit` is off.
/// Failures are logged per file and never stop the loop.
pub async fn remove_matches(target: &Path, matches: &[PathBuf], commit: bool) -> Removal {
    let mut removal = Removal {
        matched: matches.len(),
        ..Default::default()
    };

    if commit {
        info!("Removing...");
    } else {
        info!("Listing...(dryrun mode)");
    }

    for entry in matches {
        let Some(path) = join_within(target, entry) else {
            warn!("skipping {:?}: not inside {}", entry, target.display());
            removal.rejected += 1;
            continue;
        };

        info!(" > {}", path.display());
        match path.remove_file(commit).await {
            Ok(()) if commit => removal.removed += 1,
            Ok(()) => {}
            Err(e) => {
                error!("error removing file {}: {e}", path.display());
                removal.failed += 1;
            }
        }
    }

    if commit {
        info!(" {} same files removed.", removal.matched);
    } else {
        info!(" {} same files found (not removed).", removal.matched);
    }
    if removal.failed > 0 || removal.rejected > 0 {
        warn!(
            "{} files could not be removed, {} entries were outside the target",
            removal.failed, removal.rejected
        );
    }
    removal
}

/// Runs one full pass: compare, ask, remove.
pub async fn subtract<R, W>(config: &Config, input: &mut R, prompt: &mut W) -> Result<Outcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let rclone_path = rclone::locate(&config.rclone, &config.cwd)?;
    let report = rclone::check(&rclone_path, &config.target, &config.minus)
        .await
        .into_report()?;
    let matches = parse_report(&report).await?;
    debug!("{} entries in rclone report", matches.len());

    if matches.is_empty() {
        info!("No matching files were found.");
        return Ok(Outcome::NoMatches);
    }

    if !confirm(config, input, prompt).await? {
        return Ok(Outcome::Declined);
    }

    info!("");
    info!("Number of same files = {}", matches.len());
    let removal = remove_matches(&config.target, &matches, config.commit()).await;
    Ok(Outcome::Finished(removal))
}
