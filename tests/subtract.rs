#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use subtract_files::config::{Config, RcloneLocation};
use subtract_files::error::SubtractError;
use subtract_files::subtract::{Outcome, Removal, subtract};
use tempfile::TempDir;

struct Fixture {
    root: TempDir,
    target: PathBuf,
    minus: PathBuf,
}

impl Fixture {
    /// Target and minus directories plus a fake `rclone` that runs `script`.
    fn new(script: &str) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("target");
        let minus = root.path().join("minus");
        std::fs::create_dir_all(target.join("a")).unwrap();
        std::fs::create_dir_all(minus.join("a")).unwrap();

        let rclone = root.path().join("rclone");
        std::fs::write(&rclone, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&rclone, std::fs::Permissions::from_mode(0o755)).unwrap();

        Fixture {
            root,
            target,
            minus,
        }
    }

    fn config(&self, dry_run: bool) -> Config {
        Config {
            target: self.target.clone(),
            minus: self.minus.clone(),
            rclone: RcloneLocation::Explicit(self.root.path().join("rclone")),
            dry_run,
            cwd: self.root.path().to_path_buf(),
        }
    }

    fn touch(&self, relative: &str) -> PathBuf {
        let path = self.target.join(relative);
        std::fs::write(&path, relative).unwrap();
        path
    }

    async fn run(&self, dry_run: bool, answer: &str) -> Result<(Outcome, Vec<u8>), SubtractError> {
        let mut input = answer.as_bytes();
        let mut prompt = Vec::new();
        let outcome = subtract(&self.config(dry_run), &mut input, &mut prompt).await?;
        Ok((outcome, prompt))
    }
}

const TWO_MATCHES: &str = "printf 'a/b.txt\\nc.txt\\n'\nexit 1";

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

#[tokio::test]
async fn removes_reported_files_after_ok() {
    let fixture = Fixture::new(TWO_MATCHES);
    let b = fixture.touch("a/b.txt");
    let c = fixture.touch("c.txt");
    let kept = fixture.touch("kept.txt");

    let (outcome, prompt) = fixture.run(false, "ok\n").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Finished(Removal {
            matched: 2,
            removed: 2,
            failed: 0,
            rejected: 0,
        })
    );
    assert_eq!(prompt, b"Please input answer :");
    assert!(!exists(&b));
    assert!(!exists(&c));
    assert!(exists(&kept));
}

#[tokio::test]
async fn dry_run_keeps_everything() {
    let fixture = Fixture::new(TWO_MATCHES);
    let b = fixture.touch("a/b.txt");
    let c = fixture.touch("c.txt");

    let (outcome, _) = fixture.run(true, "ok\n").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Finished(Removal {
            matched: 2,
            ..Default::default()
        })
    );
    assert!(exists(&b));
    assert!(exists(&c));
}

#[tokio::test]
async fn declining_removes_nothing() {
    let fixture = Fixture::new(TWO_MATCHES);
    let b = fixture.touch("a/b.txt");

    let (outcome, _) = fixture.run(false, "yes\n").await.unwrap();
    assert_eq!(outcome, Outcome::Declined);
    assert!(exists(&b));
}

#[tokio::test]
async fn closed_input_is_an_error() {
    let fixture = Fixture::new(TWO_MATCHES);
    let b = fixture.touch("a/b.txt");

    let err = fixture.run(false, "").await.unwrap_err();
    assert!(matches!(err, SubtractError::Input(_)));
    assert!(exists(&b));
}

#[tokio::test]
async fn empty_report_skips_the_prompt() {
    let fixture = Fixture::new("exit 0");
    fixture.touch("c.txt");

    let (outcome, prompt) = fixture.run(false, "ok\n").await.unwrap();
    assert_eq!(outcome, Outcome::NoMatches);
    assert!(prompt.is_empty());
}

#[tokio::test]
async fn rclone_gets_the_check_arguments() {
    let fixture = Fixture::new("printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args\"");
    fixture.run(false, "ok\n").await.unwrap();

    let args = std::fs::read_to_string(fixture.root.path().join("args")).unwrap();
    let expected = format!(
        "check\n{}\n{}\n--match=-\n--config=dummy-rclone.conf\n",
        fixture.target.display(),
        fixture.minus.display()
    );
    assert_eq!(args, expected);
}

#[tokio::test]
async fn rclone_killed_by_signal_is_fatal() {
    let fixture = Fixture::new("printf 'c.txt\\n'\nkill -9 $$");
    let c = fixture.touch("c.txt");

    let err = fixture.run(false, "ok\n").await.unwrap_err();
    assert!(matches!(err, SubtractError::SubprocessStart(_)));
    assert!(exists(&c));
}

#[tokio::test]
async fn traversal_entries_never_leave_target() {
    let fixture = Fixture::new("printf '../minus/a/x.txt\\nc.txt\\n'\nexit 1");
    let c = fixture.touch("c.txt");
    let reference = fixture.minus.join("a/x.txt");
    std::fs::write(&reference, b"reference").unwrap();

    let (outcome, _) = fixture.run(false, "ok\n").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Finished(Removal {
            matched: 2,
            removed: 1,
            failed: 0,
            rejected: 1,
        })
    );
    assert!(!exists(&c));
    assert!(exists(&reference));
}

#[tokio::test]
async fn rclone_that_cannot_start_removes_nothing() {
    let fixture = Fixture::new(TWO_MATCHES);
    let b = fixture.touch("a/b.txt");
    let c = fixture.touch("c.txt");
    let rclone = fixture.root.path().join("rclone");
    std::fs::set_permissions(&rclone, std::fs::Permissions::from_mode(0o644)).unwrap();

    let mut input: &[u8] = b"ok\n";
    let mut prompt = Vec::new();
    let err = subtract(&fixture.config(false), &mut input, &mut prompt)
        .await
        .unwrap_err();
    assert!(matches!(err, SubtractError::SubprocessStart(_)));
    assert!(prompt.is_empty());
    assert!(exists(&b));
    assert!(exists(&c));
}

#[tokio::test]
async fn non_utf8_names_are_removed() {
    use std::os::unix::ffi::OsStrExt;

    let fixture = Fixture::new("printf 'caf\\351.txt\\n'\nexit 1");
    let name = std::ffi::OsStr::from_bytes(b"caf\xe9.txt");
    let path = fixture.target.join(name);
    if std::fs::write(&path, b"latin-1").is_err() {
        // Some filesystems refuse names that are not valid UTF-8.
        return;
    }

    let (outcome, _) = fixture.run(false, "ok\n").await.unwrap();
    assert_eq!(
        outcome,
        Outcome::Finished(Removal {
            matched: 1,
            removed: 1,
            ..Default::default()
        })
    );
    assert!(!exists(&path));
}
