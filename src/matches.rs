use crate::error::{Result, SubtractError};
use futures::TryStreamExt;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::SplitStream;

/// Splits rclone's match report into relative paths, one per line, in the order
/// rclone printed them. Line terminators (`\n`, `\r\n`) are dropped; the remaining
/// bytes are kept as they are, whether or not they are valid UTF-8. An empty report
/// is an empty list.
pub async fn parse_report(report: &[u8]) -> Result<Vec<PathBuf>> {
    SplitStream::new(BufReader::new(report).split(b'\n'))
        .map_ok(|mut line| {
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            bytes_to_path(line)
        })
        .try_collect()
        .await
        .map_err(|e| SubtractError::Parse(e.to_string()))
}

#[cfg(unix)]
fn bytes_to_path(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    std::ffi::OsString::from_vec(bytes).into()
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: Vec<u8>) -> PathBuf {
    String::from_utf8_lossy(&bytes).into_owned().into()
}
