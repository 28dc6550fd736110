use crate::config::Config;
use crate::error::{Result, SubtractError};
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const ANSWER_OK: &str = "ok";

/// Explains what is about to happen and reads one line from `input`.
/// Returns `true` only for the exact answer `ok`.
pub async fn confirm<R, W>(config: &Config, input: &mut R, prompt: &mut W) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Target: {}", config.target.display());
    info!("Minus : {}", config.minus.display());
    info!("If a file with the same relative path and the same contents is found");
    info!("in the Minus directory, it is removed from Target.");
    info!("");
    info!("[Notice] This command may remove files without any backup.");
    info!("Input '{ANSWER_OK}' and hit enter if you want to continue.");
    if config.dry_run {
        info!("DryRun mode. Even if you enter '{ANSWER_OK}', NO files will be removed.");
    }

    let input_error = |e: std::io::Error| SubtractError::Input(e.to_string());
    prompt
        .write_all(b"Please input answer :")
        .await
        .map_err(input_error)?;
    prompt.flush().await.map_err(input_error)?;

    let mut answer = String::new();
    if input.read_line(&mut answer).await.map_err(input_error)? == 0 {
        return Err(SubtractError::Input("no answer before end of input".into()));
    }
    let answer = answer
        .strip_suffix('\n')
        .map(|a| a.strip_suffix('\r').unwrap_or(a))
        .unwrap_or(answer.as_str());

    if answer == ANSWER_OK {
        info!("Your answer is {answer}, continue.");
        Ok(true)
    } else {
        info!("Your answer is not {ANSWER_OK}, exit.");
        Ok(false)
    }
}
