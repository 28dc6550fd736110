use anyhow::Result;
use clap::Parser;
use log::{debug, error, warn};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::process::ExitCode;
use subtract_files::args::SubtractOpts;
use subtract_files::config::Config;
use subtract_files::subtract::{Outcome, subtract};
use tokio::io::BufReader;

async fn run(opts: &SubtractOpts) -> subtract_files::error::Result<Outcome> {
    // Only relative paths need the working directory; an empty one makes those fail.
    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        warn!("working directory unavailable: {e}");
        PathBuf::new()
    });
    let config = Config::from_opts(opts, &cwd)?;
    debug!("{:?}", config);

    let mut input = BufReader::new(tokio::io::stdin());
    let mut prompt = tokio::io::stdout();
    subtract(&config, &mut input, &mut prompt).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let opts = SubtractOpts::parse();
    SimpleLogger::new().with_level(opts.log_level()).init()?;
    debug!("{:?}", opts);

    match run(&opts).await {
        Ok(outcome) => {
            debug!("{:?}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{e}");
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
