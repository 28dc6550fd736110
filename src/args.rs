use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(
    after_help = "Long options take two dashes: --target <DIR> --minus <DIR> [--dryrun] [--rclone <PATH>].\n\
                  The single-dash spelling `-target` is read as `-t arget` and rejected."
)]
pub struct SubtractOpts {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Search and delete target (delete matching files from this directory)
    #[arg(short, long)]
    pub target: String,

    /// Search source (read only)
    #[arg(short, long)]
    pub minus: String,

    /// Only report matching files. No files will be removed with this option.
    #[arg(short = 'n', long, visible_alias = "dryrun")]
    pub dry_run: bool,

    /// Path of the rclone executable. When given, only this path is used to find rclone.
    #[arg(long)]
    pub rclone: Option<PathBuf>,
}

impl SubtractOpts {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
