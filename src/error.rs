use thiserror::Error;

/// Fatal failures. Anything listed here stops the run before a single file is touched.
#[derive(Error, Debug)]
pub enum SubtractError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("can't get absolute path from {0}")]
    PathResolution(String),

    #[error("rclone not found: {0}")]
    ToolNotFound(String),

    #[error("error while executing rclone: {0}")]
    SubprocessStart(String),

    #[error("error while reading rclone result: {0}")]
    Parse(String),

    #[error("input error: {0}")]
    Input(String),
}

impl SubtractError {
    pub fn exit_code(&self) -> u8 {
        match self {
            SubtractError::InvalidArgument(_) | SubtractError::PathResolution(_) => 1,
            SubtractError::ToolNotFound(_) => 2,
            SubtractError::SubprocessStart(_) => 3,
            SubtractError::Parse(_) => 4,
            SubtractError::Input(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, SubtractError>;
