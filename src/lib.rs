pub mod args;
pub mod config;
pub mod confirm;
pub mod error;
pub mod file;
pub mod matches;
pub mod rclone;
pub mod subtract;
