//! Error types shared by every component and the wizard

use std::io;
use thiserror::Error;

/// Errors produced while running prompts or loading wizard manifests
#[derive(Debug, Error)]
pub enum Error {
    /// The terminal refused to enter raw input mode. Never retried.
    #[error("terminal could not enter raw mode: {0}")]
    RawMode(#[source] io::Error),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    /// Input reached end-of-stream before an Exit operation was read
    #[error("input closed before the prompt was completed")]
    InputClosed,

    #[error("window size must be between 1 and 32, got {0}")]
    InvalidWindowSize(usize),

    #[error("input id '{0}' is declared more than once")]
    DuplicateInput(String),

    #[error("invalid wizard manifest: {0}")]
    Manifest(String),

    #[error("failed to parse wizard manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
