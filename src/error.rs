use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures talking to the audio codec's mute/volume controls.
///
/// These are never recovered locally; the task that hits one exits with it.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to run mixer command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("mixer command `{command}` exited with status {code}: {stderr}")]
    Command {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("mixer command `{command}` did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("codec lock poisoned")]
    Poisoned,

    #[error("codec worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Failures starting playback of the looping asset.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The asset could not be opened; playback is skipped for this attempt.
    #[error("audio asset {path} unavailable: {source}")]
    AssetUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start audio player `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown key code: {0}")]
    UnknownKey(String),

    #[error("no input device advertising {0} found")]
    NoDevice(String),

    #[error("failed to open input device {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
