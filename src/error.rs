//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::joystick::ControlKey;

/// Problems loading the mapping document. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot find config file {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("No configuration named \"{0}\"")]
    UnknownProfile(String),
    #[error("Axis entry needs at least one of `min` or `max`")]
    EmptyAxisPair,
}

/// Failures while reading the open device stream. The supervisor treats
/// every one of them as a disconnect.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Device read failed: {0}")]
    Read(#[from] io::Error),
    #[error("Short read: got {len} of 8 bytes")]
    MalformedRecord { len: usize },
}

/// Fatal device availability error.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device {} did not reappear after {:.3}s of retries", .path.display(), .waited.as_secs_f64())]
    NeverAvailable { path: PathBuf, waited: Duration },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The control passed the filter but the profile has no entry for it.
    #[error("No action configured for {0}")]
    UnconfiguredControl(ControlKey),
}

/// Failures performing a single action. Logged; the loop keeps running.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown action type \"{0}\"")]
    UnknownActionType(String),
    #[error("Invalid value for {kind} action: {reason}")]
    InvalidActionValue { kind: &'static str, reason: String },
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}
