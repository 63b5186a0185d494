use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use super::event::{EventRecord, RECORD_SIZE};
use crate::error::StreamError;

pub const DEFAULT_DEVICE_PATH: &str = "/dev/input/js0";

/// Where joystick records come from.
pub trait DeviceSource {
    type Stream: Read;

    fn path(&self) -> &Path;

    /// Cheap availability check done before every open attempt.
    fn is_present(&mut self) -> bool;

    fn open(&mut self) -> io::Result<Self::Stream>;
}

/// A Linux joystick device node such as `/dev/input/js0`.
#[derive(Debug, Clone)]
pub struct JoystickDevice {
    path: PathBuf,
}

impl JoystickDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for JoystickDevice {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_PATH)
    }
}

impl DeviceSource for JoystickDevice {
    type Stream = File;

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_present(&mut self) -> bool {
        self.path.exists()
    }

    fn open(&mut self) -> io::Result<File> {
        File::open(&self.path)
    }
}

/// Blocking pause between probes.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Read exactly one record. End of stream before a full record is a
/// [`StreamError::MalformedRecord`].
pub fn read_record<R: Read>(reader: &mut R) -> Result<EventRecord, StreamError> {
    let mut buf = [0u8; RECORD_SIZE];
    let mut filled = 0;

    while filled < RECORD_SIZE {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Read(err)),
        }
    }

    EventRecord::from_buf(&buf[..filled])
}
