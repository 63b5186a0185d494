mod device;
mod event;
mod reconnect;
mod state;

pub use device::{
    read_record, DeviceSource, JoystickDevice, Sleeper, ThreadSleeper, DEFAULT_DEVICE_PATH,
};
pub use event::{Category, ControlKey, EventRecord, RECORD_SIZE};
pub use reconnect::{Backoff, LinkState, ReconnectPolicy};
pub use state::{ControlState, Observation};
