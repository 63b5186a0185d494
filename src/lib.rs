//! Joystick-to-action mapper.
//!
//! Reads Linux joystick records from `/dev/input/jsN`, watches for controls
//! returning to neutral and runs the keystroke or command configured for
//! them. The device is re-opened with a growing delay when it goes away.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod joystick;
pub mod mapper;
pub mod supervisor;

pub use config::{
    ActionConfig, ActionDescriptor, ActionKind, ActionValue, MappingDocument, Profile,
};
pub use dispatch::{Dispatcher, ProcessDispatcher};
pub use error::{ConfigError, DeviceError, DispatchError, ResolveError, StreamError};
pub use mapper::Mapper;
pub use supervisor::Supervisor;
