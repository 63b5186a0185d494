use std::fmt;

use crate::error::StreamError;

/// Size of one record read from a `/dev/input/jsN` stream.
pub const RECORD_SIZE: usize = 8;

const CATEGORY_BUTTON: u8 = 0x01;
const CATEGORY_AXIS: u8 = 0x02;

/// Kind of physical control an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Button,
    Axis,
}

impl Category {
    /// Map the raw type byte to a category.
    ///
    /// Synthetic initial-state events carry the `0x80` flag and map to nothing.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            CATEGORY_BUTTON => Some(Category::Button),
            CATEGORY_AXIS => Some(Category::Axis),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Category::Button => CATEGORY_BUTTON,
            Category::Axis => CATEGORY_AXIS,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Button => f.write_str("button"),
            Category::Axis => f.write_str("axis"),
        }
    }
}

/// Identifies a single control on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlKey {
    pub category: Category,
    pub index: u8,
}

impl ControlKey {
    pub fn button(index: u8) -> Self {
        Self {
            category: Category::Button,
            index,
        }
    }

    pub fn axis(index: u8) -> Self {
        Self {
            category: Category::Axis,
            index,
        }
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.index)
    }
}

/// One decoded joystick record.
///
/// `pressed` and `intensity` are the low and high byte of the kernel's
/// little-endian value; [`EventRecord::signal`] recombines them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub time_ms: u32,
    pub pressed: i8,
    pub intensity: i8,
    pub category: u8,
    pub index: u8,
}

impl EventRecord {
    /// Build a record for a known control from its full signed reading.
    pub fn new(key: ControlKey, signal: i16) -> Self {
        let [low, high] = signal.to_le_bytes();
        Self {
            time_ms: 0,
            pressed: i8::from_le_bytes([low]),
            intensity: i8::from_le_bytes([high]),
            category: key.category.as_raw(),
            index: key.index,
        }
    }

    /// Decode a record from the raw bytes read off the device.
    pub fn from_buf(buf: &[u8]) -> Result<Self, StreamError> {
        let Some(record) = buf.first_chunk::<RECORD_SIZE>() else {
            return Err(StreamError::MalformedRecord { len: buf.len() });
        };
        let [t0, t1, t2, t3, pressed, intensity, category, index] = *record;

        Ok(Self {
            time_ms: u32::from_ne_bytes([t0, t1, t2, t3]),
            pressed: i8::from_le_bytes([pressed]),
            intensity: i8::from_le_bytes([intensity]),
            category,
            index,
        })
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let [t0, t1, t2, t3] = self.time_ms.to_ne_bytes();
        [
            t0,
            t1,
            t2,
            t3,
            self.pressed.to_le_bytes()[0],
            self.intensity.to_le_bytes()[0],
            self.category,
            self.index,
        ]
    }

    /// The control this record refers to, if its category is one we map.
    pub fn control_key(&self) -> Option<ControlKey> {
        Category::from_raw(self.category).map(|category| ControlKey {
            category,
            index: self.index,
        })
    }

    /// Full signed reading: zero means released / centred.
    pub fn signal(&self) -> i16 {
        i16::from_le_bytes([self.pressed.to_le_bytes()[0], self.intensity.to_le_bytes()[0]])
    }
}
