//! Fixed-size joydev record layout
//!
//! The kernel joystick interface delivers one 8-byte little-endian record per
//! event: `u32` timestamp in milliseconds (device-relative), `i16` value,
//! `u8` event-type flags, `u8` axis/button index. The button and axis flag
//! bits are independent; a single record may carry both (the kernel sets both
//! during the initial state sync together with the init bit).

/// Size of one wire record in bytes.
pub const EVENT_SIZE: usize = 8;

const TYPE_BUTTON: u8 = 0x01;
const TYPE_AXIS: u8 = 0x02;
const TYPE_INIT: u8 = 0x80;

/// One decoded wire record, still indexed by wire position rather than name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Device-relative event time in milliseconds.
    pub timestamp_ms: u32,
    /// Signed 16-bit axis position or button state (0/1).
    pub value: i16,
    /// Event-type flag byte as reported on the wire.
    pub kind: u8,
    /// Axis or button index into the capability map.
    pub index: u8,
}

impl RawEvent {
    /// Decodes one wire record. Total; any 8 bytes form a valid record.
    pub fn parse(buf: [u8; EVENT_SIZE]) -> Self {
        Self {
            timestamp_ms: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_le_bytes([buf[4], buf[5]]),
            kind: buf[6],
            index: buf[7],
        }
    }

    pub fn is_button(&self) -> bool {
        self.kind & TYPE_BUTTON != 0
    }

    pub fn is_axis(&self) -> bool {
        self.kind & TYPE_AXIS != 0
    }

    /// Initial state-sync replay flag. Carries no special handling downstream;
    /// sync records are applied like live events.
    pub fn is_init(&self) -> bool {
        self.kind & TYPE_INIT != 0
    }
}
