//! Joystick device handle, capability negotiation and raw event stream
//!
//! Opening a device reads its capability map once over the joydev ioctls
//! (axis count, button count, axis code table, button code table); the map is
//! immutable afterwards. Events are then pulled one fixed-size record at a
//! time with blocking reads. A short or empty read means the device went
//! away, which is fatal to the stream and propagated, never retried here.

use crate::gamepad::names;
use crate::gamepad::wire::{RawEvent, EVENT_SIZE};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open joystick device {path}: {source}")]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("capability query failed: {0}")]
    CapabilityQuery(std::io::Error),

    #[error("joystick device disconnected")]
    Disconnected,
}

/// Device-reported translation of wire indices to semantic names.
///
/// Built once at connect time. Indices outside the reported ranges resolve to
/// `None`; the decoder drops those updates rather than failing.
#[derive(Debug, Clone, Default)]
pub struct CapabilityMap {
    axes: Vec<String>,
    buttons: Vec<String>,
}

impl CapabilityMap {
    /// Builds the map from the code tables reported by the device. Codes the
    /// kernel tables do not know render as `unknown(0x..)` entries, which
    /// stay addressable by index.
    pub fn from_codes(axis_codes: &[u8], button_codes: &[u16]) -> Self {
        let axes = axis_codes
            .iter()
            .map(|&code| {
                names::axis_name(code)
                    .map(str::to_owned)
                    .unwrap_or_else(|| names::unknown_axis(code))
            })
            .collect();
        let buttons = button_codes
            .iter()
            .map(|&code| {
                names::button_name(code)
                    .map(str::to_owned)
                    .unwrap_or_else(|| names::unknown_button(code))
            })
            .collect();
        Self { axes, buttons }
    }

    pub fn axis(&self, index: u8) -> Option<&str> {
        self.axes.get(index as usize).map(String::as_str)
    }

    pub fn button(&self, index: u8) -> Option<&str> {
        self.buttons.get(index as usize).map(String::as_str)
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }
}

/// Lazy, infinite, non-restartable stream of wire records from any reader.
///
/// Generic over the reader so the decode path is exercised without hardware;
/// the live path wraps the opened device file.
#[derive(Debug)]
pub struct EventStream<R> {
    reader: R,
}

impl<R: Read> EventStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Blocks until exactly one record is available and decodes it.
    pub fn read_event(&mut self) -> Result<RawEvent, DeviceError> {
        let mut buf = [0u8; EVENT_SIZE];
        self.reader
            .read_exact(&mut buf)
            .map_err(|_| DeviceError::Disconnected)?;
        Ok(RawEvent::parse(buf))
    }

    /// Consumes the stream into an iterator of records. Yields until the
    /// first error, which ends the sequence.
    pub fn events(self) -> impl Iterator<Item = Result<RawEvent, DeviceError>> {
        let mut stream = self;
        let mut finished = false;
        std::iter::from_fn(move || {
            if finished {
                return None;
            }
            match stream.read_event() {
                Ok(event) => Some(Ok(event)),
                Err(err) => {
                    finished = true;
                    Some(Err(err))
                }
            }
        })
    }
}

/// An opened joystick device with its negotiated capability map.
#[derive(Debug)]
pub struct JoystickDevice {
    stream: EventStream<File>,
    capabilities: CapabilityMap,
}

impl JoystickDevice {
    /// Opens the device node and negotiates its capabilities.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        info!("opening joystick device {}", path.display());
        let file = File::open(path).map_err(|source| DeviceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let capabilities = ioctl::negotiate_capabilities(&file)?;
        info!(
            "capability map ready: {} axes, {} buttons",
            capabilities.axis_count(),
            capabilities.button_count()
        );
        debug!("capability map: {:?}", capabilities);

        Ok(Self {
            stream: EventStream::new(file),
            capabilities,
        })
    }

    pub fn capabilities(&self) -> &CapabilityMap {
        &self.capabilities
    }

    pub fn read_event(&mut self) -> Result<RawEvent, DeviceError> {
        self.stream.read_event()
    }
}

/// joydev capability queries, `_IOR('j', ..)` encoded by hand.
#[cfg(target_os = "linux")]
mod ioctl {
    use super::{CapabilityMap, DeviceError};
    use std::fs::File;
    use std::os::unix::io::AsRawFd;

    const IOC_NRBITS: u32 = 8;
    const IOC_TYPEBITS: u32 = 8;
    const IOC_SIZEBITS: u32 = 14;
    const IOC_NRSHIFT: u32 = 0;
    const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
    const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
    const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;
    const IOC_READ: u32 = 2;

    const JOYDEV_IOCTL_TYPE: u8 = b'j';
    // Table lengths fixed by the kernel: ABS_CNT axes, KEY_MAX-BTN_MISC+1 buttons.
    const AXIS_MAP_LEN: usize = 0x40;
    const BUTTON_MAP_LEN: usize = 0x200;

    const fn ior(nr: u8, size: usize) -> libc::c_ulong {
        ((IOC_READ << IOC_DIRSHIFT)
            | ((JOYDEV_IOCTL_TYPE as u32) << IOC_TYPESHIFT)
            | ((nr as u32) << IOC_NRSHIFT)
            | ((size as u32) << IOC_SIZESHIFT)) as libc::c_ulong
    }

    const JSIOCGAXES: libc::c_ulong = ior(0x11, std::mem::size_of::<u8>());
    const JSIOCGBUTTONS: libc::c_ulong = ior(0x12, std::mem::size_of::<u8>());
    const JSIOCGAXMAP: libc::c_ulong = ior(0x32, AXIS_MAP_LEN);
    const JSIOCGBTNMAP: libc::c_ulong = ior(0x34, BUTTON_MAP_LEN * 2);

    fn query(fd: libc::c_int, request: libc::c_ulong, arg: *mut libc::c_void) -> Result<(), DeviceError> {
        let rc = unsafe { libc::ioctl(fd, request, arg) };
        if rc < 0 {
            return Err(DeviceError::CapabilityQuery(std::io::Error::last_os_error()));
        }
        Ok(())
    }

    /// Issues the four joydev capability queries and assembles the map.
    pub fn negotiate_capabilities(file: &File) -> Result<CapabilityMap, DeviceError> {
        let fd = file.as_raw_fd();

        let mut axis_count: u8 = 0;
        query(fd, JSIOCGAXES, &mut axis_count as *mut u8 as *mut _)?;

        let mut button_count: u8 = 0;
        query(fd, JSIOCGBUTTONS, &mut button_count as *mut u8 as *mut _)?;

        let mut axis_codes = [0u8; AXIS_MAP_LEN];
        query(fd, JSIOCGAXMAP, axis_codes.as_mut_ptr() as *mut _)?;

        let mut button_codes = [0u16; BUTTON_MAP_LEN];
        query(fd, JSIOCGBTNMAP, button_codes.as_mut_ptr() as *mut _)?;

        let axes = (axis_count as usize).min(AXIS_MAP_LEN);
        let buttons = (button_count as usize).min(BUTTON_MAP_LEN);
        Ok(CapabilityMap::from_codes(
            &axis_codes[..axes],
            &button_codes[..buttons],
        ))
    }
}

#[cfg(not(target_os = "linux"))]
mod ioctl {
    use super::{CapabilityMap, DeviceError};
    use std::fs::File;

    pub fn negotiate_capabilities(_file: &File) -> Result<CapabilityMap, DeviceError> {
        Err(DeviceError::CapabilityQuery(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "joydev capability queries require Linux",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn record(value: i16, kind: u8, index: u8) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[..4].copy_from_slice(&100u32.to_le_bytes());
        buf[4..6].copy_from_slice(&value.to_le_bytes());
        buf[6] = kind;
        buf[7] = index;
        buf
    }

    #[test]
    fn capability_map_resolves_known_and_unknown_codes() {
        let map = CapabilityMap::from_codes(&[0x00, 0x01, 0x99], &[0x130, 0x131, 0x2ff]);
        assert_eq!(map.axis(0), Some("x"));
        assert_eq!(map.axis(1), Some("y"));
        assert_eq!(map.axis(2), Some("unknown(0x99)"));
        assert_eq!(map.button(0), Some("a"));
        assert_eq!(map.button(2), Some("unknown(0x2ff)"));
    }

    #[test]
    fn out_of_range_indices_resolve_to_none() {
        let map = CapabilityMap::from_codes(&[0x00], &[]);
        assert_eq!(map.axis(1), None);
        assert_eq!(map.axis(255), None);
        assert_eq!(map.button(0), None);
    }

    #[test]
    fn stream_reads_one_record_per_event() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&record(100, 0x02, 1));
        bytes.extend_from_slice(&record(-32767, 0x02, 2));
        let mut stream = EventStream::new(Cursor::new(bytes));

        let first = stream.read_event().unwrap();
        assert_eq!(first.value, 100);
        assert_eq!(first.index, 1);
        let second = stream.read_event().unwrap();
        assert_eq!(second.value, -32767);
    }

    #[test]
    fn short_read_is_a_disconnect() {
        let mut stream = EventStream::new(Cursor::new(vec![0u8; 5]));
        assert!(matches!(
            stream.read_event(),
            Err(DeviceError::Disconnected)
        ));
    }

    #[test]
    fn iterator_ends_after_disconnect() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&record(1, 0x01, 0));
        bytes.extend_from_slice(&[0u8; 3]); // truncated trailing record
        let stream = EventStream::new(Cursor::new(bytes));

        let collected: Vec<_> = stream.events().collect();
        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_ok());
        assert!(matches!(collected[1], Err(DeviceError::Disconnected)));
    }
}
