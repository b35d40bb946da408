// src/port/native.rs
//
// serialport-backed driver. Reads run on a dedicated thread with a short
// timeout so the cancel flag is checked regularly; each chunk is copied out
// before it is handed to the inbound handler.

use serde::Serialize;
use std::io::{Read, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::JoinHandle;
use std::time::Duration;

use super::utils::{to_serialport_data_bits, to_serialport_parity, to_serialport_stop_bits};
use super::{InboundHandler, PortDriver, PortEvent, PortHandle};
use crate::error::ConnectionError;
use crate::settings::SerialConfig;

/// Read timeout; bounds how long close() waits for the reader to notice.
const READ_TIMEOUT: Duration = Duration::from_millis(10);
const READ_BUFFER_SIZE: usize = 1024;

/// Information about an available serial port
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialPortInfo {
    pub port_name: String,
    pub port_type: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

/// List the serial ports currently present on the system.
pub fn list_serial_ports() -> Result<Vec<SerialPortInfo>, ConnectionError> {
    let ports = serialport::available_ports()
        .map_err(|e| ConnectionError::Other(format!("Failed to enumerate ports: {}", e)))?;

    Ok(ports
        .into_iter()
        // On macOS, filter out /dev/tty.* devices - only show /dev/cu.* (calling unit)
        .filter(|_p| {
            #[cfg(target_os = "macos")]
            {
                !_p.port_name.starts_with("/dev/tty.")
            }
            #[cfg(not(target_os = "macos"))]
            {
                true
            }
        })
        .map(|p| {
            let (port_type, manufacturer, product, serial_number, vid, pid) = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => (
                    "USB".to_string(),
                    info.manufacturer,
                    info.product,
                    info.serial_number,
                    Some(info.vid),
                    Some(info.pid),
                ),
                serialport::SerialPortType::BluetoothPort => {
                    ("Bluetooth".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::PciPort => {
                    ("PCI".to_string(), None, None, None, None, None)
                }
                serialport::SerialPortType::Unknown => {
                    ("Unknown".to_string(), None, None, None, None, None)
                }
            };
            SerialPortInfo {
                port_name: p.port_name,
                port_type,
                manufacturer,
                product,
                serial_number,
                vid,
                pid,
            }
        })
        .collect())
}

/// Map a serialport open failure onto the user-facing categories.
pub(crate) fn classify_open_error(port: &str, e: &serialport::Error) -> ConnectionError {
    use std::io::ErrorKind as IoKind;

    let description = e.description.to_lowercase();
    match e.kind {
        serialport::ErrorKind::NoDevice => ConnectionError::NotFound(port.to_string()),
        serialport::ErrorKind::Io(IoKind::NotFound) => ConnectionError::NotFound(port.to_string()),
        serialport::ErrorKind::Io(IoKind::PermissionDenied) => {
            ConnectionError::PermissionDenied(port.to_string())
        }
        _ if description.contains("busy") || description.contains("in use") => {
            ConnectionError::Busy(port.to_string())
        }
        _ if description.contains("permission") || description.contains("access is denied") => {
            ConnectionError::PermissionDenied(port.to_string())
        }
        _ if description.contains("no such file") || description.contains("cannot find") => {
            ConnectionError::NotFound(port.to_string())
        }
        _ => ConnectionError::Other(format!("Failed to open {}: {}", port, e)),
    }
}

/// Opens real OS serial ports.
#[derive(Debug, Default)]
pub struct NativeDriver;

impl NativeDriver {
    pub fn new() -> Self {
        Self
    }
}

impl PortDriver for NativeDriver {
    fn open(
        &mut self,
        port: &str,
        config: &SerialConfig,
        on_event: InboundHandler,
    ) -> Result<Box<dyn PortHandle>, ConnectionError> {
        let parity = to_serialport_parity(config.parity)?;
        let stop_bits = to_serialport_stop_bits(config.stop_bits)?;
        let data_bits = to_serialport_data_bits(config.data_bits);

        let serial = serialport::new(port, config.baud_rate.as_u32())
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| classify_open_error(port, &e))?;

        let cancel_flag = Arc::new(AtomicBool::new(false));
        let reader = if config.open_mode.can_read() {
            let read_half = serial
                .try_clone()
                .map_err(|e| ConnectionError::Other(format!("Failed to clone {}: {}", port, e)))?;
            Some(spawn_reader(port.to_string(), read_half, cancel_flag.clone(), on_event)?)
        } else {
            None
        };

        tlog!(
            "[port] Opened {} at {} ({})",
            port,
            config.summary(),
            config.open_mode
        );

        Ok(Box::new(NativeHandle {
            port_name: port.to_string(),
            serial: Some(serial),
            cancel_flag,
            reader,
        }))
    }
}

fn spawn_reader(
    port_name: String,
    mut serial: Box<dyn serialport::SerialPort>,
    cancel_flag: Arc<AtomicBool>,
    on_event: InboundHandler,
) -> Result<JoinHandle<()>, ConnectionError> {
    std::thread::Builder::new()
        .name(format!("serial-reader {}", port_name))
        .spawn(move || {
            let mut buf = [0u8; READ_BUFFER_SIZE];
            while !cancel_flag.load(Ordering::Relaxed) {
                match serial.read(&mut buf) {
                    Ok(0) => {}
                    Ok(n) => on_event(PortEvent::Data(buf[..n].to_vec())),
                    Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        if !cancel_flag.load(Ordering::Relaxed) {
                            tlog!("[port] Read error on {}: {}", port_name, e);
                            on_event(PortEvent::Lost(format!("Read error on {}: {}", port_name, e)));
                        }
                        break;
                    }
                }
            }
            tlog!("[port] Reader for {} stopped", port_name);
        })
        .map_err(|e| ConnectionError::Other(format!("Failed to start reader thread: {}", e)))
}

struct NativeHandle {
    port_name: String,
    serial: Option<Box<dyn serialport::SerialPort>>,
    cancel_flag: Arc<AtomicBool>,
    /// Detached on close: the reader may be blocked delivering to a handler
    /// that waits on the caller of close(). It exits within one read timeout.
    reader: Option<JoinHandle<()>>,
}

impl PortHandle for NativeHandle {
    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ConnectionError> {
        let serial = self
            .serial
            .as_mut()
            .ok_or_else(|| ConnectionError::Other(format!("{} is closed", self.port_name)))?;
        serial
            .write_all(bytes)
            .and_then(|_| serial.flush())
            .map_err(|e| ConnectionError::Other(format!("Write to {} failed: {}", self.port_name, e)))
    }

    fn close(&mut self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
        self.reader.take();
        if self.serial.take().is_some() {
            tlog!("[port] Closed {}", self.port_name);
        }
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp_error(kind: serialport::ErrorKind, description: &str) -> serialport::Error {
        serialport::Error::new(kind, description)
    }

    #[test]
    fn test_classify_no_device() {
        let e = sp_error(serialport::ErrorKind::NoDevice, "No such device");
        assert_eq!(
            classify_open_error("/dev/ttyUSB9", &e),
            ConnectionError::NotFound("/dev/ttyUSB9".into())
        );
    }

    #[test]
    fn test_classify_permission_denied() {
        let e = sp_error(
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
            "Permission denied",
        );
        assert_eq!(
            classify_open_error("/dev/ttyS0", &e),
            ConnectionError::PermissionDenied("/dev/ttyS0".into())
        );
    }

    #[test]
    fn test_classify_busy() {
        let e = sp_error(
            serialport::ErrorKind::Io(std::io::ErrorKind::Other),
            "Device or resource busy",
        );
        assert_eq!(
            classify_open_error("/dev/ttyACM0", &e),
            ConnectionError::Busy("/dev/ttyACM0".into())
        );
    }

    #[test]
    fn test_classify_other_keeps_description() {
        let e = sp_error(serialport::ErrorKind::InvalidInput, "bad baud");
        match classify_open_error("COM4", &e) {
            ConnectionError::Other(msg) => {
                assert!(msg.contains("COM4"));
                assert!(msg.contains("bad baud"));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_open_missing_port_fails_without_panicking() {
        let mut driver = NativeDriver::new();
        let handler: InboundHandler = Arc::new(|_| {});
        let result = driver.open(
            "/dev/serialterm-does-not-exist",
            &SerialConfig::default(),
            handler,
        );
        assert!(result.is_err());
    }
}
