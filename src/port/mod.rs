// src/port/mod.rs
//
// Serial port access behind a small driver seam.
//
// The terminal only talks to `PortDriver`/`PortHandle`; the native
// implementation wraps the serialport crate, tests use an in-memory double.

pub mod native;
pub(crate) mod utils;

use std::sync::Arc;

use crate::error::ConnectionError;
use crate::settings::SerialConfig;

pub use native::{list_serial_ports, NativeDriver, SerialPortInfo};

/// Something that happened on an open port, delivered off the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortEvent {
    /// A chunk of received bytes, copied out of the read buffer.
    Data(Vec<u8>),
    /// The port failed underneath us (unplugged, I/O error).
    Lost(String),
}

/// Callback registered at open time for inbound port events.
pub type InboundHandler = Arc<dyn Fn(PortEvent) + Send + Sync>;

/// Opens ports. One driver can open many ports over its lifetime.
pub trait PortDriver: Send {
    /// Open `port` with `config`.
    ///
    /// When the open mode can read, the driver must deliver inbound data to
    /// `on_event` until the handle is closed.
    fn open(
        &mut self,
        port: &str,
        config: &SerialConfig,
        on_event: InboundHandler,
    ) -> Result<Box<dyn PortHandle>, ConnectionError>;
}

/// An open port.
pub trait PortHandle: Send {
    fn port_name(&self) -> &str;

    /// Write all bytes; returns once the transport accepted them.
    fn write(&mut self, bytes: &[u8]) -> Result<(), ConnectionError>;

    /// Stop reading and release the port. Idempotent.
    fn close(&mut self);
}
