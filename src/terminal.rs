// src/terminal.rs
//
// Connection lifecycle and the send/receive paths of the terminal window.
//
// States: Closed <-> Open. While open the serial settings are locked; while
// closed every send is rejected. Inbound chunks arrive through `on_port_event`
// from whatever thread the driver reads on; the owner serialises access.

use serde::Serialize;
use std::path::PathBuf;

use crate::error::TerminalError;
use crate::history::{History, HistoryLine};
use crate::log_sink::LogSink;
use crate::port::{InboundHandler, PortDriver, PortEvent, PortHandle};
use crate::settings::{DisplayConfig, LogConfig, OpenMode, SerialConfig, SettingsStore};
use crate::transform::{self, Direction, TransformEvent};

/// Label for send attempts that never reached the port.
const NOT_SENT_LABEL: &str = "Not sent: ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Closed,
    Open,
}

/// Everything the window needs to redraw itself.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSnapshot {
    pub state: ConnectionState,
    pub port: Option<String>,
    pub settings: SettingsStore,
    pub sent: Vec<HistoryLine>,
    pub received: Vec<HistoryLine>,
    pub status: Option<String>,
}

struct OpenPort {
    handle: Box<dyn PortHandle>,
    mode: OpenMode,
}

pub struct Terminal<D: PortDriver> {
    driver: D,
    serial: SerialConfig,
    display: DisplayConfig,
    log: LogSink,
    port: Option<OpenPort>,
    sent: History,
    received: History,
    status: Option<String>,
}

impl<D: PortDriver> Terminal<D> {
    pub fn new(driver: D) -> Self {
        Self::with_settings(driver, SettingsStore::default())
    }

    pub fn with_settings(driver: D, settings: SettingsStore) -> Self {
        Self {
            driver,
            serial: settings.serial,
            display: settings.display,
            log: LogSink::new(settings.log),
            port: None,
            sent: History::default(),
            received: History::default(),
            status: None,
        }
    }

    // ------------------------------------------------------------------
    // State and settings
    // ------------------------------------------------------------------

    pub fn state(&self) -> ConnectionState {
        if self.port.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port.as_ref().map(|p| p.handle.port_name())
    }

    pub fn settings(&self) -> SettingsStore {
        SettingsStore {
            serial: self.serial,
            display: self.display,
            log: self.log.config().clone(),
        }
    }

    pub fn serial_config(&self) -> &SerialConfig {
        &self.serial
    }

    pub fn display_config(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn log_config(&self) -> &LogConfig {
        self.log.config()
    }

    /// Replace the port parameters. Rejected while the port is open.
    pub fn update_serial_config(&mut self, config: SerialConfig) -> Result<(), TerminalError> {
        if self.is_open() {
            return Err(TerminalError::SettingsLocked);
        }
        self.serial = config;
        Ok(())
    }

    /// Display flags may change at any time; only later lines are affected.
    pub fn set_display_config(&mut self, config: DisplayConfig) {
        self.display = config;
    }

    pub fn set_log_path(&mut self, path: Option<PathBuf>) -> Result<(), TerminalError> {
        self.log.set_path(path)?;
        self.status = Some(match self.log.config().active_path() {
            Some(p) => format!("Log file set to: {}", p.display()),
            None => "No log file set".to_string(),
        });
        Ok(())
    }

    pub fn set_log_enabled(&mut self, enabled: bool) {
        self.log.set_enabled(enabled);
    }

    pub fn set_log_append(&mut self, append: bool) -> Result<(), TerminalError> {
        self.log.set_append_mode(append)?;
        Ok(())
    }

    pub fn set_log_surface_errors(&mut self, surface: bool) {
        self.log.set_surface_errors(surface);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open `port` with the current serial settings.
    ///
    /// Opening an already open terminal is rejected; the existing connection is
    /// left untouched. A failed open leaves the terminal closed.
    pub fn open(&mut self, port: &str, on_event: InboundHandler) -> Result<(), TerminalError> {
        if self.is_open() {
            return Err(TerminalError::AlreadyOpen);
        }
        let port = port.trim();
        if port.is_empty() {
            return Err(TerminalError::MissingPort);
        }

        let mode = self.serial.open_mode;
        match self.driver.open(port, &self.serial, on_event) {
            Ok(handle) => {
                tlog!("[terminal] Connected to {} ({}, {})", port, self.serial.summary(), mode);
                self.status = Some(format!("Connected: {} ({})", port, mode));
                self.port = Some(OpenPort { handle, mode });
                Ok(())
            }
            Err(e) => {
                tlog!("[terminal] Failed to open {} as {}: {}", port, mode, e);
                Err(e.into())
            }
        }
    }

    /// Close the port. Closing a closed terminal does nothing.
    pub fn close(&mut self) {
        if let Some(mut open) = self.port.take() {
            let name = open.handle.port_name().to_string();
            open.handle.close();
            tlog!("[terminal] Closed {}", name);
            self.status = Some(format!("Port {} closed", name));
        }
    }

    // ------------------------------------------------------------------
    // Send / receive
    // ------------------------------------------------------------------

    /// Send the text from the send box.
    ///
    /// Returns the history line that was recorded, or `None` for empty input.
    /// Encoding and write failures are recorded as "Not sent" lines before the
    /// error is returned.
    pub fn send(&mut self, text: &str) -> Result<Option<HistoryLine>, TerminalError> {
        let mode = match &self.port {
            None => return Err(TerminalError::NotConnected),
            Some(open) => open.mode,
        };
        if !mode.can_write() {
            return Err(TerminalError::ReadOnly);
        }
        if text.is_empty() {
            return Ok(None);
        }

        let bytes = match transform::encode_outbound(text, self.display.hex_send) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.record_failed_send(text);
                return Err(e.into());
            }
        };

        let event = TransformEvent::capture(Direction::Sent, bytes, self.display.show_timestamps);
        let written = match self.port.as_mut() {
            Some(open) => open.handle.write(&event.raw_bytes),
            None => return Err(TerminalError::NotConnected),
        };
        if let Err(e) = written {
            tlog!("[terminal] {}", e);
            self.record_failed_send(text);
            return Err(e.into());
        }

        let line = HistoryLine {
            direction: Direction::Sent,
            text: format!("{}{}{}", event.prefix(), Direction::Sent.label(), text),
            failed: false,
        };
        self.sent.push(line.clone());
        self.log_line(&format!("{}{}", Direction::Sent.label(), text));
        Ok(Some(line))
    }

    fn record_failed_send(&mut self, text: &str) {
        let prefix = transform::timestamp_prefix(self.display.show_timestamps);
        self.sent.push(HistoryLine {
            direction: Direction::Sent,
            text: format!("{}{}{}", prefix, NOT_SENT_LABEL, text),
            failed: true,
        });
    }

    /// Render a received chunk into the receive history.
    ///
    /// Chunks that arrive after close (the reader lags by up to one read
    /// timeout) are dropped.
    pub fn receive(&mut self, bytes: Vec<u8>) -> Option<HistoryLine> {
        if !self.is_open() {
            return None;
        }
        let event = TransformEvent::capture(Direction::Received, bytes, self.display.show_timestamps);
        let body = transform::render_inbound(
            &event.raw_bytes,
            self.display.hex_receive,
            self.display.show_control_chars,
        );
        let line = HistoryLine {
            direction: Direction::Received,
            text: format!("{}{}{}", event.prefix(), Direction::Received.label(), body),
            failed: false,
        };
        self.received.push(line.clone());
        self.log_line(&format!("{}{}", Direction::Received.label(), body));
        Some(line)
    }

    /// Dispatch an event from the port reader.
    pub fn on_port_event(&mut self, event: PortEvent) -> Option<HistoryLine> {
        match event {
            PortEvent::Data(bytes) => self.receive(bytes),
            PortEvent::Lost(reason) => {
                if self.is_open() {
                    self.close();
                    self.status = Some(reason);
                }
                None
            }
        }
    }

    fn log_line(&mut self, line: &str) {
        if let Err(e) = self.log.write_line(line) {
            self.status = Some(format!("Log warning: {}", e));
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn sent_history(&self) -> &History {
        &self.sent
    }

    pub fn received_history(&self) -> &History {
        &self.received
    }

    pub fn clear_received(&mut self) {
        self.received.clear();
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Latest status-bar message.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn snapshot(&self) -> TerminalSnapshot {
        TerminalSnapshot {
            state: self.state(),
            port: self.port_name().map(str::to_string),
            settings: self.settings(),
            sent: self.sent.to_vec(),
            received: self.received.to_vec(),
            status: self.status.clone(),
        }
    }
}

impl<D: PortDriver> Drop for Terminal<D> {
    fn drop(&mut self) {
        self.close();
    }
}
