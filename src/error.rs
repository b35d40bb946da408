// src/error.rs
//
// Error taxonomy shared by the transform pipeline, the port layer and the terminal.
// Tauri commands flatten these to strings at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Outbound text could not be turned into bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Invalid hex data: {0}")]
    InvalidHex(String),
}

/// Failure reported by the serial driver when opening or using a port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Port {0} was not found")]
    NotFound(String),
    #[error("Permission denied opening {0}")]
    PermissionDenied(String),
    #[error("Port {0} is busy (already in use by another application)")]
    Busy(String),
    #[error("{0}")]
    Other(String),
}

/// A settings value outside the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unsupported baud rate {0} (expected 9600, 19200, 38400, 57600 or 115200)")]
    UnsupportedBaudRate(u32),
    #[error("Unsupported data bits {0} (expected 5, 6, 7 or 8)")]
    UnsupportedDataBits(u8),
    #[error("Unknown parity '{0}'")]
    UnknownParity(String),
    #[error("Unknown stop bits '{0}'")]
    UnknownStopBits(String),
    #[error("Unknown open mode '{0}'")]
    UnknownOpenMode(String),
}

/// Session log file could not be written.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every way a user action on the terminal can be rejected.
#[derive(Error, Debug)]
pub enum TerminalError {
    #[error("Not connected. Open a serial port first.")]
    NotConnected,
    #[error("The port is open read-only, data cannot be sent.")]
    ReadOnly,
    #[error("The port is already open. Close it before opening again.")]
    AlreadyOpen,
    #[error("No serial port selected.")]
    MissingPort,
    #[error("Serial settings cannot be changed while the port is open.")]
    SettingsLocked,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Log(#[from] LogError),
}
