// src/transform/mod.rs
//
// Conversions between raw serial bytes and the text shown in the terminal.
//
// - encode: outbound text (UTF-8 or hex digits) -> bytes
// - render: inbound bytes -> hex dump or control-char-safe text
// - timestamp: `[HH:MM:SS.mmm] ` line prefixes
//
// Everything in here is pure; the terminal decides when to call it.

pub mod encode;
pub mod render;
pub mod timestamp;

pub use encode::{decode_hex, encode_outbound};
pub use render::{escape_control_chars, filter_control_chars, hex_render, render_inbound};
pub use timestamp::{format_timestamp_prefix, timestamp_prefix};

use serde::{Deserialize, Serialize};

/// Which way a chunk of data travelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Label placed between the timestamp and the payload in history lines.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Sent => "Sent: ",
            Direction::Received => "Received: ",
        }
    }
}

/// One send or receive, captured at the moment it happened.
#[derive(Clone, Debug)]
pub struct TransformEvent {
    pub direction: Direction,
    pub raw_bytes: Vec<u8>,
    pub timestamp: Option<chrono::DateTime<chrono::Local>>,
}

impl TransformEvent {
    /// Capture an event now. The timestamp is only taken when it will be shown.
    pub fn capture(direction: Direction, raw_bytes: Vec<u8>, with_timestamp: bool) -> Self {
        Self {
            direction,
            raw_bytes,
            timestamp: with_timestamp.then(chrono::Local::now),
        }
    }

    /// Timestamp prefix for this event, empty when none was captured.
    pub fn prefix(&self) -> String {
        self.timestamp
            .as_ref()
            .map(format_timestamp_prefix)
            .unwrap_or_default()
    }
}
