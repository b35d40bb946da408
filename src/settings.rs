use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::SettingsError;

// ============================================================================
// Serial port settings
// ============================================================================

/// Baud rates offered by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    pub const ALL: [BaudRate; 5] = [
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        BaudRate::B115200
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = SettingsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        BaudRate::ALL
            .into_iter()
            .find(|b| b.as_u32() == value)
            .ok_or(SettingsError::UnsupportedBaudRate(value))
    }
}

impl From<BaudRate> for u32 {
    fn from(b: BaudRate) -> u32 {
        b.as_u32()
    }
}

/// Bits per character, 5 to 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DataBits(u8);

impl DataBits {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for DataBits {
    fn default() -> Self {
        DataBits(8)
    }
}

impl TryFrom<u8> for DataBits {
    type Error = SettingsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5..=8 => Ok(DataBits(value)),
            _ => Err(SettingsError::UnsupportedDataBits(value)),
        }
    }
}

impl From<DataBits> for u8 {
    fn from(d: DataBits) -> u8 {
        d.0
    }
}

/// Parity setting for serial port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
    Mark,
    Space,
}

impl Parity {
    /// Single-letter code used in "8N1" style summaries.
    pub fn code(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
            Parity::Mark => 'M',
            Parity::Space => 'S',
        }
    }
}

impl std::str::FromStr for Parity {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Parity::None),
            "even" => Ok(Parity::Even),
            "odd" => Ok(Parity::Odd),
            "mark" => Ok(Parity::Mark),
            "space" => Ok(Parity::Space),
            _ => Err(SettingsError::UnknownParity(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopBits {
    #[default]
    One,
    OneAndHalf,
    Two,
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopBits::One => "1",
            StopBits::OneAndHalf => "1.5",
            StopBits::Two => "2",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for StopBits {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(StopBits::One),
            "1.5" => Ok(StopBits::OneAndHalf),
            "2" => Ok(StopBits::Two),
            _ => Err(SettingsError::UnknownStopBits(s.to_string())),
        }
    }
}

/// Direction(s) the port is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenMode {
    ReadOnly,
    WriteOnly,
    #[default]
    ReadWrite,
}

impl OpenMode {
    pub fn can_read(self) -> bool {
        matches!(self, OpenMode::ReadOnly | OpenMode::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, OpenMode::WriteOnly | OpenMode::ReadWrite)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpenMode::ReadOnly => "read-only",
            OpenMode::WriteOnly => "write-only",
            OpenMode::ReadWrite => "read/write",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for OpenMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', '/', ' '], "").as_str() {
            "readonly" => Ok(OpenMode::ReadOnly),
            "writeonly" => Ok(OpenMode::WriteOnly),
            "readwrite" => Ok(OpenMode::ReadWrite),
            _ => Err(SettingsError::UnknownOpenMode(s.to_string())),
        }
    }
}

/// Parameters applied when the port is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialConfig {
    #[serde(default)]
    pub baud_rate: BaudRate,
    #[serde(default)]
    pub open_mode: OpenMode,
    #[serde(default)]
    pub data_bits: DataBits,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default)]
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Compact frame summary, e.g. "115200 8N1".
    pub fn summary(&self) -> String {
        format!(
            "{} {}{}{}",
            self.baud_rate.as_u32(),
            self.data_bits.get(),
            self.parity.code(),
            self.stop_bits
        )
    }
}

// ============================================================================
// Display and log settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(default)]
    pub hex_send: bool,
    #[serde(default)]
    pub hex_receive: bool,
    #[serde(default)]
    pub show_control_chars: bool,
    #[serde(default)]
    pub show_timestamps: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_append_mode")]
    pub append_mode: bool,
    /// Report log write failures to the user instead of dropping them.
    #[serde(default)]
    pub surface_errors: bool,
}

fn default_append_mode() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            append_mode: default_append_mode(),
            surface_errors: false,
        }
    }
}

impl LogConfig {
    /// The configured path, if it is non-empty.
    pub fn active_path(&self) -> Option<&PathBuf> {
        self.path.as_ref().filter(|p| !p.as_os_str().is_empty())
    }

    /// Logging only happens when enabled and pointed at a file.
    pub fn is_active(&self) -> bool {
        self.enabled && self.active_path().is_some()
    }
}

/// Default folder offered by the log file dialog.
pub fn default_log_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ============================================================================
// Settings store
// ============================================================================

/// In-memory settings for the lifetime of the session. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsStore {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate.as_u32(), 115200);
        assert_eq!(config.open_mode, OpenMode::ReadWrite);
        assert_eq!(config.data_bits.get(), 8);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.summary(), "115200 8N1");
    }

    #[test]
    fn test_baud_rate_conversion() {
        assert_eq!(BaudRate::try_from(9600).unwrap(), BaudRate::B9600);
        assert_eq!(BaudRate::try_from(57600).unwrap(), BaudRate::B57600);
        assert_eq!(
            BaudRate::try_from(4800),
            Err(SettingsError::UnsupportedBaudRate(4800))
        );
    }

    #[test]
    fn test_data_bits_range() {
        for bits in 5..=8 {
            assert_eq!(DataBits::try_from(bits).unwrap().get(), bits);
        }
        assert!(DataBits::try_from(4).is_err());
        assert!(DataBits::try_from(9).is_err());
    }

    #[test]
    fn test_parse_parity_stop_bits_open_mode() {
        assert_eq!("Mark".parse::<Parity>().unwrap(), Parity::Mark);
        assert!("bogus".parse::<Parity>().is_err());
        assert_eq!("1.5".parse::<StopBits>().unwrap(), StopBits::OneAndHalf);
        assert!("3".parse::<StopBits>().is_err());
        assert_eq!("read-only".parse::<OpenMode>().unwrap(), OpenMode::ReadOnly);
        assert_eq!("ReadWrite".parse::<OpenMode>().unwrap(), OpenMode::ReadWrite);
        assert!("sideways".parse::<OpenMode>().is_err());
    }

    #[test]
    fn test_open_mode_capabilities() {
        assert!(OpenMode::ReadOnly.can_read() && !OpenMode::ReadOnly.can_write());
        assert!(!OpenMode::WriteOnly.can_read() && OpenMode::WriteOnly.can_write());
        assert!(OpenMode::ReadWrite.can_read() && OpenMode::ReadWrite.can_write());
    }

    #[test]
    fn test_serial_config_json_shape() {
        let json = serde_json::to_value(SerialConfig::default()).unwrap();
        assert_eq!(json["baudRate"], 115200);
        assert_eq!(json["openMode"], "readWrite");
        assert_eq!(json["dataBits"], 8);
        assert_eq!(json["parity"], "none");
        assert_eq!(json["stopBits"], "one");

        let parsed: SerialConfig =
            serde_json::from_str(r#"{"baudRate":9600,"parity":"even","stopBits":"two"}"#).unwrap();
        assert_eq!(parsed.baud_rate, BaudRate::B9600);
        assert_eq!(parsed.parity, Parity::Even);
        assert_eq!(parsed.stop_bits, StopBits::Two);
        assert_eq!(parsed.open_mode, OpenMode::ReadWrite);
    }

    #[test]
    fn test_serial_config_rejects_unsupported_baud() {
        let parsed = serde_json::from_str::<SerialConfig>(r#"{"baudRate":1234}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_log_config_inert_without_path() {
        let mut log = LogConfig {
            enabled: true,
            ..LogConfig::default()
        };
        assert!(!log.is_active());
        log.path = Some(PathBuf::new());
        assert!(!log.is_active());
        log.path = Some(PathBuf::from("session.txt"));
        assert!(log.is_active());
        log.enabled = false;
        assert!(!log.is_active());
    }

    #[test]
    fn test_log_config_defaults_to_append() {
        assert!(LogConfig::default().append_mode);
        let parsed: LogConfig = serde_json::from_str(r#"{"enabled":true}"#).unwrap();
        assert!(parsed.append_mode);
        assert!(!parsed.surface_errors);
    }
}
