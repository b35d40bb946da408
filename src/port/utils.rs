// src/port/utils.rs
//
// Conversions from our settings types to the serialport crate's types.
// Settings the serialport backend cannot express are rejected here, before
// any OS call is made.

use serialport::{DataBits as SpDataBits, Parity as SpParity, StopBits as SpStopBits};

use crate::error::ConnectionError;
use crate::settings::{DataBits, Parity, StopBits};

/// Convert our Parity enum to serialport crate's Parity type
pub fn to_serialport_parity(p: Parity) -> Result<SpParity, ConnectionError> {
    match p {
        Parity::None => Ok(SpParity::None),
        Parity::Odd => Ok(SpParity::Odd),
        Parity::Even => Ok(SpParity::Even),
        Parity::Mark | Parity::Space => Err(ConnectionError::Other(format!(
            "{:?} parity is not supported by this serial backend",
            p
        ))),
    }
}

/// Convert data bits to serialport crate's DataBits type
pub fn to_serialport_data_bits(bits: DataBits) -> SpDataBits {
    match bits.get() {
        5 => SpDataBits::Five,
        6 => SpDataBits::Six,
        7 => SpDataBits::Seven,
        _ => SpDataBits::Eight,
    }
}

/// Convert stop bits to serialport crate's StopBits type
pub fn to_serialport_stop_bits(bits: StopBits) -> Result<SpStopBits, ConnectionError> {
    match bits {
        StopBits::One => Ok(SpStopBits::One),
        StopBits::Two => Ok(SpStopBits::Two),
        StopBits::OneAndHalf => Err(ConnectionError::Other(
            "1.5 stop bits are not supported by this serial backend".to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_serialport_parity() {
        assert!(matches!(to_serialport_parity(Parity::None), Ok(SpParity::None)));
        assert!(matches!(to_serialport_parity(Parity::Odd), Ok(SpParity::Odd)));
        assert!(matches!(to_serialport_parity(Parity::Even), Ok(SpParity::Even)));
        assert!(matches!(
            to_serialport_parity(Parity::Mark),
            Err(ConnectionError::Other(msg)) if msg.contains("Mark")
        ));
        assert!(to_serialport_parity(Parity::Space).is_err());
    }

    #[test]
    fn test_to_serialport_data_bits() {
        let bits = |n: u8| DataBits::try_from(n).unwrap();
        assert!(matches!(to_serialport_data_bits(bits(5)), SpDataBits::Five));
        assert!(matches!(to_serialport_data_bits(bits(6)), SpDataBits::Six));
        assert!(matches!(to_serialport_data_bits(bits(7)), SpDataBits::Seven));
        assert!(matches!(to_serialport_data_bits(bits(8)), SpDataBits::Eight));
    }

    #[test]
    fn test_to_serialport_stop_bits() {
        assert!(matches!(to_serialport_stop_bits(StopBits::One), Ok(SpStopBits::One)));
        assert!(matches!(to_serialport_stop_bits(StopBits::Two), Ok(SpStopBits::Two)));
        assert!(to_serialport_stop_bits(StopBits::OneAndHalf).is_err());
    }
}
