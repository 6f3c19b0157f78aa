//! Analog reader for the Grove Base Hat ADC
//!
//! The hat carries a small MCU that samples its analog ports and exposes
//! each channel as a 16-bit little-endian register over I2C.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use thiserror::Error;
use tracing::{debug, warn};

use super::normalize::{AxisReading, ADC_MAX_RAW};

/// Default I2C address of the Base Hat ADC
pub const GROVE_ADC_ADDRESS: u8 = 0x04;

/// Product ID register
const REG_PRODUCT_ID: u8 = 0x00;
/// Firmware version register
const REG_VERSION: u8 = 0x02;
/// First raw-value register; channel `n` lives at `REG_RAW_BASE + n`
const REG_RAW_BASE: u8 = 0x10;

/// Product IDs reported by known hats
const PID_BASE_HAT: u16 = 0x0004;
const PID_BASE_HAT_ZERO: u16 = 0x0005;

/// Number of analog channels on the hat
pub const CHANNEL_COUNT: u8 = 8;

/// Failure reading the ADC
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AdcError {
    #[error("I2C bus error: {0:?}")]
    Bus(ErrorKind),

    #[error("ADC channel {0} does not exist on the hat")]
    InvalidChannel(u8),

    #[error("ADC channel {channel} reported {value}, outside the 12-bit range")]
    OutOfRange { channel: u8, value: u16 },
}

/// Source of raw analog readings
///
/// Implementations are blocking and only ever used from the poll loop.
pub trait AnalogReader {
    /// Read one channel, returning a value in `0..=4095`
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError>;

    /// Read both stick axes for one tick
    fn read_axes(&mut self, x_channel: u8, y_channel: u8) -> Result<AxisReading, AdcError> {
        let x = self.read_raw(x_channel)?;
        let y = self.read_raw(y_channel)?;
        Ok(AxisReading::new(x, y))
    }
}

/// Base Hat ADC on any `embedded-hal` I2C bus
pub struct GroveAdc<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> GroveAdc<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check that something answering like a Base Hat sits on the bus
    ///
    /// Bus errors are returned so startup can fail early. An unexpected
    /// product ID is only logged, since clones of the hat report other IDs.
    pub fn probe(&mut self) -> Result<u16, AdcError> {
        let pid = self.read_register(REG_PRODUCT_ID)?;
        let version = self.read_register(REG_VERSION)?;

        match pid {
            PID_BASE_HAT => debug!("Found Grove Base Hat (firmware v{})", version),
            PID_BASE_HAT_ZERO => debug!("Found Grove Base Hat for Pi Zero (firmware v{})", version),
            other => warn!(
                "Unknown ADC product ID 0x{:04X} at address 0x{:02X}, continuing anyway",
                other, self.address
            ),
        }

        Ok(pid)
    }

    fn read_register(&mut self, register: u8) -> Result<u16, AdcError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| AdcError::Bus(e.kind()))?;
        Ok(u16::from_le_bytes(buf))
    }
}

impl<I2C: I2c> AnalogReader for GroveAdc<I2C> {
    fn read_raw(&mut self, channel: u8) -> Result<u16, AdcError> {
        if channel >= CHANNEL_COUNT {
            return Err(AdcError::InvalidChannel(channel));
        }

        let value = self.read_register(REG_RAW_BASE + channel)?;
        if value > ADC_MAX_RAW {
            return Err(AdcError::OutOfRange { channel, value });
        }

        Ok(value)
    }
}
