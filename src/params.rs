//! Strongly typed parameter enumerations for the MPU9250 driver.
//!
//! These enums map directly to register field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs.
//!
//! # Examples
//!
//! ```rust
//! use mpu9250::params::{AccelScale, GyroScale};
//!
//! assert_eq!(GyroScale::Dps2000.code(), 0b11);
//! assert_eq!(AccelScale::try_from(16u8), Ok(AccelScale::G16));
//! assert!(GyroScale::try_from(300u16).is_err());
//! ```

use core::f32::consts::PI;

use modular_bitfield::prelude::Specifier;

/// Raw signed 16-bit half range used as the gyroscope conversion denominator.
pub const GYRO_LSB_BASE: f32 = 32_768.0;
/// Raw signed 16-bit half range used as the accelerometer conversion denominator.
pub const ACCEL_LSB_BASE: f32 = 32_768.0;

/// Temperature sensitivity in LSB per degree Celsius.
///
/// Provenance unknown: the register map lists different values for this part.
/// Kept unchanged so readings stay comparable with existing deployments.
pub const TEMP_SENSITIVITY: f32 = 340.0;
/// Temperature offset in degrees Celsius applied after scaling.
///
/// Same provenance caveat as [`TEMP_SENSITIVITY`].
pub const TEMP_OFFSET_C: f32 = 36.53;

/// Converts a raw `TEMP_OUT` sample to degrees Celsius.
pub fn celsius_from_raw(raw: i16) -> f32 {
    f32::from(raw) / TEMP_SENSITIVITY + TEMP_OFFSET_C
}

/// Returned when a numeric value does not name a supported setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownValue;

/// Gyroscope full-scale range selections encoded in `GYRO_CONFIG[4:3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum GyroScale {
    /// ±250 °/s.
    Dps250 = 0b00,
    /// ±500 °/s.
    Dps500 = 0b01,
    /// ±1000 °/s.
    Dps1000 = 0b10,
    /// ±2000 °/s.
    Dps2000 = 0b11,
}

impl GyroScale {
    /// Returns the 2-bit register code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the full-scale value in degrees per second.
    pub const fn dps(self) -> u16 {
        match self {
            Self::Dps250 => 250,
            Self::Dps500 => 500,
            Self::Dps1000 => 1_000,
            Self::Dps2000 => 2_000,
        }
    }

    /// Returns the conversion factor from raw LSB to radians per second.
    pub const fn factor(self) -> f32 {
        self.dps() as f32 / 180.0 * PI / GYRO_LSB_BASE
    }
}

impl TryFrom<u16> for GyroScale {
    type Error = UnknownValue;

    /// Maps a full-scale value in degrees per second.
    fn try_from(dps: u16) -> Result<Self, Self::Error> {
        match dps {
            250 => Ok(Self::Dps250),
            500 => Ok(Self::Dps500),
            1_000 => Ok(Self::Dps1000),
            2_000 => Ok(Self::Dps2000),
            _ => Err(UnknownValue),
        }
    }
}

/// Accelerometer full-scale range selections encoded in `ACCEL_CONFIG[4:3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AccelScale {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl AccelScale {
    /// Returns the 2-bit register code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the full-scale value in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Returns the conversion factor from raw LSB to g.
    pub const fn factor(self) -> f32 {
        self.g() as f32 / ACCEL_LSB_BASE
    }
}

impl TryFrom<u8> for AccelScale {
    type Error = UnknownValue;

    /// Maps a full-scale value in g.
    fn try_from(g: u8) -> Result<Self, Self::Error> {
        match g {
            2 => Ok(Self::G2),
            4 => Ok(Self::G4),
            8 => Ok(Self::G8),
            16 => Ok(Self::G16),
            _ => Err(UnknownValue),
        }
    }
}

/// Gyroscope and temperature low-pass filter selections encoded in `CONFIG[2:0]`.
///
/// Only effective while `GYRO_CONFIG.FCHOICE_B` is clear, which is the reset state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum GyroDlpf {
    /// 250 Hz bandwidth, 8 kHz internal rate.
    Hz250 = 0b000,
    /// 184 Hz bandwidth.
    Hz184 = 0b001,
    /// 92 Hz bandwidth.
    Hz92 = 0b010,
    /// 41 Hz bandwidth.
    Hz41 = 0b011,
    /// 20 Hz bandwidth.
    Hz20 = 0b100,
    /// 10 Hz bandwidth.
    Hz10 = 0b101,
    /// 5 Hz bandwidth.
    Hz5 = 0b110,
    /// 3600 Hz bandwidth, 8 kHz internal rate.
    Hz3600 = 0b111,
}

impl GyroDlpf {
    /// Returns the nominal gyroscope bandwidth in hertz.
    pub const fn bandwidth_hz(self) -> u16 {
        match self {
            Self::Hz250 => 250,
            Self::Hz184 => 184,
            Self::Hz92 => 92,
            Self::Hz41 => 41,
            Self::Hz20 => 20,
            Self::Hz10 => 10,
            Self::Hz5 => 5,
            Self::Hz3600 => 3_600,
        }
    }

    /// Returns `true` when `SMPLRT_DIV` applies, i.e. the internal rate is 1 kHz.
    pub const fn uses_sample_rate_divider(self) -> bool {
        !matches!(self, Self::Hz250 | Self::Hz3600)
    }
}

/// Accelerometer low-pass filter selections encoded in `ACCEL_CONFIG_2[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum AccelDlpf {
    /// 218.1 Hz bandwidth.
    Hz218 = 0b000,
    /// 218.1 Hz bandwidth (alternate encoding).
    Hz218Alt = 0b001,
    /// 99 Hz bandwidth.
    Hz99 = 0b010,
    /// 44.8 Hz bandwidth.
    Hz45 = 0b011,
    /// 21.2 Hz bandwidth.
    Hz21 = 0b100,
    /// 10.2 Hz bandwidth.
    Hz10 = 0b101,
    /// 5.05 Hz bandwidth.
    Hz5 = 0b110,
    /// 420 Hz bandwidth.
    Hz420 = 0b111,
}
