//! `#![no_std]` driver for the InvenSense MPU9250 motion sensor over SPI.
//!
//! The driver talks to the chip through a single full-duplex
//! [`Transport`](crate::interface::Transport) capability. An adapter for any
//! `embedded-hal` 1.0 [`SpiDevice`](embedded_hal::spi::SpiDevice) is provided in
//! [`interface::spi`]. The magnetometer (AK8963) is not supported.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod params;
pub mod registers;
pub mod stream;

pub use crate::config::Config;
pub use crate::device::{DriverState, InitFailure, Mpu9250, RawSensorData, SensorData};
pub use crate::error::{Error, Result};
pub use crate::params::{AccelDlpf, AccelScale, GyroDlpf, GyroScale};
