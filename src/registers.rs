//! Register map definitions for the MPU9250 accelerometer/gyroscope.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AccelDlpf, AccelScale, GyroDlpf, GyroScale};

/// Register address of `SMPLRT_DIV`.
pub const REG_SMPLRT_DIV: u8 = 0x19;
/// Register address of `CONFIG`.
pub const REG_CONFIG: u8 = 0x1A;
/// Register address of `GYRO_CONFIG`.
pub const REG_GYRO_CONFIG: u8 = 0x1B;
/// Register address of `ACCEL_CONFIG`.
pub const REG_ACCEL_CONFIG: u8 = 0x1C;
/// Register address of `ACCEL_CONFIG_2`.
pub const REG_ACCEL_CONFIG_2: u8 = 0x1D;
/// Register address of `INT_STATUS`.
pub const REG_INT_STATUS: u8 = 0x3A;
/// Register address of `ACCEL_XOUT_H`.
pub const REG_ACCEL_XOUT_H: u8 = 0x3B;
/// Register address of `TEMP_OUT_H`.
pub const REG_TEMP_OUT_H: u8 = 0x41;
/// Register address of `GYRO_XOUT_H`.
pub const REG_GYRO_XOUT_H: u8 = 0x43;
/// Register address of `PWR_MGMT_1`.
pub const REG_PWR_MGMT_1: u8 = 0x6B;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x75;

/// Value reported by `WHO_AM_I` on a genuine MPU9250.
pub const EXPECTED_WHO_AM_I: u8 = 0x71;

/// Direction bit set in the address byte of a read transaction.
pub const READ_FLAG: u8 = 0x80;
/// Direction bit pattern of a write transaction (bit 7 clear).
pub const WRITE_FLAG: u8 = 0x00;
/// Mask selecting the 7-bit register address.
pub const ADDRESS_MASK: u8 = 0x7F;

/// `PWR_MGMT_1.H_RESET`: resets internal registers to their defaults.
pub const PWR_MGMT_1_H_RESET: u8 = 0x80;

/// Bit offset of `GYRO_CONFIG.GYRO_FS_SEL`.
pub const GYRO_FS_SEL_SHIFT: u8 = 3;
/// Mask of `GYRO_CONFIG.GYRO_FS_SEL`.
pub const GYRO_FS_SEL_MASK: u8 = 0b11 << GYRO_FS_SEL_SHIFT;
/// Bit offset of `ACCEL_CONFIG.ACCEL_FS_SEL`.
pub const ACCEL_FS_SEL_SHIFT: u8 = 3;
/// Mask of `ACCEL_CONFIG.ACCEL_FS_SEL`.
pub const ACCEL_FS_SEL_MASK: u8 = 0b11 << ACCEL_FS_SEL_SHIFT;
/// Mask of `CONFIG.DLPF_CFG`.
pub const CONFIG_DLPF_MASK: u8 = 0b0000_0111;
/// Mask of `ACCEL_CONFIG_2.A_DLPFCFG` and `ACCEL_FCHOICE_B`.
pub const ACCEL_CONFIG_2_DLPF_MASK: u8 = 0b0000_1111;

/// Builds the first byte of a transaction: 7-bit address plus direction flag.
pub const fn command_byte(register: u8, is_read: bool) -> u8 {
    let address = register & ADDRESS_MASK;
    if is_read { address | READ_FLAG } else { address | WRITE_FLAG }
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address as documented in the register map.
    const ADDRESS: u8;
    /// Value held by the register after power-up or `H_RESET`.
    const RESET_VALUE: u8;
}

/// Bitfield representation of the `PWR_MGMT_1` register (address `0x6B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerManagement1 {
    // Clock source selection (bits 2:0).
    pub clksel: B3,
    // Power down internal PTAT voltage generator (bit 3).
    pub pd_ptat: bool,
    // Gyro standby (bit 4).
    pub gyro_standby: bool,
    // Cycle between sleep and sampling (bit 5).
    pub cycle: bool,
    // Sleep mode (bit 6).
    pub sleep: bool,
    // Hard reset, self-clearing (bit 7).
    pub h_reset: bool,
}

impl From<u8> for PowerManagement1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerManagement1> for u8 {
    fn from(value: PowerManagement1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CONFIG` register (address `0x1A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralConfig {
    // Gyro/temperature low-pass filter (bits 2:0).
    pub dlpf_cfg: GyroDlpf,
    // FSYNC pin sampling target (bits 5:3).
    pub ext_sync_set: B3,
    // FIFO stops instead of overwriting when full (bit 6).
    pub fifo_mode: bool,
    #[skip]
    __: B1,
}

impl From<u8> for GeneralConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<GeneralConfig> for u8 {
    fn from(value: GeneralConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `GYRO_CONFIG` register (address `0x1B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroConfig {
    // Filter bypass (bits 1:0).
    pub fchoice_b: B2,
    #[skip]
    __: B1,
    // Full-scale selection (bits 4:3).
    pub fs_sel: GyroScale,
    // Z-axis self-test (bit 5).
    pub zg_st: bool,
    // Y-axis self-test (bit 6).
    pub yg_st: bool,
    // X-axis self-test (bit 7).
    pub xg_st: bool,
}

impl From<u8> for GyroConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<GyroConfig> for u8 {
    fn from(value: GyroConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACCEL_CONFIG` register (address `0x1C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig {
    #[skip]
    __: B3,
    // Full-scale selection (bits 4:3).
    pub fs_sel: AccelScale,
    // Z-axis self-test (bit 5).
    pub az_st: bool,
    // Y-axis self-test (bit 6).
    pub ay_st: bool,
    // X-axis self-test (bit 7).
    pub ax_st: bool,
}

impl From<u8> for AccelConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<AccelConfig> for u8 {
    fn from(value: AccelConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACCEL_CONFIG_2` register (address `0x1D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelConfig2 {
    // Accelerometer low-pass filter (bits 2:0).
    pub a_dlpf_cfg: AccelDlpf,
    // Filter bypass, inverted (bit 3).
    pub accel_fchoice_b: bool,
    #[skip]
    __: B4,
}

impl From<u8> for AccelConfig2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<AccelConfig2> for u8 {
    fn from(value: AccelConfig2) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_STATUS` register (address `0x3A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntStatus {
    // Raw sensor data ready (bit 0).
    pub raw_data_ready: bool,
    #[skip]
    __: B2,
    // FSYNC interrupt (bit 3).
    pub fsync: bool,
    // FIFO overflow (bit 4).
    pub fifo_overflow: bool,
    #[skip]
    __: B1,
    // Wake-on-motion interrupt (bit 6).
    pub wake_on_motion: bool,
    #[skip]
    __: B1,
}

impl From<u8> for IntStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntStatus> for u8 {
    fn from(value: IntStatus) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for PowerManagement1 {
    const ADDRESS: u8 = REG_PWR_MGMT_1;
    const RESET_VALUE: u8 = 0x01;
}

impl Register for GeneralConfig {
    const ADDRESS: u8 = REG_CONFIG;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for GyroConfig {
    const ADDRESS: u8 = REG_GYRO_CONFIG;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for AccelConfig {
    const ADDRESS: u8 = REG_ACCEL_CONFIG;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for AccelConfig2 {
    const ADDRESS: u8 = REG_ACCEL_CONFIG_2;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for IntStatus {
    const ADDRESS: u8 = REG_INT_STATUS;
    const RESET_VALUE: u8 = 0x00;
}
