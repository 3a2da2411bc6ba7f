//! High-level MPU9250 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::spi::SpiInterface;
use crate::interface::Transport;
use crate::params::{celsius_from_raw, AccelDlpf, AccelScale, GyroDlpf, GyroScale};
use crate::registers::{
    command_byte,
    AccelConfig,
    AccelConfig2,
    GeneralConfig,
    GyroConfig,
    IntStatus,
    PowerManagement1,
    Register,
    ACCEL_CONFIG_2_DLPF_MASK,
    ACCEL_FS_SEL_MASK,
    CONFIG_DLPF_MASK,
    EXPECTED_WHO_AM_I,
    GYRO_FS_SEL_MASK,
    REG_ACCEL_XOUT_H,
    REG_GYRO_XOUT_H,
    REG_SMPLRT_DIV,
    REG_TEMP_OUT_H,
    REG_WHO_AM_I,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

/// Largest number of registers a single burst read may cover.
pub const MAX_BURST_LEN: usize = 32;

// Settle time after H_RESET before the chip answers reliably (milliseconds).
const RESET_SETTLE_DELAY_MS: u32 = 10;
// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;
// Accel, temperature and gyro output registers read in one burst.
const RAW_ALL_BYTES: usize = 14;

/// Reason recorded when initialization stops early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitFailure {
    /// The identity register did not match the MPU9250.
    Comms,
    /// A bus transaction required by the sequence failed.
    Driver,
}

/// Progress of the initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Not initialized yet, or closed.
    Uninitialized,
    /// Hard reset issued.
    Resetting,
    /// `WHO_AM_I` matched.
    IdentityChecked,
    /// Defaults applied; data reads are valid.
    Configured,
    /// Initialization aborted.
    Failed(InitFailure),
}

/// Raw output of a combined accelerometer, temperature and gyroscope burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSensorData {
    /// Accelerometer X, Y, Z.
    pub accel: [i16; 3],
    /// Temperature.
    pub temp: i16,
    /// Gyroscope X, Y, Z.
    pub gyro: [i16; 3],
}

/// Scaled output of a combined burst.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorData {
    /// Acceleration in g.
    pub accel: [f32; 3],
    /// Die temperature in degrees Celsius.
    pub temp: f32,
    /// Angular rate in radians per second.
    pub gyro: [f32; 3],
}

/// High-level synchronous driver for the MPU9250.
///
/// The driver assumes exclusive use of the bus: register updates are
/// read-modify-write sequences, so sharing a handle between execution
/// contexts needs a lock held by the caller.
pub struct Mpu9250<IFACE> {
    interface: Option<IFACE>,
    config: Config,
    state: DriverState,
    gyro_scale: GyroScale,
    accel_scale: AccelScale,
}

impl<IFACE> Mpu9250<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver bound to `interface` with the default configuration.
    pub fn new(interface: IFACE) -> Self {
        Self::with_config(interface, Config::default())
    }

    /// Creates a new driver bound to `interface` that applies `config` on init.
    pub fn with_config(interface: IFACE, config: Config) -> Self {
        Self {
            interface: Some(interface),
            config,
            state: DriverState::Uninitialized,
            gyro_scale: GyroScale::Dps250,
            accel_scale: AccelScale::G2,
        }
    }

    /// Releases the transport binding and returns it.
    ///
    /// Returns the transport instead of a `Result`: closing cannot fail, and the
    /// caller owns the bus again afterwards. Does not touch the chip. Calling it
    /// again returns `None`; every bus operation fails with
    /// [`Error::InvalidTransport`] until [`attach`](Self::attach).
    pub fn close(&mut self) -> Option<IFACE> {
        self.state = DriverState::Uninitialized;
        self.interface.take()
    }

    /// Binds a transport to a closed driver, returning the previous one if any.
    pub fn attach(&mut self, interface: IFACE) -> Option<IFACE> {
        self.state = DriverState::Uninitialized;
        self.interface.replace(interface)
    }

    /// Consumes the driver and returns the bound interface, if any.
    pub fn release(self) -> Option<IFACE> {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> Option<&mut IFACE> {
        self.interface.as_mut()
    }

    /// Returns the initialization state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the configuration applied by [`init`](Self::init).
    ///
    /// Individual setters such as [`set_gyro_scale`](Self::set_gyro_scale) only
    /// change the live chip state; use [`configure`](Self::configure) to replace
    /// this configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gyroscope range last applied successfully.
    pub fn gyro_scale(&self) -> GyroScale {
        self.gyro_scale
    }

    /// Accelerometer range last applied successfully.
    pub fn accel_scale(&self) -> AccelScale {
        self.accel_scale
    }

    /// Radians per second per LSB for the current gyroscope range.
    pub fn gyro_factor(&self) -> f32 {
        self.gyro_scale.factor()
    }

    /// g per LSB for the current accelerometer range.
    pub fn accel_factor(&self) -> f32 {
        self.accel_scale.factor()
    }
}

impl<SPI> Mpu9250<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI) -> Self {
        Self::new(SpiInterface::new(spi))
    }

    /// Releases the driver, returning the SPI device if still bound.
    pub fn release_spi(self) -> Option<SPI> {
        self.release().map(SpiInterface::release)
    }
}

impl<IFACE, CommE> Mpu9250<IFACE>
where
    IFACE: Transport<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Resets the chip, checks its identity and applies the configuration.
    ///
    /// Stops at the first failing step. Bus failures are reported as
    /// [`Error::Driver`], an identity mismatch as [`Error::Comms`].
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        if self.interface.is_none() {
            return Err(Error::InvalidTransport);
        }
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        self.state = DriverState::Resetting;
        let reset = u8::from(PowerManagement1::new().with_h_reset(true));
        if let Err(err) = self.write_register(PowerManagement1::ADDRESS, reset) {
            error!("reset write failed");
            return Err(self.abort_init(err));
        }
        delay.delay_ms(RESET_SETTLE_DELAY_MS);
        // H_RESET restores both scale fields to code 0.
        self.gyro_scale = GyroScale::Dps250;
        self.accel_scale = AccelScale::G2;
        debug!("reset complete");

        let who = match self.read_register(REG_WHO_AM_I) {
            Ok(who) => who,
            Err(err) => {
                error!("WHO_AM_I read failed");
                return Err(self.abort_init(err));
            }
        };
        if who != EXPECTED_WHO_AM_I {
            warn!("unexpected WHO_AM_I: {}", who);
            self.state = DriverState::Failed(InitFailure::Comms);
            return Err(Error::Comms(who));
        }
        self.state = DriverState::IdentityChecked;
        debug!("device identified");

        let config = self.config;
        if let Err(err) = self.apply_config(&config) {
            error!("applying default configuration failed");
            return Err(self.abort_init(err));
        }

        self.state = DriverState::Configured;
        info!(
            "MPU9250 configured: gyro {} dps, accel {} g",
            self.gyro_scale.dps(),
            self.accel_scale.g()
        );
        Ok(())
    }

    /// Validates and applies a new configuration to the device.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;
        self.apply_config(&config)
    }

    /// Reads the identity register.
    pub fn who_am_i(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_WHO_AM_I)
    }

    // ==================================================================
    // == Scale & Filter Configuration ==================================
    // ==================================================================
    /// Programs the gyroscope full-scale range.
    ///
    /// The stored conversion factor only changes once the register write succeeds.
    pub fn set_gyro_scale(&mut self, scale: GyroScale) -> Result<(), CommE> {
        let value = u8::from(GyroConfig::new().with_fs_sel(scale));
        self.update_register(GyroConfig::ADDRESS, value, GYRO_FS_SEL_MASK)?;
        self.gyro_scale = scale;
        debug!("gyro full scale: {} dps", scale.dps());
        Ok(())
    }

    /// Programs the gyroscope range from a full-scale value in degrees per second.
    ///
    /// Values other than 250, 500, 1000 and 2000 fail with
    /// [`Error::InvalidArgument`] without touching the bus.
    pub fn set_gyro_scale_dps(&mut self, dps: u16) -> Result<(), CommE> {
        let scale = GyroScale::try_from(dps).map_err(|_| Error::InvalidArgument)?;
        self.set_gyro_scale(scale)
    }

    /// Programs the accelerometer full-scale range.
    ///
    /// The stored conversion factor only changes once the register write succeeds.
    pub fn set_accel_scale(&mut self, scale: AccelScale) -> Result<(), CommE> {
        let value = u8::from(AccelConfig::new().with_fs_sel(scale));
        self.update_register(AccelConfig::ADDRESS, value, ACCEL_FS_SEL_MASK)?;
        self.accel_scale = scale;
        debug!("accel full scale: {} g", scale.g());
        Ok(())
    }

    /// Programs the accelerometer range from a full-scale value in g.
    ///
    /// Values other than 2, 4, 8 and 16 fail with [`Error::InvalidArgument`]
    /// without touching the bus.
    pub fn set_accel_scale_g(&mut self, g: u8) -> Result<(), CommE> {
        let scale = AccelScale::try_from(g).map_err(|_| Error::InvalidArgument)?;
        self.set_accel_scale(scale)
    }

    /// Reads back the gyroscope range currently programmed in the chip.
    pub fn read_gyro_scale(&mut self) -> Result<GyroScale, CommE> {
        let raw = self.read_register(GyroConfig::ADDRESS)?;
        Ok(GyroConfig::from(raw).fs_sel())
    }

    /// Reads back the accelerometer range currently programmed in the chip.
    pub fn read_accel_scale(&mut self) -> Result<AccelScale, CommE> {
        let raw = self.read_register(AccelConfig::ADDRESS)?;
        Ok(AccelConfig::from(raw).fs_sel())
    }

    /// Selects the gyroscope/temperature low-pass filter.
    pub fn set_gyro_dlpf(&mut self, dlpf: GyroDlpf) -> Result<(), CommE> {
        let value = u8::from(GeneralConfig::new().with_dlpf_cfg(dlpf));
        self.update_register(GeneralConfig::ADDRESS, value, CONFIG_DLPF_MASK)?;
        Ok(())
    }

    /// Selects the accelerometer low-pass filter and enables it.
    pub fn set_accel_dlpf(&mut self, dlpf: AccelDlpf) -> Result<(), CommE> {
        let value = u8::from(
            AccelConfig2::new()
                .with_a_dlpf_cfg(dlpf)
                .with_accel_fchoice_b(false),
        );
        self.update_register(AccelConfig2::ADDRESS, value, ACCEL_CONFIG_2_DLPF_MASK)?;
        Ok(())
    }

    /// Writes the sample rate divider.
    ///
    /// Only effective with a gyroscope filter that runs the 1 kHz internal rate.
    pub fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), CommE> {
        self.write_register(REG_SMPLRT_DIV, divider)?;
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ===============================================
    // ==================================================================
    #[inline]
    fn unpack_axis(msb: u8, lsb: u8) -> i16 {
        i16::from_be_bytes([msb, lsb])
    }

    #[inline]
    fn unpack_axes(raw: &[u8]) -> [i16; 3] {
        [
            Self::unpack_axis(raw[0], raw[1]),
            Self::unpack_axis(raw[2], raw[3]),
            Self::unpack_axis(raw[4], raw[5]),
        ]
    }

    #[inline]
    fn scale_axes(raw: [i16; 3], factor: f32) -> [f32; 3] {
        raw.map(|axis| f32::from(axis) * factor)
    }

    fn read_axes(&mut self, register: u8) -> Result<[i16; 3], CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.read_registers(register, &mut raw)?;
        Ok(Self::unpack_axes(&raw))
    }

    /// Reads a raw gyroscope triplet.
    pub fn read_gyro_raw(&mut self) -> Result<[i16; 3], CommE> {
        self.read_axes(REG_GYRO_XOUT_H)
    }

    /// Returns angular rate in radians per second.
    pub fn read_gyro(&mut self) -> Result<[f32; 3], CommE> {
        let raw = self.read_gyro_raw()?;
        Ok(Self::scale_axes(raw, self.gyro_factor()))
    }

    /// Reads a raw accelerometer triplet.
    pub fn read_accel_raw(&mut self) -> Result<[i16; 3], CommE> {
        self.read_axes(REG_ACCEL_XOUT_H)
    }

    /// Returns acceleration in g.
    pub fn read_accel(&mut self) -> Result<[f32; 3], CommE> {
        let raw = self.read_accel_raw()?;
        Ok(Self::scale_axes(raw, self.accel_factor()))
    }

    /// Reads the raw temperature sample.
    pub fn read_temp_raw(&mut self) -> Result<i16, CommE> {
        let mut raw = [0u8; 2];
        self.read_registers(REG_TEMP_OUT_H, &mut raw)?;
        Ok(Self::unpack_axis(raw[0], raw[1]))
    }

    /// Returns the die temperature in degrees Celsius.
    pub fn read_temp(&mut self) -> Result<f32, CommE> {
        self.read_temp_raw().map(celsius_from_raw)
    }

    /// Reads accelerometer, temperature and gyroscope outputs in one burst.
    pub fn read_all_raw(&mut self) -> Result<RawSensorData, CommE> {
        let mut raw = [0u8; RAW_ALL_BYTES];
        self.read_registers(REG_ACCEL_XOUT_H, &mut raw)?;

        Ok(RawSensorData {
            accel: Self::unpack_axes(&raw[0..6]),
            temp: Self::unpack_axis(raw[6], raw[7]),
            gyro: Self::unpack_axes(&raw[8..14]),
        })
    }

    /// Scaled variant of [`read_all_raw`](Self::read_all_raw).
    pub fn read_all(&mut self) -> Result<SensorData, CommE> {
        let raw = self.read_all_raw()?;

        Ok(SensorData {
            accel: Self::scale_axes(raw.accel, self.accel_factor()),
            temp: celsius_from_raw(raw.temp),
            gyro: Self::scale_axes(raw.gyro, self.gyro_factor()),
        })
    }

    /// Returns `true` when a new sample is available.
    ///
    /// Reading `INT_STATUS` clears it on the chip.
    pub fn data_ready(&mut self) -> Result<bool, CommE> {
        let raw = self.read_register(IntStatus::ADDRESS)?;
        Ok(IntStatus::from(raw).raw_data_ready())
    }

    // ==================================================================
    // == Register Access ================================================
    // ==================================================================
    fn exchange(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), CommE> {
        let interface = self.interface.as_mut().ok_or(Error::InvalidTransport)?;
        trace!("transfer {} bytes, command {}", write.len(), write[0]);
        interface.transfer(write, read).map_err(Error::Transport)
    }

    /// Reads a single register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        let command = [command_byte(register, true), 0x00];
        let mut response = [0u8; 2];
        self.exchange(&command, &mut response)?;
        Ok(response[1])
    }

    /// Reads `buf.len()` consecutive registers starting at `register`.
    ///
    /// Fails with [`Error::InvalidArgument`] above [`MAX_BURST_LEN`] registers.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CommE> {
        if buf.is_empty() {
            return Ok(());
        }
        if buf.len() > MAX_BURST_LEN {
            return Err(Error::InvalidArgument);
        }

        let frame_len = buf.len() + 1;
        let mut command = [0u8; MAX_BURST_LEN + 1];
        command[0] = command_byte(register, true);
        let mut response = [0u8; MAX_BURST_LEN + 1];
        self.exchange(&command[..frame_len], &mut response[..frame_len])?;

        // Byte 0 is clocked in while the address goes out.
        buf.copy_from_slice(&response[1..frame_len]);
        Ok(())
    }

    /// Writes a single register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        let command = [command_byte(register, false), value];
        let mut response = [0u8; 2];
        self.exchange(&command, &mut response)
    }

    /// Replaces the bits selected by `mask` with those of `value`.
    ///
    /// Not atomic: the register is read, merged and written back in two
    /// transactions. A failed read skips the write.
    pub fn update_register(&mut self, register: u8, value: u8, mask: u8) -> Result<(), CommE> {
        let current = self.read_register(register)?;
        let updated = (current & !mask) | (value & mask);
        self.write_register(register, updated)
    }

    // ==================================================================
    // == Internal Configuration Helpers =================================
    // ==================================================================
    fn apply_config(&mut self, config: &Config) -> Result<(), CommE> {
        self.set_gyro_scale(config.gyro_scale)?;
        self.set_accel_scale(config.accel_scale)?;

        if let Some(dlpf) = config.gyro_dlpf {
            self.set_gyro_dlpf(dlpf)?;
        }
        if let Some(dlpf) = config.accel_dlpf {
            self.set_accel_dlpf(dlpf)?;
        }
        if let Some(divider) = config.sample_rate_divider {
            self.set_sample_rate_divider(divider)?;
        }

        self.config = *config;
        Ok(())
    }

    fn abort_init(&mut self, err: Error<CommE>) -> Error<CommE> {
        self.state = DriverState::Failed(InitFailure::Driver);
        match err {
            Error::Transport(inner) => Error::Driver(inner),
            other => other,
        }
    }
}
