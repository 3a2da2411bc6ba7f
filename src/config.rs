//! Configuration primitives for the MPU9250 driver.

use crate::params::{AccelDlpf, AccelScale, GyroDlpf, GyroScale};

/// User-facing configuration applied by [`Mpu9250::init`](crate::Mpu9250::init).
///
/// Optional fields left as `None` keep the chip's post-reset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Gyroscope full-scale range.
    pub gyro_scale: GyroScale,
    /// Accelerometer full-scale range.
    pub accel_scale: AccelScale,
    /// Gyroscope/temperature low-pass filter.
    pub gyro_dlpf: Option<GyroDlpf>,
    /// Accelerometer low-pass filter.
    pub accel_dlpf: Option<AccelDlpf>,
    /// Sample rate divider: `rate = 1 kHz / (1 + divider)`.
    pub sample_rate_divider: Option<u8>,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration can be applied as a whole.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.sample_rate_divider.is_some()
            && !self
                .gyro_dlpf
                .is_some_and(GyroDlpf::uses_sample_rate_divider)
        {
            return Err(ConfigError::DividerWithoutDlpf);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the gyroscope full-scale range.
    pub fn gyro_scale(mut self, scale: GyroScale) -> Self {
        self.config.gyro_scale = scale;
        self
    }

    /// Overrides the accelerometer full-scale range.
    pub fn accel_scale(mut self, scale: AccelScale) -> Self {
        self.config.accel_scale = scale;
        self
    }

    /// Selects the gyroscope low-pass filter.
    pub fn gyro_dlpf(mut self, dlpf: GyroDlpf) -> Self {
        self.config.gyro_dlpf = Some(dlpf);
        self
    }

    /// Selects the accelerometer low-pass filter.
    pub fn accel_dlpf(mut self, dlpf: AccelDlpf) -> Self {
        self.config.accel_dlpf = Some(dlpf);
        self
    }

    /// Sets the sample rate divider.
    pub fn sample_rate_divider(mut self, divider: u8) -> Self {
        self.config.sample_rate_divider = Some(divider);
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gyro_scale: GyroScale::Dps2000,
            accel_scale: AccelScale::G16,
            gyro_dlpf: None,
            accel_dlpf: None,
            sample_rate_divider: None,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A sample rate divider was requested without a DLPF mode that honours it.
    DividerWithoutDlpf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reset_defaults() {
        let config = Config::default();
        assert_eq!(config.gyro_scale, GyroScale::Dps2000);
        assert_eq!(config.accel_scale, AccelScale::G16);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn divider_requires_filtered_mode() {
        let missing = Config::new().sample_rate_divider(4).build();
        assert_eq!(missing.validate(), Err(ConfigError::DividerWithoutDlpf));

        let bypassed = Config::new()
            .gyro_dlpf(GyroDlpf::Hz3600)
            .sample_rate_divider(4)
            .build();
        assert_eq!(bypassed.validate(), Err(ConfigError::DividerWithoutDlpf));

        let filtered = Config::new()
            .gyro_dlpf(GyroDlpf::Hz41)
            .sample_rate_divider(4)
            .build();
        assert_eq!(filtered.validate(), Ok(()));
    }
}
