//! Periodic sampling loop with cooperative cancellation.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::device::Mpu9250;
use crate::error::Result;
use crate::interface::Transport;

/// Flag checked by [`Mpu9250::stream_accel`] before every sample.
///
/// Can live in a `static` and be cancelled from an interrupt handler.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Creates a token in the running state.
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Requests the loop to stop after the current sample.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Re-arms the token for another run.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

/// One scaled accelerometer reading, in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    /// X axis.
    pub x: f32,
    /// Y axis.
    pub y: f32,
    /// Z axis.
    pub z: f32,
}

impl AccelSample {
    /// Euclidean norm of the three axes.
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

impl From<[f32; 3]> for AccelSample {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl<IFACE, CommE> Mpu9250<IFACE>
where
    IFACE: Transport<Error = CommE>,
{
    /// Reads the accelerometer every `period_ms` until `token` is cancelled.
    ///
    /// Each reading is handed to `sink`. Returns the number of samples
    /// delivered; a failed read ends the loop with that error.
    pub fn stream_accel<D, F>(
        &mut self,
        delay: &mut D,
        period_ms: u32,
        token: &CancelToken,
        mut sink: F,
    ) -> Result<u32, CommE>
    where
        D: DelayNs,
        F: FnMut(AccelSample),
    {
        let mut delivered = 0u32;
        while !token.is_cancelled() {
            let sample = AccelSample::from(self.read_accel()?);
            trace!("accel sample magnitude {}", sample.magnitude());
            sink(sample);
            delivered = delivered.wrapping_add(1);
            delay.delay_ms(period_ms);
        }

        debug!("accel stream stopped after {} samples", delivered);
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::tests::{BusFault, FakeChip};
    use crate::error::Error;
    use crate::params::AccelScale;
    use crate::registers::REG_ACCEL_XOUT_H;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    struct CountingDelay {
        calls: u32,
        last_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.calls += 1;
            self.last_ms = ms;
        }
    }

    #[test]
    fn magnitude_is_euclidean_norm() {
        let sample = AccelSample::from([3.0, 4.0, 12.0]);
        assert_eq!(sample.magnitude(), 13.0);
    }

    #[test]
    fn stream_stops_when_token_is_cancelled() {
        let mut chip = FakeChip::new(0x71);
        chip.set_axes(REG_ACCEL_XOUT_H, [0, 0, 2_048]);
        let mut driver = Mpu9250::new(&mut chip);
        driver.set_accel_scale(AccelScale::G16).unwrap();

        let token = CancelToken::new();
        let mut delay = CountingDelay { calls: 0, last_ms: 0 };
        let mut seen = Vec::new();
        let delivered = driver
            .stream_accel(&mut delay, 250, &token, |sample| {
                seen.push(sample);
                if seen.len() == 3 {
                    token.cancel();
                }
            })
            .unwrap();

        assert_eq!(delivered, 3);
        assert_eq!(delay.calls, 3);
        assert_eq!(delay.last_ms, 250);
        assert!(seen.iter().all(|sample| sample.z == 1.0 && sample.magnitude() == 1.0));
    }

    #[test]
    fn cancelled_token_skips_sampling() {
        let mut chip = FakeChip::new(0x71);
        let mut driver = Mpu9250::new(&mut chip);
        let token = CancelToken::new();
        token.cancel();

        let delivered = driver
            .stream_accel(&mut NoopDelay::new(), 10, &token, |_| panic!("no sample expected"))
            .unwrap();
        assert_eq!(delivered, 0);
        drop(driver);

        assert!(chip.frames.is_empty());
        token.reset();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn stream_returns_read_failure() {
        let mut chip = FakeChip::new(0x71).failing_at(1);
        let mut driver = Mpu9250::new(&mut chip);
        let token = CancelToken::new();
        let mut count = 0;

        let result = driver.stream_accel(&mut NoopDelay::new(), 10, &token, |_| count += 1);
        assert_eq!(result, Err(Error::Transport(BusFault)));
        assert_eq!(count, 1);
    }
}
