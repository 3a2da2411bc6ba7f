//! Bus interface abstraction for the MPU9250 driver.

pub mod spi;

/// Full-duplex transfer capability required by the driver.
///
/// The driver never connects or disconnects the underlying bus; that lifecycle
/// stays with the caller.
pub trait Transport {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Clocks out `write` while filling `read` with the bytes clocked in.
    ///
    /// Both buffers have the same length.
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error>;
}

impl<T> Transport for &mut T
where
    T: Transport + ?Sized,
{
    type Error = T::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error> {
        T::transfer(self, write, read)
    }
}
