//! Error handling primitives for the MPU9250 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// No transport is bound to the driver (never bound, or released by `close`).
    InvalidTransport,
    /// Any error reported by the underlying transport.
    Transport(E),
    /// `WHO_AM_I` returned an unexpected value; carries the value read.
    Comms(u8),
    /// A required bus step of the initialization sequence failed.
    Driver(E),
    /// The caller passed a value outside the accepted range.
    InvalidArgument,
    /// The provided configuration parameters are invalid.
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Transport(err)
    }
}
