//! SPI transport built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::SpiDevice;

use super::Transport;

/// SPI-based transport for the MPU9250 driver.
///
/// Each transfer runs as one `SpiDevice` transaction, so chip select stays
/// asserted for the whole exchange.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Transport for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if write.is_empty() {
            return Ok(());
        }

        self.spi.transfer(read, write)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Transport;
    use embedded_hal_mock::eh1::spi::{Mock, Transaction};

    #[test]
    fn transfer_runs_single_framed_exchange() {
        let expectations = [
            Transaction::transaction_start(),
            Transaction::transfer(vec![0xF5, 0x00], vec![0xFF, 0x71]),
            Transaction::transaction_end(),
        ];
        let mut mock = Mock::new(&expectations);
        let mut interface = SpiInterface::new(mock.clone());

        let mut read = [0u8; 2];
        interface.transfer(&[0xF5, 0x00], &mut read).unwrap();
        assert_eq!(read, [0xFF, 0x71]);

        mock.done();
    }

    #[test]
    fn transfer_ignores_empty_buffers() {
        let expectations: [Transaction<u8>; 0] = [];
        let mut mock = Mock::new(&expectations);
        let mut interface = SpiInterface::new(mock.clone());

        interface.transfer(&[], &mut []).unwrap();

        mock.done();
    }

    #[test]
    fn driver_reads_identity_through_spi() {
        let expectations = [
            Transaction::transaction_start(),
            Transaction::transfer(vec![0xF5, 0x00], vec![0x00, 0x71]),
            Transaction::transaction_end(),
        ];
        let mut mock = Mock::new(&expectations);
        let mut driver = crate::Mpu9250::new_spi(mock.clone());

        assert_eq!(driver.who_am_i().unwrap(), 0x71);

        let spi = driver.release_spi().unwrap();
        drop(spi);
        mock.done();
    }
}
