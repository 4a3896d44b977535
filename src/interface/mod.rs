//! Bus interface abstraction for the combo sensor driver.
//!
//! The device logic only ever talks to a [`SensorInterface`]; the concrete
//! implementations decide how a register address and its payload travel over
//! I2C or SPI.

pub mod i2c;
pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// Every call selects `register` again; the device does not auto-increment
/// between calls.
pub trait SensorInterface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes `data` starting at `register` as one bus operation.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Reads `buf.len()` bytes starting at `register`.
    ///
    /// Returns the number of bytes actually transferred; zero means nothing
    /// was received.
    fn read_many(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error>;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_many(register, core::slice::from_ref(&value))
    }

    /// Reads a single register, returning `None` when no byte was transferred.
    fn read_register(&mut self, register: u8) -> core::result::Result<Option<u8>, Self::Error> {
        let mut value = [0u8; 1];
        let count = self.read_many(register, &mut value)?;
        Ok((count == 1).then_some(value[0]))
    }
}

impl<T> SensorInterface for &mut T
where
    T: SensorInterface + ?Sized,
{
    type Error = T::Error;

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        T::write_many(self, register, data)
    }

    fn read_many(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        T::read_many(self, register, buf)
    }
}
