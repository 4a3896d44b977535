//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{I2c, Operation};

use super::SensorInterface;
use crate::registers::DEFAULT_I2C_ADDRESS;

/// I2C-based interface implementation for the combo sensor driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface at the device's fixed bus address.
    pub const fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_I2C_ADDRESS)
    }

    /// Creates a new interface at a non-standard 7-bit address.
    pub const fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit address used for every transaction.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> SensorInterface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        // Adjacent writes go out back to back under a single start condition.
        let command = [register];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.i2c.transaction(self.address, &mut operations)
    }

    fn read_many(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        // Register selection is committed with a stop before the read request.
        self.i2c.write(self.address, &[register])?;
        self.i2c.read(self.address, buf)?;
        Ok(buf.len())
    }
}
