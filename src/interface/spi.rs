//! SPI interface implementations built on top of `embedded-hal`.
//!
//! [`SpiInterface`] drives the select line itself from an exclusive
//! [`SpiBus`]; [`SpiDeviceInterface`] leaves select handling to a
//! [`SpiDevice`], which is the way to share one bus between several chips.
//! Either way every register access is framed by exactly one select
//! assertion: the register byte goes out first, then the payload or the
//! `0x00` filler bytes that clock the response in.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, Operation, SpiBus, SpiDevice, MODE_0};

use super::SensorInterface;

/// Maximum SCK frequency supported by the device.
pub const SPI_FREQUENCY_HZ: u32 = 14_000_000;
/// Clock polarity and phase expected by the device (MSB first).
pub const SPI_MODE: Mode = MODE_0;

/// Errors raised by [`SpiInterface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError<B, P> {
    /// The SPI bus reported an error.
    Bus(B),
    /// The chip-select pin could not be driven.
    Pin(P),
}

/// SPI interface driving an active-low chip-select pin explicitly.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    /// Creates a new interface from an exclusive SPI bus and its select pin.
    ///
    /// The bus must already be configured for [`SPI_MODE`], MSB first, at no
    /// more than [`SPI_FREQUENCY_HZ`].
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned bus and select pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn framed<F>(
        &mut self,
        transfer: F,
    ) -> core::result::Result<(), SpiError<SPI::Error, CS::Error>>
    where
        F: FnOnce(&mut SPI) -> core::result::Result<(), SPI::Error>,
    {
        self.cs.set_low().map_err(SpiError::Pin)?;

        let result = transfer(&mut self.spi).and_then(|()| self.spi.flush());
        // Release select even when the transfer failed.
        let deselect = self.cs.set_high().map_err(SpiError::Pin);

        result.map_err(SpiError::Bus)?;
        deselect
    }
}

impl<SPI, CS> SensorInterface for SpiInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = SpiError<SPI::Error, CS::Error>;

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        self.framed(|spi| {
            spi.write(&[register])?;
            spi.write(data)
        })
    }

    fn read_many(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        let len = buf.len();
        buf.fill(0x00);
        self.framed(|spi| {
            spi.write(&[register])?;
            spi.transfer_in_place(buf)
        })?;
        Ok(len)
    }
}

/// SPI interface for a [`SpiDevice`] that owns the select line.
pub struct SpiDeviceInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiDeviceInterface<SPI> {
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

impl<SPI> SensorInterface for SpiDeviceInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = [register];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }

    fn read_many(
        &mut self,
        register: u8,
        buf: &mut [u8],
    ) -> core::result::Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        buf.fill(0x00);
        let command = [register];
        let len = buf.len();
        let mut operations = [Operation::Write(&command), Operation::TransferInPlace(buf)];
        self.spi.transaction(&mut operations)?;
        Ok(len)
    }
}
