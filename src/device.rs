//! High-level combo sensor device driver implementation.
//!
//! [`ComboSensor`] expresses everything in terms of register reads and writes
//! on a [`SensorInterface`], so the same logic runs over I2C or SPI.

use crate::color::Rgb565;
use crate::config::Mode;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::{SpiDeviceInterface, SpiInterface};
use crate::interface::SensorInterface;
use crate::log::{debug, trace, warn};
use crate::registers::{
    CombinedReading,
    ModeConfig,
    Register,
    EXPECTED_DEVICE_ID,
    REG_DEVICE_ID,
    REG_MODE_CONFIG,
};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::{SpiBus, SpiDevice};

/// High-level synchronous driver for the combo sensor.
pub struct ComboSensor<IFACE> {
    interface: IFACE,
    mode: Mode,
    initialized: bool,
}

/// Light and sound levels decoded from one `COMBINED_READING` sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Levels {
    /// Light intensity, 0-15.
    pub light: u8,
    /// Sound level, 0-15.
    pub sound: u8,
}

impl From<CombinedReading> for Levels {
    fn from(reading: CombinedReading) -> Self {
        Self {
            light: reading.light(),
            sound: reading.sound(),
        }
    }
}

impl<IFACE> ComboSensor<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// No bus traffic happens until [`begin`](Self::begin).
    pub fn new(interface: IFACE, mode: Mode) -> Self {
        Self {
            interface,
            mode,
            initialized: false,
        }
    }

    /// Consumes the driver and returns the owned interface and current mode.
    pub fn release(self) -> (IFACE, Mode) {
        (self.interface, self.mode)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the mode most recently applied to the device.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` once [`begin`](Self::begin) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<I2C> ComboSensor<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Convenience constructor for I2C transports at the fixed device address.
    pub fn new_i2c(i2c: I2C, mode: Mode) -> Self {
        Self::new(I2cInterface::new(i2c), mode)
    }

    /// Releases the driver, returning the I2C bus and mode.
    pub fn release_i2c(self) -> (I2C, Mode) {
        let (iface, mode) = self.release();
        (iface.release(), mode)
    }
}

impl<SPI, CS> ComboSensor<SpiInterface<SPI, CS>>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Convenience constructor for an exclusive SPI bus with its select pin.
    pub fn new_spi(spi: SPI, cs: CS, mode: Mode) -> Self {
        Self::new(SpiInterface::new(spi, cs), mode)
    }

    /// Releases the driver, returning the SPI bus, select pin and mode.
    pub fn release_spi(self) -> (SPI, CS, Mode) {
        let (iface, mode) = self.release();
        let (spi, cs) = iface.release();
        (spi, cs, mode)
    }
}

impl<SPI> ComboSensor<SpiDeviceInterface<SPI>>
where
    SPI: SpiDevice,
{
    /// Convenience constructor for SPI devices that manage select themselves.
    pub fn new_spi_device(spi: SPI, mode: Mode) -> Self {
        Self::new(SpiDeviceInterface::new(spi), mode)
    }

    /// Releases the driver, returning the SPI device and mode.
    pub fn release_spi_device(self) -> (SPI, Mode) {
        let (iface, mode) = self.release();
        (iface.release(), mode)
    }
}

impl<IFACE, CommE> ComboSensor<IFACE>
where
    IFACE: SensorInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Verifies the device identity and applies the stored mode.
    ///
    /// Fails with [`Error::Bus`] when the identity read transfers nothing and
    /// with [`Error::VersionMismatch`] when another chip answers. The driver
    /// stays uninitialized on failure, so `begin` can simply be called again.
    pub fn begin(&mut self) -> Result<(), CommE> {
        self.initialized = false;

        let id = self.read_byte(REG_DEVICE_ID)?;
        if id != EXPECTED_DEVICE_ID {
            warn!("unexpected device id {:#x}", id);
            return Err(Error::VersionMismatch { found: id });
        }

        let bits = self.mode.bits();
        self.write_view::<ModeConfig>(&[bits])?;

        self.initialized = true;
        debug!("sensor ready, mode {:#x}", bits);
        Ok(())
    }

    /// Reads the raw `DEVICE_ID` byte. Usable before [`begin`](Self::begin).
    pub fn device_id(&mut self) -> Result<u8, CommE> {
        self.read_byte(REG_DEVICE_ID)
    }

    // ==================================================================
    // == LED ===========================================================
    // ==================================================================
    /// Sets the LED color from 8-bit channels.
    ///
    /// Only the top 5/6/5 bits of red/green/blue reach the device. The new
    /// color shows after roughly 0.2 s.
    pub fn set_led_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), CommE> {
        self.set_led_color_packed(Rgb565::from_rgb(r, g, b))
    }

    /// Sets the LED color from an already packed value.
    pub fn set_led_color_packed(&mut self, color: impl Into<Rgb565>) -> Result<(), CommE> {
        self.ensure_ready()?;

        let color = color.into();
        trace!("led color {:#x}", color.raw());
        self.write_view::<Rgb565>(&color.to_le_bytes())
    }

    // ==================================================================
    // == Measurements ==================================================
    // ==================================================================
    /// Reads light and sound from a single `COMBINED_READING` sample.
    pub fn read_levels(&mut self) -> Result<Levels, CommE> {
        self.ensure_ready()?;
        self.read_view::<CombinedReading>().map(Levels::from)
    }

    /// Returns the light intensity nibble.
    pub fn light_level(&mut self) -> Result<u8, CommE> {
        self.read_levels().map(|levels| levels.light)
    }

    /// Returns the sound level nibble.
    pub fn sound_level(&mut self) -> Result<u8, CommE> {
        self.read_levels().map(|levels| levels.sound)
    }

    // ==================================================================
    // == Mode Control ==================================================
    // ==================================================================
    /// Writes `mode` and reports whether the device's `MODE_CONFIG` changed.
    ///
    /// The register is read before and after the write. Requesting the mode
    /// already in effect therefore returns `Ok(false)` even though the write
    /// went through. The stored mode is only updated on `Ok(true)`.
    ///
    /// No combination check is made here; see [`Mode::validate`] for the
    /// combinations the device documents as supported.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<bool, CommE> {
        self.ensure_ready()?;

        let before = self.read_byte(REG_MODE_CONFIG)?;
        self.write_view::<ModeConfig>(&[mode.bits()])?;
        let after = self.read_byte(REG_MODE_CONFIG)?;

        let changed = before != after;
        if changed {
            self.mode = mode;
        }
        debug!("mode {:#x} -> {:#x}, changed: {}", before, after, changed);
        Ok(changed)
    }

    /// Returns a snapshot of the `MODE_CONFIG` register.
    pub fn read_mode_config(&mut self) -> Result<ModeConfig, CommE> {
        self.ensure_ready()?;
        self.read_view::<ModeConfig>()
    }

    /// Returns the device-set ready flag (`MODE_CONFIG[7]`).
    pub fn is_ready(&mut self) -> Result<bool, CommE> {
        self.read_mode_config().map(|config| config.ready())
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn ensure_ready(&self) -> Result<(), CommE> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn read_byte(&mut self, register: u8) -> Result<u8, CommE> {
        let value = self
            .interface
            .read_register(register)
            .map_err(Error::from)?;

        match value {
            Some(byte) => {
                trace!("read {:#x} = {:#x}", register, byte);
                Ok(byte)
            }
            None => {
                warn!("no data from register {:#x}", register);
                Err(Error::Bus)
            }
        }
    }

    fn read_view<R>(&mut self) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8>,
    {
        const { assert!(R::ACCESS.is_readable()) };
        self.read_byte(R::ADDRESS).map(R::from)
    }

    fn write_view<R>(&mut self, payload: &[u8]) -> Result<(), CommE>
    where
        R: Register,
    {
        const { assert!(R::ACCESS.is_writable()) };
        self
            .interface
            .write_many(R::ADDRESS, payload)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{PowerMode, Precision, SpeedMode};
    use crate::registers::{
        DEFAULT_I2C_ADDRESS,
        MODE_WRITABLE_MASK,
        REG_COMBINED_READING,
        REG_LED_COLOR,
    };
    use core::convert::Infallible;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    extern crate std;
    use std::vec;
    use std::vec::Vec;

    const READY: u8 = 0x80;

    /// Register-file stand-in for a real bus.
    struct FakeSensor {
        registers: [u8; 4],
        /// When false, every read transfers zero bytes.
        responding: bool,
        /// When true, writes to `MODE_CONFIG` are ignored.
        mode_locked: bool,
        writes: Vec<(u8, Vec<u8>)>,
        reads: Vec<u8>,
    }

    impl FakeSensor {
        fn new(id: u8) -> Self {
            Self {
                registers: [0x00, 0x00, 0x00, id],
                responding: true,
                mode_locked: false,
                writes: Vec::new(),
                reads: Vec::new(),
            }
        }
    }

    impl SensorInterface for FakeSensor {
        type Error = Infallible;

        fn write_many(
            &mut self,
            register: u8,
            data: &[u8],
        ) -> core::result::Result<(), Infallible> {
            self.writes.push((register, data.to_vec()));
            if register == REG_MODE_CONFIG && !self.mode_locked {
                self.registers[REG_MODE_CONFIG as usize] = (data[0] & MODE_WRITABLE_MASK) | READY;
            }
            Ok(())
        }

        fn read_many(
            &mut self,
            register: u8,
            buf: &mut [u8],
        ) -> core::result::Result<usize, Infallible> {
            self.reads.push(register);
            if !self.responding {
                return Ok(0);
            }
            buf[0] = self.registers[register as usize];
            Ok(1)
        }
    }

    fn ready_sensor(fake: FakeSensor) -> ComboSensor<FakeSensor> {
        let mut sensor = ComboSensor::new(fake, Mode::default());
        sensor.begin().unwrap();
        sensor.interface_mut().writes.clear();
        sensor.interface_mut().reads.clear();
        sensor
    }

    #[test]
    fn begin_checks_id_then_writes_stored_mode() {
        let mode = Mode::new().speed(SpeedMode::High).precision(Precision::Low).build();
        let mut sensor = ComboSensor::new(FakeSensor::new(EXPECTED_DEVICE_ID), mode);

        sensor.begin().unwrap();

        assert!(sensor.is_initialized());
        let (fake, _) = sensor.release();
        assert_eq!(fake.reads, vec![REG_DEVICE_ID]);
        assert_eq!(fake.writes, vec![(REG_MODE_CONFIG, vec![0b0010])]);
    }

    #[test]
    fn begin_reports_version_mismatch() {
        let mut sensor = ComboSensor::new(FakeSensor::new(0x42), Mode::default());

        assert_eq!(sensor.begin(), Err(Error::VersionMismatch { found: 0x42 }));
        assert!(!sensor.is_initialized());
        let (fake, _) = sensor.release();
        assert!(fake.writes.is_empty());
    }

    #[test]
    fn begin_reports_bus_error_on_empty_read() {
        let mut fake = FakeSensor::new(EXPECTED_DEVICE_ID);
        fake.responding = false;
        let mut sensor = ComboSensor::new(fake, Mode::default());

        assert_eq!(sensor.begin(), Err(Error::Bus));
        assert!(!sensor.is_initialized());

        sensor.interface_mut().responding = true;
        assert_eq!(sensor.begin(), Ok(()));
        assert!(sensor.is_initialized());
    }

    #[test]
    fn begin_writes_any_stored_mode() {
        let mode = Mode::new()
            .power(PowerMode::Low)
            .speed(SpeedMode::High)
            .precision(Precision::Low)
            .build();
        let mut sensor = ComboSensor::new(FakeSensor::new(EXPECTED_DEVICE_ID), mode);

        assert_eq!(sensor.begin(), Ok(()));
        let (fake, _) = sensor.release();
        assert_eq!(fake.reads, vec![REG_DEVICE_ID]);
        assert_eq!(fake.writes, vec![(REG_MODE_CONFIG, vec![0b0011])]);
    }

    #[test]
    fn operations_require_begin() {
        let mut sensor = ComboSensor::new(FakeSensor::new(EXPECTED_DEVICE_ID), Mode::default());

        assert_eq!(sensor.set_led_color(1, 2, 3), Err(Error::NotReady));
        assert_eq!(sensor.light_level(), Err(Error::NotReady));
        assert_eq!(sensor.switch_mode(Mode::default()), Err(Error::NotReady));
        assert_eq!(sensor.device_id(), Ok(EXPECTED_DEVICE_ID));
    }

    #[test]
    fn led_color_is_one_two_byte_write() {
        let mut sensor = ready_sensor(FakeSensor::new(EXPECTED_DEVICE_ID));

        sensor.set_led_color(0xFF, 0x00, 0x80).unwrap();
        sensor.set_led_color_packed(0x07E0u16).unwrap();
        sensor.set_led_color_packed(Rgb565::WHITE).unwrap();

        let (fake, _) = sensor.release();
        assert_eq!(
            fake.writes,
            vec![
                (REG_LED_COLOR, vec![0x1F, 0x80]),
                (REG_LED_COLOR, vec![0xE0, 0x07]),
                (REG_LED_COLOR, vec![0xFF, 0xFF]),
            ]
        );
    }

    #[test]
    fn levels_split_combined_byte() {
        let mut fake = FakeSensor::new(EXPECTED_DEVICE_ID);
        fake.registers[REG_COMBINED_READING as usize] = 0xA7;
        let mut sensor = ready_sensor(fake);

        assert_eq!(sensor.light_level(), Ok(0x7));
        assert_eq!(sensor.sound_level(), Ok(0xA));
        assert_eq!(sensor.read_levels(), Ok(Levels { light: 0x7, sound: 0xA }));

        let (fake, _) = sensor.release();
        assert_eq!(fake.reads, vec![REG_COMBINED_READING; 3]);
    }

    #[test]
    fn switch_mode_reports_change_then_no_op() {
        let mut sensor = ready_sensor(FakeSensor::new(EXPECTED_DEVICE_ID));
        let target = Mode::new().power(PowerMode::Low).precision(Precision::Low).build();

        assert_eq!(sensor.switch_mode(target), Ok(true));
        assert_eq!(sensor.mode(), target);
        assert_eq!(sensor.switch_mode(target), Ok(false));

        let (fake, _) = sensor.release();
        assert_eq!(
            fake.reads,
            vec![REG_MODE_CONFIG, REG_MODE_CONFIG, REG_MODE_CONFIG, REG_MODE_CONFIG]
        );
        assert_eq!(
            fake.writes,
            vec![(REG_MODE_CONFIG, vec![0b0001]), (REG_MODE_CONFIG, vec![0b0001])]
        );
    }

    #[test]
    fn switch_mode_verifies_low_power_high_speed() {
        let mut sensor = ready_sensor(FakeSensor::new(EXPECTED_DEVICE_ID));
        let target = Mode {
            power: PowerMode::Low,
            speed: SpeedMode::High,
            precision: Precision::Low,
        };

        assert_eq!(sensor.switch_mode(target), Ok(true));
        assert_eq!(sensor.mode(), target);

        let (fake, _) = sensor.release();
        assert_eq!(fake.reads, vec![REG_MODE_CONFIG, REG_MODE_CONFIG]);
        assert_eq!(fake.writes, vec![(REG_MODE_CONFIG, vec![0b0011])]);
    }

    #[test]
    fn switch_mode_keeps_stored_mode_when_device_ignores_write() {
        let mut fake = FakeSensor::new(EXPECTED_DEVICE_ID);
        fake.mode_locked = true;
        let mut sensor = ready_sensor(fake);
        let target = Mode::new().precision(Precision::High).build();

        assert_eq!(sensor.switch_mode(target), Ok(false));
        assert_eq!(sensor.mode(), Mode::default());
    }

    #[test]
    fn mode_config_snapshot_exposes_ready_flag() {
        let mut sensor = ready_sensor(FakeSensor::new(EXPECTED_DEVICE_ID));

        let config = sensor.read_mode_config().unwrap();
        assert_eq!(Mode::from(config), Mode::default());
        assert_eq!(sensor.is_ready(), Ok(true));
    }

    #[test]
    fn borrowed_interface_is_not_consumed() {
        let mut fake = FakeSensor::new(EXPECTED_DEVICE_ID);
        {
            let mut sensor = ComboSensor::new(&mut fake, Mode::default());
            sensor.begin().unwrap();
            sensor.set_led_color_packed(Rgb565::RED).unwrap();
        }
        assert_eq!(fake.writes.last(), Some(&(REG_LED_COLOR, vec![0x1F, 0x00])));
    }

    #[test]
    fn begin_over_i2c() {
        let expectations = [
            I2cTransaction::write(DEFAULT_I2C_ADDRESS, vec![REG_DEVICE_ID]),
            I2cTransaction::read(DEFAULT_I2C_ADDRESS, vec![EXPECTED_DEVICE_ID]),
            I2cTransaction::transaction_start(DEFAULT_I2C_ADDRESS),
            I2cTransaction::write(DEFAULT_I2C_ADDRESS, vec![REG_MODE_CONFIG]),
            I2cTransaction::write(DEFAULT_I2C_ADDRESS, vec![0x04]),
            I2cTransaction::transaction_end(DEFAULT_I2C_ADDRESS),
        ];
        let mut sensor = ComboSensor::new_i2c(I2cMock::new(&expectations), Mode::default());

        sensor.begin().unwrap();

        let (mut i2c, _) = sensor.release_i2c();
        i2c.done();
    }

    #[test]
    fn i2c_errors_are_propagated() {
        let expectations = [
            I2cTransaction::write(DEFAULT_I2C_ADDRESS, vec![REG_DEVICE_ID])
                .with_error(ErrorKind::Other),
        ];
        let mut sensor = ComboSensor::new_i2c(I2cMock::new(&expectations), Mode::default());

        assert_eq!(sensor.begin(), Err(Error::Interface(ErrorKind::Other)));

        let (mut i2c, _) = sensor.release_i2c();
        i2c.done();
    }
}
