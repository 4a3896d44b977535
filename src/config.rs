//! Operating mode configuration for the combo sensor.

use crate::params::{PowerMode, Precision, SpeedMode};
use crate::registers::{ModeConfig, MODE_WRITABLE_MASK};

/// Operating mode written to `MODE_CONFIG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode {
    /// Power consumption selection.
    pub power: PowerMode,
    /// Acquisition speed selection.
    pub speed: SpeedMode,
    /// Measurement precision selection.
    pub precision: Precision,
}

impl Mode {
    /// Begins building a [`Mode`] using the builder pattern.
    pub fn new() -> ModeBuilder {
        ModeBuilder::new()
    }

    /// Register value for this mode. Only bits 0-3 are ever set.
    pub const fn bits(&self) -> u8 {
        self.power.bits() | self.speed.bits() | self.precision.bits()
    }

    /// Decodes a `MODE_CONFIG` value, ignoring the reserved and ready bits.
    pub const fn from_bits(value: u8) -> Self {
        let power = if value & PowerMode::Low.bits() != 0 {
            PowerMode::Low
        } else {
            PowerMode::Normal
        };
        let speed = if value & SpeedMode::High.bits() != 0 {
            SpeedMode::High
        } else {
            SpeedMode::Normal
        };

        Self {
            power,
            speed,
            precision: Precision::from_field((value & MODE_WRITABLE_MASK) >> 2),
        }
    }

    /// Checks the combination against the device's supported precision table.
    ///
    /// The driver never calls this itself; any mode can be written.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if matches!(self.power, PowerMode::Low) && !self.precision.is_coarse() {
            return Err(ConfigError::LowPowerPrecision);
        }

        if matches!(self.speed, SpeedMode::High) && !self.precision.is_coarse() {
            return Err(ConfigError::HighSpeedPrecision);
        }

        Ok(())
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            power: PowerMode::Normal,
            speed: SpeedMode::Normal,
            precision: Precision::Normal,
        }
    }
}

impl From<Mode> for ModeConfig {
    fn from(mode: Mode) -> Self {
        ModeConfig::new()
            .with_power(mode.power)
            .with_speed(mode.speed)
            .with_precision(mode.precision)
    }
}

impl From<ModeConfig> for Mode {
    fn from(register: ModeConfig) -> Self {
        Self {
            power: register.power(),
            speed: register.speed(),
            precision: register.precision(),
        }
    }
}

/// Builder for [`Mode`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ModeBuilder {
    mode: Mode,
}

impl ModeBuilder {
    /// Creates a new builder seeded with [`Mode::default()`].
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
        }
    }

    /// Overrides the power selection.
    pub fn power(mut self, power: PowerMode) -> Self {
        self.mode.power = power;
        self
    }

    /// Overrides the speed selection.
    pub fn speed(mut self, speed: SpeedMode) -> Self {
        self.mode.speed = speed;
        self
    }

    /// Overrides the precision selection.
    pub fn precision(mut self, precision: Precision) -> Self {
        self.mode.precision = precision;
        self
    }

    /// Finalizes the builder and returns the [`Mode`].
    pub fn build(self) -> Mode {
        self.mode
    }
}

impl Default for ModeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation errors generated while verifying a [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Low power only supports low or normal precision.
    LowPowerPrecision,
    /// High speed only supports low or normal precision.
    HighSpeedPrecision,
}
