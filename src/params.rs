//! Strongly typed parameter enumerations for the `MODE_CONFIG` register.
//!
//! Each setting maps directly to its field encoding and occupies its own
//! adjacent bit range, so the three settings are orthogonal and combine by
//! bitwise OR of their pre-shifted values.
//!
//! # Examples
//!
//! ```rust
//! use combo_sensor::params::{PowerMode, Precision, SpeedMode};
//!
//! let bits = PowerMode::Normal.bits() | SpeedMode::High.bits() | Precision::Low.bits();
//! assert_eq!(bits, 0b0000_0010);
//! ```

use modular_bitfield::prelude::Specifier;

/// Power consumption selection (`MODE_CONFIG[0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum PowerMode {
    /// Normal power, roughly 20 mW to 60 mW.
    Normal = 0,
    /// Low power, roughly 2 mW to 4 mW.
    Low = 1,
}

impl PowerMode {
    /// Returns the setting shifted into its register position.
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Acquisition speed selection (`MODE_CONFIG[1]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum SpeedMode {
    /// Normal acquisition speed.
    Normal = 0,
    /// High-speed acquisition with a 10 ms period.
    High = 1,
}

impl SpeedMode {
    /// Returns the setting shifted into its register position.
    pub const fn bits(self) -> u8 {
        (self as u8) << 1
    }
}

/// Measurement precision selection (`MODE_CONFIG[3:2]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Precision {
    /// Low precision.
    Low = 0b00,
    /// Normal precision.
    Normal = 0b01,
    /// High precision, 100 ms acquisition period.
    High = 0b10,
    /// Ultra precision, 1000 ms acquisition period.
    Ultra = 0b11,
}

impl Precision {
    /// Returns the setting shifted into its register position.
    pub const fn bits(self) -> u8 {
        (self as u8) << 2
    }

    /// Returns `true` for the precision levels usable in low-power or high-speed mode.
    pub const fn is_coarse(self) -> bool {
        matches!(self, Self::Low | Self::Normal)
    }

    /// Decodes the two precision bits, ignoring anything above them.
    pub const fn from_field(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Low,
            0b01 => Self::Normal,
            0b10 => Self::High,
            _ => Self::Ultra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_occupy_disjoint_bits() {
        assert_eq!(PowerMode::Low.bits(), 0b0001);
        assert_eq!(SpeedMode::High.bits(), 0b0010);
        assert_eq!(Precision::Ultra.bits(), 0b1100);
        assert_eq!(PowerMode::Low.bits() & SpeedMode::High.bits(), 0);
        assert_eq!(SpeedMode::High.bits() & Precision::Ultra.bits(), 0);
    }

    #[test]
    fn precision_field_decoding_masks_upper_bits() {
        assert_eq!(Precision::from_field(0b01), Precision::Normal);
        assert_eq!(Precision::from_field(0b1110), Precision::High);
    }
}
