//! Register map definitions for the combo sensor.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{PowerMode, Precision, SpeedMode};

/// Register address of `LED_COLOR` (16-bit packed color).
pub const REG_LED_COLOR: u8 = 0x00;
/// Register address of `COMBINED_READING` (light and sound nibbles).
pub const REG_COMBINED_READING: u8 = 0x01;
/// Register address of `MODE_CONFIG`.
pub const REG_MODE_CONFIG: u8 = 0x02;
/// Register address of `DEVICE_ID`.
pub const REG_DEVICE_ID: u8 = 0x03;

/// Identity byte reported by `DEVICE_ID`.
pub const EXPECTED_DEVICE_ID: u8 = 0x99;
/// Fixed 7-bit I2C address of the device.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x09;

/// Bits of `MODE_CONFIG` the host is allowed to write.
pub const MODE_WRITABLE_MASK: u8 = 0x0F;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

impl RegisterAccess {
    /// Returns `true` if the host may read the register.
    pub const fn is_readable(self) -> bool {
        !matches!(self, Self::WriteOnly)
    }

    /// Returns `true` if the host may write the register.
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address in the device map.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
}

/// Bitfield representation of the `COMBINED_READING` register (address `0x01`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedReading {
    // Light intensity (bits 3:0).
    pub light: B4,
    // Sound level (bits 7:4).
    pub sound: B4,
}

impl From<u8> for CombinedReading {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CombinedReading> for u8 {
    fn from(value: CombinedReading) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `MODE_CONFIG` register (address `0x02`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    // Low-power enable (bit 0).
    pub power: PowerMode,
    // High-speed enable (bit 1).
    pub speed: SpeedMode,
    // Precision level (bits 3:2).
    pub precision: Precision,
    // Reserved, reads as zero (bits 6:4).
    pub reserved: B3,
    // Set by the device once the configured mode is active (bit 7).
    #[skip(setters)]
    pub ready: bool,
}

impl ModeConfig {
    /// Returns the host-writable portion of the register.
    pub fn writable_bits(self) -> u8 {
        u8::from(self) & MODE_WRITABLE_MASK
    }
}

impl From<u8> for ModeConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ModeConfig> for u8 {
    fn from(value: ModeConfig) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for CombinedReading {
    type Raw = u8;
    const ADDRESS: u8 = REG_COMBINED_READING;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
}

impl Register for ModeConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_MODE_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}
