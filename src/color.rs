//! Packed 5:6:5 color values written to the `LED_COLOR` register.
//!
//! The register stores red in bits `[4:0]`, green in bits `[10:5]` and blue in
//! bits `[15:11]`. Packing keeps the most significant bits of each 8-bit
//! channel, so converting back to 8-bit channels is lossy.

use crate::registers::{Register, RegisterAccess, REG_LED_COLOR};

const RED_MASK: u16 = 0x1F;
const GREEN_MASK: u16 = 0x3F;
const BLUE_MASK: u16 = 0x1F;
const GREEN_SHIFT: u16 = 5;
const BLUE_SHIFT: u16 = 11;

/// A color packed into the 16-bit `LED_COLOR` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(u16);

impl Rgb565 {
    pub const BLACK: Self = Self::from_rgb(0x00, 0x00, 0x00);
    pub const NAVY: Self = Self::from_rgb(0x00, 0x00, 0x80);
    pub const DARK_GREEN: Self = Self::from_rgb(0x00, 0x80, 0x00);
    pub const DARK_CYAN: Self = Self::from_rgb(0x00, 0x80, 0x80);
    pub const MAROON: Self = Self::from_rgb(0x80, 0x00, 0x00);
    pub const PURPLE: Self = Self::from_rgb(0x80, 0x00, 0x80);
    pub const OLIVE: Self = Self::from_rgb(0x80, 0x80, 0x00);
    pub const LIGHT_GRAY: Self = Self::from_rgb(0xC0, 0xC0, 0xC0);
    pub const DARK_GRAY: Self = Self::from_rgb(0x80, 0x80, 0x80);
    pub const BLUE: Self = Self::from_rgb(0x00, 0x00, 0xFF);
    pub const GREEN: Self = Self::from_rgb(0x00, 0xFF, 0x00);
    pub const CYAN: Self = Self::from_rgb(0x00, 0xFF, 0xFF);
    pub const RED: Self = Self::from_rgb(0xFF, 0x00, 0x00);
    pub const MAGENTA: Self = Self::from_rgb(0xFF, 0x00, 0xFF);
    pub const YELLOW: Self = Self::from_rgb(0xFF, 0xFF, 0x00);
    pub const WHITE: Self = Self::from_rgb(0xFF, 0xFF, 0xFF);

    /// Wraps an already packed value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Packs 8-bit channels, keeping the top 5/6/5 bits of red/green/blue.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let red = (r >> 3) as u16;
        let green = (g >> 2) as u16;
        let blue = (b >> 3) as u16;
        Self(red | (green << GREEN_SHIFT) | (blue << BLUE_SHIFT))
    }

    /// Returns the packed register value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// 5-bit red channel.
    pub const fn red(self) -> u8 {
        (self.0 & RED_MASK) as u8
    }

    /// 6-bit green channel.
    pub const fn green(self) -> u8 {
        ((self.0 >> GREEN_SHIFT) & GREEN_MASK) as u8
    }

    /// 5-bit blue channel.
    pub const fn blue(self) -> u8 {
        ((self.0 >> BLUE_SHIFT) & BLUE_MASK) as u8
    }

    /// Expands the channels back to 8 bits with the low bits cleared.
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        (self.red() << 3, self.green() << 2, self.blue() << 3)
    }

    /// Register payload in the order it is put on the wire.
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Rgb565> for u16 {
    fn from(color: Rgb565) -> Self {
        color.0
    }
}

impl From<(u8, u8, u8)> for Rgb565 {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb(r, g, b)
    }
}

impl Register for Rgb565 {
    type Raw = u16;
    const ADDRESS: u8 = REG_LED_COLOR;
    const ACCESS: RegisterAccess = RegisterAccess::WriteOnly;
}
