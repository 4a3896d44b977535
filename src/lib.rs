#![no_std]

mod error;

pub mod color;
pub mod config;
pub mod device;
pub mod interface;
mod log;
pub mod params;
pub mod registers;

pub use crate::color::Rgb565;
pub use crate::config::Mode;
pub use crate::device::ComboSensor;
pub use crate::error::{Error, Result};
