//! Error handling primitives for the combo sensor driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The bus transferred fewer bytes than requested.
    Bus,
    /// The identity register did not hold the expected device id.
    VersionMismatch {
        /// Byte actually read from `DEVICE_ID`.
        found: u8,
    },
    /// The device has not been initialized with `begin()` yet.
    NotReady,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
