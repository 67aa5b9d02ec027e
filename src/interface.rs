//! Hardware interface abstraction
//!
//! This module provides the [`MatrixInterface`] trait and the [`Interface`] struct
//! for communicating with the IS31FL3731 over I2C.
//!
//! ## Hardware Requirements
//!
//! The IS31FL3731 only needs the two-wire bus (SDA + SCL). Every transaction is
//! 7-bit addressed and starts with a register byte:
//!
//! - **Write**: `[register, data...]`, the chip auto-increments the register
//! - **Read**: `[register]`, then a repeated start and one or more data bytes
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use is31fl3731::{Interface, MatrixInterface};
//! # use core::convert::Infallible;
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: SevenBitAddress,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! // Create interface with the bus and a delay provider
//! let mut interface = Interface::new(MockI2c, MockDelay);
//!
//! // Select the control page
//! let _ = interface.write(0x75, &[0xFD, 0x0B]);
//!
//! // Read the shutdown register
//! let mut value = [0u8; 1];
//! let _ = interface.read(0x75, 0x0A, &mut value);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, I2c, NoAcknowledgeSource};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the bus interface to the IS31FL3731
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Matrix`](crate::matrix::Matrix) to work with any
/// bus that can carry 7-bit addressed write and write-then-read transactions.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this trait
/// yourself to put the driver on a shared bus manager or a simulator.
pub trait MatrixInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Write one transaction to the chip
    ///
    /// `bytes[0]` is the register address; the remaining bytes are written to
    /// consecutive registers starting there.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is not acknowledged or the bus fails.
    fn write(&mut self, address: u8, bytes: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Read `buffer.len()` bytes starting at `register`
    ///
    /// Blocks until the chip returns data or the implementation's retry budget
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus fails or no data arrives in time.
    fn read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> InterfaceResult<(), Self::Error>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<T: MatrixInterface + ?Sized> MatrixInterface for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        T::write(self, address, bytes)
    }

    fn read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> InterfaceResult<(), Self::Error> {
        T::read(self, address, register, buffer)
    }

    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms);
    }
}

/// Errors that can occur at the interface level
///
/// Generic over the bus error type.
#[derive(Debug)]
pub enum InterfaceError<E> {
    /// The chip did not acknowledge the transaction
    NoAcknowledge(NoAcknowledgeSource),
    /// Any other bus error
    I2c(E),
    /// No data arrived within the read retry budget
    Timeout,
}

impl<E: Debug> core::fmt::Display for InterfaceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoAcknowledge(source) => write!(f, "Not acknowledged: {source}"),
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::Timeout => write!(f, "Timeout waiting for data"),
        }
    }
}

impl<E: Debug> core::error::Error for InterfaceError<E> {}

/// Default number of read attempts before giving up
pub const DEFAULT_READ_ATTEMPTS: u32 = 100;

/// Default pause between read attempts in microseconds
pub const DEFAULT_POLL_INTERVAL_US: u32 = 1_000;

/// I2C interface implementation for the IS31FL3731
///
/// Implements [`MatrixInterface`] for embedded-hal v1.0 I2C and delay traits.
///
/// ## Type Parameters
///
/// * `I2C` - Bus implementing [`I2c`]
/// * `D` - Delay provider implementing [`DelayNs`]
pub struct Interface<I2C, D> {
    /// Two-wire bus
    i2c: I2C,
    /// Delay provider for read polling and the reset pulse
    delay: D,
    /// Read attempts before reporting a timeout (0 = unbounded)
    read_attempts: u32,
    /// Pause between read attempts
    poll_interval_us: u32,
}

impl<I2C, D> Interface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `i2c` - Bus (must implement [`I2c`])
    /// * `delay` - Delay provider (must implement [`DelayNs`])
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            read_attempts: DEFAULT_READ_ATTEMPTS,
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
        }
    }

    /// Set the number of read attempts
    ///
    /// Default is 100. Set to 0 to poll until data arrives, however long that takes.
    pub fn set_read_attempts(&mut self, attempts: u32) -> &mut Self {
        self.read_attempts = attempts;
        self
    }

    /// Get the number of read attempts
    pub fn read_attempts(&self) -> u32 {
        self.read_attempts
    }

    /// Set the pause between read attempts in microseconds
    pub fn set_poll_interval_us(&mut self, interval_us: u32) -> &mut Self {
        self.poll_interval_us = interval_us;
        self
    }

    /// Get the pause between read attempts in microseconds
    pub fn poll_interval_us(&self) -> u32 {
        self.poll_interval_us
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

fn classify<E: embedded_hal::i2c::Error>(err: E) -> InterfaceError<E> {
    match err.kind() {
        ErrorKind::NoAcknowledge(source) => InterfaceError::NoAcknowledge(source),
        _ => InterfaceError::I2c(err),
    }
}

impl<I2C, D> MatrixInterface for Interface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = InterfaceError<I2C::Error>;

    fn write(&mut self, address: u8, bytes: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.i2c.write(address, bytes).map_err(classify)
    }

    fn read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> InterfaceResult<(), Self::Error> {
        let mut attempts = 0u32;

        loop {
            match self.i2c.write_read(address, &[register], buffer) {
                Ok(()) => return Ok(()),
                Err(e) => match classify(e) {
                    InterfaceError::NoAcknowledge(_) => {}
                    other => return Err(other),
                },
            }

            attempts = attempts.saturating_add(1);
            if self.read_attempts > 0 && attempts >= self.read_attempts {
                log::warn!(
                    "no data from 0x{:02X} register 0x{:02X} after {} attempts",
                    address,
                    register,
                    attempts
                );
                return Err(InterfaceError::Timeout);
            }

            if attempts == 1 {
                log::warn!("read of register 0x{:02X} not acknowledged, retrying", register);
            } else {
                log::trace!("read retry {} for register 0x{:02X}", attempts, register);
            }
            self.delay.delay_us(self.poll_interval_us);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
