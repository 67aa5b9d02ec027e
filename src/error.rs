//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! frame buffer access ([`CoordinateError`]) and driver operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`CoordinateError`] - Pixel coordinates outside the 11x7 matrix
//! - [`Error`] - Runtime errors during chip operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus errors
//!
//! ## Example
//!
//! ```
//! use is31fl3731::{Builder, BuilderError, FrameBuffer, CoordinateError};
//!
//! // Addresses are 7-bit
//! let result = Builder::new().address(0xEA).build();
//! assert!(matches!(result, Err(BuilderError::InvalidAddress { .. })));
//!
//! // Row 7 does not exist on the matrix
//! let mut frame = FrameBuffer::new();
//! assert_eq!(frame.set_pixel(0, 7, true), Err(CoordinateError { x: 0, y: 7 }));
//! ```

use crate::interface::MatrixInterface;

/// Pixel coordinates outside the matrix
///
/// Valid coordinates satisfy `x < 11` and `y < 7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateError {
    /// Requested column
    pub x: u8,
    /// Requested row
    pub y: u8,
}

impl core::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Pixel ({}, {}) is outside the 11x7 matrix", self.x, self.y)
    }
}

impl core::error::Error for CoordinateError {}

/// Errors that can occur when talking to the chip
///
/// Generic over the interface type to preserve the specific error type.
pub enum Error<I: MatrixInterface> {
    /// Interface error (bus)
    ///
    /// Wraps the underlying error from the [`MatrixInterface`] implementation.
    Interface(I::Error),
    /// Pixel coordinates outside the matrix
    OutOfBounds {
        /// Requested column
        x: u8,
        /// Requested row
        y: u8,
    },
    /// Frame number outside 0-7
    InvalidFrame {
        /// Requested frame
        frame: u8,
    },
    /// Register run extends past address 0xFF or covers the command register
    InvalidRange {
        /// First register
        start: u8,
        /// Number of bytes
        len: usize,
    },
    /// Value does not fit in the register field
    InvalidValue {
        /// Requested value
        value: u8,
        /// Largest value the field can hold
        max: u8,
    },
}

impl<I: MatrixInterface> From<CoordinateError> for Error<I> {
    fn from(err: CoordinateError) -> Self {
        Self::OutOfBounds { x: err.x, y: err.y }
    }
}

impl<I: MatrixInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::OutOfBounds { x, y } => {
                write!(f, "Pixel ({x}, {y}) is outside the 11x7 matrix")
            }
            Self::InvalidFrame { frame } => write!(f, "Invalid frame {frame} (must be 0-7)"),
            Self::InvalidRange { start, len } => {
                write!(f, "Register run of {len} bytes from 0x{start:02X} is out of range")
            }
            Self::InvalidValue { value, max } => {
                write!(f, "Value {value} out of range (max {max})")
            }
        }
    }
}

impl<I: MatrixInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::OutOfBounds { x, y } => f
                .debug_struct("OutOfBounds")
                .field("x", x)
                .field("y", y)
                .finish(),
            Self::InvalidFrame { frame } => {
                f.debug_struct("InvalidFrame").field("frame", frame).finish()
            }
            Self::InvalidRange { start, len } => f
                .debug_struct("InvalidRange")
                .field("start", start)
                .field("len", len)
                .finish(),
            Self::InvalidValue { value, max } => f
                .debug_struct("InvalidValue")
                .field("value", value)
                .field("max", max)
                .finish(),
        }
    }
}

impl<I: MatrixInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Bus address does not fit in 7 bits
    InvalidAddress {
        /// Requested address
        address: u8,
    },
    /// Transfer size cannot carry a register byte plus data, or exceeds the frame size
    ///
    /// See [`MAX_TRANSFER_LIMIT`](crate::config::MAX_TRANSFER_LIMIT).
    InvalidTransferSize {
        /// Requested bytes per transaction
        bytes: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAddress { address } => {
                write!(f, "Invalid bus address 0x{address:02X} (must be 7-bit)")
            }
            Self::InvalidTransferSize { bytes } => write!(
                f,
                "Invalid transfer size {bytes} (must be 2-{})",
                crate::config::MAX_TRANSFER_LIMIT
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
