//! IS31FL3731 LED Matrix Driver
//!
//! A driver for the IS31FL3731 charlieplexed LED controller as wired on 11x7
//! matrix boards.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Eight frames with per-pixel on/off, blink and 8-bit PWM
//! - Page-select caching and burst frame flushes
//! - Typed access to autoplay, breathing, blink and audio settings
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use is31fl3731::{Builder, FlushStrategy, Interface, Matrix};
//!
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
//! let interface = Interface::new(MockI2c, MockDelay);
//! let config = match Builder::new()
//!     .address(0x75)
//!     .flush_strategy(FlushStrategy::Burst)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut matrix = Matrix::new(interface, config);
//! let _ = matrix.begin();
//!
//! let _ = matrix.set_pixel(0, 0, true);
//! let _ = matrix.set_pwm(0, 0, 64);
//! let _ = matrix.flush_frame(0);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// Driver configuration types and builder
pub mod config;
/// Control-page settings
pub mod control;
/// Error types for the driver
pub mod error;
/// Local pixel, blink and PWM buffers
pub mod frame;
/// Hardware interface abstraction
pub mod interface;
/// Core matrix operations
pub mod matrix;
/// IS31FL3731 register map
pub mod register;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod mock;

pub use config::{Builder, ColumnLayout, Config, DEFAULT_ADDRESS, FlushStrategy, HEIGHT, WIDTH};
pub use control::{AgcMode, DisplayMode, FrameState, IntensityControl};
pub use error::{BuilderError, CoordinateError, Error};
pub use frame::{FrameBuffer, FrameImage};
pub use interface::InterfaceError;
pub use interface::{DEFAULT_POLL_INTERVAL_US, DEFAULT_READ_ATTEMPTS, Interface, MatrixInterface};
pub use matrix::Matrix;
pub use register::{Field, Page};
