//! Driver configuration types and builder

pub use crate::error::BuilderError;

/// Number of LED columns on the matrix
pub const WIDTH: usize = 11;

/// Number of LED rows on the matrix
pub const HEIGHT: usize = 7;

/// Default 7-bit bus address of the 11x7 matrix board
///
/// The chip answers on 0x74-0x77 depending on its AD pin; the board ties it to 0x75.
pub const DEFAULT_ADDRESS: u8 = 0x75;

/// Default maximum bytes per bus transaction, register byte included
///
/// Matches the 32-byte transmit buffer found on most microcontroller TWI drivers.
pub const DEFAULT_MAX_TRANSFER: usize = 32;

/// Largest useful transaction: the register byte plus the whole PWM block
pub const MAX_TRANSFER_LIMIT: usize = 1 + crate::register::PWM_LEN;

/// Default pause between software shutdown and wake in [`Matrix::begin`](crate::Matrix::begin)
pub const DEFAULT_SHUTDOWN_PULSE_MS: u32 = 10;

/// How matrix columns are wired to the chip's LED control bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Columns 0-5 on matrix A (even control bytes), columns 6-10 on matrix B (odd bytes)
    ///
    /// Follows the chip's register map, which alternates control bytes between
    /// its two charlieplexed halves A and B.
    #[default]
    Interleaved,
    /// Column `x` on control byte `x`, for boards wired linearly across 0x00-0x0A
    Sequential,
}

impl ColumnLayout {
    /// LED control byte offset that drives column `column`
    ///
    /// Every layout places the 11 columns on offsets 0-10.
    pub const fn offset(self, column: usize) -> usize {
        match self {
            Self::Interleaved => {
                if column < 6 {
                    column * 2
                } else {
                    (column - 6) * 2 + 1
                }
            }
            Self::Sequential => column,
        }
    }
}

/// What [`Matrix::flush_frame`](crate::Matrix::flush_frame) uses to push a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlushStrategy {
    /// One bus transaction per register byte
    PerByte,
    /// One page select, then burst writes bounded by the transfer size
    #[default]
    Burst,
}

/// Driver configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// 7-bit bus address of the chip
    pub address: u8,
    /// Column to control byte wiring
    pub column_layout: ColumnLayout,
    /// Default frame flush strategy
    pub flush_strategy: FlushStrategy,
    /// Maximum bytes per bus transaction, register byte included
    pub max_transfer: usize,
    /// Pause between software shutdown and wake during initialization
    pub shutdown_pulse_ms: u32,
}

impl Config {
    /// Data bytes that fit in one burst transaction
    ///
    /// `max_transfer` is clamped to 2-[`MAX_TRANSFER_LIMIT`] first, so a
    /// hand-built Config still yields a usable chunk size.
    pub fn burst_len(&self) -> usize {
        self.max_transfer.clamp(2, MAX_TRANSFER_LIMIT) - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            column_layout: ColumnLayout::Interleaved,
            flush_strategy: FlushStrategy::Burst,
            max_transfer: DEFAULT_MAX_TRANSFER,
            shutdown_pulse_ms: DEFAULT_SHUTDOWN_PULSE_MS,
        }
    }
}

/// Builder for constructing driver configuration
///
/// # Example
///
/// ```
/// use is31fl3731::{Builder, ColumnLayout, FlushStrategy};
///
/// let config = match Builder::new()
///     .address(0x74)
///     .column_layout(ColumnLayout::Sequential)
///     .flush_strategy(FlushStrategy::PerByte)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.address, 0x74);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the 7-bit bus address
    pub fn address(mut self, address: u8) -> Self {
        self.config.address = address;
        self
    }

    /// Set the column wiring
    pub fn column_layout(mut self, layout: ColumnLayout) -> Self {
        self.config.column_layout = layout;
        self
    }

    /// Set the strategy used by `flush_frame`
    pub fn flush_strategy(mut self, strategy: FlushStrategy) -> Self {
        self.config.flush_strategy = strategy;
        self
    }

    /// Set the maximum bytes per bus transaction, register byte included
    pub fn max_transfer(mut self, bytes: usize) -> Self {
        self.config.max_transfer = bytes;
        self
    }

    /// Set the pause between software shutdown and wake during initialization
    pub fn shutdown_pulse_ms(mut self, ms: u32) -> Self {
        self.config.shutdown_pulse_ms = ms;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidAddress` if the address does not fit in 7 bits,
    /// and `BuilderError::InvalidTransferSize` if the transfer size cannot carry at
    /// least one data byte or exceeds [`MAX_TRANSFER_LIMIT`].
    pub fn build(self) -> Result<Config, BuilderError> {
        let config = self.config;
        if config.address > 0x7F {
            return Err(BuilderError::InvalidAddress {
                address: config.address,
            });
        }
        if config.max_transfer < 2 || config.max_transfer > MAX_TRANSFER_LIMIT {
            return Err(BuilderError::InvalidTransferSize {
                bytes: config.max_transfer,
            });
        }
        Ok(config)
    }
}
