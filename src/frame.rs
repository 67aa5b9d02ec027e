//! Local frame buffers
//!
//! A [`FrameBuffer`] caches one frame of the 11x7 matrix in three independent
//! planes:
//!
//! | Plane | Shape     | Meaning                                  |
//! |-------|-----------|------------------------------------------|
//! | state | 11 bytes  | bit `y` of byte `x` turns pixel (x, y) on |
//! | blink | 11 bytes  | bit `y` of byte `x` makes pixel (x, y) blink |
//! | pwm   | 11 x 7    | intensity of pixel (x, y), 0-255         |
//!
//! Changes stay local until the buffer is flushed to a frame page with
//! [`Matrix::flush_frame`](crate::Matrix::flush_frame). Coordinates start at
//! the bottom left of the board.
//!
//! ## Example
//!
//! ```
//! use is31fl3731::FrameBuffer;
//!
//! let mut frame = FrameBuffer::new();
//! frame.set_pixel(3, 2, true).ok();
//! frame.set_pwm(3, 2, 128).ok();
//!
//! assert_eq!(frame.pixel(3, 2), Ok(true));
//! assert_eq!(frame.state_column(3), Ok(0b0000_0100));
//! ```

use crate::config::{ColumnLayout, HEIGHT, WIDTH};
use crate::error::CoordinateError;

type FrameResult<T> = core::result::Result<T, CoordinateError>;

/// Rows of PWM registers reserved per LED control byte
pub(crate) const PWM_ROW_STRIDE: usize = 8;

/// One frame of pixel, blink and PWM state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    state: [u8; WIDTH],
    blink: [u8; WIDTH],
    pwm: [[u8; HEIGHT]; WIDTH],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn check(x: u8, y: u8) -> FrameResult<(usize, usize)> {
    let (column, row) = (usize::from(x), usize::from(y));
    if column < WIDTH && row < HEIGHT {
        Ok((column, row))
    } else {
        Err(CoordinateError { x, y })
    }
}

fn check_column(x: u8) -> FrameResult<usize> {
    check(x, 0).map(|(column, _)| column)
}

fn set_bit(byte: &mut u8, row: usize, on: bool) {
    if on {
        *byte |= 1 << row;
    } else {
        *byte &= !(1 << row);
    }
}

impl FrameBuffer {
    /// Create a frame with every pixel off, not blinking, at zero intensity
    pub const fn new() -> Self {
        Self {
            state: [0; WIDTH],
            blink: [0; WIDTH],
            pwm: [[0; HEIGHT]; WIDTH],
        }
    }

    /// Turn a pixel on or off
    pub fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> FrameResult<()> {
        let (column, row) = check(x, y)?;
        set_bit(&mut self.state[column], row, on);
        Ok(())
    }

    /// Whether a pixel is on
    pub fn pixel(&self, x: u8, y: u8) -> FrameResult<bool> {
        let (column, row) = check(x, y)?;
        Ok((self.state[column] >> row) & 1 == 1)
    }

    /// Enable or disable blinking for a pixel
    pub fn set_blink(&mut self, x: u8, y: u8, on: bool) -> FrameResult<()> {
        let (column, row) = check(x, y)?;
        set_bit(&mut self.blink[column], row, on);
        Ok(())
    }

    /// Whether a pixel blinks
    pub fn blink(&self, x: u8, y: u8) -> FrameResult<bool> {
        let (column, row) = check(x, y)?;
        Ok((self.blink[column] >> row) & 1 == 1)
    }

    /// Set a pixel's intensity
    pub fn set_pwm(&mut self, x: u8, y: u8, value: u8) -> FrameResult<()> {
        let (column, row) = check(x, y)?;
        self.pwm[column][row] = value;
        Ok(())
    }

    /// A pixel's intensity
    pub fn pwm(&self, x: u8, y: u8) -> FrameResult<u8> {
        let (column, row) = check(x, y)?;
        Ok(self.pwm[column][row])
    }

    /// Raw on/off byte of a column
    pub fn state_column(&self, x: u8) -> FrameResult<u8> {
        Ok(self.state[check_column(x)?])
    }

    /// Raw blink byte of a column
    pub fn blink_column(&self, x: u8) -> FrameResult<u8> {
        Ok(self.blink[check_column(x)?])
    }

    /// Zero all three planes
    pub fn clear_all(&mut self) {
        self.clear_state();
        self.clear_blink();
        self.clear_pwm();
    }

    /// Turn every pixel off
    pub fn clear_state(&mut self) {
        self.fill_state(0);
    }

    /// Stop every pixel blinking
    pub fn clear_blink(&mut self) {
        self.fill_blink(0);
    }

    /// Set every intensity to zero
    pub fn clear_pwm(&mut self) {
        self.fill_pwm(0);
    }

    /// Store `value` as the on/off byte of every column
    pub fn fill_state(&mut self, value: u8) {
        self.state = [value; WIDTH];
    }

    /// Store `value` as the blink byte of every column
    pub fn fill_blink(&mut self, value: u8) {
        self.blink = [value; WIDTH];
    }

    /// Set every pixel's intensity to `value`
    pub fn fill_pwm(&mut self, value: u8) {
        self.pwm = [[value; HEIGHT]; WIDTH];
    }

    /// Store a gray level at a drawing position, skipping positions off the matrix
    ///
    /// The level becomes the PWM value and any non-zero level turns the pixel on.
    #[cfg(feature = "graphics")]
    pub(crate) fn draw_gray(&mut self, x: i32, y: i32, luma: u8) {
        let (Ok(column), Ok(row)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if column >= WIDTH || row >= HEIGHT {
            return;
        }
        self.pwm[column][row] = luma;
        set_bit(&mut self.state[column], row, luma > 0);
    }

    /// Lay the buffer out in chip register order
    pub fn to_image(&self, layout: ColumnLayout) -> FrameImage {
        let mut image = FrameImage {
            state: [0; WIDTH],
            blink: [0; WIDTH],
            pwm: [0; WIDTH * PWM_ROW_STRIDE],
        };

        for column in 0..WIDTH {
            let offset = layout.offset(column);
            image.state[offset] = self.state[column];
            image.blink[offset] = self.blink[column];

            let start = offset * PWM_ROW_STRIDE;
            image.pwm[start..start + HEIGHT].copy_from_slice(&self.pwm[column]);
        }

        image
    }
}

/// A frame laid out in chip register order
///
/// Covers the first 11 LED control bytes, the matching blink bytes and their
/// 88 PWM registers. Each column owns 8 PWM registers; the eighth has no LED on
/// the 11x7 board and is always zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameImage {
    /// LED on/off bytes from [`LED_CONTROL_BASE`](crate::register::LED_CONTROL_BASE)
    pub state: [u8; WIDTH],
    /// Blink bytes from [`BLINK_CONTROL_BASE`](crate::register::BLINK_CONTROL_BASE)
    pub blink: [u8; WIDTH],
    /// PWM bytes from [`PWM_BASE`](crate::register::PWM_BASE)
    pub pwm: [u8; WIDTH * PWM_ROW_STRIDE],
}
