//! Graphics support via embedded-graphics
//!
//! [`FrameBuffer`] implements [`DrawTarget`] with [`Gray8`] colors. A drawn
//! pixel's luma becomes its PWM intensity and any non-zero luma also turns the
//! pixel on. Drawing coordinates map directly onto frame coordinates and pixels
//! outside the 11x7 matrix are skipped.
//!
//! ## Example
//!
//! ```
//! use embedded_graphics::{
//!     pixelcolor::Gray8,
//!     prelude::*,
//!     primitives::{Line, PrimitiveStyle},
//! };
//! use is31fl3731::FrameBuffer;
//!
//! let mut frame = FrameBuffer::new();
//! let _ = Line::new(Point::new(0, 0), Point::new(10, 6))
//!     .into_styled(PrimitiveStyle::with_stroke(Gray8::new(64), 1))
//!     .draw(&mut frame);
//!
//! assert_eq!(frame.pwm(10, 6), Ok(64));
//! ```

use core::convert::Infallible;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::{Gray8, GrayColor},
    prelude::Pixel,
};

use crate::config::{HEIGHT, WIDTH};
use crate::frame::FrameBuffer;

/// On/off byte with every wired row lit
const ALL_ROWS: u8 = (1 << HEIGHT) - 1;

impl DrawTarget for FrameBuffer {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.draw_gray(x, y, color.luma());
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let luma = color.luma();
        self.fill_pwm(luma);
        self.fill_state(if luma > 0 { ALL_ROWS } else { 0 });
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
