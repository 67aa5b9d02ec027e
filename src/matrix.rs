//! Core matrix operations

use crate::config::{Config, FlushStrategy, MAX_TRANSFER_LIMIT};
use crate::control::DisplayMode;
use crate::error::Error;
use crate::frame::FrameBuffer;
use crate::interface::MatrixInterface;
use crate::register::{BLINK_CONTROL_BASE, COMMAND_REGISTER, LED_CONTROL_BASE, PWM_BASE, Page};

pub(crate) type MatrixResult<I, T = ()> = core::result::Result<T, Error<I>>;

/// Reject register runs past 0xFF or over the command register
fn check_run<I: MatrixInterface>(start: u8, len: usize) -> MatrixResult<I> {
    let begin = usize::from(start);
    let end = begin + len;
    let command = usize::from(COMMAND_REGISTER);
    if end > 0x100 || (begin <= command && command < end) {
        return Err(Error::InvalidRange { start, len });
    }
    Ok(())
}

/// Driver for an IS31FL3731 wired to an 11x7 LED matrix
///
/// Owns the bus interface, one local [`FrameBuffer`] and the page-select cache.
/// Pixel changes only reach the chip when a frame is flushed.
pub struct Matrix<I>
where
    I: MatrixInterface,
{
    /// Bus interface
    interface: I,
    /// Driver configuration
    config: Config,
    /// Page last written to the command register, `None` when unknown
    page: Option<u8>,
    /// Local pixel, blink and PWM state
    frame: FrameBuffer,
}

impl<I> Matrix<I>
where
    I: MatrixInterface,
{
    /// Create a new Matrix instance
    ///
    /// No bus traffic happens until the first register access; call
    /// [`begin`](Self::begin) to bring the chip into a known state.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            page: None,
            frame: FrameBuffer::new(),
        }
    }

    /// Reset and initialize the chip
    ///
    /// Pulses software shutdown, selects picture mode showing frame 0, clears the
    /// local buffers and flushes them to frame 0. Register writes issued before the
    /// shutdown pulse may be discarded by the chip, so configure afterwards.
    pub fn begin(&mut self) -> MatrixResult<I> {
        log::debug!("initializing matrix at 0x{:02X}", self.config.address);
        self.page = None;

        self.set_software_shutdown(true)?;
        self.interface.delay_ms(self.config.shutdown_pulse_ms);
        self.set_software_shutdown(false)?;

        self.set_display_mode(DisplayMode::Picture)?;
        self.set_picture_frame(0)?;

        self.frame.clear_all();
        self.flush_frame(0)
    }

    /// Write one register on `page`
    ///
    /// The page select is skipped when `page` is already selected.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` for the command register; pages are only
    /// switched through the page cache.
    pub fn write_register(&mut self, page: Page, register: u8, value: u8) -> MatrixResult<I> {
        check_run::<I>(register, 1)?;
        self.select_page(page)?;
        self.interface
            .write(self.config.address, &[register, value])
            .map_err(Error::Interface)
    }

    /// Read one register on `page`
    ///
    /// Blocks until the chip answers or the interface gives up.
    pub fn read_register(&mut self, page: Page, register: u8) -> MatrixResult<I, u8> {
        self.select_page(page)?;
        let mut buffer = [0u8; 1];
        self.interface
            .read(self.config.address, register, &mut buffer)
            .map_err(Error::Interface)?;
        Ok(buffer[0])
    }

    /// Write consecutive registers on `page` starting at `start`
    ///
    /// Data is split into as few transactions as the configured transfer size allows.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRange` if the run would pass register 0xFF or
    /// cover the command register.
    pub fn write_burst(&mut self, page: Page, start: u8, data: &[u8]) -> MatrixResult<I> {
        check_run::<I>(start, data.len())?;
        self.select_page(page)?;

        let chunk_len = self.config.burst_len();
        let mut buffer = [0u8; MAX_TRANSFER_LIMIT];
        for (index, chunk) in data.chunks(chunk_len).enumerate() {
            let register = usize::from(start) + index * chunk_len;
            log::trace!("burst of {} bytes at 0x{:02X}", chunk.len(), register);

            buffer[0] = register as u8;
            buffer[1..=chunk.len()].copy_from_slice(chunk);
            self.interface
                .write(self.config.address, &buffer[..=chunk.len()])
                .map_err(Error::Interface)?;
        }

        Ok(())
    }

    /// Page the chip currently has selected, as far as the driver knows
    pub fn selected_page(&self) -> Option<u8> {
        self.page
    }

    /// Forget the selected page so the next access selects explicitly
    ///
    /// Call this after talking to the chip through [`interface_mut`](Self::interface_mut).
    pub fn invalidate_page_cache(&mut self) {
        self.page = None;
    }

    /// Push the local buffers to frame page `frame` with the configured strategy
    ///
    /// The chip's frame page matches the buffers once this returns. Writes are not
    /// read back.
    pub fn flush_frame(&mut self, frame: u8) -> MatrixResult<I> {
        match self.config.flush_strategy {
            FlushStrategy::PerByte => self.flush_frame_per_byte(frame),
            FlushStrategy::Burst => self.flush_frame_burst(frame),
        }
    }

    /// Push the local buffers to `frame` one register at a time
    pub fn flush_frame_per_byte(&mut self, frame: u8) -> MatrixResult<I> {
        log::debug!("flushing frame {} byte by byte", frame);
        let page = Page::Frame(frame);
        let image = self.frame.to_image(self.config.column_layout);

        let blocks: [(u8, &[u8]); 3] = [
            (LED_CONTROL_BASE, &image.state),
            (BLINK_CONTROL_BASE, &image.blink),
            (PWM_BASE, &image.pwm),
        ];
        for (base, block) in blocks {
            for (offset, value) in block.iter().enumerate() {
                self.write_register(page, base + offset as u8, *value)?;
            }
        }

        Ok(())
    }

    /// Push the local buffers to `frame` with one page select and burst writes
    pub fn flush_frame_burst(&mut self, frame: u8) -> MatrixResult<I> {
        log::debug!("flushing frame {} in bursts", frame);
        let page = Page::Frame(frame);
        let image = self.frame.to_image(self.config.column_layout);

        self.write_burst(page, LED_CONTROL_BASE, &image.state)?;
        self.write_burst(page, BLINK_CONTROL_BASE, &image.blink)?;
        self.write_burst(page, PWM_BASE, &image.pwm)?;

        Ok(())
    }

    /// Turn a pixel on or off in the local buffer
    pub fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> MatrixResult<I> {
        self.frame.set_pixel(x, y, on).map_err(Error::from)
    }

    /// Whether a pixel is on in the local buffer
    pub fn pixel(&self, x: u8, y: u8) -> MatrixResult<I, bool> {
        self.frame.pixel(x, y).map_err(Error::from)
    }

    /// Enable or disable blinking for a pixel in the local buffer
    pub fn set_blink(&mut self, x: u8, y: u8, on: bool) -> MatrixResult<I> {
        self.frame.set_blink(x, y, on).map_err(Error::from)
    }

    /// Whether a pixel blinks in the local buffer
    pub fn blink(&self, x: u8, y: u8) -> MatrixResult<I, bool> {
        self.frame.blink(x, y).map_err(Error::from)
    }

    /// Set a pixel's intensity in the local buffer
    pub fn set_pwm(&mut self, x: u8, y: u8, value: u8) -> MatrixResult<I> {
        self.frame.set_pwm(x, y, value).map_err(Error::from)
    }

    /// A pixel's intensity in the local buffer
    pub fn pwm(&self, x: u8, y: u8) -> MatrixResult<I, u8> {
        self.frame.pwm(x, y).map_err(Error::from)
    }

    /// Zero the on/off, blink and PWM buffers
    pub fn clear_all(&mut self) {
        self.frame.clear_all();
    }

    /// Store `value` as the on/off byte of every column
    pub fn fill_state(&mut self, value: u8) {
        self.frame.fill_state(value);
    }

    /// Store `value` as the blink byte of every column
    pub fn fill_blink(&mut self, value: u8) {
        self.frame.fill_blink(value);
    }

    /// Set every pixel's intensity to `value`
    pub fn fill_pwm(&mut self, value: u8) {
        self.frame.fill_pwm(value);
    }

    /// Local frame buffer
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Mutable local frame buffer
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the bus interface directly
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give back the bus interface
    pub fn release(self) -> I {
        self.interface
    }

    fn select_page(&mut self, page: Page) -> MatrixResult<I> {
        if !page.is_valid() {
            return Err(Error::InvalidFrame {
                frame: page.number(),
            });
        }

        let number = page.number();
        if self.page == Some(number) {
            return Ok(());
        }

        log::trace!("selecting page 0x{:02X}", number);
        self.page = None;
        self.interface
            .write(self.config.address, &[COMMAND_REGISTER, number])
            .map_err(Error::Interface)?;
        self.page = Some(number);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, ColumnLayout};
    use crate::mock::{MockChip, MockError, Transaction};
    use crate::register::{CONFIGURATION, CONTROL_PAGE, PICTURE_DISPLAY, SHUTDOWN};
    use alloc::vec;
    use alloc::vec::Vec;

    fn test_matrix() -> Matrix<MockChip> {
        Matrix::new(MockChip::new(), Builder::new().build().unwrap())
    }

    fn matrix_with(builder: Builder) -> Matrix<MockChip> {
        Matrix::new(MockChip::new(), builder.build().unwrap())
    }

    /// xorshift32, enough to scramble buffer contents
    fn fill_random(matrix: &mut Matrix<MockChip>, mut seed: u32) {
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed as u8
        };
        matrix.fill_state(next());
        matrix.fill_blink(next());
        for x in 0..11 {
            for y in 0..7 {
                matrix.set_pixel(x, y, next() & 1 == 1).unwrap();
                matrix.set_blink(x, y, next() & 1 == 1).unwrap();
                matrix.set_pwm(x, y, next()).unwrap();
            }
        }
    }

    #[test]
    fn test_first_access_selects_page() {
        let mut matrix = test_matrix();
        assert_eq!(matrix.selected_page(), None);

        matrix.write_register(Page::Frame(0), 0x00, 0xFF).unwrap();

        assert_eq!(
            matrix.interface.writes(),
            vec![vec![0xFD, 0x00], vec![0x00, 0xFF]]
        );
        assert_eq!(matrix.selected_page(), Some(0));
    }

    #[test]
    fn test_page_select_elided_for_same_page() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Control, SHUTDOWN, 0x01).unwrap();
        matrix.write_register(Page::Control, CONFIGURATION, 0x00).unwrap();
        matrix.read_register(Page::Control, SHUTDOWN).unwrap();

        assert_eq!(matrix.interface.page_selects(), 1);
        assert_eq!(matrix.interface.transactions.len(), 4);
    }

    #[test]
    fn test_page_select_reissued_on_change() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Control, SHUTDOWN, 0x01).unwrap();
        matrix.write_register(Page::Frame(3), 0x00, 0x01).unwrap();
        matrix.write_register(Page::Frame(3), 0x01, 0x01).unwrap();
        matrix.write_register(Page::Control, SHUTDOWN, 0x00).unwrap();

        assert_eq!(matrix.interface.page_selects(), 3);
        assert_eq!(
            matrix.interface.writes(),
            vec![
                vec![0xFD, 0x0B],
                vec![0x0A, 0x01],
                vec![0xFD, 0x03],
                vec![0x00, 0x01],
                vec![0x01, 0x01],
                vec![0xFD, 0x0B],
                vec![0x0A, 0x00],
            ]
        );
    }

    #[test]
    fn test_invalidate_forces_reselect() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Frame(1), 0x00, 0x01).unwrap();
        matrix.invalidate_page_cache();
        matrix.write_register(Page::Frame(1), 0x00, 0x02).unwrap();
        assert_eq!(matrix.interface.page_selects(), 2);
    }

    #[test]
    fn test_failed_page_select_leaves_cache_unknown() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Frame(0), 0x00, 0x01).unwrap();

        matrix.interface.fail_writes = true;
        let result = matrix.write_register(Page::Control, SHUTDOWN, 0x01);
        assert!(matches!(result, Err(Error::Interface(MockError::Nack))));
        assert_eq!(matrix.selected_page(), None);

        matrix.interface.fail_writes = false;
        matrix.write_register(Page::Frame(0), 0x00, 0x02).unwrap();
        assert_eq!(matrix.interface.page_selects(), 2);
    }

    #[test]
    fn test_invalid_frame_rejected_without_traffic() {
        let mut matrix = test_matrix();
        let result = matrix.write_register(Page::Frame(8), 0x00, 0x01);
        assert!(matches!(result, Err(Error::InvalidFrame { frame: 8 })));
        assert!(matrix.flush_frame(9).is_err());
        assert!(matrix.interface.transactions.is_empty());
    }

    #[test]
    fn test_read_register_returns_chip_value() {
        let mut matrix = test_matrix();
        matrix.interface.set_control(PICTURE_DISPLAY, 0x05);
        let value = matrix.read_register(Page::Control, PICTURE_DISPLAY).unwrap();
        assert_eq!(value, 0x05);
        assert_eq!(
            matrix.interface.transactions.last(),
            Some(&Transaction::Read {
                register: PICTURE_DISPLAY,
                len: 1
            })
        );
    }

    #[test]
    fn test_burst_respects_transfer_size() {
        let mut matrix = matrix_with(Builder::new().max_transfer(8));
        let data: Vec<u8> = (0..20).collect();
        matrix.write_burst(Page::Frame(2), 0x24, &data).unwrap();

        let writes = matrix.interface.writes();
        assert_eq!(writes[0], vec![0xFD, 0x02]);
        assert_eq!(writes.len(), 1 + 3);
        assert!(writes.iter().all(|bytes| bytes.len() <= 8));
        assert_eq!(writes[1][0], 0x24);
        assert_eq!(writes[2][0], 0x24 + 7);
        assert_eq!(writes[3][0], 0x24 + 14);
        assert_eq!(&matrix.interface.frame(2)[0x24..0x24 + 20], data.as_slice());
    }

    #[test]
    fn test_burst_past_register_space_rejected() {
        let mut matrix = test_matrix();
        let result = matrix.write_burst(Page::Frame(0), 0xF0, &[0; 17]);
        assert!(matches!(
            result,
            Err(Error::InvalidRange {
                start: 0xF0,
                len: 17
            })
        ));
        assert!(matrix.interface.transactions.is_empty());
    }

    #[test]
    fn test_command_register_write_rejected() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Control, SHUTDOWN, 0x01).unwrap();

        let result = matrix.write_register(Page::Control, COMMAND_REGISTER, 0x03);
        assert!(matches!(
            result,
            Err(Error::InvalidRange {
                start: COMMAND_REGISTER,
                len: 1
            })
        ));
        assert_eq!(matrix.interface.page, CONTROL_PAGE);
        assert_eq!(matrix.selected_page(), Some(CONTROL_PAGE));

        matrix.write_register(Page::Control, SHUTDOWN, 0x00).unwrap();
        assert_eq!(matrix.interface.control(SHUTDOWN), 0x00);
        assert_eq!(matrix.interface.frame(3)[usize::from(SHUTDOWN)], 0x00);
    }

    #[test]
    fn test_burst_over_command_register_rejected() {
        let mut matrix = test_matrix();
        matrix.write_register(Page::Frame(0), 0x00, 0x01).unwrap();
        matrix.interface.clear_log();

        let result = matrix.write_burst(Page::Frame(0), 0xF0, &[2; 16]);
        assert!(matches!(
            result,
            Err(Error::InvalidRange {
                start: 0xF0,
                len: 16
            })
        ));
        assert!(matrix.interface.transactions.is_empty());
        assert_eq!(matrix.interface.page, 0);

        // runs ending just below or starting just above are fine
        matrix.write_burst(Page::Frame(0), 0xF0, &[2; 13]).unwrap();
        matrix.write_burst(Page::Frame(0), 0xFE, &[2; 2]).unwrap();
        assert_eq!(matrix.interface.page, 0);
        assert_eq!(matrix.selected_page(), Some(0));
    }

    #[test]
    fn test_burst_flush_selects_page_once() {
        let mut matrix = test_matrix();
        matrix.flush_frame_burst(5).unwrap();

        let writes = matrix.interface.writes();
        assert_eq!(matrix.interface.page_selects(), 1);
        assert_eq!(writes[0], vec![0xFD, 0x05]);
        // state, blink, then 88 PWM bytes in 31-byte chunks
        assert_eq!(writes.len(), 1 + 1 + 1 + 3);
        assert_eq!(writes[1].len(), 12);
        assert_eq!(writes[1][0], LED_CONTROL_BASE);
        assert_eq!(writes[2][0], BLINK_CONTROL_BASE);
        assert_eq!(writes[3][0], PWM_BASE);
        assert!(writes.iter().all(|bytes| bytes.len() <= 32));
    }

    #[test]
    fn test_per_byte_flush_writes_one_register_per_transaction() {
        let mut matrix = test_matrix();
        matrix.flush_frame_per_byte(0).unwrap();

        let writes = matrix.interface.writes();
        assert_eq!(matrix.interface.page_selects(), 1);
        assert_eq!(writes.len(), 1 + 11 + 11 + 88);
        assert!(writes[1..].iter().all(|bytes| bytes.len() == 2));
    }

    #[test]
    fn test_burst_and_per_byte_produce_identical_memory() {
        for layout in [ColumnLayout::Interleaved, ColumnLayout::Sequential] {
            for seed in [0x1234_5678, 0xDEAD_BEEF, 0x0BAD_F00D] {
                let mut per_byte = matrix_with(Builder::new().column_layout(layout));
                let mut burst = matrix_with(Builder::new().column_layout(layout).max_transfer(13));
                for chip in [&mut per_byte.interface, &mut burst.interface] {
                    chip.memory[4].fill(0xA5);
                }
                fill_random(&mut per_byte, seed);
                fill_random(&mut burst, seed);

                per_byte.flush_frame_per_byte(4).unwrap();
                burst.flush_frame_burst(4).unwrap();

                assert_eq!(per_byte.interface.frame(4), burst.interface.frame(4));
                assert!(burst.interface.transactions.len() < per_byte.interface.transactions.len());
            }
        }
    }

    #[test]
    fn test_flush_uses_configured_strategy() {
        let mut matrix = matrix_with(Builder::new().flush_strategy(FlushStrategy::PerByte));
        matrix.flush_frame(0).unwrap();
        assert_eq!(matrix.interface.writes().len(), 1 + 110);

        let mut matrix = test_matrix();
        matrix.flush_frame(0).unwrap();
        assert_eq!(matrix.interface.writes().len(), 6);
    }

    #[test]
    fn test_flush_targets_requested_frame_only() {
        let mut matrix = test_matrix();
        matrix.fill_state(0xFF);
        matrix.flush_frame(6).unwrap();

        assert_eq!(matrix.interface.frame(6)[0x00], 0xFF);
        assert_eq!(matrix.interface.frame(0)[0x00], 0x00);
    }

    #[test]
    fn test_interleaved_column_placement() {
        let mut matrix = test_matrix();
        matrix.set_pixel(5, 0, true).unwrap();
        matrix.set_pixel(6, 6, true).unwrap();
        matrix.set_pwm(6, 6, 0x42).unwrap();
        matrix.set_blink(10, 3, true).unwrap();
        matrix.flush_frame(1).unwrap();

        let frame = matrix.interface.frame(1);
        assert_eq!(frame[0x0A], 0b0000_0001);
        assert_eq!(frame[0x01], 0b0100_0000);
        assert_eq!(frame[0x24 + 8 + 6], 0x42);
        assert_eq!(frame[0x12 + 9], 0b0000_1000);
    }

    #[test]
    fn test_begin_sequence() {
        let mut matrix = test_matrix();
        matrix.interface.set_control(CONFIGURATION, 0b0000_1011);
        matrix.interface.set_control(PICTURE_DISPLAY, 0x03);
        matrix.fill_pwm(0x10);

        matrix.begin().unwrap();

        let writes = matrix.interface.writes();
        assert_eq!(
            writes[..7],
            [
                vec![0xFD, CONTROL_PAGE],
                vec![SHUTDOWN, 0x00],
                vec![SHUTDOWN, 0x01],
                vec![CONFIGURATION, 0b0000_0011],
                vec![PICTURE_DISPLAY, 0x00],
                vec![0xFD, 0x00],
                vec![0u8; 12],
            ]
        );
        assert_eq!(matrix.interface.delay_ms_total, 10);
        assert_eq!(matrix.interface.control(SHUTDOWN), 0x01);
        assert_eq!(matrix.frame(), &FrameBuffer::new());
        assert!(matrix.interface.frame(0)[0x24..0xB4].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_begin_then_flush_single_pixel() {
        let mut matrix = test_matrix();
        matrix.begin().unwrap();
        matrix.interface.clear_log();

        matrix.set_pixel(0, 0, true).unwrap();
        matrix.set_pwm(0, 0, 4).unwrap();
        matrix.flush_frame(0).unwrap();

        let writes = matrix.interface.writes();
        // frame 0 is still selected from begin
        assert_eq!(matrix.interface.page_selects(), 0);
        assert_eq!(writes[0][0], LED_CONTROL_BASE);
        assert_eq!(writes[0][1], 0b0000_0001);
        assert_eq!(writes[2][0], PWM_BASE);
        assert_eq!(writes[2][1], 4);
        assert_eq!(matrix.interface.frame(0)[0x00], 0x01);
        assert_eq!(matrix.interface.frame(0)[0x24], 4);
    }

    #[test]
    fn test_pixel_accessors_reject_out_of_bounds() {
        let mut matrix = test_matrix();
        assert!(matches!(
            matrix.set_pixel(11, 0, true),
            Err(Error::OutOfBounds { x: 11, y: 0 })
        ));
        assert!(matches!(
            matrix.set_pwm(0, 7, 1),
            Err(Error::OutOfBounds { x: 0, y: 7 })
        ));
        assert!(matches!(matrix.blink(20, 20), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_buffers_not_synced_until_flush() {
        let mut matrix = test_matrix();
        matrix.set_pixel(2, 2, true).unwrap();
        assert!(matrix.interface.transactions.is_empty());
        assert!(matrix.pixel(2, 2).unwrap());
    }
}
