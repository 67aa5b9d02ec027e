//! Control-page settings
//!
//! Every setting lives in a bit field of a register on the control page (0x0B).
//! Setters read the register, replace only their field and write it back, so
//! neighbouring fields survive. Fields that cover the whole register are written
//! without the read.
//!
//! ## Example
//!
//! ```
//! # use core::convert::Infallible;
//! # use is31fl3731::{Config, Matrix, MatrixInterface};
//! # struct Bus;
//! # impl MatrixInterface for Bus {
//! #     type Error = Infallible;
//! #     fn write(&mut self, _: u8, _: &[u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn read(&mut self, _: u8, _: u8, _: &mut [u8]) -> Result<(), Infallible> { Ok(()) }
//! #     fn delay_ms(&mut self, _: u32) {}
//! # }
//! use is31fl3731::DisplayMode;
//!
//! let mut matrix = Matrix::new(Bus, Config::default());
//! matrix.set_display_mode(DisplayMode::AutoPlay).ok();
//! matrix.set_autoplay_frame_count(4).ok();
//! matrix.set_autoplay_frame_delay(10).ok();
//! ```

use crate::error::Error;
use crate::interface::MatrixInterface;
use crate::matrix::{Matrix, MatrixResult};
use crate::register::{Field, Page, field};

/// How the chip picks the frame it shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Show the frame selected with [`Matrix::set_picture_frame`]
    #[default]
    Picture = 0b00,
    /// Cycle through frames on the chip's own timer
    AutoPlay = 0b01,
    /// Modulate frame 0 with the audio input
    AudioPlay = 0b10,
}

impl DisplayMode {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0b00 => Self::Picture,
            0b01 => Self::AutoPlay,
            _ => Self::AudioPlay,
        }
    }
}

/// Which frame's intensity settings apply while animating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IntensityControl {
    /// Each frame uses its own settings
    #[default]
    PerFrame = 0,
    /// All frames use the settings of frame 0
    FirstFrame = 1,
}

/// Speed of the automatic gain control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AgcMode {
    /// Slow attack and release
    #[default]
    Slow = 0,
    /// Fast attack and release
    Fast = 1,
}

/// Snapshot of the frame state register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameState {
    /// Autoplay finished its loops since the last read
    pub interrupt: bool,
    /// Frame currently shown during autoplay
    pub current_frame: u8,
}

impl<I> Matrix<I>
where
    I: MatrixInterface,
{
    /// Replace one bit field of a control register
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidValue` without touching the bus if `value` does not
    /// fit in the field.
    pub fn update_field(&mut self, field: Field, value: u8) -> MatrixResult<I> {
        if value > field.max() {
            return Err(Error::InvalidValue {
                value,
                max: field.max(),
            });
        }

        let current = if field.is_full_width() {
            0
        } else {
            self.read_register(Page::Control, field.register)?
        };
        self.write_register(Page::Control, field.register, field.insert(current, value))
    }

    /// Read one bit field of a control register, shifted down
    pub fn read_field(&mut self, field: Field) -> MatrixResult<I, u8> {
        let byte = self.read_register(Page::Control, field.register)?;
        Ok(field.extract(byte))
    }

    fn update_flag(&mut self, field: Field, on: bool) -> MatrixResult<I> {
        self.update_field(field, u8::from(on))
    }

    fn read_flag(&mut self, field: Field) -> MatrixResult<I, bool> {
        Ok(self.read_field(field)? != 0)
    }

    /// Enter (`true`) or leave (`false`) software shutdown
    ///
    /// Frame memory is kept while shut down.
    pub fn set_software_shutdown(&mut self, shutdown: bool) -> MatrixResult<I> {
        self.update_flag(field::SOFTWARE_SHUTDOWN, !shutdown)
    }

    /// Whether the chip is in software shutdown
    pub fn software_shutdown(&mut self) -> MatrixResult<I, bool> {
        Ok(!self.read_flag(field::SOFTWARE_SHUTDOWN)?)
    }

    /// Choose how the chip picks the shown frame
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> MatrixResult<I> {
        self.update_field(field::DISPLAY_MODE, mode as u8)
    }

    /// How the chip picks the shown frame
    pub fn display_mode(&mut self) -> MatrixResult<I, DisplayMode> {
        Ok(DisplayMode::from_bits(self.read_field(field::DISPLAY_MODE)?))
    }

    /// First frame shown by autoplay (0-7)
    pub fn set_autoplay_start_frame(&mut self, frame: u8) -> MatrixResult<I> {
        self.update_field(field::AUTOPLAY_START_FRAME, frame)
    }

    /// First frame shown by autoplay
    pub fn autoplay_start_frame(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AUTOPLAY_START_FRAME)
    }

    /// Frame shown in picture mode (0-7)
    pub fn set_picture_frame(&mut self, frame: u8) -> MatrixResult<I> {
        self.update_field(field::PICTURE_FRAME, frame)
    }

    /// Frame shown in picture mode
    pub fn picture_frame(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::PICTURE_FRAME)
    }

    /// Autoplay loop count (1-7, 0 loops forever)
    pub fn set_autoplay_loops(&mut self, loops: u8) -> MatrixResult<I> {
        self.update_field(field::AUTOPLAY_LOOPS, loops)
    }

    /// Autoplay loop count
    pub fn autoplay_loops(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AUTOPLAY_LOOPS)
    }

    /// Frames per autoplay loop (1-7, 0 plays all eight)
    pub fn set_autoplay_frame_count(&mut self, count: u8) -> MatrixResult<I> {
        self.update_field(field::AUTOPLAY_FRAME_COUNT, count)
    }

    /// Frames per autoplay loop
    pub fn autoplay_frame_count(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AUTOPLAY_FRAME_COUNT)
    }

    /// Time each autoplay frame is shown, in steps of 11 ms (0 means 64 steps)
    pub fn set_autoplay_frame_delay(&mut self, delay: u8) -> MatrixResult<I> {
        self.update_field(field::AUTOPLAY_FRAME_DELAY, delay)
    }

    /// Autoplay frame delay in 11 ms steps
    pub fn autoplay_frame_delay(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AUTOPLAY_FRAME_DELAY)
    }

    /// Choose whose intensity settings apply while animating
    pub fn set_intensity_control(&mut self, control: IntensityControl) -> MatrixResult<I> {
        self.update_field(field::INTENSITY_CONTROL, control as u8)
    }

    /// Whose intensity settings apply while animating
    pub fn intensity_control(&mut self) -> MatrixResult<I, IntensityControl> {
        Ok(match self.read_field(field::INTENSITY_CONTROL)? {
            0 => IntensityControl::PerFrame,
            _ => IntensityControl::FirstFrame,
        })
    }

    /// Enable or disable blinking for all frames
    pub fn set_blink_enabled(&mut self, enabled: bool) -> MatrixResult<I> {
        self.update_flag(field::BLINK_ENABLE, enabled)
    }

    /// Whether blinking is enabled
    pub fn blink_enabled(&mut self) -> MatrixResult<I, bool> {
        self.read_flag(field::BLINK_ENABLE)
    }

    /// Blink period in steps of 0.27 s (0-7)
    pub fn set_blink_period(&mut self, period: u8) -> MatrixResult<I> {
        self.update_field(field::BLINK_PERIOD, period)
    }

    /// Blink period in 0.27 s steps
    pub fn blink_period(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::BLINK_PERIOD)
    }

    /// Modulate intensity with the audio input
    pub fn set_audio_sync_enabled(&mut self, enabled: bool) -> MatrixResult<I> {
        self.update_flag(field::AUDIO_SYNC_ENABLE, enabled)
    }

    /// Whether audio sync is enabled
    pub fn audio_sync_enabled(&mut self) -> MatrixResult<I, bool> {
        self.read_flag(field::AUDIO_SYNC_ENABLE)
    }

    /// Whether autoplay has finished since the last read
    ///
    /// The chip clears the flag when the register is read, so a second call
    /// usually returns `false`.
    pub fn frame_interrupt(&mut self) -> MatrixResult<I, bool> {
        self.read_flag(field::FRAME_INTERRUPT)
    }

    /// Frame currently shown by autoplay
    pub fn current_frame(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::CURRENT_FRAME)
    }

    /// Read the interrupt flag and current frame with a single access
    pub fn frame_state(&mut self) -> MatrixResult<I, FrameState> {
        let byte = self.read_register(Page::Control, field::CURRENT_FRAME.register)?;
        Ok(FrameState {
            interrupt: field::FRAME_INTERRUPT.extract(byte) != 0,
            current_frame: field::CURRENT_FRAME.extract(byte),
        })
    }

    /// Breath fade-out time (0-7)
    pub fn set_breath_fade_out(&mut self, time: u8) -> MatrixResult<I> {
        self.update_field(field::BREATH_FADE_OUT, time)
    }

    /// Breath fade-out time
    pub fn breath_fade_out(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::BREATH_FADE_OUT)
    }

    /// Breath fade-in time (0-7)
    pub fn set_breath_fade_in(&mut self, time: u8) -> MatrixResult<I> {
        self.update_field(field::BREATH_FADE_IN, time)
    }

    /// Breath fade-in time
    pub fn breath_fade_in(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::BREATH_FADE_IN)
    }

    /// Enable or disable breathing
    pub fn set_breath_enabled(&mut self, enabled: bool) -> MatrixResult<I> {
        self.update_flag(field::BREATH_ENABLE, enabled)
    }

    /// Whether breathing is enabled
    pub fn breath_enabled(&mut self) -> MatrixResult<I, bool> {
        self.read_flag(field::BREATH_ENABLE)
    }

    /// Time LEDs stay dark between breaths
    pub fn set_breath_extinguish(&mut self, time: u8) -> MatrixResult<I> {
        self.update_field(field::BREATH_EXTINGUISH, time)
    }

    /// Time LEDs stay dark between breaths
    pub fn breath_extinguish(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::BREATH_EXTINGUISH)
    }

    /// Choose the gain control speed
    pub fn set_agc_mode(&mut self, mode: AgcMode) -> MatrixResult<I> {
        self.update_field(field::AGC_MODE, mode as u8)
    }

    /// Gain control speed
    pub fn agc_mode(&mut self) -> MatrixResult<I, AgcMode> {
        Ok(match self.read_field(field::AGC_MODE)? {
            0 => AgcMode::Slow,
            _ => AgcMode::Fast,
        })
    }

    /// Enable or disable automatic gain control
    pub fn set_agc_enabled(&mut self, enabled: bool) -> MatrixResult<I> {
        self.update_flag(field::AGC_ENABLE, enabled)
    }

    /// Whether automatic gain control is enabled
    pub fn agc_enabled(&mut self) -> MatrixResult<I, bool> {
        self.read_flag(field::AGC_ENABLE)
    }

    /// Audio gain in 3 dB steps from 0 dB (0-7)
    pub fn set_agc_gain(&mut self, gain: u8) -> MatrixResult<I> {
        self.update_field(field::AGC_GAIN, gain)
    }

    /// Audio gain in 3 dB steps
    pub fn agc_gain(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AGC_GAIN)
    }

    /// Audio ADC sample period in steps of 46 us (0 means 256 steps)
    pub fn set_audio_adc_rate(&mut self, rate: u8) -> MatrixResult<I> {
        self.update_field(field::AUDIO_ADC_RATE, rate)
    }

    /// Audio ADC sample period in 46 us steps
    pub fn audio_adc_rate(&mut self) -> MatrixResult<I, u8> {
        self.read_field(field::AUDIO_ADC_RATE)
    }
}
