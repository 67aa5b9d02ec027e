//! IS31FL3731 register map
//!
//! The chip exposes nine register pages behind a single command register:
//!
//! | Page        | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | 0x00 - 0x07 | Animation frames (LED control, blink, PWM)      |
//! | 0x0B        | Control (function) registers                    |
//!
//! Writing a page number to [`COMMAND_REGISTER`] selects which page every
//! following register access goes to.
//!
//! ## Frame page layout
//!
//! | Range       | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | 0x00 - 0x11 | LED on/off, one byte per 8 LEDs, A/B alternating |
//! | 0x12 - 0x23 | Blink enable, same layout as LED on/off         |
//! | 0x24 - 0xB3 | PWM, one byte per LED                           |
//!
//! The PWM register for LED control byte `n`, bit `b` is `0x24 + 8 * n + b`.
//!
//! ## Example
//!
//! ```
//! use is31fl3731::register::{field, CONFIGURATION};
//!
//! // Switch to auto play without touching the start frame bits
//! let config = 0b0000_0101;
//! let updated = field::DISPLAY_MODE.insert(config, 0b01);
//! assert_eq!(updated, 0b0000_1101);
//! assert_eq!(field::AUTOPLAY_START_FRAME.extract(updated), 0b101);
//! assert_eq!(field::DISPLAY_MODE.register, CONFIGURATION);
//! ```

/// Command register (0xFD)
///
/// Selects the page addressed by every following register access.
pub const COMMAND_REGISTER: u8 = 0xFD;

/// Number of animation frame pages
pub const FRAME_COUNT: u8 = 8;

/// Page number of the control (function) registers
pub const CONTROL_PAGE: u8 = 0x0B;

// Frame memory

/// First LED on/off register in a frame page
pub const LED_CONTROL_BASE: u8 = 0x00;

/// First blink control register in a frame page
pub const BLINK_CONTROL_BASE: u8 = 0x12;

/// First PWM register in a frame page
pub const PWM_BASE: u8 = 0x24;

/// Number of LED on/off (and blink) bytes in a frame page
pub const LED_CONTROL_LEN: usize = 0x12;

/// Number of PWM bytes in a frame page
pub const PWM_LEN: usize = 0x90;

// Control page registers

/// Configuration register: display mode and auto play start frame
pub const CONFIGURATION: u8 = 0x00;

/// Picture display register: frame shown in picture mode
pub const PICTURE_DISPLAY: u8 = 0x01;

/// Auto play control register 1: loop count and frame count
pub const AUTO_PLAY_CONTROL_1: u8 = 0x02;

/// Auto play control register 2: frame delay time
pub const AUTO_PLAY_CONTROL_2: u8 = 0x03;

/// Display option register: intensity control and blink
pub const DISPLAY_OPTION: u8 = 0x05;

/// Audio synchronization register
pub const AUDIO_SYNC: u8 = 0x06;

/// Frame state register (read only)
///
/// Reading it clears the frame display interrupt flag.
pub const FRAME_STATE: u8 = 0x07;

/// Breath control register 1: fade out and fade in time
pub const BREATH_CONTROL_1: u8 = 0x08;

/// Breath control register 2: breath enable and extinguish time
pub const BREATH_CONTROL_2: u8 = 0x09;

/// Shutdown register
pub const SHUTDOWN: u8 = 0x0A;

/// AGC control register
pub const AGC_CONTROL: u8 = 0x0B;

/// Audio ADC rate register
pub const AUDIO_ADC_RATE: u8 = 0x0C;

/// A register page on the chip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    /// Animation frame page (0-7)
    Frame(u8),
    /// Control (function register) page
    Control,
}

impl Page {
    /// Page number as written to the command register
    pub const fn number(self) -> u8 {
        match self {
            Self::Frame(frame) => frame,
            Self::Control => CONTROL_PAGE,
        }
    }

    /// Whether the page exists on the chip
    pub const fn is_valid(self) -> bool {
        match self {
            Self::Frame(frame) => frame < FRAME_COUNT,
            Self::Control => true,
        }
    }
}

/// A bit field packed into one control register
///
/// Several settings share one physical byte, so writers must go through
/// [`Field::insert`] to keep the neighbouring fields intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Register address within the control page
    pub register: u8,
    /// Bits occupied by the field, in register position
    pub mask: u8,
    /// Position of the field's least significant bit
    pub shift: u8,
}

impl Field {
    /// Create a field descriptor
    pub const fn new(register: u8, mask: u8, shift: u8) -> Self {
        Self {
            register,
            mask,
            shift,
        }
    }

    /// Largest value the field can hold
    pub const fn max(self) -> u8 {
        self.mask >> self.shift
    }

    /// Whether the field spans the whole register
    pub const fn is_full_width(self) -> bool {
        self.mask == 0xFF
    }

    /// Replace the field in `byte` with `value`, leaving other bits untouched
    ///
    /// Bits of `value` that do not fit the field are dropped.
    pub const fn insert(self, byte: u8, value: u8) -> u8 {
        (byte & !self.mask) | ((value << self.shift) & self.mask)
    }

    /// Read the field out of `byte`
    pub const fn extract(self, byte: u8) -> u8 {
        (byte & self.mask) >> self.shift
    }
}

/// Control page field table
pub mod field {
    use super::*;

    /// Display mode (0b00 picture, 0b01 auto play, 0b1x audio play)
    pub const DISPLAY_MODE: Field = Field::new(CONFIGURATION, 0b0001_1000, 3);
    /// First frame played in auto play mode
    pub const AUTOPLAY_START_FRAME: Field = Field::new(CONFIGURATION, 0b0000_0111, 0);

    /// Frame shown in picture mode
    pub const PICTURE_FRAME: Field = Field::new(PICTURE_DISPLAY, 0b0000_0111, 0);

    /// Auto play loop count (0 = endless)
    pub const AUTOPLAY_LOOPS: Field = Field::new(AUTO_PLAY_CONTROL_1, 0b0111_0000, 4);
    /// Number of frames played in auto play (0 = all)
    pub const AUTOPLAY_FRAME_COUNT: Field = Field::new(AUTO_PLAY_CONTROL_1, 0b0000_0111, 0);

    /// Auto play frame delay in 11 ms steps (0 = 64 steps)
    pub const AUTOPLAY_FRAME_DELAY: Field = Field::new(AUTO_PLAY_CONTROL_2, 0b0011_1111, 0);

    /// Intensity control (1 = every frame uses frame 0's intensity)
    pub const INTENSITY_CONTROL: Field = Field::new(DISPLAY_OPTION, 0b0010_0000, 5);
    /// Blink enable
    pub const BLINK_ENABLE: Field = Field::new(DISPLAY_OPTION, 0b0000_1000, 3);
    /// Blink period in 0.27 s steps
    pub const BLINK_PERIOD: Field = Field::new(DISPLAY_OPTION, 0b0000_0111, 0);

    /// Audio synchronization enable
    pub const AUDIO_SYNC_ENABLE: Field = Field::new(AUDIO_SYNC, 0b0000_0001, 0);

    /// Frame display interrupt flag (read only, cleared by reading)
    pub const FRAME_INTERRUPT: Field = Field::new(FRAME_STATE, 0b0001_0000, 4);
    /// Frame currently shown in auto play (read only)
    pub const CURRENT_FRAME: Field = Field::new(FRAME_STATE, 0b0000_0111, 0);

    /// Breath fade out time
    pub const BREATH_FADE_OUT: Field = Field::new(BREATH_CONTROL_1, 0b0111_0000, 4);
    /// Breath fade in time
    pub const BREATH_FADE_IN: Field = Field::new(BREATH_CONTROL_1, 0b0000_0111, 0);

    /// Breath enable
    pub const BREATH_ENABLE: Field = Field::new(BREATH_CONTROL_2, 0b0001_0000, 4);
    /// Breath extinguish time
    pub const BREATH_EXTINGUISH: Field = Field::new(BREATH_CONTROL_2, 0b0000_0111, 0);

    /// Software shutdown (0 = shutdown, 1 = normal operation)
    pub const SOFTWARE_SHUTDOWN: Field = Field::new(SHUTDOWN, 0b0000_0001, 0);

    /// AGC mode (0 = slow, 1 = fast)
    pub const AGC_MODE: Field = Field::new(AGC_CONTROL, 0b0001_0000, 4);
    /// AGC enable
    pub const AGC_ENABLE: Field = Field::new(AGC_CONTROL, 0b0000_1000, 3);
    /// Audio gain in 3 dB steps
    pub const AGC_GAIN: Field = Field::new(AGC_CONTROL, 0b0000_0111, 0);

    /// Audio ADC sample rate
    pub const AUDIO_ADC_RATE: Field = Field::new(super::AUDIO_ADC_RATE, 0xFF, 0);
}
