//! Register map for the M5Stack 8-Angle and 8-Encoder units.
//!
//! Both units use a flat one-byte register address. Multi-byte registers are
//! little-endian and auto-increment, so a single framed read or write covers
//! the whole value.

// ---------------------------------------------------------------------------
// Common registers
// ---------------------------------------------------------------------------

/// Firmware version (1 byte, read-only).
pub const VERSION: u8 = 0xFE;

/// Device I2C address (1 byte, read/write). Writing moves the unit.
pub const ADDRESS: u8 = 0xFF;

/// Number of input channels on either unit.
pub const CHANNEL_COUNT: usize = 8;

/// Number of RGB LEDs on either unit (one per channel plus the switch LED).
pub const LED_COUNT: usize = 9;

// ---------------------------------------------------------------------------
// 8-Angle unit
// ---------------------------------------------------------------------------

/// Default I2C address for the 8-Angle unit.
pub const ANGLE_DEFAULT_ADDRESS: u8 = 0x43;

/// Base register for the 16-bit potentiometer values.
/// Per-channel address: `ANGLE_POT + 2 * channel`.
pub const ANGLE_POT: u8 = 0x00;

/// Toggle switch state (1 byte).
pub const ANGLE_SWITCH: u8 = 0x20;

/// Base register for LED colours, 4 bytes each (R, G, B, brightness).
/// Per-LED address: `ANGLE_LED + 4 * led`.
pub const ANGLE_LED: u8 = 0x30;

/// Largest raw potentiometer value the unit reports.
pub const POT_MAX: u16 = 0x0FFC;

// ---------------------------------------------------------------------------
// 8-Encoder unit
// ---------------------------------------------------------------------------

/// Default I2C address for the 8-Encoder unit.
pub const ENCODER_DEFAULT_ADDRESS: u8 = 0x41;

/// Base register for absolute counters (32-bit signed, read/write).
/// Per-channel address: `ENCODER_COUNT + 4 * channel`.
pub const ENCODER_COUNT: u8 = 0x00;

/// Base register for increments (32-bit signed). The unit clears the value
/// once it has been read.
pub const ENCODER_INCREMENT: u8 = 0x20;

/// Base register of the reset-flag region. Writing 1 to
/// `ENCODER_RESET + channel` zeroes that counter.
pub const ENCODER_RESET: u8 = 0x40;

/// Base register for button states (1 byte each, 0 = pressed).
pub const ENCODER_BUTTON: u8 = 0x50;

/// Toggle switch state (1 byte).
pub const ENCODER_SWITCH: u8 = 0x60;

/// Base register for LED colours, 3 bytes each (R, G, B).
/// Per-LED address: `ENCODER_LED + 3 * led`.
pub const ENCODER_LED: u8 = 0x70;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Minimum spacing in microseconds between LED writes. An LED update stalls
/// the unit's I2C handling for a short while after the command completes.
pub const LED_WRITE_INTERVAL_US: u64 = 80;

/// Settle time in milliseconds before the first probe in `begin()`.
pub const SETTLE_DELAY_MS: u64 = 10;

/// Largest payload a single register write carries.
pub const MAX_PAYLOAD: usize = 8;
