//! Async driver for the M5Stack 8-Angle and 8-Encoder I2C units.
//!
//! Both units expose a flat one-byte register map behind a 7-bit I2C
//! address. This crate provides an Embassy-compatible driver for each,
//! built on a shared register transport.
//!
//! # Architecture
//!
//! - **[`RegisterTransport`]**: register read/write primitives, Wire-style
//!   status codes, the `begin()` liveness probe and LED write spacing.
//! - **[`AngleDevice`]**: eight potentiometers with inversion and a
//!   per-channel [`HookFilter`], the toggle switch, and nine RGB LEDs.
//! - **[`EncoderDevice`]**: eight counters and read-and-clear increments,
//!   counter reset by bitmask, push buttons, the toggle switch, and nine RGB
//!   LEDs.
//!
//! Any `embedded-hal-async` I2C implementation can back a device. To put both
//! units on one bus, give each an `I2cDevice` from
//! `embassy-embedded-hal::shared_bus`, which serialises transactions behind a
//! mutex.
//!
//! # Quick start
//!
//! ```no_run
//! use m5_unit_driver::{AngleDevice, EncoderDevice, LedColor};
//! use m5_unit_driver::{ANGLE_DEFAULT_ADDRESS, ENCODER_DEFAULT_ADDRESS};
//!
//! # async fn example<I: embedded_hal_async::i2c::I2c>(bus_a: I, bus_b: I) {
//! let mut angle = AngleDevice::new(bus_a, ANGLE_DEFAULT_ADDRESS);
//! let mut encoder = EncoderDevice::new(bus_b, ENCODER_DEFAULT_ADDRESS);
//! angle.begin().await.ok();
//! encoder.begin().await.ok();
//!
//! let level = angle.read_potentiometer(0).await.unwrap();
//! let delta = encoder.read_increment(0).await.unwrap();
//! encoder.set_led_color(0, LedColor::rgb(0, 0, 255)).await.unwrap();
//! # }
//! ```
//!
//! # Features
//!
//! - **`defmt`**: log bus failures and throttling via [`defmt`], and enable
//!   [`defmt::Format`] on the public types.

#![cfg_attr(not(test), no_std)]

pub use angle::{invert_raw, AngleDevice};
pub use color::{LedColor, FULL_BRIGHTNESS};
pub use driver::{RegisterTransport, TransportConfig};
pub use encoder::{decode_button, EncoderDevice};
pub use error::{Error, BYTE_SENTINEL, LONG_SENTINEL, STATUS_NO_DATA, STATUS_OK};
pub use hook::{HookFilter, HookState};
pub use registers::{ANGLE_DEFAULT_ADDRESS, CHANNEL_COUNT, ENCODER_DEFAULT_ADDRESS, LED_COUNT, POT_MAX};
pub use reset::{reset_flags, reset_span, ResetSpan};

mod angle;
mod color;
mod driver;
mod encoder;
mod error;
mod hook;
pub mod registers;
mod reset;

#[cfg(test)]
mod sim;
