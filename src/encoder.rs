//! Driver for the M5Stack 8-Encoder unit.
//!
//! [`EncoderDevice`] reads and writes the eight 32-bit counters, reads the
//! read-and-clear increment registers, resets counters through the flag
//! region, reads the push buttons and the toggle switch, and drives the nine
//! RGB LEDs. Nothing is cached; every call goes to the unit.

use embedded_hal_async::i2c::I2c;

use crate::color::LedColor;
use crate::driver::{RegisterTransport, TransportConfig};
use crate::error::{check_channel, Error};
use crate::registers::{
    CHANNEL_COUNT, ENCODER_BUTTON, ENCODER_COUNT, ENCODER_INCREMENT, ENCODER_LED, ENCODER_SWITCH,
    LED_COUNT,
};
use crate::reset::{reset_flags, reset_span};

/// Buttons read 0 while pressed.
pub fn decode_button(raw: u8) -> bool {
    raw == 0
}

/// Driver for the 8-Encoder unit.
///
/// # Example
///
/// ```no_run
/// use m5_unit_driver::{EncoderDevice, ENCODER_DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut encoder = EncoderDevice::new(i2c, ENCODER_DEFAULT_ADDRESS);
///
/// let delta = encoder.read_increment(0).await.unwrap();
/// if encoder.read_button(0).await.unwrap() {
///     encoder.reset_count(0).await.unwrap();
/// }
/// # }
/// ```
pub struct EncoderDevice<I2C> {
    transport: RegisterTransport<I2C>,
}

impl<I2C> EncoderDevice<I2C>
where
    I2C: I2c,
{
    /// Create a driver with default timing. No I2C traffic.
    ///
    /// # Arguments
    /// * `i2c`: I2C bus or shared-bus device (owned by the driver)
    /// * `address`: 7-bit unit address (0x41 unless reprogrammed)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, TransportConfig::default())
    }

    /// Create a driver with explicit LED spacing and settle delay.
    pub fn with_config(i2c: I2C, address: u8, config: TransportConfig) -> Self {
        Self {
            transport: RegisterTransport::with_config(i2c, address, config),
        }
    }

    /// Probe the unit; see [`RegisterTransport::begin`].
    ///
    /// # Errors
    /// * [`Error::Write`] if the unit does not acknowledge its address
    pub async fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        self.transport.begin().await
    }

    /// Whether the last [`begin`](Self::begin) probe succeeded.
    ///
    /// False before `begin` has run. Later register failures do not change
    /// it.
    pub fn is_alive(&self) -> bool {
        self.transport.is_alive()
    }

    /// Register-level access for version, address and status queries.
    pub fn transport(&mut self) -> &mut RegisterTransport<I2C> {
        &mut self.transport
    }

    /// Consume the driver and hand back the bus.
    pub fn release(self) -> I2C {
        self.transport.release()
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    /// Read the absolute count of one encoder.
    ///
    /// Counts are signed 32-bit and wrap on the unit.
    ///
    /// # Arguments
    /// * `channel`: encoder index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    ///
    /// # Example
    /// ```no_run
    /// # use m5_unit_driver::{EncoderDevice, Error};
    /// # async fn example<I: embedded_hal_async::i2c::I2c>(
    /// #     encoder: &mut EncoderDevice<I>,
    /// # ) -> Result<(), Error<I::Error>> {
    /// let position = encoder.read_count(2).await?;
    /// # let _ = position;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_count(&mut self, channel: u8) -> Result<i32, Error<I2C::Error>> {
        check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.transport.get_long(ENCODER_COUNT + 4 * channel).await
    }

    /// Overwrite the absolute count of one encoder.
    ///
    /// # Arguments
    /// * `channel`: encoder index (0-7)
    /// * `value`: new count
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Write`] if the unit rejects the write
    pub async fn set_count(&mut self, channel: u8, value: i32) -> Result<(), Error<I2C::Error>> {
        check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.transport
            .write_bytes(ENCODER_COUNT + 4 * channel, &value.to_le_bytes())
            .await
    }

    /// Read all eight counts, one transaction per channel.
    ///
    /// # Errors
    /// Returns the first [`Error::Address`] or [`Error::NoData`] encountered;
    /// no partial results are returned.
    pub async fn read_all_counts(&mut self) -> Result<[i32; CHANNEL_COUNT], Error<I2C::Error>> {
        let mut counts = [0i32; CHANNEL_COUNT];
        for (channel, count) in counts.iter_mut().enumerate() {
            *count = self.read_count(channel as u8).await?;
        }
        Ok(counts)
    }

    /// Zero the count of one encoder.
    ///
    /// # Arguments
    /// * `channel`: encoder index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Write`] if the unit rejects the write
    pub async fn reset_count(&mut self, channel: u8) -> Result<(), Error<I2C::Error>> {
        check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.reset_counts(1 << channel).await
    }

    /// Zero every count selected in `mask` (bit n = channel n) with a single
    /// write. An empty mask sends nothing.
    ///
    /// # Errors
    /// * [`Error::Write`] if the unit rejects the write
    ///
    /// # Example
    /// ```no_run
    /// # use m5_unit_driver::{EncoderDevice, Error};
    /// # async fn example<I: embedded_hal_async::i2c::I2c>(
    /// #     encoder: &mut EncoderDevice<I>,
    /// # ) -> Result<(), Error<I::Error>> {
    /// // Zero every encoder whose button is held.
    /// let held = encoder.read_buttons().await?;
    /// encoder.reset_counts(held).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn reset_counts(&mut self, mask: u8) -> Result<(), Error<I2C::Error>> {
        let Some(span) = reset_span(mask) else {
            return Ok(());
        };
        let flags = reset_flags(mask, span);
        self.transport
            .write_bytes(span.start_register, &flags)
            .await
    }

    // -----------------------------------------------------------------------
    // Increments
    // -----------------------------------------------------------------------

    /// Read the movement of one encoder since its increment was last read.
    ///
    /// The unit clears the register as it is read.
    ///
    /// # Arguments
    /// * `channel`: encoder index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    pub async fn read_increment(&mut self, channel: u8) -> Result<i32, Error<I2C::Error>> {
        check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.transport.get_long(ENCODER_INCREMENT + 4 * channel).await
    }

    /// Read and clear all eight increments in channel order.
    ///
    /// # Errors
    /// Returns the first [`Error::Address`] or [`Error::NoData`] encountered.
    /// Increments read before the failure are already cleared on the unit.
    pub async fn read_all_increments(
        &mut self,
    ) -> Result<[i32; CHANNEL_COUNT], Error<I2C::Error>> {
        let mut increments = [0i32; CHANNEL_COUNT];
        for (channel, increment) in increments.iter_mut().enumerate() {
            *increment = self.read_increment(channel as u8).await?;
        }
        Ok(increments)
    }

    // -----------------------------------------------------------------------
    // Buttons, switch and LEDs
    // -----------------------------------------------------------------------

    /// `true` while the push button of `channel` is held.
    ///
    /// # Arguments
    /// * `channel`: encoder index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    pub async fn read_button(&mut self, channel: u8) -> Result<bool, Error<I2C::Error>> {
        check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        let raw = self.transport.get_byte(ENCODER_BUTTON + channel).await?;
        Ok(decode_button(raw))
    }

    /// All eight buttons as a bitmap, bit n set while button n is held.
    ///
    /// Channels are read from 7 down to 0, each from its own register.
    ///
    /// # Errors
    /// Returns the first [`Error::Address`] or [`Error::NoData`] encountered.
    pub async fn read_buttons(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut bitmap = 0u8;
        for channel in (0..CHANNEL_COUNT as u8).rev() {
            let pressed = self.read_button(channel).await?;
            bitmap = (bitmap << 1) | pressed as u8;
        }
        Ok(bitmap)
    }

    /// Toggle switch state (0 or 1).
    ///
    /// # Errors
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    pub async fn read_switch(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.transport.get_byte(ENCODER_SWITCH).await
    }

    /// Set one of the nine LEDs (8 is the switch LED). Brightness is ignored.
    ///
    /// Consecutive LED writes are spaced by the configured interval.
    ///
    /// # Arguments
    /// * `led`: LED index (0-8)
    /// * `color`: colour; only the RGB components are sent
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `led >= 9`, with no I2C traffic
    /// * [`Error::Write`] if the unit rejects the write
    pub async fn set_led_color(
        &mut self,
        led: u8,
        color: LedColor,
    ) -> Result<(), Error<I2C::Error>> {
        check_channel::<I2C::Error>(led, LED_COUNT)?;
        self.transport
            .write_led(ENCODER_LED + 3 * led, &color.encoder_bytes())
            .await
    }
}
