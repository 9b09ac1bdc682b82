//! Driver for the M5Stack 8-Angle unit.
//!
//! [`AngleDevice`] reads eight potentiometers through a per-channel
//! [`HookFilter`], reads the toggle switch, and drives the nine RGB LEDs.

use embedded_hal_async::i2c::I2c;

use crate::color::LedColor;
use crate::driver::{RegisterTransport, TransportConfig};
use crate::error::{check_channel, Error};
use crate::hook::{HookFilter, HookState};
use crate::registers::{ANGLE_LED, ANGLE_POT, ANGLE_SWITCH, CHANNEL_COUNT, LED_COUNT, POT_MAX};

/// Turn a raw register value into a position that grows clockwise.
///
/// The unit reports roughly `POT_MAX` at the left stop and 0 at the right.
/// Anything above `POT_MAX` is clamped to 0.
pub fn invert_raw(raw: u16) -> u16 {
    if raw > POT_MAX {
        0
    } else {
        POT_MAX - raw
    }
}

/// Driver for the 8-Angle unit.
///
/// # Example
///
/// ```no_run
/// use m5_unit_driver::{AngleDevice, LedColor, ANGLE_DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut angle = AngleDevice::new(i2c, ANGLE_DEFAULT_ADDRESS);
/// angle.begin().await.ok();
///
/// let level = angle.read_potentiometer(0).await.unwrap();
/// angle.set_led_color(0, LedColor::rgb(0, (level >> 4) as u8, 0)).await.unwrap();
/// # }
/// ```
pub struct AngleDevice<I2C> {
    transport: RegisterTransport<I2C>,
    pots: [HookFilter; CHANNEL_COUNT],
}

impl<I2C> AngleDevice<I2C>
where
    I2C: I2c,
{
    /// Create a driver with default timing. No I2C traffic.
    ///
    /// # Arguments
    /// * `i2c`: I2C bus or shared-bus device (owned by the driver)
    /// * `address`: 7-bit unit address (0x43 unless reprogrammed)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, TransportConfig::default())
    }

    /// Create a driver with explicit LED spacing and settle delay.
    ///
    /// All eight hook filters start unhooked at 0.
    pub fn with_config(i2c: I2C, address: u8, config: TransportConfig) -> Self {
        Self {
            transport: RegisterTransport::with_config(i2c, address, config),
            pots: [HookFilter::default(); CHANNEL_COUNT],
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
    // Potentiometers
    // -----------------------------------------------------------------------

    /// Read one potentiometer and return the filtered value (0..=4092).
    ///
    /// The raw register is inverted so the value grows clockwise, then run
    /// through the channel's hook filter. On a bus error the stored value is
    /// left untouched; [`last_reading`](Self::last_reading) still yields the
    /// previous value.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`, with no I2C traffic
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    ///
    /// # Example
    /// ```no_run
    /// # use m5_unit_driver::{AngleDevice, Error};
    /// # async fn example<I: embedded_hal_async::i2c::I2c>(
    /// #     angle: &mut AngleDevice<I>,
    /// # ) -> Result<(), Error<I::Error>> {
    /// let level = angle.read_potentiometer(3).await?;
    /// # let _ = level;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read_potentiometer(&mut self, channel: u8) -> Result<u16, Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;

        let mut buf = [0u8; 2];
        self.transport
            .read_bytes(ANGLE_POT + 2 * channel, &mut buf)
            .await?;

        let reading = invert_raw(u16::from_le_bytes(buf));
        Ok(self.pots[index].update(reading))
    }

    /// Read all eight potentiometers in order.
    ///
    /// # Errors
    /// Returns the first [`Error::Address`] or [`Error::NoData`] encountered.
    /// Channels already read keep their filter update.
    pub async fn read_all_potentiometers(
        &mut self,
    ) -> Result<[u16; CHANNEL_COUNT], Error<I2C::Error>> {
        let mut values = [0u16; CHANNEL_COUNT];
        for (channel, value) in values.iter_mut().enumerate() {
            *value = self.read_potentiometer(channel as u8).await?;
        }
        Ok(values)
    }

    /// Value returned by the last accepted read. No I2C traffic.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`
    pub fn last_reading(&self, channel: u8) -> Result<u16, Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        Ok(self.pots[index].value())
    }

    /// Pin the reported value of `channel` at `value` until the knob is
    /// turned through it.
    ///
    /// Use this after recalling a preset so the knob does not jump the
    /// parameter on its first read.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    /// * `value`: value to report while hooking (0..=4092)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`
    ///
    /// # Example
    /// ```no_run
    /// # use m5_unit_driver::{AngleDevice, Error};
    /// # async fn example<I: embedded_hal_async::i2c::I2c>(
    /// #     angle: &mut AngleDevice<I>,
    /// # ) -> Result<(), Error<I::Error>> {
    /// angle.set_hook_target(0, 2048)?;
    /// // Stays at 2048 until the knob crosses it.
    /// let level = angle.read_potentiometer(0).await?;
    /// # let _ = level;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_hook_target(&mut self, channel: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.pots[index].pin(value);
        Ok(())
    }

    /// Whether `channel` is still holding a pinned value.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`
    pub fn is_hooking(&self, channel: u8) -> Result<bool, Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        Ok(self.pots[index].is_hooking())
    }

    /// Hook state of `channel`, including which side of the target the knob
    /// sits on.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`
    pub fn hook_state(&self, channel: u8) -> Result<HookState, Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        Ok(self.pots[index].state())
    }

    /// Release a hook without changing the stored value.
    ///
    /// # Arguments
    /// * `channel`: potentiometer index (0-7)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `channel >= 8`
    pub fn clear_hook(&mut self, channel: u8) -> Result<(), Error<I2C::Error>> {
        let index = check_channel::<I2C::Error>(channel, CHANNEL_COUNT)?;
        self.pots[index].clear();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Switch and LEDs
    // -----------------------------------------------------------------------

    /// Toggle switch state (0 or 1).
    ///
    /// # Errors
    /// * [`Error::Address`] if selecting the register fails
    /// * [`Error::NoData`] if the unit refuses the data read
    pub async fn read_switch(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.transport.get_byte(ANGLE_SWITCH).await
    }

    /// Set one of the nine LEDs (8 is the switch LED).
    ///
    /// Consecutive LED writes are spaced by the configured interval.
    ///
    /// # Arguments
    /// * `led`: LED index (0-8)
    /// * `color`: colour and brightness (0-100)
    ///
    /// # Errors
    /// * [`Error::InvalidChannel`] if `led >= 9`, with no I2C traffic
    /// * [`Error::Write`] if the unit rejects the write
    ///
    /// # Example
    /// ```no_run
    /// # use m5_unit_driver::{AngleDevice, Error, LedColor};
    /// # async fn example<I: embedded_hal_async::i2c::I2c>(
    /// #     angle: &mut AngleDevice<I>,
    /// # ) -> Result<(), Error<I::Error>> {
    /// angle.set_led_color(8, LedColor::new(255, 0, 0, 50)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_led_color(
        &mut self,
        led: u8,
        color: LedColor,
    ) -> Result<(), Error<I2C::Error>> {
        check_channel::<I2C::Error>(led, LED_COUNT)?;
        self.transport
            .write_led(ANGLE_LED + 4 * led, &color.angle_bytes())
            .await
    }
}
