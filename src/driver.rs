//! Register transport shared by both units.
//!
//! [`RegisterTransport`] owns the bus handle and the device address and
//! provides the register read/write primitives the unit drivers build on.
//! It also records the Wire-style status code of every operation, the
//! liveness flag set by [`begin`](RegisterTransport::begin), and the
//! timestamp used to space out LED writes.

use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::i2c::{Error as _, I2c};

use crate::error::{transport_code, Error, STATUS_OK};
use crate::registers::{ADDRESS, LED_WRITE_INTERVAL_US, MAX_PAYLOAD, SETTLE_DELAY_MS, VERSION};

/// Timing configuration for a [`RegisterTransport`].
///
/// [`TransportConfig::default()`] gives the values the units are known to
/// work with (80 µs LED spacing, 10 ms settle delay).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Minimum spacing between two LED writes. Default: 80 µs.
    pub led_write_interval: Duration,
    /// Delay before the address probe in `begin()`. Default: 10 ms.
    pub settle_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            led_write_interval: Duration::from_micros(LED_WRITE_INTERVAL_US),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
        }
    }
}

/// Byte-oriented register access to one unit on an I2C bus.
///
/// The bus handle can be an owned peripheral, a `&mut` borrow of one, or a
/// shared-bus device wrapper; the transport never assumes exclusive
/// ownership of the physical bus.
pub struct RegisterTransport<I2C> {
    i2c: I2C,
    address: u8,
    config: TransportConfig,
    begin_status: Option<u8>,
    last_status: u8,
    last_led_write: Option<Instant>,
}

impl<I2C> RegisterTransport<I2C>
where
    I2C: I2c,
{
    /// Create a transport with the default timing. No I2C traffic.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_config(i2c, address, TransportConfig::default())
    }

    /// Create a transport with explicit timing. No I2C traffic.
    pub fn with_config(i2c: I2C, address: u8, config: TransportConfig) -> Self {
        Self {
            i2c,
            address,
            config,
            begin_status: None,
            last_status: STATUS_OK,
            last_led_write: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Wait for the unit to settle, then probe its address.
    ///
    /// The outcome is stored as the liveness flag queried by
    /// [`is_alive`](Self::is_alive).
    pub async fn begin(&mut self) -> Result<(), Error<I2C::Error>> {
        Timer::after(self.config.settle_delay).await;

        let result = self.i2c.write(self.address, &[]).await;
        let status = match &result {
            Ok(()) => STATUS_OK,
            Err(e) => transport_code(e.kind()),
        };
        self.begin_status = Some(status);
        self.last_status = status;

        #[cfg(feature = "defmt")]
        defmt::debug!("unit {=u8:#x}: probe status {}", self.address, status);

        result.map_err(Error::Write)
    }

    /// `true` if the last [`begin`](Self::begin) probe was acknowledged.
    pub fn is_alive(&self) -> bool {
        self.begin_status == Some(STATUS_OK)
    }

    /// Give the bus handle back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Core register primitives
    // -----------------------------------------------------------------------

    /// Select `register`, then read `buffer.len()` bytes from it.
    ///
    /// Bytes land in `buffer` in the order the unit sends them.
    pub async fn read_bytes(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        let result = match self.i2c.write(self.address, &[register]).await {
            Err(e) => Err(Error::Address(e)),
            Ok(()) => self.i2c.read(self.address, buffer).await.map_err(Error::NoData),
        };
        self.record(register, result)
    }

    /// Write `payload` to `register` in one framed transaction.
    ///
    /// This does not wait for the LED spacing; LED writes go through
    /// [`write_led`](Self::write_led).
    pub async fn write_bytes(
        &mut self,
        register: u8,
        payload: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        if payload.len() > MAX_PAYLOAD {
            return self.record(register, Err(Error::PayloadTooLong(payload.len())));
        }

        let mut buf = [0u8; MAX_PAYLOAD + 1];
        buf[0] = register;
        buf[1..=payload.len()].copy_from_slice(payload);

        let result = self
            .i2c
            .write(self.address, &buf[..=payload.len()])
            .await
            .map_err(Error::Write);
        self.record(register, result)
    }

    /// Store the status of a finished operation and pass the result through.
    fn record(
        &mut self,
        _register: u8,
        result: Result<(), Error<I2C::Error>>,
    ) -> Result<(), Error<I2C::Error>> {
        match &result {
            Ok(()) => self.last_status = STATUS_OK,
            Err(e) => {
                if let Some(status) = e.status_code() {
                    self.last_status = status;
                }
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "unit {=u8:#x}: register {=u8:#x} failed with status {}",
                    self.address,
                    _register,
                    self.last_status
                );
            }
        }
        result
    }

    /// Composite status code of the most recent register operation.
    ///
    /// `0` on success; see [`Error::status_code`] for the failure ranges.
    pub fn last_status(&self) -> u8 {
        self.last_status
    }

    // -----------------------------------------------------------------------
    // Typed helpers
    // -----------------------------------------------------------------------

    /// Read a single-byte register.
    pub async fn get_byte(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.read_bytes(register, &mut buf).await?;
        Ok(buf[0])
    }

    /// Read a 4-byte little-endian signed register.
    pub async fn get_long(&mut self, register: u8) -> Result<i32, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.read_bytes(register, &mut buf).await?;
        Ok(i32::from_le_bytes(buf))
    }

    /// Firmware version of the unit.
    pub async fn version(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.get_byte(VERSION).await
    }

    /// Address the unit reports for itself.
    pub async fn device_address(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.get_byte(ADDRESS).await
    }

    /// Address this transport currently targets. No I2C traffic.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Move the unit to `new_address`.
    ///
    /// The command is sent to the current address, after which the transport
    /// targets `new_address` even if the write failed. A failed write can
    /// therefore leave the transport and the unit disagreeing; there is no
    /// rollback.
    pub async fn set_address(&mut self, new_address: u8) -> Result<(), Error<I2C::Error>> {
        if new_address > 0x7F {
            return Err(Error::InvalidAddress(new_address));
        }

        let result = self.write_bytes(ADDRESS, &[new_address]).await;

        #[cfg(feature = "defmt")]
        defmt::debug!("unit {=u8:#x}: moving to {=u8:#x}", self.address, new_address);

        self.address = new_address;
        result
    }

    // -----------------------------------------------------------------------
    // LED timing
    // -----------------------------------------------------------------------

    /// Minimum spacing currently enforced between LED writes.
    pub fn led_write_interval(&self) -> Duration {
        self.config.led_write_interval
    }

    /// Change the minimum spacing between LED writes.
    pub fn set_led_write_interval(&mut self, interval: Duration) {
        self.config.led_write_interval = interval;
    }

    /// Wait until at least the LED write interval has passed since the
    /// previous LED write. Returns immediately if it already has.
    pub async fn throttle_led_write(&mut self) {
        let Some(last) = self.last_led_write else {
            return;
        };

        let elapsed = Instant::now().saturating_duration_since(last);
        if elapsed < self.config.led_write_interval {
            let remaining = self.config.led_write_interval - elapsed;

            #[cfg(feature = "defmt")]
            defmt::trace!("LED write throttled for {} us", remaining.as_micros());

            Timer::after(remaining).await;
        }
    }

    /// Write an LED colour block, spaced from the previous LED write.
    ///
    /// The LED timestamp is taken after the write, whether or not it
    /// succeeded.
    pub async fn write_led(
        &mut self,
        register: u8,
        payload: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.throttle_led_write().await;
        let result = self.write_bytes(register, payload).await;
        self.last_led_write = Some(Instant::now());
        result
    }
}
