//! Mixer panel demo
//!
//! Drives an 8-Angle and an 8-Encoder unit on one I2C bus from a Raspberry
//! Pi Pico 2. Each potentiometer sets the brightness of its own LED, encoder
//! increments are logged, and pressing an encoder zeroes its counter.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                                |
//! |-----------|------------|--------------------------------------|
//! | I2C0 SDA  | GP20       | Both units daisy-chained on Grove    |
//! | I2C0 SCL  | GP21       |                                      |

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use m5_unit_driver::{
    AngleDevice, EncoderDevice, LedColor, ANGLE_DEFAULT_ADDRESS, CHANNEL_COUNT,
    ENCODER_DEFAULT_ADDRESS, POT_MAX,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// I2C0, shared by both units through `I2cDevice` wrappers.
static I2C_BUS: StaticCell<Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>> =
    StaticCell::new();

type UnitI2c = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>;

/// Scale a potentiometer value onto the 0..=100 LED brightness range.
fn brightness(level: u16) -> u8 {
    (level as u32 * 100 / POT_MAX as u32) as u8
}

#[embassy_executor::task]
async fn angle_task(mut angle: AngleDevice<UnitI2c>) {
    let mut ticker = Ticker::every(Duration::from_millis(20));
    let mut shown = [u8::MAX; CHANNEL_COUNT];

    loop {
        ticker.next().await;

        let levels = match angle.read_all_potentiometers().await {
            Ok(levels) => levels,
            Err(e) => {
                warn!("Potentiometer read failed: {}", Debug2Format(&e));
                continue;
            }
        };

        for (channel, &level) in levels.iter().enumerate() {
            let target = brightness(level);
            if target == shown[channel] {
                continue;
            }
            let color = LedColor::new(0, 64, 255, target);
            match angle.set_led_color(channel as u8, color).await {
                Ok(()) => shown[channel] = target,
                Err(e) => warn!("LED {} write failed: {}", channel, Debug2Format(&e)),
            }
        }
    }
}

#[embassy_executor::task]
async fn encoder_task(mut encoder: EncoderDevice<UnitI2c>) {
    let mut ticker = Ticker::every(Duration::from_millis(10));

    loop {
        ticker.next().await;

        match encoder.read_all_increments().await {
            Ok(increments) => {
                for (channel, &delta) in increments.iter().enumerate() {
                    if delta != 0 {
                        debug!("Encoder {}: {}", channel, delta);
                    }
                }
            }
            Err(e) => warn!("Increment read failed: {}", Debug2Format(&e)),
        }

        let pressed = match encoder.read_buttons().await {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!("Button read failed: {}", Debug2Format(&e));
                continue;
            }
        };
        if pressed != 0 {
            info!("Resetting counters {=u8:08b}", pressed);
            if let Err(e) = encoder.reset_counts(pressed).await {
                error!("Counter reset failed: {}", Debug2Format(&e));
            }
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("mixer-panel starting");

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let mut angle = AngleDevice::new(I2cDevice::new(i2c_bus), ANGLE_DEFAULT_ADDRESS);
    let mut encoder = EncoderDevice::new(I2cDevice::new(i2c_bus), ENCODER_DEFAULT_ADDRESS);

    // A missing unit is reported but does not stop the other one.
    if angle.begin().await.is_err() || !angle.is_alive() {
        error!("8-Angle unit not found at {=u8:#x}", ANGLE_DEFAULT_ADDRESS);
    } else if let Ok(version) = angle.transport().version().await {
        info!("8-Angle firmware v{}", version);
    }

    if encoder.begin().await.is_err() || !encoder.is_alive() {
        error!("8-Encoder unit not found at {=u8:#x}", ENCODER_DEFAULT_ADDRESS);
    } else if let Ok(version) = encoder.transport().version().await {
        info!("8-Encoder firmware v{}", version);
    }

    spawner.spawn(unwrap!(angle_task(angle)));
    spawner.spawn(unwrap!(encoder_task(encoder)));

    info!("All tasks spawned");
}
