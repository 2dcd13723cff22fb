//! RoboEyes - animated robot eyes firmware
//!
//! Main firmware binary for RP2040 boards driving a 128x64 SSD1306-class
//! OLED over I2C. Boots the peripherals, initializes the panel, builds the
//! eye animation and hands both to the eyes task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Instant;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use {defmt_rtt as _, panic_probe as _};

use roboeyes_core::RoboEyes;
use roboeyes_drivers::display::Ssd1306;

use crate::clock::EmbassyClock;
use crate::config::{
    eyes_config, oled_config, I2C_FREQUENCY_HZ, RNG_SALT, SCREEN_HEIGHT, SCREEN_WIDTH, TARGET_FPS,
};

mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RoboEyes firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // I2C0: SDA on GP4, SCL on GP5
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);

    let mut display = Ssd1306::new(bus, oled_config());
    if let Err(e) = display.init().await {
        defmt::panic!("Display init failed: {}", e);
    }
    info!("Display initialized ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);

    // Seed from the boot timestamp
    let seed = Instant::now().as_ticks() ^ RNG_SALT;
    let rng = SmallRng::seed_from_u64(seed);

    let eyes = match RoboEyes::begin(
        eyes_config(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        TARGET_FPS,
        rng,
        EmbassyClock,
    ) {
        Ok(eyes) => eyes,
        Err(e) => defmt::panic!("Invalid eyes configuration: {}", e),
    };
    info!("Eyes ready, {} fps", TARGET_FPS);

    unwrap!(spawner.spawn(tasks::eyes_task(display, eyes)));

    info!("All tasks spawned, firmware running");
}
