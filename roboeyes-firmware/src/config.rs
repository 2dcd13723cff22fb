//! Board and animation settings
//!
//! Edit and rebuild to customize.

use roboeyes_core::config::EyesConfig;
use roboeyes_drivers::display::{Controller, OledConfig};

/// Panel width in pixels
pub const SCREEN_WIDTH: u16 = 128;
/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 64;

/// Target tick rate
pub const TARGET_FPS: u32 = 8;

/// Panel I2C address
pub const OLED_ADDR: u8 = 0x3C;

/// I2C bus clock
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Interval between status lines
pub const STATUS_INTERVAL_MS: u64 = 1_000;

/// Mixed into the boot timestamp when seeding the random source
pub const RNG_SALT: u64 = 0x5EED_E7E5_0B0E_7E55;

/// Panel settings for the attached display
pub fn oled_config() -> OledConfig {
    OledConfig {
        address: OLED_ADDR,
        controller: Controller::Ssd1306,
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
        ..OledConfig::default()
    }
}

/// Animation settings
pub fn eyes_config() -> EyesConfig {
    EyesConfig::default()
}
