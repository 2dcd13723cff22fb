//! Display drivers

pub mod ssd1306;

pub use ssd1306::{Controller, OledConfig, Ssd1306};
