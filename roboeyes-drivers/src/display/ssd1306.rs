//! SSD1306 / SH1106 OLED display driver
//!
//! Driver for 128x64 and 128x32 monochrome OLED panels via async I2C.
//! Frames are written page by page (8 pixel rows per byte) with page
//! addressing, which both controllers support. SH1106 panels have a
//! 132-column RAM and show columns 2..130, so they need a column offset.

use embedded_hal_async::i2c::I2c;
use roboeyes_core::framebuffer::{FrameBuffer, Palette, MAX_WIDTH};
use roboeyes_core::traits::{DisplayError, EyeDisplay};

/// Default I2C address (0x3D with the address pin pulled high)
pub const DEFAULT_ADDR: u8 = 0x3C;

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Controller commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Panel controller family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    Ssd1306,
    Sh1106,
}

impl Controller {
    /// First visible RAM column
    pub fn column_offset(&self) -> u8 {
        match self {
            Controller::Ssd1306 => 0,
            Controller::Sh1106 => 2,
        }
    }
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OledConfig {
    pub address: u8,
    pub controller: Controller,
    pub width: u16,
    pub height: u16,
    /// Contrast (0-255)
    pub contrast: u8,
}

impl Default for OledConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDR,
            controller: Controller::Ssd1306,
            width: 128,
            height: 64,
            contrast: 0xCF,
        }
    }
}

/// OLED panel driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    config: OledConfig,
    initialized: bool,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Create a new driver; call [`init`](Self::init) before presenting
    pub fn new(i2c: I2C, config: OledConfig) -> Self {
        Self {
            i2c,
            config,
            initialized: false,
        }
    }

    pub fn config(&self) -> &OledConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Initialize the panel and switch it on
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        let mux = (self.config.height.clamp(16, 64) - 1) as u8;
        let com_pins = if self.config.height > 32 { 0x12 } else { 0x02 };

        let head: [u8; 9] = [
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            mux,
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
        ];
        let tail: [u8; 13] = [
            0x14,                  // Enable charge pump
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            com_pins,
            cmd::SET_CONTRAST,
            self.config.contrast,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in head.iter() {
            self.command(c).await?;
        }
        if self.config.controller == Controller::Ssd1306 {
            // Page addressing
            self.command(cmd::SET_MEMORY_MODE).await?;
            self.command(0x02).await?;
        }
        for &c in tail.iter() {
            self.command(c).await?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Send a command byte to the panel
    async fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.config.address, &[CONTROL_COMMAND, cmd])
            .await
            .map_err(|_| DisplayError::Communication)
    }

    /// Point the RAM cursor at the start of a page
    async fn select_page(&mut self, page: u8) -> Result<(), DisplayError> {
        let column = self.config.controller.column_offset();
        self.command(cmd::SET_PAGE_ADDR | page).await?;
        self.command(cmd::SET_LOW_COLUMN | (column & 0x0F)).await?;
        self.command(cmd::SET_HIGH_COLUMN | (column >> 4)).await
    }

    /// Set display contrast (0-255)
    pub async fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.command(cmd::SET_CONTRAST).await?;
        self.command(contrast).await?;
        self.config.contrast = contrast;
        Ok(())
    }
}

impl<I2C> EyeDisplay for Ssd1306<I2C>
where
    I2C: I2c,
{
    async fn present(&mut self, frame: &FrameBuffer, palette: Palette) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if !self.accepts(frame) {
            return Err(DisplayError::DimensionMismatch);
        }

        let width = frame.width() as usize;
        let mut data = [0u8; MAX_WIDTH + 1];
        data[0] = CONTROL_DATA;

        for page in 0..frame.page_count() {
            let Some(columns) = frame.page(page) else {
                break;
            };
            for (out, &column) in data[1..=width].iter_mut().zip(columns) {
                *out = palette.encode(column);
            }

            self.select_page(page as u8).await?;
            self.i2c
                .write(self.config.address, &data[..=width])
                .await
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }
}
