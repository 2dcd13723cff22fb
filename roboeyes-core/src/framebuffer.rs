//! 1-bit frame buffer
//!
//! Pixels are stored in the page layout used by SSD1306-class OLED
//! controllers: each byte holds a column of 8 vertical pixels, least
//! significant bit on top. A driver can stream each page as-is.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use embedded_graphics::Pixel;

use crate::sprite::Sprite;

/// Widest supported display
pub const MAX_WIDTH: usize = 128;

/// Tallest supported display
pub const MAX_HEIGHT: usize = 64;

/// Pixels per page byte
pub const PAGE_HEIGHT: usize = 8;

/// Number of pages at maximum height
pub const MAX_PAGES: usize = MAX_HEIGHT / PAGE_HEIGHT;

/// Mapping of the two logical pixel values to panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette {
    /// Panel state for background pixels
    pub background: BinaryColor,
    /// Panel state for foreground pixels
    pub foreground: BinaryColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BinaryColor::Off,
            foreground: BinaryColor::On,
        }
    }
}

impl Palette {
    /// Light background, dark eyes
    pub fn inverted() -> Self {
        Self {
            background: BinaryColor::On,
            foreground: BinaryColor::Off,
        }
    }

    /// Map a logical pixel to the panel
    pub fn map(&self, logical: BinaryColor) -> BinaryColor {
        match logical {
            BinaryColor::Off => self.background,
            BinaryColor::On => self.foreground,
        }
    }

    /// Map a page byte of logical pixels to panel bits
    pub fn encode(&self, column: u8) -> u8 {
        match (self.background, self.foreground) {
            (BinaryColor::Off, BinaryColor::On) => column,
            (BinaryColor::On, BinaryColor::Off) => !column,
            (BinaryColor::Off, BinaryColor::Off) => 0x00,
            (BinaryColor::On, BinaryColor::On) => 0xFF,
        }
    }
}

/// In-memory frame, overwritten in full every tick
///
/// `BinaryColor::Off` is the background value and `BinaryColor::On` the
/// foreground value; the [`Palette`] decides how they appear on the panel.
#[derive(Clone)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    pages: [[u8; MAX_WIDTH]; MAX_PAGES],
}

impl FrameBuffer {
    /// Create a blank buffer (dimensions are clamped to the capacity)
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.min(MAX_WIDTH as u16),
            height: height.min(MAX_HEIGHT as u16),
            pages: [[0; MAX_WIDTH]; MAX_PAGES],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of pages covering the visible height
    pub fn page_count(&self) -> usize {
        (self.height as usize).div_ceil(PAGE_HEIGHT)
    }

    /// Column bytes of one page, `width` long
    pub fn page(&self, index: usize) -> Option<&[u8]> {
        if index < self.page_count() {
            Some(&self.pages[index][..self.width as usize])
        } else {
            None
        }
    }

    /// Set every pixel to one value
    pub fn fill(&mut self, color: BinaryColor) {
        let byte = match color {
            BinaryColor::Off => 0x00,
            BinaryColor::On => 0xFF,
        };
        for page in self.pages.iter_mut() {
            page.fill(byte);
        }
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Set one pixel; returns false if it is outside the frame
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let bit = 1u8 << (y % PAGE_HEIGHT);
        let byte = &mut self.pages[y / PAGE_HEIGHT][x];
        match color {
            BinaryColor::On => *byte |= bit,
            BinaryColor::Off => *byte &= !bit,
        }
        true
    }

    /// Read one pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let set = self.pages[y / PAGE_HEIGHT][x] & (1u8 << (y % PAGE_HEIGHT)) != 0;
        Some(BinaryColor::from(set))
    }

    /// Composite a sprite with its top-left corner at `(x, y)`
    ///
    /// Sprite pixels equal to `transparent` are not written. The sprite is
    /// clipped against every edge. Returns false, drawing nothing, when the
    /// sprite does not intersect the frame at all.
    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32, transparent: Option<BinaryColor>) -> bool {
        let w = sprite.width() as i32;
        let h = sprite.height() as i32;
        if w == 0
            || h == 0
            || x + w <= 0
            || y + h <= 0
            || x >= self.width as i32
            || y >= self.height as i32
        {
            return false;
        }

        let y_start = (-y).max(0);
        let y_end = h.min(self.height as i32 - y);
        let x_start = (-x).max(0);
        let x_end = w.min(self.width as i32 - x);

        for sy in y_start..y_end {
            for sx in x_start..x_end {
                let color = BinaryColor::from(sprite.is_foreground(sx, sy));
                if Some(color) == transparent {
                    continue;
                }
                self.set_pixel(x + sx, y + sy, color);
            }
        }
        true
    }

    /// Number of foreground pixels in the visible area
    pub fn lit_pixels(&self) -> u32 {
        let mut count = 0;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.pixel(x, y) == Some(BinaryColor::On) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
