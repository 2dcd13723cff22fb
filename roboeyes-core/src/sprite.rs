//! Sprite builder
//!
//! Pre-renders the eye shapes once at startup. Every shape is a solid
//! rounded rectangle of foreground on a background field, stored one bit
//! per pixel with one `u64` per row.

use crate::config::EyeGeometry;

/// Widest sprite that can be built
pub const MAX_SPRITE_WIDTH: usize = 64;

/// Tallest sprite that can be built
pub const MAX_SPRITE_HEIGHT: usize = 64;

/// Height of the closed-eye line
pub const CLOSED_HEIGHT: i32 = 6;

/// Immutable 1-bit bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u16,
    height: u16,
    rows: [u64; MAX_SPRITE_HEIGHT],
}

/// Mask with the low `n` bits set
const fn low_bits(n: i32) -> u64 {
    if n <= 0 {
        0
    } else if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

impl Sprite {
    /// Zero-area sprite
    pub const fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            rows: [0; MAX_SPRITE_HEIGHT],
        }
    }

    /// Build a filled rounded rectangle covering the whole sprite
    ///
    /// Non-positive sizes give a zero-area sprite and sizes above the
    /// sprite capacity are clamped to it. The radius is clamped to half
    /// the width and half the height; a radius of zero gives a plain
    /// filled rectangle.
    pub fn rounded_rect(width: i32, height: i32, radius: i32) -> Self {
        let w = width.clamp(0, MAX_SPRITE_WIDTH as i32);
        let h = height.clamp(0, MAX_SPRITE_HEIGHT as i32);

        let mut sprite = Self {
            width: w as u16,
            height: h as u16,
            ..Self::empty()
        };
        if w == 0 || h == 0 {
            return sprite;
        }

        let r = radius.max(0).min(w / 2).min(h / 2);
        if r == 0 {
            for row in sprite.rows.iter_mut().take(h as usize) {
                *row = low_bits(w);
            }
            return sprite;
        }

        // Straight bands: full rows between the corners, and the columns
        // between the corners on the top and bottom rows.
        let centre_span = low_bits(w - r) & !low_bits(r);
        for y in 0..h {
            sprite.rows[y as usize] = if y >= r && y < h - r {
                low_bits(w)
            } else {
                centre_span
            };
        }

        let corners = [(r, r), (w - r - 1, r), (r, h - r - 1), (w - r - 1, h - r - 1)];
        let r2 = r * r;
        for (cx, cy) in corners {
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy <= r2 {
                        sprite.set(cx + dx, cy + dy);
                    }
                }
            }
        }

        sprite
    }

    fn set(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32 {
            self.rows[y as usize] |= 1u64 << x;
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check if a pixel is foreground (out-of-range pixels are background)
    pub fn is_foreground(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.rows[y as usize] & (1u64 << x) != 0
    }

    /// Number of foreground pixels
    pub fn lit_pixels(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }
}

/// Identifies one of the pre-rendered shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpriteId {
    /// Fully open eye (also used for SURPRISED)
    Open,
    /// Squashed happy eye
    Happy,
    /// Thin closed line (sleepy and the middle of a blink)
    Closed,
    /// Half-closed transition frame
    BlinkMid,
}

/// Sprites shown during a blink, in order
pub const BLINK_SEQUENCE: [SpriteId; 5] = [
    SpriteId::Open,
    SpriteId::BlinkMid,
    SpriteId::Closed,
    SpriteId::BlinkMid,
    SpriteId::Open,
];

/// Number of frames in a blink
pub const BLINK_FRAME_COUNT: usize = BLINK_SEQUENCE.len();

/// All eye shapes, built once from the eye geometry
#[derive(Debug, Clone)]
pub struct SpriteSet {
    open: Sprite,
    happy: Sprite,
    closed: Sprite,
    blink_mid: Sprite,
}

impl SpriteSet {
    /// Render every shape for the given geometry
    pub fn build(geometry: &EyeGeometry) -> Self {
        let w = geometry.width as i32;
        let h = geometry.height as i32;
        let r = geometry.corner_radius as i32;

        let happy_h = (h * 55 / 100).max(1);
        let mid_h = (h * 35 / 100).max(1);
        let closed_r = if CLOSED_HEIGHT > 3 { 2 } else { 1 };

        Self {
            open: Sprite::rounded_rect(w, h, r),
            happy: Sprite::rounded_rect(w, happy_h, (r / 2).max(1)),
            closed: Sprite::rounded_rect(w, CLOSED_HEIGHT, closed_r),
            blink_mid: Sprite::rounded_rect(w, mid_h, (r / 3).max(1)),
        }
    }

    /// Look up a shape
    pub fn get(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Open => &self.open,
            SpriteId::Happy => &self.happy,
            SpriteId::Closed => &self.closed,
            SpriteId::BlinkMid => &self.blink_mid,
        }
    }

    /// Shape for a blink frame index (clamped to the last frame)
    pub fn blink_frame(index: usize) -> SpriteId {
        BLINK_SEQUENCE[index.min(BLINK_FRAME_COUNT - 1)]
    }
}
