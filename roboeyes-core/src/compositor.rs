//! Frame compositor
//!
//! Turns the current expression and eye positions into pixels: clear the
//! buffer, pick one sprite for both eyes, centre it vertically in the eye
//! slot and blit it with the background treated as transparent.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::expression::{BlinkAnimation, Mood};
use crate::framebuffer::FrameBuffer;
use crate::motion::{round_to_i32, EyePair, EyePosition};
use crate::sprite::{SpriteId, SpriteSet};

/// Pick the sprite both eyes show this tick
///
/// A running blink wins over the mood. SLEEPY flips between the closed and
/// half-open shapes on a fixed period derived from `now_ms` alone.
pub fn select_sprite(mood: Mood, blink: &BlinkAnimation, now_ms: u64, sleepy_toggle_ms: u32) -> SpriteId {
    if blink.is_active() {
        return SpriteSet::blink_frame(blink.frame());
    }
    match mood {
        Mood::Default | Mood::Surprised => SpriteId::Open,
        Mood::Happy => SpriteId::Happy,
        Mood::Sleepy => {
            let period = sleepy_toggle_ms.max(1) as u64;
            if (now_ms / period) % 2 == 0 {
                SpriteId::Closed
            } else {
                SpriteId::BlinkMid
            }
        }
    }
}

/// Top edge of a sprite centred in an eye slot starting at `slot_y`
pub fn draw_y(slot_y: f32, eye_height: u16, sprite_height: u16) -> f32 {
    slot_y + (eye_height as f32 - sprite_height as f32) / 2.0
}

/// Integer draw origin for one eye
pub fn draw_origin(pos: EyePosition, eye_height: u16, sprite_height: u16) -> (i32, i32) {
    (
        round_to_i32(pos.x),
        round_to_i32(draw_y(pos.y, eye_height, sprite_height)),
    )
}

/// Redraw the whole frame
pub fn compose(
    frame: &mut FrameBuffer,
    sprites: &SpriteSet,
    sprite: SpriteId,
    positions: &EyePair,
    eye_height: u16,
) {
    frame.fill(BinaryColor::Off);

    let shape = sprites.get(sprite);
    for pos in [positions.left, positions.right] {
        let (x, y) = draw_origin(pos, eye_height, shape.height());
        frame.blit(shape, x, y, Some(BinaryColor::Off));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EyeGeometry;
    use crate::sprite::{BLINK_SEQUENCE, CLOSED_HEIGHT};

    fn rest() -> EyePair {
        EyePair::new(EyePosition::new(23.0, 14.0), EyePosition::new(69.0, 14.0))
    }

    #[test]
    fn test_mood_sprites() {
        let idle = BlinkAnimation::new();
        assert_eq!(select_sprite(Mood::Default, &idle, 0, 667), SpriteId::Open);
        assert_eq!(select_sprite(Mood::Surprised, &idle, 0, 667), SpriteId::Open);
        assert_eq!(select_sprite(Mood::Happy, &idle, 0, 667), SpriteId::Happy);
    }

    #[test]
    fn test_sleepy_toggles_with_time() {
        let idle = BlinkAnimation::new();
        assert_eq!(select_sprite(Mood::Sleepy, &idle, 0, 667), SpriteId::Closed);
        assert_eq!(select_sprite(Mood::Sleepy, &idle, 666, 667), SpriteId::Closed);
        assert_eq!(select_sprite(Mood::Sleepy, &idle, 667, 667), SpriteId::BlinkMid);
        assert_eq!(select_sprite(Mood::Sleepy, &idle, 1_334, 667), SpriteId::Closed);
    }

    #[test]
    fn test_blink_overrides_mood() {
        let mut blink = BlinkAnimation::new();
        blink.start(0);
        for (k, expected) in BLINK_SEQUENCE.iter().enumerate().take(4) {
            assert_eq!(select_sprite(Mood::Default, &blink, 0, 667), *expected);
            blink.advance(75 * k as u64, 75);
        }
    }

    #[test]
    fn test_draw_y_centres_sprite() {
        assert_eq!(draw_y(14.0, 36, 36), 14.0);
        assert_eq!(draw_y(14.0, 36, 6), 29.0);
        assert_eq!(draw_origin(EyePosition::new(23.4, 14.0), 36, 19), (23, 23));
    }

    #[test]
    fn test_compose_open_eyes() {
        let sprites = SpriteSet::build(&EyeGeometry::default());
        let mut frame = FrameBuffer::new(128, 64);
        compose(&mut frame, &sprites, SpriteId::Open, &rest(), 36);

        let open = sprites.get(SpriteId::Open);
        assert_eq!(frame.lit_pixels(), 2 * open.lit_pixels());

        // Centres of both eyes lit, gap between them dark
        assert_eq!(frame.pixel(41, 32), Some(BinaryColor::On));
        assert_eq!(frame.pixel(87, 32), Some(BinaryColor::On));
        assert_eq!(frame.pixel(64, 32), Some(BinaryColor::Off));
        // Rounded corner stays dark
        assert_eq!(frame.pixel(23, 14), Some(BinaryColor::Off));
    }

    #[test]
    fn test_compose_clears_previous_frame() {
        let sprites = SpriteSet::build(&EyeGeometry::default());
        let mut frame = FrameBuffer::new(128, 64);
        frame.fill(BinaryColor::On);

        compose(&mut frame, &sprites, SpriteId::Closed, &rest(), 36);

        let closed = sprites.get(SpriteId::Closed);
        assert_eq!(closed.height(), CLOSED_HEIGHT as u16);
        assert_eq!(frame.lit_pixels(), 2 * closed.lit_pixels());
        assert_eq!(frame.pixel(0, 0), Some(BinaryColor::Off));
        // Closed sprite sits in the middle of the slot
        assert_eq!(frame.pixel(41, 14), Some(BinaryColor::Off));
        assert_eq!(frame.pixel(41, 31), Some(BinaryColor::On));
    }

    #[test]
    fn test_compose_clips_off_screen_eye() {
        let sprites = SpriteSet::build(&EyeGeometry::default());
        let mut frame = FrameBuffer::new(128, 64);
        let positions = EyePair::new(EyePosition::new(-200.0, 0.0), EyePosition::new(110.0, 40.0));

        compose(&mut frame, &sprites, SpriteId::Open, &positions, 36);

        let open = sprites.get(SpriteId::Open);
        assert!(frame.lit_pixels() > 0);
        assert!(frame.lit_pixels() < open.lit_pixels());
    }
}
