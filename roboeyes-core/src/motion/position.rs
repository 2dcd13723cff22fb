//! Eye position types and smoothing

/// Top-left corner of an eye's nominal slot, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyePosition {
    pub x: f32,
    pub y: f32,
}

impl EyePosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Move a fraction of the way toward `target`
    ///
    /// First-order exponential approach: never passes the target.
    pub fn approach(&mut self, target: EyePosition, factor: f32) {
        self.x = approach_axis(self.x, target.x, factor);
        self.y = approach_axis(self.y, target.y, factor);
    }

    /// Nearest integer pixel
    pub fn rounded(&self) -> (i32, i32) {
        (round_to_i32(self.x), round_to_i32(self.y))
    }
}

fn approach_axis(current: f32, target: f32, factor: f32) -> f32 {
    let next = current + (target - current) * factor;
    // Rounding in the subtraction can land one ulp past the target
    if (target - current) * (target - next) < 0.0 {
        target
    } else {
        next
    }
}

/// Round half away from zero
pub fn round_to_i32(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Positions of both eyes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyePair {
    pub left: EyePosition,
    pub right: EyePosition,
}

impl EyePair {
    pub const fn new(left: EyePosition, right: EyePosition) -> Self {
        Self { left, right }
    }

    /// Smooth both eyes toward `target`
    pub fn approach(&mut self, target: &EyePair, factor: f32) {
        self.left.approach(target.left, factor);
        self.right.approach(target.right, factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_to_i32() {
        assert_eq!(round_to_i32(0.0), 0);
        assert_eq!(round_to_i32(2.49), 2);
        assert_eq!(round_to_i32(2.5), 3);
        assert_eq!(round_to_i32(-2.5), -3);
        assert_eq!(round_to_i32(-0.4), 0);
        assert_eq!(round_to_i32(13.999), 14);
    }

    #[test]
    fn test_approach_quarter() {
        let mut pos = EyePosition::new(0.0, 100.0);
        pos.approach(EyePosition::new(40.0, 20.0), 0.25);
        assert_eq!(pos, EyePosition::new(10.0, 80.0));
    }

    #[test]
    fn test_factor_one_snaps() {
        let mut pos = EyePosition::new(3.0, 4.0);
        pos.approach(EyePosition::new(-7.0, 9.5), 1.0);
        assert_eq!(pos, EyePosition::new(-7.0, 9.5));
    }

    #[test]
    fn test_pair_moves_together() {
        let mut pair = EyePair::new(EyePosition::new(0.0, 0.0), EyePosition::new(50.0, 0.0));
        let target = EyePair::new(EyePosition::new(8.0, 4.0), EyePosition::new(58.0, 4.0));
        pair.approach(&target, 0.5);

        assert_eq!(pair.left, EyePosition::new(4.0, 2.0));
        assert_eq!(pair.right, EyePosition::new(54.0, 2.0));
    }

    proptest! {
        #[test]
        fn prop_approach_is_monotonic(
            start in -200.0f32..200.0,
            target in -200.0f32..200.0,
            factor in 0.01f32..=1.0,
        ) {
            let mut pos = EyePosition::new(start, start);
            let goal = EyePosition::new(target, target);
            let mut prev_gap = (target - start).abs();

            for _ in 0..200 {
                let before = pos.x;
                pos.approach(goal, factor);
                let gap = (target - pos.x).abs();

                // Never farther, never past the target
                prop_assert!(gap <= prev_gap);
                prop_assert!((target - before) * (target - pos.x) >= 0.0);
                prev_gap = gap;
            }
        }
    }
}
