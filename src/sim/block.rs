//! Per-block excitation state
//!
//! Two independent raise channels:
//! - light: continuous, smoothed toward a randomly re-drawn target while lit
//! - timer: set and cleared instantly by the pulse

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lattice::BlockAnchor;
use crate::angular_distance;
use crate::consts::BOUNCE_ARRIVE_TOLERANCE;

/// Tuning shared by every block's light channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceParams {
    /// Degrees from a marker that still count as lit
    pub influence_range: f32,
    /// Upper bound of a new random target
    pub max_height: f32,
    /// Interpolation rate
    pub speed: f32,
}

/// Move `current` toward `target` at `speed`, scaled by the real `dt`.
///
/// Non-positive speed snaps straight to the target.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist * dist < 1e-8 {
        return target;
    }
    current + dist * (dt * speed).clamp(0.0, 1.0)
}

/// Raised/lit state of one block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Excitation {
    pub lit_by_light: bool,
    pub light_height: f32,
    pub light_height_target: f32,
    pub raised_by_timer: bool,
    pub timer_height: f32,
}

impl Excitation {
    /// Recompute the light channel for one tick
    pub fn update_light(
        &mut self,
        lit: bool,
        dt: f32,
        params: &BounceParams,
        rng: &mut impl Rng,
    ) {
        self.lit_by_light = lit;

        if lit {
            let arrived = (self.light_height - self.light_height_target).abs()
                <= BOUNCE_ARRIVE_TOLERANCE;
            if !self.raised_by_timer && arrived {
                self.light_height_target = rng.random_range(0.0..=params.max_height);
            }
        } else {
            self.light_height_target = 0.0;
        }

        self.light_height = interp_to(self.light_height, self.light_height_target, dt, params.speed);
    }

    pub fn raise_by_timer(&mut self, height: f32) {
        self.raised_by_timer = true;
        self.timer_height = height;
    }

    pub fn clear_timer_raise(&mut self) {
        self.raised_by_timer = false;
        self.timer_height = 0.0;
    }

    /// Total displacement along the block's normal
    pub fn offset(&self) -> f32 {
        let mut offset = 0.0;
        if self.lit_by_light {
            offset += self.light_height;
        }
        if self.raised_by_timer {
            offset += self.timer_height;
        }
        offset
    }
}

/// A lattice site plus its excitation.
///
/// `id` is the block's index in the ring and its instance index in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingBlock {
    pub id: u32,
    /// Angle around the major circle (degrees, fixed)
    pub major_angle: f32,
    pub anchor: BlockAnchor,
    pub excitation: Excitation,
}

impl RingBlock {
    /// Whether any marker angle is within range of this block
    pub fn near_light(&self, mut marker_angles: impl Iterator<Item = f32>, range: f32) -> bool {
        marker_angles.any(|angle| angular_distance(self.major_angle, angle) <= range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const PARAMS: BounceParams = BounceParams {
        influence_range: 10.0,
        max_height: 50.0,
        speed: 300.0,
    };

    #[test]
    fn test_interp_to() {
        assert_eq!(interp_to(0.0, 10.0, 0.1, 0.0), 10.0);
        assert!((interp_to(0.0, 10.0, 0.01, 5.0) - 0.5).abs() < 1e-6);
        // dt * speed saturates at one step
        assert_eq!(interp_to(0.0, 10.0, 1.0, 300.0), 10.0);
        assert_eq!(interp_to(3.0, 3.0, 0.016, 300.0), 3.0);
    }

    #[test]
    fn test_idle_block_never_moves() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ex = Excitation::default();
        for _ in 0..10_000 {
            ex.update_light(false, 1.0 / 60.0, &PARAMS, &mut rng);
            assert_eq!(ex.light_height, 0.0);
            assert_eq!(ex.offset(), 0.0);
        }
    }

    #[test]
    fn test_lit_height_stays_bounded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ex = Excitation::default();
        let slow = BounceParams { speed: 4.0, ..PARAMS };
        let mut moved = false;
        for _ in 0..5_000 {
            ex.update_light(true, 1.0 / 60.0, &slow, &mut rng);
            assert!(ex.light_height >= 0.0 && ex.light_height <= slow.max_height + 1e-3);
            moved |= ex.light_height > 1.0;
        }
        assert!(moved, "lit block never bounced");
    }

    #[test]
    fn test_unlit_block_settles() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ex = Excitation {
            lit_by_light: true,
            light_height: 40.0,
            light_height_target: 40.0,
            ..Default::default()
        };
        let slow = BounceParams { speed: 10.0, ..PARAMS };
        for _ in 0..600 {
            ex.update_light(false, 1.0 / 60.0, &slow, &mut rng);
        }
        assert_eq!(ex.light_height_target, 0.0);
        assert_eq!(ex.light_height, 0.0);
    }

    #[test]
    fn test_timer_raise_freezes_new_targets() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ex = Excitation::default();
        ex.raise_by_timer(25.0);
        ex.update_light(true, 1.0 / 60.0, &PARAMS, &mut rng);
        assert_eq!(ex.light_height_target, 0.0);
        assert_eq!(ex.offset(), 25.0);

        ex.clear_timer_raise();
        assert!(!ex.raised_by_timer);
        assert_eq!(ex.timer_height, 0.0);
    }

    #[test]
    fn test_offset_adds_both_channels() {
        let ex = Excitation {
            lit_by_light: true,
            light_height: 10.0,
            light_height_target: 10.0,
            raised_by_timer: true,
            timer_height: 5.0,
        };
        assert_eq!(ex.offset(), 15.0);
    }
}
