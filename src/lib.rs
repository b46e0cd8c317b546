//! Ring Lights - a torus of blocks lifted by sweeping lights and a timer pulse
//!
//! Core modules:
//! - `sim`: Deterministic simulation (light sweep, excitation, lattice, pulse)
//! - `host`: Seam to the engine that owns instances and the parent transform
//! - `renderer`: GPU-ready per-instance records
//! - `settings`: Designer-tunable configuration

pub mod host;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{CubeSettings, ReprojectMode, RingSettings, SettingsError};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Blocks placed around each minor circle of the torus
    pub const MINOR_SEGMENTS: usize = 6;

    /// Light height within this distance of its target counts as arrived
    pub const BOUNCE_ARRIVE_TOLERANCE: f32 = 1.0;

    /// Light sweep speed shared by the default markers (degrees/sec)
    pub const LIGHT_SPEED: f32 = 90.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // -1e-6 % 360 + 360 rounds to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unsigned distance along the shorter arc between two angles, in [0, 180]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let delta = normalize_degrees(a - b);
    delta.min(360.0 - delta)
}

/// Whether `angle` lies on the arc from `lo` to `hi` (inclusive).
///
/// When `lo > hi` the arc wraps through 0°, e.g. 315° → 45°.
#[inline]
pub fn in_arc(angle: f32, lo: f32, hi: f32) -> bool {
    if lo <= hi {
        angle >= lo && angle <= hi
    } else {
        angle >= lo || angle <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(999.0), 279.0);
        assert!(normalize_degrees(-1e-6) < 360.0);
    }

    #[test]
    fn test_angular_distance_takes_short_way() {
        assert_eq!(angular_distance(10.0, 350.0), 20.0);
        assert_eq!(angular_distance(350.0, 10.0), 20.0);
        assert_eq!(angular_distance(0.0, 180.0), 180.0);
        assert_eq!(angular_distance(45.0, 45.0), 0.0);
    }

    #[test]
    fn test_in_arc_wraparound() {
        assert!(in_arc(0.0, 315.0, 45.0));
        assert!(in_arc(330.0, 315.0, 45.0));
        assert!(!in_arc(180.0, 315.0, 45.0));
        assert!(in_arc(90.0, 45.0, 135.0));
        assert!(!in_arc(136.0, 45.0, 135.0));
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent_and_in_range(a in -1.0e5f32..1.0e5) {
            let n = normalize_degrees(a);
            prop_assert!((0.0..360.0).contains(&n));
            prop_assert_eq!(normalize_degrees(n), n);
        }

        #[test]
        fn distance_is_symmetric_and_bounded(a in -720.0f32..720.0, b in -720.0f32..720.0) {
            let d = angular_distance(a, b);
            prop_assert!((0.0..=180.0).contains(&d));
            prop_assert!((d - angular_distance(b, a)).abs() < 1e-3);
            prop_assert_eq!(angular_distance(a, a), 0.0);
        }
    }
}
