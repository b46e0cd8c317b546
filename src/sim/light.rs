//! Sweeping light markers
//!
//! Each marker ping-pongs inside its own arc of the major circle. Blocks
//! near any marker's angle are lit.

use serde::{Deserialize, Serialize};

use super::arc::AngularArc;
use crate::normalize_degrees;

/// Upper bound on sub-steps for a single `advance` call
const MAX_SWEEP_SUBSTEPS: u32 = 1024;

/// An oscillating angular zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightMarker {
    /// Current angle (degrees, normalized to [0, 360))
    pub angle: f32,
    /// Direction of travel, +1.0 or -1.0
    pub direction: f32,
    /// Arc the marker is confined to
    pub arc: AngularArc,
    /// Sweep speed (degrees/sec)
    pub speed: f32,
}

impl LightMarker {
    pub fn new(angle: f32, direction: f32, arc: AngularArc, speed: f32) -> Self {
        Self {
            angle: normalize_degrees(angle),
            direction: if direction < 0.0 { -1.0 } else { 1.0 },
            arc,
            speed,
        }
    }

    /// Move by `dt` seconds, reversing at the arc bounds.
    ///
    /// Travel is split so no single step exceeds a quarter of the arc or of
    /// the gap outside it, which keeps a long frame from jumping clean over a
    /// bound or across the gap.
    pub fn advance(&mut self, dt: f32) {
        let travel = (self.speed * dt).abs();
        let max_step = if self.arc.is_full() {
            90.0
        } else {
            (self.arc.span().min(self.arc.gap()) / 4.0).max(0.25)
        };
        let substeps = if travel.is_finite() && travel > max_step {
            ((travel / max_step).ceil() as u32).min(MAX_SWEEP_SUBSTEPS)
        } else {
            1
        };
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.step(sub_dt);
        }
    }

    fn step(&mut self, dt: f32) {
        self.angle = normalize_degrees(self.angle + self.direction * self.speed * dt);

        // Membership rather than a plain `> max` / `< min` compare: an arc
        // touching 0° is left by wrapping to the far side of the circle
        if !self.arc.contains(self.angle) {
            let crossed = self.arc.bound_ahead(self.direction);
            self.direction = -self.direction;
            self.angle = normalize_degrees(crossed);
        }
    }
}

/// The set of markers owned by one ring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightSweeper {
    markers: Vec<LightMarker>,
}

impl LightSweeper {
    /// Four markers, one per quadrant, each sweeping a 90° arc
    pub fn four_quadrants(speed: f32) -> Self {
        Self::with_markers(vec![
            LightMarker::new(90.0, 1.0, AngularArc::new(45.0, 135.0), speed),
            LightMarker::new(180.0, -1.0, AngularArc::new(135.0, 225.0), speed),
            LightMarker::new(270.0, 1.0, AngularArc::new(225.0, 315.0), speed),
            LightMarker::new(0.0, -1.0, AngularArc::new(315.0, 45.0), speed),
        ])
    }

    pub fn with_markers(markers: Vec<LightMarker>) -> Self {
        Self { markers }
    }

    /// Advance every marker by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        for marker in &mut self.markers {
            marker.advance(dt);
        }
    }

    /// Change every marker's sweep speed
    pub fn set_speed(&mut self, speed: f32) {
        for marker in &mut self.markers {
            marker.speed = speed;
        }
    }

    /// Current marker angles
    pub fn angles(&self) -> impl Iterator<Item = f32> + '_ {
        self.markers.iter().map(|m| m.angle)
    }

    pub fn markers(&self) -> &[LightMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverses_and_snaps_at_max() {
        let mut marker = LightMarker::new(90.0, 1.0, AngularArc::new(45.0, 135.0), 90.0);
        // 0.4s → 126°
        marker.advance(0.4);
        assert!((marker.angle - 126.0).abs() < 1e-3);
        assert_eq!(marker.direction, 1.0);

        // Another 0.2s would reach 144°, past the bound
        marker.advance(0.2);
        assert_eq!(marker.angle, 135.0);
        assert_eq!(marker.direction, -1.0);

        marker.advance(0.5);
        assert!((marker.angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_stays_in_arc_over_long_run() {
        let mut marker = LightMarker::new(90.0, 1.0, AngularArc::new(45.0, 135.0), 90.0);
        let dts = [1.0 / 60.0, 0.033, 0.25, 1.7, 0.001, 3.0];
        for i in 0..5000 {
            marker.advance(dts[i % dts.len()]);
            assert!(
                marker.angle >= 45.0 && marker.angle <= 135.0,
                "angle {} escaped arc",
                marker.angle
            );
        }
    }

    #[test]
    fn test_wrapping_arc_stays_in_arc() {
        let arc = AngularArc::new(315.0, 45.0);
        let mut marker = LightMarker::new(0.0, -1.0, arc, 90.0);
        for _ in 0..2000 {
            marker.advance(1.0 / 30.0);
            assert!(arc.contains(marker.angle), "angle {} escaped", marker.angle);
        }
    }

    #[test]
    fn test_wrapping_arc_snaps_to_min_moving_negative() {
        let mut marker = LightMarker::new(0.0, -1.0, AngularArc::new(315.0, 45.0), 90.0);
        // 0.6s → -54° = 306°, inside the gap
        marker.advance(0.6);
        assert_eq!(marker.angle, 315.0);
        assert_eq!(marker.direction, 1.0);
    }

    #[test]
    fn test_arcs_touching_zero_hold_the_marker() {
        let cases = [
            (AngularArc::new(0.0, 90.0), 10.0, -1.0),
            (AngularArc::new(0.0, 90.0), 80.0, 1.0),
            (AngularArc::new(270.0, 359.0), 350.0, 1.0),
            (AngularArc::new(270.0, 359.0), 280.0, -1.0),
        ];
        for (arc, start, direction) in cases {
            let mut marker = LightMarker::new(start, direction, arc, 90.0);
            let mut reversals = 0;
            for step in 0..2000 {
                let before = marker.direction;
                marker.advance(1.0 / 30.0);
                if marker.direction != before {
                    reversals += 1;
                }
                assert!(
                    marker.angle >= arc.min && marker.angle <= arc.max,
                    "step {step}: angle {} escaped [{}, {}]",
                    marker.angle,
                    arc.min,
                    arc.max
                );
            }
            assert!(reversals > 10, "marker never bounced in [{}, {}]", arc.min, arc.max);
        }
    }

    #[test]
    fn test_snaps_to_zero_bound_moving_negative() {
        let mut marker = LightMarker::new(10.0, -1.0, AngularArc::new(0.0, 90.0), 90.0);
        // 0.2s → -8°, which normalizes to 352°
        marker.advance(0.2);
        assert_eq!(marker.angle, 0.0);
        assert_eq!(marker.direction, 1.0);
    }

    #[test]
    fn test_full_circle_marker_keeps_sweeping() {
        let mut marker = LightMarker::new(0.0, 1.0, AngularArc::new(0.0, 360.0), 90.0);
        marker.advance(1.0);
        assert!((marker.angle - 90.0).abs() < 1e-3);
        marker.advance(3.5);
        assert!((marker.angle - 45.0).abs() < 1e-2);
        assert_eq!(marker.direction, 1.0);
    }

    #[test]
    fn test_four_quadrants_layout() {
        let sweeper = LightSweeper::four_quadrants(90.0);
        let angles: Vec<f32> = sweeper.angles().collect();
        assert_eq!(angles, vec![90.0, 180.0, 270.0, 0.0]);
        for marker in sweeper.markers() {
            assert_eq!(marker.arc.span(), 90.0);
            assert_eq!(marker.speed, 90.0);
        }
    }

    #[test]
    fn test_degenerate_angle_is_normalized() {
        let marker = LightMarker::new(999.0, 1.0, AngularArc::new(0.0, 0.0), 0.0);
        assert_eq!(marker.angle, 279.0);
    }
}
