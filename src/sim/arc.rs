//! Angular arcs on the ring's major circle
//!
//! An arc is defined by two bounds in degrees:
//! - min, max: normalized to [0, 360)
//! - when min > max the arc wraps through 0° (e.g. 315° → 45°)
//! - a requested span of 360° or more is the full circle, stored as [0, 360]

use serde::{Deserialize, Serialize};

use crate::{in_arc, normalize_degrees};

/// A closed arc on the [0, 360) degree circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularArc {
    /// Lower bound (degrees, normalized)
    pub min: f32,
    /// Upper bound (degrees, normalized)
    pub max: f32,
}

impl AngularArc {
    pub fn new(min: f32, max: f32) -> Self {
        if (max - min).abs() >= 360.0 {
            return Self::FULL;
        }
        Self {
            min: normalize_degrees(min),
            max: normalize_degrees(max),
        }
    }

    /// The whole circle; nothing is ever outside it
    pub const FULL: Self = Self { min: 0.0, max: 360.0 };

    #[inline]
    pub fn is_full(&self) -> bool {
        self.max - self.min >= 360.0
    }

    /// True when the arc passes through 0°
    #[inline]
    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    /// Angular width of the arc (handles wraparound)
    pub fn span(&self) -> f32 {
        let mut span = self.max - self.min;
        if span < 0.0 {
            span += 360.0;
        }
        span
    }

    /// Check if an angle is within the arc
    pub fn contains(&self, angle: f32) -> bool {
        in_arc(normalize_degrees(angle), self.min, self.max)
    }

    /// Width of the part of the circle outside the arc
    pub fn gap(&self) -> f32 {
        (360.0 - self.span()).max(0.0)
    }

    /// Bound a marker travelling in `direction` runs into
    pub fn bound_ahead(&self, direction: f32) -> f32 {
        if direction > 0.0 { self.max } else { self.min }
    }

    /// Midpoint of the arc
    pub fn center(&self) -> f32 {
        normalize_degrees(self.min + self.span() / 2.0)
    }
}
