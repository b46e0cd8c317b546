//! Bouncing cube actor
//!
//! Closed-form vertical oscillation around the spawn point:
//! z(t) = origin.z + amplitude * sin(2π * frequency * t + phase)

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::settings::CubeSettings;

#[derive(Debug, Clone)]
pub struct BouncingCube {
    origin: Vec3,
    amplitude: f32,
    frequency: f32,
    /// Initial phase (radians), randomized at spawn so cubes bob out of step
    phase: f32,
    running_time: f32,
}

impl BouncingCube {
    pub fn new(origin: Vec3, settings: &CubeSettings, rng: &mut impl Rng) -> Self {
        Self::with_phase(origin, settings, rng.random_range(0.0..TAU))
    }

    pub fn with_phase(origin: Vec3, settings: &CubeSettings, phase: f32) -> Self {
        Self {
            origin,
            amplitude: settings.amplitude,
            frequency: settings.frequency,
            phase,
            running_time: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the new position
    pub fn tick(&mut self, dt: f32) -> Vec3 {
        self.running_time += dt.max(0.0);
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        let z = self.amplitude * (TAU * self.frequency * self.running_time + self.phase).sin();
        self.origin + Vec3::Z * z
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}
