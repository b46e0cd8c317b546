//! Ring orchestrator
//!
//! Per tick, in order:
//! 1. due pulse/clear events from the ring clock
//! 2. light markers advance
//! 3. every block's excitation is recomputed
//! 4. every block's transform is submitted, then the batch is marked dirty once

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::block::{BounceParams, Excitation, RingBlock};
use super::lattice::{self, ParentTransform};
use super::light::LightSweeper;
use super::schedule::{Due, PendingClear, Schedule};
use crate::host::InstanceHost;
use crate::renderer::{BlockTint, InstanceTransform};
use crate::settings::{RingSettings, SettingsError};

/// Snapshot of ring activity, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingStats {
    pub blocks: usize,
    pub lit: usize,
    pub raised: usize,
    pub pending_clears: usize,
    pub generation: u32,
}

/// Drives the light sweep, excitation and pulse for one ring
#[derive(Debug, Clone)]
pub struct RingAnimator {
    settings: RingSettings,
    lights: LightSweeper,
    blocks: Vec<RingBlock>,
    schedule: Schedule,
    /// Bumped on every (re)generation and on shutdown; stale clears carry an old value
    generation: u32,
    last_parent: ParentTransform,
    rng: Pcg32,
    running: bool,
}

impl RingAnimator {
    /// A ring with the default four-quadrant lights
    pub fn new(settings: RingSettings) -> Self {
        let lights = LightSweeper::four_quadrants(settings.light_speed);
        Self::with_lights(settings, lights)
    }

    pub fn with_lights(settings: RingSettings, lights: LightSweeper) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            schedule: Schedule::new(settings.pulse_interval),
            settings,
            lights,
            blocks: Vec::new(),
            generation: 0,
            last_parent: ParentTransform::IDENTITY,
            running: false,
        }
    }

    /// Build the lattice and start the pulse clock. Returns the block count.
    pub fn init(&mut self, host: &mut impl InstanceHost) -> usize {
        if self.running {
            log::warn!("Ring already initialized");
            return self.blocks.len();
        }
        self.schedule = Schedule::new(self.settings.pulse_interval);
        self.running = true;
        let count = self.regenerate(host);
        log::info!(
            "Ring started: {} blocks, {} lights, pulse every {}s",
            count,
            self.lights.len(),
            self.settings.pulse_interval
        );
        count
    }

    /// Rebuild every block from the current settings.
    ///
    /// Clears queued by earlier generations become no-ops.
    pub fn regenerate(&mut self, host: &mut impl InstanceHost) -> usize {
        self.generation = self.generation.wrapping_add(1);
        self.blocks.clear();
        host.clear_instances();

        if !host.load_block_mesh() {
            log::warn!("Block mesh unavailable; ring left empty");
            return 0;
        }

        let parent = host.parent_transform();
        let points = lattice::generate(
            self.settings.major_radius,
            self.settings.minor_radius,
            self.settings.total_blocks,
            &parent,
        );

        self.blocks.reserve(points.len());
        for point in points {
            let transform =
                InstanceTransform::oriented(point.anchor.position, point.anchor.normal, BlockTint::Idle);
            let index = host.add_instance(&transform);
            self.blocks.push(RingBlock {
                id: index as u32,
                major_angle: point.major_angle,
                anchor: point.anchor,
                excitation: Excitation::default(),
            });
        }
        self.last_parent = parent;

        log::info!(
            "Generated ring lattice: {} instances (generation {})",
            self.blocks.len(),
            self.generation
        );
        self.blocks.len()
    }

    /// Validate and swap in new settings, then rebuild.
    ///
    /// Invalid settings leave the ring untouched.
    pub fn apply_settings(
        &mut self,
        mut settings: RingSettings,
        host: &mut impl InstanceHost,
    ) -> Result<usize, SettingsError> {
        settings.validate()?;
        if settings.pulse_interval != self.settings.pulse_interval {
            self.schedule.set_pulse_interval(settings.pulse_interval);
        }
        if settings.light_speed != self.settings.light_speed {
            self.lights.set_speed(settings.light_speed);
        }
        self.settings = settings;
        Ok(self.regenerate(host))
    }

    /// Advance the ring by `dt` seconds and push transforms to the host
    pub fn tick(&mut self, dt: f32, host: &mut impl InstanceHost) {
        if !self.running {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.schedule.advance(dt);
        while let Some(event) = self.schedule.pop_due() {
            match event {
                Due::Pulse { at } => self.raise_all_at(at),
                Due::Clear(clear) => self.apply_clear(clear),
            }
        }

        self.lights.advance(dt);
        self.update_excitation(dt);
        self.submit_transforms(host);
    }

    /// Raise every block now; each drops back after `pulse_duration`
    pub fn raise_all(&mut self) {
        self.raise_all_at(self.schedule.now());
    }

    fn raise_all_at(&mut self, at: f64) {
        log::debug!("Pulse at {:.2}s raising {} blocks", at, self.blocks.len());
        let max = self.settings.raise_height;
        for block in &mut self.blocks {
            block.excitation.raise_by_timer(self.rng.random_range(0.0..=max));
            self.schedule
                .schedule_clear(at, self.settings.pulse_duration, block.id, self.generation);
        }
    }

    fn apply_clear(&mut self, clear: PendingClear) {
        if clear.generation != self.generation {
            return;
        }
        match self.blocks.get_mut(clear.block_id as usize) {
            Some(block) => block.excitation.clear_timer_raise(),
            None => log::warn!(
                "Dropping clear for block {} (ring has {})",
                clear.block_id,
                self.blocks.len()
            ),
        }
    }

    fn update_excitation(&mut self, dt: f32) {
        let params = BounceParams {
            influence_range: self.settings.influence_range,
            max_height: self.settings.max_bounce_height,
            speed: self.settings.bounce_speed,
        };
        for block in &mut self.blocks {
            let lit = block.near_light(self.lights.angles(), params.influence_range);
            block.excitation.update_light(lit, dt, &params, &mut self.rng);
        }
    }

    fn submit_transforms(&mut self, host: &mut impl InstanceHost) {
        if host.instance_count() != self.blocks.len() {
            log::warn!(
                "Instance count {} does not match {} blocks; skipping update",
                host.instance_count(),
                self.blocks.len()
            );
            return;
        }

        let current = host.parent_transform();
        for block in &mut self.blocks {
            block
                .anchor
                .reproject(&self.last_parent, &current, self.settings.reprojection);

            let ex = &block.excitation;
            let anchor = &block.anchor;
            let mut position = anchor.position;
            if ex.lit_by_light {
                position += anchor.normal * ex.light_height;
            }
            if ex.raised_by_timer {
                position += anchor.normal * ex.timer_height;
            }

            let tint = BlockTint::from_channels(ex.lit_by_light, ex.raised_by_timer);
            let transform = InstanceTransform::oriented(position, anchor.normal, tint);
            host.submit_instance_transform(block.id as usize, &transform);
        }
        self.last_parent = current;
        host.mark_batch_dirty();
    }

    /// Stop ticking, invalidate every queued clear and release the host's instances
    pub fn shutdown(&mut self, host: &mut impl InstanceHost) {
        if !self.running {
            return;
        }
        self.running = false;
        self.generation = self.generation.wrapping_add(1);
        self.schedule.cancel_pending();
        self.blocks.clear();
        host.clear_instances();
        log::info!("Ring shut down");
    }

    pub fn stats(&self) -> RingStats {
        RingStats {
            blocks: self.blocks.len(),
            lit: self.blocks.iter().filter(|b| b.excitation.lit_by_light).count(),
            raised: self.blocks.iter().filter(|b| b.excitation.raised_by_timer).count(),
            pending_clears: self.schedule.pending_len(),
            generation: self.generation,
        }
    }

    pub fn blocks(&self) -> &[RingBlock] {
        &self.blocks
    }

    pub fn lights(&self) -> &LightSweeper {
        &self.lights
    }

    pub fn settings(&self) -> &RingSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds on the ring clock since `init`
    pub fn elapsed(&self) -> f64 {
        self.schedule.now()
    }
}
