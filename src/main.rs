//! Ring Lights headless demo
//!
//! Drives a ring and a bouncing cube with a fixed-timestep loop against the
//! in-memory host, logging what the ring is doing once per simulated second.
//!
//! Usage: `ring-lights [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::{Quat, Vec3};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use ring_lights::consts::{MAX_SUBSTEPS, SIM_DT};
    use ring_lights::host::RecordingHost;
    use ring_lights::sim::{BouncingCube, ParentTransform, RingAnimator};
    use ring_lights::{CubeSettings, RingSettings};

    env_logger::init();
    log::info!("Ring Lights (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match RingSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => RingSettings::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10.0);

    let mut host = RecordingHost::new();
    let mut ring = RingAnimator::new(settings.clone());
    ring.init(&mut host);

    let mut rng = Pcg32::seed_from_u64(settings.seed ^ 0xC0BE);
    let mut cube = BouncingCube::new(Vec3::new(0.0, 0.0, 200.0), &CubeSettings::default(), &mut rng);

    // Uneven frame times, as a real host would deliver them
    let frame_times = [1.0 / 60.0, 1.0 / 58.0, 1.0 / 75.0, 1.0 / 30.0];
    let mut accumulator = 0.0f32;
    let mut elapsed = 0.0f32;
    let mut next_report = 1.0f32;
    let mut frame = 0usize;

    while elapsed < seconds {
        let frame_dt = frame_times[frame % frame_times.len()];
        frame += 1;
        accumulator += frame_dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            elapsed += SIM_DT;
            // Slowly spin the parent so the lattice has to follow it
            host.parent = ParentTransform::from_translation_rotation(
                Vec3::ZERO,
                Quat::from_rotation_z(elapsed * 0.25),
            );
            ring.tick(SIM_DT, &mut host);
            cube.tick(SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            accumulator = 0.0;
        }

        if elapsed >= next_report {
            let stats = ring.stats();
            log::info!(
                "t={:.1}s lit={} raised={} pending={} cube_z={:.1}",
                elapsed,
                stats.lit,
                stats.raised,
                stats.pending_clears,
                cube.position().z
            );
            next_report += 1.0;
        }
    }

    log::info!(
        "Done: {} frames, {} batch uploads, {} bytes per upload",
        frame,
        host.dirty_marks,
        host.instance_bytes().len()
    );
    ring.shutdown(&mut host);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; a browser host drives RingAnimator directly
}
