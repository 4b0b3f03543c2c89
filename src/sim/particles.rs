//! Splash and spray particle effects.
//!
//! Particles are pure decoration: nothing in the simulation reads them
//! back. They still live in the deterministic state so replays render
//! identically.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::PI;

use crate::consts::*;
use crate::sim::state::{GameEvent, Particle, ParticleKind, SplashKind};

const SPLASH_GRAVITY: f32 = 0.2;
const SPRAY_GRAVITY: f32 = 0.15;

/// Burst parameters derived from the splash kind and impact magnitude
struct BurstConfig {
    count: usize,
    speed: f32,
    upward_bias: f32,
    size: f32,
    life: f32,
}

impl BurstConfig {
    fn for_kind(kind: SplashKind, magnitude: f32) -> Self {
        match kind {
            SplashKind::Ball => Self {
                count: 12,
                speed: 7.0,
                upward_bias: 3.0,
                size: 3.0,
                life: 30.0,
            },
            // Heavier impacts throw more, faster, longer-lived water
            SplashKind::Anvil => Self {
                count: (15 + (magnitude * 2.0) as usize).min(25),
                speed: 4.0 + magnitude * 1.2,
                upward_bias: 2.0 + magnitude * 0.5,
                size: 4.0 + magnitude * 0.3,
                life: 40.0 + magnitude * 3.0,
            },
        }
    }
}

/// Spawn a splash burst at `pos` and record the matching event.
///
/// The shared pool is soft-capped: when a burst finds it over the
/// limit, the oldest particles are evicted in bulk first, so the new
/// burst always lands intact.
pub fn spawn_splash(
    splash: &mut Vec<Particle>,
    events: &mut Vec<GameEvent>,
    rng: &mut Pcg32,
    pos: Vec2,
    kind: SplashKind,
    magnitude: f32,
) {
    events.push(GameEvent::Splash {
        pos,
        kind,
        magnitude,
    });

    if splash.len() > MAX_SPLASH_PARTICLES {
        let excess = splash.len() - MAX_SPLASH_PARTICLES + 20;
        splash.drain(..excess);
    }

    let config = BurstConfig::for_kind(kind, magnitude);
    let particle_kind = match kind {
        SplashKind::Ball => ParticleKind::Ball,
        SplashKind::Anvil => ParticleKind::Anvil,
    };

    // Even ring of droplets with a randomized upward kick
    for i in 0..config.count {
        let angle = i as f32 / config.count as f32 * 2.0 * PI;
        let speed = config.speed + rng.random::<f32>();
        splash.push(Particle {
            pos,
            vel: Vec2::new(
                angle.cos() * speed,
                angle.sin() * speed - rng.random::<f32>() * config.upward_bias,
            ),
            size: config.size + rng.random::<f32>() * 3.0,
            life: config.life + rng.random::<f32>() * 20.0,
            kind: particle_kind,
        });
    }

    // Fat droplets arcing high out of a heavy impact
    if kind == SplashKind::Anvil {
        for _ in 0..5 {
            let angle = rng.random::<f32>() * PI - PI / 2.0;
            let speed = 6.0 + rng.random::<f32>() * magnitude;
            splash.push(Particle {
                pos,
                vel: Vec2::new(
                    angle.cos() * speed,
                    angle.sin() * speed - (3.0 + magnitude * 0.8),
                ),
                size: 6.0 + rng.random::<f32>() * 4.0,
                life: 50.0 + rng.random::<f32>() * 30.0,
                kind: particle_kind,
            });
        }
    }
}

/// Spawn one batch of geyser spray into a pocket's own pool.
pub fn spawn_spray(spray: &mut Vec<Particle>, rng: &mut Pcg32, x: f32, top_y: f32, width: f32) {
    for _ in 0..8 {
        let angle = PI / 3.0 + (rng.random::<f32>() - 0.5) * (PI / 2.0);
        let speed = 3.0 + rng.random::<f32>() * 4.0;
        spray.push(Particle {
            pos: Vec2::new(x + (rng.random::<f32>() - 0.5) * width * 0.8, top_y),
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed),
            size: 2.0 + rng.random::<f32>() * 3.0,
            life: 30.0 + rng.random::<f32>() * 20.0,
            kind: ParticleKind::Geyser,
        });
    }
}

/// Advance a particle pool one tick and drop the dead ones.
fn update_particles(particles: &mut Vec<Particle>, gravity: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += gravity;
        p.life -= 1.0;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Advance splash particles one tick.
pub fn update_splash(splash: &mut Vec<Particle>) {
    update_particles(splash, SPLASH_GRAVITY);
}

/// Advance a pocket's spray one tick, bounding the pool.
pub fn update_spray(spray: &mut Vec<Particle>) {
    update_particles(spray, SPRAY_GRAVITY);
    if spray.len() > MAX_POCKET_PARTICLES {
        let excess = spray.len() - MAX_POCKET_PARTICLES;
        spray.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_ball_splash_burst_size() {
        let mut splash = Vec::new();
        let mut events = Vec::new();
        let mut rng = Pcg32::seed_from_u64(5);
        spawn_splash(
            &mut splash,
            &mut events,
            &mut rng,
            Vec2::new(100.0, 800.0),
            SplashKind::Ball,
            1.0,
        );
        assert_eq!(splash.len(), 12);
        assert_eq!(events.len(), 1);
        assert!(splash.iter().all(|p| p.kind == ParticleKind::Ball));
    }

    #[test]
    fn test_anvil_splash_scales_with_magnitude_and_caps() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut small = Vec::new();
        let mut big = Vec::new();
        let mut events = Vec::new();
        let at = Vec2::new(100.0, 800.0);
        spawn_splash(&mut small, &mut events, &mut rng, at, SplashKind::Anvil, 3.0);
        spawn_splash(&mut big, &mut events, &mut rng, at, SplashKind::Anvil, 16.0);
        assert!(big.len() >= small.len());
        // Count cap: 25 ring particles plus 5 droplets
        assert_eq!(big.len(), 30);
    }

    #[test]
    fn test_pool_eviction_keeps_burst_intact() {
        let mut splash = Vec::new();
        let mut events = Vec::new();
        let mut rng = Pcg32::seed_from_u64(9);
        let at = Vec2::new(50.0, 700.0);
        for _ in 0..20 {
            spawn_splash(&mut splash, &mut events, &mut rng, at, SplashKind::Anvil, 16.0);
        }
        assert!(splash.len() <= MAX_SPLASH_PARTICLES + 30);
        assert!(splash.len() >= 30);
    }

    #[test]
    fn test_particles_age_out() {
        let mut splash = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(0.0, -2.0),
            size: 2.0,
            life: 3.0,
            kind: ParticleKind::Ball,
        }];
        for _ in 0..3 {
            update_splash(&mut splash);
        }
        assert!(splash.is_empty());
    }

    #[test]
    fn test_spray_pool_bounded() {
        let mut spray = Vec::new();
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..10 {
            spawn_spray(&mut spray, &mut rng, 100.0, 600.0, 200.0);
        }
        update_spray(&mut spray);
        assert!(spray.len() <= MAX_POCKET_PARTICLES);
    }
}
