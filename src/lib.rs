//! Anvil Rain - a seesaw-balancing arcade toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, seesaw dynamics,
//!   anvil lifecycle, water-pocket rescue, splash effects, game state)
//! - `tuning`: Device-class parameter presets (physics constants,
//!   object sizes, spawn rates)
//!
//! Rendering, input device wiring, and responsive canvas sizing are
//! external collaborators; the simulation exposes a per-tick snapshot
//! plus discrete splash events and consumes an input-intent set and
//! display metrics.

pub mod sim;
pub mod tuning;

pub use sim::{DisplayMetrics, GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
pub use tuning::{DeviceClass, Tuning};

/// Fixed, device-independent game constants.
///
/// All velocities are in pixels per 60 Hz tick, matching the fixed
/// simulation rate. Device-dependent numbers live in [`tuning::Tuning`].
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const TICK_DT: f32 = 1.0 / TICK_RATE;
    /// Inter-frame delta above which a tick is skipped outright
    /// (backgrounded tab / debugger stall; no catch-up sub-stepping)
    pub const STALL_THRESHOLD_MS: f64 = 100.0;

    /// Full-power jump impulse from the seesaw (negative = up)
    pub const BALL_JUMP_POWER: f32 = -12.0;
    /// Reduced-power airborne jump impulse
    pub const AIR_JUMP_POWER: f32 = -8.0;
    /// Airborne jumps allowed before the ball must land again
    pub const MAX_AIR_JUMPS: u8 = 2;
    /// Extra downward acceleration while holding fast-fall
    pub const FAST_FALL_ACCEL: f32 = 0.8;

    /// Horizontal/vertical ball speed clamps (anti-tunneling)
    pub const BALL_MAX_SPEED_X: f32 = 15.0;
    pub const BALL_MAX_SPEED_Y: f32 = 20.0;
    /// Restitution for the four playfield boundaries
    pub const BOUNDARY_RESTITUTION: f32 = 0.7;

    /// Squish incapacitation length in ticks
    pub const SQUISH_DURATION_TICKS: u32 = 60;
    /// Delay between squish and the scripted life loss
    pub const SQUISH_DEATH_DELAY_TICKS: u32 = 60;
    /// Flattened vertical scale while squished
    pub const SQUISH_AMOUNT: f32 = 0.2;
    /// Post-respawn window suppressing anvil/ball collision
    pub const RESPAWN_IMMUNITY_TICKS: u32 = 30;

    /// Slope-induced acceleration coefficient on the tilted plank
    pub const SLOPE_ACCEL: f32 = 0.08;
    /// Anti-stick horizontal kick near the tilt limit
    pub const ANTI_STICK_KICK: f32 = 0.15;
    /// Fraction of max angle beyond which the anti-stick kick applies
    pub const ANTI_STICK_THRESHOLD: f32 = 0.85;

    /// Anvil fall acceleration per tick
    pub const ANVIL_GRAVITY: f32 = 0.3;
    /// Type-dependent fall speed caps
    pub const ANVIL_MAX_FALL_SPEED: f32 = 8.0;
    pub const BIG_ANVIL_MAX_FALL_SPEED: f32 = 10.0;
    /// Absolute anvil velocity cap, applied right before movement
    pub const ANVIL_VELOCITY_CAP: f32 = 12.0;
    /// Sideways slide speed of a resting anvil beyond the tilt deadband
    pub const ANVIL_SLIDE_SPEED: f32 = 2.0;
    /// Tilt magnitude below which resting anvils do not slide
    pub const TILT_DEADBAND: f32 = 0.05;

    /// Count caps with graceful refusal/eviction rather than failure
    pub const MAX_ANVILS_ON_SCREEN: usize = 15;
    pub const MAX_ANVILS_ON_SEESAW: usize = 8;
    pub const MAX_SPLASH_PARTICLES: usize = 100;
    pub const MAX_POCKET_PARTICLES: usize = 50;
}
