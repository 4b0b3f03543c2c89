//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Fixed 60 Hz timestep only; velocities are in pixels per tick
//! - Seeded RNG only, owned by the game state
//! - Deferred effects are tick counters, never wall-clock callbacks
//! - No rendering or platform dependencies

pub mod anvil;
pub mod ball;
pub mod collision;
pub mod particles;
pub mod seesaw;
pub mod state;
pub mod tick;
pub mod water;

pub use collision::{rect_circle_overlap, swept_plane_crossing};
pub use state::{
    Anvil, Ball, DisplayMetrics, GameEvent, GamePhase, GameState, Layout, Particle, ParticleKind,
    PocketPhase, PocketSide, Seesaw, Snapshot, SplashKind, WaterPocket,
};
pub use tick::{TickInput, tick};
