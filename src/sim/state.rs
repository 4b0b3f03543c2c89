//! Game state and core simulation types
//!
//! One [`GameState`] owns every entity collection and singleton; no
//! entity holds a reference to another. Interactions are resolved by
//! scanning the owning collections each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ball just lost; immunity window before play resumes
    Respawning,
    /// Run ended (terminal; only `reset` leaves this state)
    GameOver,
}

/// Display metrics consumed from the host (canvas size and CSS scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl DisplayMetrics {
    /// Default metrics for a tuning preset's base resolution
    pub fn base(tuning: &Tuning) -> Self {
        Self {
            width: tuning.base_width,
            height: tuning.base_height,
            scale: 1.0,
        }
    }
}

/// Playfield geometry derived from display metrics.
///
/// Recomputed on resize; gameplay progress is untouched by a resize.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    /// y of the water surface
    pub water_level: f32,
    /// Seesaw pivot
    pub seesaw_x: f32,
    pub seesaw_y: f32,
    pub seesaw_width: f32,
    pub seesaw_height: f32,
}

impl Layout {
    pub fn new(metrics: &DisplayMetrics, tuning: &Tuning) -> Self {
        let water_level = metrics.height - tuning.water_inset;
        Self {
            width: metrics.width,
            height: metrics.height,
            water_level,
            seesaw_x: metrics.width / 2.0,
            seesaw_y: water_level - tuning.seesaw_above_water,
            seesaw_width: metrics.width * tuning.seesaw_width_frac,
            seesaw_height: tuning.seesaw_height,
        }
    }

    #[inline]
    pub fn seesaw_left(&self) -> f32 {
        self.seesaw_x - self.seesaw_width / 2.0
    }

    #[inline]
    pub fn seesaw_right(&self) -> f32 {
        self.seesaw_x + self.seesaw_width / 2.0
    }

    /// Top of the plank at the pivot, ignoring tilt
    #[inline]
    pub fn seesaw_top(&self) -> f32 {
        self.seesaw_y - self.seesaw_height / 2.0
    }

    /// Where the ball rests between runs and after a resize
    #[inline]
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.seesaw_x, self.seesaw_y - 50.0)
    }
}

/// The player's ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Resting on the seesaw surface this tick
    pub on_seesaw: bool,
    pub is_squished: bool,
    /// Ticks of squish animation remaining
    pub squish_timer: u32,
    /// Vertical flatten scale, 1.0 normal down to 0.2 squished
    pub squish_amount: f32,
    pub can_jump: bool,
    /// Latch for edge-triggered jump input
    pub jump_pressed: bool,
    pub air_jumps: u8,
    pub max_air_jumps: u8,
}

impl Ball {
    pub fn at_spawn(layout: &Layout, tuning: &Tuning) -> Self {
        Self {
            pos: layout.spawn_point(),
            vel: Vec2::ZERO,
            radius: tuning.ball_radius,
            on_seesaw: false,
            is_squished: false,
            squish_timer: 0,
            squish_amount: 1.0,
            can_jump: true,
            jump_pressed: false,
            air_jumps: 0,
            max_air_jumps: MAX_AIR_JUMPS,
        }
    }

    /// Move the ball to a point and clear all transient state
    pub fn reset_at(&mut self, pos: Vec2, vel: Vec2) {
        self.pos = pos;
        self.vel = vel;
        self.on_seesaw = false;
        self.is_squished = false;
        self.squish_timer = 0;
        self.squish_amount = 1.0;
        self.can_jump = true;
        self.jump_pressed = false;
        self.air_jumps = 0;
    }
}

/// A falling or resting anvil
#[derive(Debug, Clone)]
pub struct Anvil {
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    /// One-shot: this anvil already hit the ball while falling
    pub crushed_ball: bool,
    /// Landed on the seesaw
    pub hit_seesaw: bool,
    /// Slid past the plank edge; falling toward the water
    pub falling_off: bool,
    /// One-shot: splashed into the water
    pub hit_water: bool,
    /// -1 left, 0 still, 1 right
    pub slide_direction: i8,
    pub is_big: bool,
    /// Decaying landing impact (big anvils only)
    pub impact_force: f32,
}

impl Anvil {
    pub fn spawn(x: f32, is_big: bool, tuning: &Tuning) -> Self {
        let (size, velocity_y, y) = if is_big {
            (tuning.big_anvil_size, tuning.big_anvil_spawn_velocity, -60.0)
        } else {
            (tuning.anvil_size, tuning.anvil_spawn_velocity, -30.0)
        };
        Self {
            pos: Vec2::new(x, y),
            size,
            velocity_y,
            crushed_ball: false,
            hit_seesaw: false,
            falling_off: false,
            hit_water: false,
            slide_direction: 0,
            is_big,
            impact_force: 0.0,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.size.y / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half_height()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_height()
    }

    /// Resting on the seesaw and counted for torque
    #[inline]
    pub fn is_resting(&self) -> bool {
        self.hit_seesaw && !self.falling_off
    }
}

/// The pivoting plank. Tilt is torque-driven; no angular velocity is
/// retained, only a smoothed angle chasing an instantaneous target.
#[derive(Debug, Clone, Copy, Default)]
pub struct Seesaw {
    pub angle: f32,
    pub target_angle: f32,
}

impl Seesaw {
    /// Surface height of the tilted plank at a given x
    #[inline]
    pub fn surface_y(&self, layout: &Layout, x: f32) -> f32 {
        layout.seesaw_top() + (x - layout.seesaw_x) * self.angle.tan()
    }
}

/// Geyser lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketPhase {
    Rising,
    Active,
    Falling,
}

/// Which half of the playfield a pocket occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketSide {
    Left,
    Right,
}

/// A rising water column that rescues the ball on contact
#[derive(Debug, Clone)]
pub struct WaterPocket {
    pub x: f32,
    pub height: f32,
    pub phase: PocketPhase,
    pub timer: u32,
    /// Randomized per spawn: fraction of the configured maximum
    pub max_height: f32,
    pub side: PocketSide,
    /// Spray particles owned by this pocket
    pub spray: Vec<Particle>,
}

/// Visual tag carried by a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Ball,
    Anvil,
    Geyser,
}

/// A short-lived effect particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Remaining life in ticks
    pub life: f32,
    pub kind: ParticleKind,
}

/// What kind of impact produced a splash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashKind {
    Ball,
    Anvil,
}

/// Discrete effect events for renderer/audio subscribers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Splash {
        pos: Vec2,
        kind: SplashKind,
        magnitude: f32,
    },
}

/// Read-only per-tick view for the render pass
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub ball: &'a Ball,
    pub anvils: &'a [Anvil],
    pub water_pockets: &'a [WaterPocket],
    pub splash_particles: &'a [Particle],
    pub seesaw_angle: f32,
    pub lives: u8,
    pub survival_time: f32,
    pub game_over: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub lives: u8,
    /// Total simulation ticks since creation/reset
    pub time_ticks: u64,
    /// Ticks spent actively playing (not respawning, not game over)
    pub survival_ticks: u64,
    pub layout: Layout,
    pub ball: Ball,
    pub seesaw: Seesaw,
    /// Insertion-ordered; capped at `MAX_ANVILS_ON_SCREEN`
    pub anvils: Vec<Anvil>,
    /// At most one live pocket per side
    pub pockets: Vec<WaterPocket>,
    /// Shared splash pool, capped at `MAX_SPLASH_PARTICLES`
    pub splash: Vec<Particle>,
    pub anvil_spawn_timer: u32,
    pub big_anvil_spawn_timer: u32,
    pub left_pocket_timer: u32,
    pub right_pocket_timer: u32,
    /// Respawn-immunity window; positive while `Respawning`
    pub respawn_ticks: u32,
    /// Deferred life loss scheduled by a squish (0 = none pending)
    pub squish_death_ticks: u32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: &Tuning, metrics: DisplayMetrics, seed: u64) -> Self {
        let layout = Layout::new(&metrics, tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            lives: 3,
            time_ticks: 0,
            survival_ticks: 0,
            layout,
            ball: Ball::at_spawn(&layout, tuning),
            seesaw: Seesaw::default(),
            anvils: Vec::new(),
            pockets: Vec::new(),
            splash: Vec::new(),
            anvil_spawn_timer: 0,
            big_anvil_spawn_timer: 0,
            left_pocket_timer: 0,
            right_pocket_timer: 0,
            respawn_ticks: 0,
            squish_death_ticks: 0,
            events: Vec::new(),
        };
        state.reset(tuning);
        state
    }

    /// Restore every component to initial values and resume play.
    ///
    /// Reseeds the RNG so a post-reset run replays identically to a
    /// fresh state with the same seed, independent of pre-reset state.
    pub fn reset(&mut self, tuning: &Tuning) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = GamePhase::Playing;
        self.lives = 3;
        self.time_ticks = 0;
        self.survival_ticks = 0;
        self.ball = Ball::at_spawn(&self.layout, tuning);
        self.seesaw = Seesaw::default();
        self.anvils.clear();
        self.pockets.clear();
        self.splash.clear();
        self.events.clear();
        self.anvil_spawn_timer = 0;
        self.big_anvil_spawn_timer = 0;
        self.left_pocket_timer = 0;
        // Stagger the sides so geysers alternate from the start
        self.right_pocket_timer = tuning.pocket_spawn_period / 2;
        self.respawn_ticks = 0;
        self.squish_death_ticks = 0;
        log::info!("game reset (seed {})", self.seed);
    }

    /// Reposition seesaw/water geometry for new display metrics without
    /// resetting progress.
    pub fn resize(&mut self, metrics: DisplayMetrics, tuning: &Tuning) {
        self.layout = Layout::new(&metrics, tuning);
        if self.ball.on_seesaw {
            self.ball.pos = self.layout.spawn_point();
        }
        log::debug!("resized to {}x{}", metrics.width, metrics.height);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            ball: &self.ball,
            anvils: &self.anvils,
            water_pockets: &self.pockets,
            splash_particles: &self.splash,
            seesaw_angle: self.seesaw.angle,
            lives: self.lives,
            survival_time: self.survival_time(),
            game_over: self.phase == GamePhase::GameOver,
        }
    }

    /// Take the effect events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Seconds survived this run
    #[inline]
    pub fn survival_time(&self) -> f32 {
        self.survival_ticks as f32 * TICK_DT
    }

    #[inline]
    pub fn is_respawning(&self) -> bool {
        self.phase == GamePhase::Respawning
    }

    /// Count of anvils currently resting on the seesaw
    pub fn resting_anvil_count(&self) -> usize {
        self.anvils.iter().filter(|a| a.is_resting()).count()
    }

    /// Lose a life; respawn if any remain, otherwise end the run.
    pub(crate) fn lose_life(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.squish_death_ticks = 0;
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("game over after {:.1}s", self.survival_time());
        } else {
            log::debug!("life lost, {} remaining", self.lives);
            self.respawn_ball();
        }
    }

    /// Drop the ball back in above the pivot with respawn immunity
    pub(crate) fn respawn_ball(&mut self) {
        self.ball
            .reset_at(Vec2::new(self.layout.seesaw_x, 50.0), Vec2::new(0.0, 2.0));
        self.phase = GamePhase::Respawning;
        self.respawn_ticks = RESPAWN_IMMUNITY_TICKS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop_state() -> (GameState, Tuning) {
        let tuning = Tuning::desktop();
        let metrics = DisplayMetrics::base(&tuning);
        (GameState::new(&tuning, metrics, 7), tuning)
    }

    #[test]
    fn test_layout_geometry() {
        let tuning = Tuning::desktop();
        let layout = Layout::new(&DisplayMetrics::base(&tuning), &tuning);
        assert_eq!(layout.water_level, 800.0);
        assert_eq!(layout.seesaw_y, 550.0);
        assert_eq!(layout.seesaw_x, 750.0);
        assert_eq!(layout.seesaw_width, 1050.0);
        assert!(layout.seesaw_left() < layout.seesaw_x);
        assert!(layout.seesaw_right() > layout.seesaw_x);
    }

    #[test]
    fn test_surface_y_level_and_tilted() {
        let tuning = Tuning::desktop();
        let layout = Layout::new(&DisplayMetrics::base(&tuning), &tuning);
        let mut seesaw = Seesaw::default();
        assert_eq!(seesaw.surface_y(&layout, layout.seesaw_x), layout.seesaw_top());

        seesaw.angle = 0.1;
        // Right of the pivot the surface dips down (y grows) under
        // positive tilt, left of the pivot it rises.
        assert!(seesaw.surface_y(&layout, layout.seesaw_x + 100.0) > layout.seesaw_top());
        assert!(seesaw.surface_y(&layout, layout.seesaw_x - 100.0) < layout.seesaw_top());
    }

    #[test]
    fn test_new_state_initial_placement() {
        let (state, _tuning) = desktop_state();
        assert_eq!(state.lives, 3);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.anvils.is_empty());
        assert!(state.pockets.is_empty());
        assert_eq!(state.ball.pos, state.layout.spawn_point());
        assert_eq!(state.seesaw.angle, 0.0);
    }

    #[test]
    fn test_resize_repositions_resting_ball() {
        let (mut state, tuning) = desktop_state();
        state.ball.on_seesaw = true;
        state.lives = 2;
        state.resize(
            DisplayMetrics {
                width: 1000.0,
                height: 700.0,
                scale: 1.0,
            },
            &tuning,
        );
        assert_eq!(state.ball.pos, state.layout.spawn_point());
        // Progress untouched
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_lose_last_life_is_terminal() {
        let (mut state, _tuning) = desktop_state();
        state.lives = 1;
        state.lose_life();
        assert_eq!(state.phase, GamePhase::GameOver);
        // Further losses are ignored
        state.lose_life();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_lose_life_respawns_with_immunity() {
        let (mut state, _tuning) = desktop_state();
        state.ball.pos = Vec2::new(10.0, 10.0);
        state.lose_life();
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Respawning);
        assert_eq!(state.respawn_ticks, RESPAWN_IMMUNITY_TICKS);
        assert_eq!(state.ball.pos.x, state.layout.seesaw_x);
        assert_eq!(state.ball.pos.y, 50.0);
    }
}
