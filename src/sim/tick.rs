//! Fixed-timestep orchestration.
//!
//! One `tick` advances the whole simulation by exactly 1/60 s. The
//! update order matters and mirrors the dependency chain: input first,
//! then the ball, then anvils (which may grab or launch the ball),
//! then geysers (which may rescue it), then the seesaw's response to
//! the new load, and finally the decorative splash pool.

use serde::{Deserialize, Serialize};

use crate::sim::{anvil, ball, particles, seesaw, water};
use crate::sim::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// Player intent for one tick, already debounced to booleans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
}

/// Advance the simulation one fixed step. A game-over state is inert
/// until `GameState::reset`.
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    // Respawn immunity runs down first so the released ball moves this
    // same tick
    if state.phase == GamePhase::Respawning {
        state.respawn_ticks = state.respawn_ticks.saturating_sub(1);
        if state.respawn_ticks == 0 {
            state.phase = GamePhase::Playing;
        }
    }

    ball::apply_input(state, input, tuning);
    ball::step_ball(state, tuning);
    anvil::update_anvils(state, tuning);
    water::update_water_pockets(state, tuning);
    seesaw::update_seesaw(state, tuning);
    particles::update_splash(&mut state.splash);

    // Deferred squish death: scheduled as a tick count so reset wipes
    // it along with everything else
    if state.squish_death_ticks > 0 {
        state.squish_death_ticks -= 1;
        if state.squish_death_ticks == 0 {
            state.lose_life();
        }
    }

    if state.phase == GamePhase::Playing {
        state.survival_ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{DisplayMetrics, GamePhase};
    use glam::Vec2;

    fn fresh(seed: u64) -> (GameState, Tuning) {
        let tuning = Tuning::desktop();
        let metrics = DisplayMetrics::base(&tuning);
        (GameState::new(&tuning, metrics, seed), tuning)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_ball_settles_on_plank_and_stays() {
        let (mut state, tuning) = fresh(1);
        // Spawned 50 px above the plank: falls, lands, stays put
        for _ in 0..120 {
            tick(&mut state, &idle(), &tuning);
        }
        assert!(state.ball.on_seesaw);
        let expected = state.seesaw.surface_y(&state.layout, state.ball.pos.x) - state.ball.radius;
        assert!((state.ball.pos.y - expected).abs() < 1.0);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_survival_clock_counts_play_only() {
        let (mut state, tuning) = fresh(1);
        for _ in 0..60 {
            tick(&mut state, &idle(), &tuning);
        }
        assert!((state.survival_time() - 1.0).abs() < 1e-3);

        state.respawn_ball();
        let before = state.survival_ticks;
        tick(&mut state, &idle(), &tuning);
        assert_eq!(state.survival_ticks, before);
    }

    #[test]
    fn test_respawn_immunity_expires() {
        let (mut state, tuning) = fresh(1);
        state.respawn_ball();
        for _ in 0..RESPAWN_IMMUNITY_TICKS {
            tick(&mut state, &idle(), &tuning);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        // Ball resumes falling with its respawn velocity
        let y_before = state.ball.pos.y;
        tick(&mut state, &idle(), &tuning);
        assert!(state.ball.pos.y > y_before);
    }

    #[test]
    fn test_squish_death_fires_once_after_delay() {
        let (mut state, tuning) = fresh(1);
        // Settle the ball first
        for _ in 0..120 {
            tick(&mut state, &idle(), &tuning);
        }
        ball::squish_ball(&mut state);
        for _ in 0..SQUISH_DEATH_DELAY_TICKS {
            tick(&mut state, &idle(), &tuning);
        }
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Respawning);
        assert_eq!(state.squish_death_ticks, 0);

        // No double charge afterwards
        tick(&mut state, &idle(), &tuning);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_reset_cancels_pending_squish_death() {
        let (mut state, tuning) = fresh(1);
        ball::squish_ball(&mut state);
        assert!(state.squish_death_ticks > 0);
        state.reset(&tuning);
        for _ in 0..(SQUISH_DEATH_DELAY_TICKS * 2) {
            tick(&mut state, &idle(), &tuning);
        }
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_game_over_is_inert_until_reset() {
        let (mut state, tuning) = fresh(1);
        state.lives = 1;
        state.ball.pos = Vec2::new(400.0, state.layout.water_level - 5.0);
        state.ball.vel = Vec2::new(0.0, 6.0);
        tick(&mut state, &idle(), &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks_before = state.time_ticks;
        for _ in 0..10 {
            tick(&mut state, &idle(), &tuning);
        }
        assert_eq!(state.time_ticks, ticks_before);

        state.reset(&tuning);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 3);
        tick(&mut state, &idle(), &tuning);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_same_seed_same_inputs_same_run() {
        let (mut a, tuning) = fresh(42);
        let (mut b, _) = fresh(42);
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { jump: true, ..Default::default() },
            TickInput::default(),
            TickInput { left: true, down: true, ..Default::default() },
        ];
        for i in 0..1200 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input, &tuning);
            tick(&mut b, &input, &tuning);
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.seesaw.angle, b.seesaw.angle);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.anvils.len(), b.anvils.len());
        for (x, y) in a.anvils.iter().zip(&b.anvils) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_reset_replays_like_a_fresh_state() {
        let (mut dirty, tuning) = fresh(7);
        let (mut clean, _) = fresh(7);
        // Wreck the first state, then reset it
        for _ in 0..900 {
            tick(&mut dirty, &TickInput { right: true, ..Default::default() }, &tuning);
        }
        dirty.reset(&tuning);
        for _ in 0..300 {
            tick(&mut dirty, &idle(), &tuning);
            tick(&mut clean, &idle(), &tuning);
        }
        assert_eq!(dirty.ball.pos, clean.ball.pos);
        assert_eq!(dirty.anvils.len(), clean.anvils.len());
        assert_eq!(dirty.pockets.len(), clean.pockets.len());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut state, tuning) = fresh(1);
        for _ in 0..200 {
            tick(&mut state, &idle(), &tuning);
        }
        let snap = state.snapshot();
        assert_eq!(snap.lives, 3);
        assert!(!snap.game_over);
        assert!(snap.survival_time > 3.0);
        assert_eq!(snap.anvils.len(), state.anvils.len());
    }
}
