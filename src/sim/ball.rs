//! Ball input response, free-body integration, and squish handling.
//!
//! Surface contact with the seesaw lives in [`crate::sim::seesaw`];
//! this module covers everything up to the walls and the water line.

use glam::Vec2;

use crate::consts::*;
use crate::sim::particles;
use crate::sim::seesaw;
use crate::sim::state::{GameState, SplashKind};
use crate::sim::tick::TickInput;
use crate::tuning::Tuning;

/// Apply held/edge-triggered controls to the ball's velocity.
pub fn apply_input(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let ball = &mut state.ball;
    if ball.is_squished {
        ball.jump_pressed = input.jump;
        return;
    }

    let control = if ball.on_seesaw {
        tuning.ground_control
    } else {
        tuning.air_control
    };
    if input.left {
        ball.vel.x -= tuning.move_speed * control;
    }
    if input.right {
        ball.vel.x += tuning.move_speed * control;
    }

    // Jump fires on the press edge only
    if input.jump && !ball.jump_pressed {
        if ball.on_seesaw && ball.can_jump {
            ball.vel.y = BALL_JUMP_POWER;
            ball.can_jump = false;
            ball.air_jumps = 0;
        } else if !ball.on_seesaw && ball.air_jumps < ball.max_air_jumps {
            ball.vel.y = AIR_JUMP_POWER;
            ball.air_jumps += 1;
        }
    }
    ball.jump_pressed = input.jump;

    if input.down && !ball.on_seesaw {
        ball.vel.y += FAST_FALL_ACCEL;
    }
}

/// Integrate the ball one tick: gravity, walls, water, seesaw contact.
///
/// Frozen during respawn immunity; a squished ball only rides the
/// plank surface until its timer runs out.
pub fn step_ball(state: &mut GameState, tuning: &Tuning) {
    if state.is_respawning() {
        return;
    }

    if state.ball.is_squished {
        step_squished(state);
        return;
    }

    let layout = state.layout;
    let ball = &mut state.ball;

    if !ball.on_seesaw {
        ball.vel.y += tuning.gravity;
    }

    ball.vel.x = ball.vel.x.clamp(-BALL_MAX_SPEED_X, BALL_MAX_SPEED_X);
    ball.vel.y = ball.vel.y.clamp(-BALL_MAX_SPEED_Y, BALL_MAX_SPEED_Y);

    ball.pos += ball.vel;

    if ball.on_seesaw {
        ball.vel.x *= tuning.seesaw_friction;
    } else {
        ball.vel.x *= tuning.air_resistance;
    }

    // All four playfield walls bounce with energy loss
    if ball.pos.x < ball.radius {
        ball.pos.x = ball.radius;
        ball.vel.x *= -BOUNDARY_RESTITUTION;
    }
    if ball.pos.x > layout.width - ball.radius {
        ball.pos.x = layout.width - ball.radius;
        ball.vel.x *= -BOUNDARY_RESTITUTION;
    }
    if ball.pos.y < ball.radius {
        ball.pos.y = ball.radius;
        ball.vel.y *= -BOUNDARY_RESTITUTION;
    }
    if ball.pos.y > layout.height - ball.radius {
        ball.pos.y = layout.height - ball.radius;
        ball.vel.y *= -BOUNDARY_RESTITUTION;
    }

    if state.ball.pos.y + state.ball.radius >= layout.water_level {
        let splash_pos = Vec2::new(state.ball.pos.x, layout.water_level);
        particles::spawn_splash(
            &mut state.splash,
            &mut state.events,
            &mut state.rng,
            splash_pos,
            SplashKind::Ball,
            1.0,
        );
        state.lose_life();
        return;
    }

    // Emergency respawn if the ball somehow escapes the playfield;
    // this one is free
    if state.ball.pos.x < -50.0
        || state.ball.pos.x > layout.width + 50.0
        || state.ball.pos.y > layout.height + 50.0
    {
        log::warn!(
            "ball escaped playfield at ({:.0}, {:.0})",
            state.ball.pos.x,
            state.ball.pos.y
        );
        state.respawn_ball();
        return;
    }

    seesaw::resolve_ball_surface(state, tuning);
}

/// A squished ball stays flattened where it was hit, riding the plank
/// if it was on it, until the squish timer expires.
fn step_squished(state: &mut GameState) {
    let ball = &mut state.ball;
    if ball.squish_timer > 0 {
        ball.squish_timer -= 1;
    }
    if ball.squish_timer == 0 {
        ball.is_squished = false;
        ball.squish_amount = 1.0;
        return;
    }
    if ball.on_seesaw {
        let x = ball.pos.x;
        if x >= state.layout.seesaw_left() && x <= state.layout.seesaw_right() {
            ball.pos.y = state.seesaw.surface_y(&state.layout, x) - ball.radius;
        }
    }
}

/// Flatten the ball under an anvil and schedule the deferred life loss.
pub fn squish_ball(state: &mut GameState) {
    if state.ball.is_squished {
        return;
    }
    let ball = &mut state.ball;
    ball.is_squished = true;
    ball.squish_timer = SQUISH_DURATION_TICKS;
    ball.squish_amount = SQUISH_AMOUNT;
    ball.vel = Vec2::ZERO;
    state.squish_death_ticks = SQUISH_DEATH_DELAY_TICKS;
    log::debug!(
        "ball squished at ({:.0}, {:.0})",
        state.ball.pos.x,
        state.ball.pos.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{DisplayMetrics, GamePhase};

    fn playing_state() -> (GameState, Tuning) {
        let tuning = Tuning::desktop();
        let metrics = DisplayMetrics::base(&tuning);
        (GameState::new(&tuning, metrics, 99), tuning)
    }

    #[test]
    fn test_ground_jump_consumes_can_jump() {
        let (mut state, tuning) = playing_state();
        state.ball.on_seesaw = true;
        state.ball.can_jump = true;
        let input = TickInput {
            jump: true,
            ..TickInput::default()
        };
        apply_input(&mut state, &input, &tuning);
        assert_eq!(state.ball.vel.y, BALL_JUMP_POWER);
        assert!(!state.ball.can_jump);

        // Held jump does not fire again
        apply_input(&mut state, &input, &tuning);
        assert_eq!(state.ball.air_jumps, 0);
    }

    #[test]
    fn test_air_jumps_limited() {
        let (mut state, tuning) = playing_state();
        state.ball.on_seesaw = false;
        state.ball.can_jump = false;
        let pressed = TickInput {
            jump: true,
            ..TickInput::default()
        };
        let released = TickInput::default();
        for _ in 0..5 {
            apply_input(&mut state, &pressed, &tuning);
            apply_input(&mut state, &released, &tuning);
        }
        assert_eq!(state.ball.air_jumps, MAX_AIR_JUMPS);
    }

    #[test]
    fn test_squished_ball_ignores_input() {
        let (mut state, tuning) = playing_state();
        state.ball.is_squished = true;
        let input = TickInput {
            left: true,
            jump: true,
            ..TickInput::default()
        };
        apply_input(&mut state, &input, &tuning);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_wall_bounce_loses_energy() {
        let (mut state, tuning) = playing_state();
        state.ball.pos = Vec2::new(5.0, 100.0);
        state.ball.vel = Vec2::new(-10.0, 0.0);
        step_ball(&mut state, &tuning);
        assert_eq!(state.ball.pos.x, state.ball.radius);
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.vel.x < 10.0);
    }

    #[test]
    fn test_water_contact_costs_a_life() {
        let (mut state, tuning) = playing_state();
        state.ball.pos = Vec2::new(400.0, state.layout.water_level - 5.0);
        state.ball.vel = Vec2::new(0.0, 6.0);
        step_ball(&mut state, &tuning);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Respawning);
        assert!(!state.splash.is_empty());
    }

    #[test]
    fn test_respawning_ball_is_frozen() {
        let (mut state, tuning) = playing_state();
        state.respawn_ball();
        let before = state.ball.pos;
        step_ball(&mut state, &tuning);
        assert_eq!(state.ball.pos, before);
    }

    #[test]
    fn test_squish_schedules_deferred_death() {
        let (mut state, _tuning) = playing_state();
        squish_ball(&mut state);
        assert!(state.ball.is_squished);
        assert_eq!(state.squish_death_ticks, SQUISH_DEATH_DELAY_TICKS);
        assert_eq!(state.ball.vel, Vec2::ZERO);

        // Idempotent while squished
        state.squish_death_ticks = 30;
        squish_ball(&mut state);
        assert_eq!(state.squish_death_ticks, 30);
    }

    #[test]
    fn test_squished_ball_rides_the_plank() {
        let (mut state, tuning) = playing_state();
        state.ball.on_seesaw = true;
        state.ball.pos = Vec2::new(
            state.layout.seesaw_x + 100.0,
            state.layout.seesaw_top() - state.ball.radius,
        );
        squish_ball(&mut state);
        state.seesaw.angle = 0.2;
        step_ball(&mut state, &tuning);
        let expected = state.seesaw.surface_y(&state.layout, state.ball.pos.x) - state.ball.radius;
        assert_eq!(state.ball.pos.y, expected);
    }

    #[test]
    fn test_squish_wears_off() {
        let (mut state, tuning) = playing_state();
        squish_ball(&mut state);
        for _ in 0..SQUISH_DURATION_TICKS {
            step_ball(&mut state, &tuning);
        }
        assert!(!state.ball.is_squished);
        assert_eq!(state.ball.squish_amount, 1.0);
    }
}
