//! Seesaw surface contact and torque response.

use crate::consts::*;
use crate::sim::state::GameState;
use crate::tuning::Tuning;

/// Snap the ball to the plank surface when it is within the contact
/// band, and roll it along the tilt.
///
/// The band reaches a little above and well below the surface so a
/// fast-falling ball that passed the plank this tick is still caught.
pub fn resolve_ball_surface(state: &mut GameState, tuning: &Tuning) {
    let layout = state.layout;
    let seesaw = state.seesaw;
    let ball = &mut state.ball;

    let on_plank_span = ball.pos.x >= layout.seesaw_left() && ball.pos.x <= layout.seesaw_right();
    if !on_plank_span {
        ball.on_seesaw = false;
        return;
    }

    let surface = seesaw.surface_y(&layout, ball.pos.x);
    let in_band = ball.pos.y >= surface - ball.radius - 5.0
        && ball.pos.y <= surface + ball.radius + 20.0;

    if in_band {
        ball.pos.y = surface - ball.radius;
        ball.vel.y = 0.0;
        ball.on_seesaw = true;
        ball.can_jump = true;
        ball.air_jumps = 0;

        // Roll downhill along the tilt
        ball.vel.x += seesaw.angle.sin() * SLOPE_ACCEL;

        // Kick the ball loose near the tilt limit instead of letting
        // it pin against the stop
        if seesaw.angle.abs() > ANTI_STICK_THRESHOLD * tuning.max_angle {
            ball.vel.x += seesaw.angle.signum() * ANTI_STICK_KICK;
        }
    } else {
        ball.on_seesaw = false;
    }
}

/// Chase the target angle, then recompute it from the current load.
///
/// The one-tick lag between target and angle is what gives the plank
/// its springy feel.
pub fn update_seesaw(state: &mut GameState, tuning: &Tuning) {
    state.seesaw.angle +=
        (state.seesaw.target_angle - state.seesaw.angle) * tuning.angle_smoothing;

    let layout = state.layout;
    let mut torque = 0.0;
    let mut impact_bonus = 0.0;
    let mut resting = 0usize;

    if state.ball.on_seesaw {
        torque += (state.ball.pos.x - layout.seesaw_x) * tuning.ball_weight;
    }

    for anvil in &mut state.anvils {
        if !anvil.is_resting() {
            continue;
        }
        resting += 1;
        let lever = anvil.pos.x - layout.seesaw_x;
        torque += lever * tuning.anvil_weight_for(anvil.is_big);

        // Fresh big-anvil landings slam the plank; the bonus decays
        // each tick until it fades out
        if anvil.is_big && anvil.impact_force > 0.0 {
            impact_bonus += anvil.impact_force * lever * 1.2;
            anvil.impact_force *= 0.98;
            if anvil.impact_force < 0.5 {
                anvil.impact_force = 0.0;
            }
        }
    }

    let loaded_mult = if resting > 0 { 1.2 } else { 1.0 };
    let slam_mult = if impact_bonus != 0.0 { 1.8 } else { 1.0 };
    let mut target = (torque + impact_bonus) * tuning.torque_scale * loaded_mult * slam_mult;

    // Never tilt so far that the plank tip dips near the water
    let half_span = layout.seesaw_width / 2.0;
    let clearance = layout.water_level - layout.seesaw_y - 50.0;
    let safe_angle = (clearance / half_span).atan().abs();
    let limit = tuning.max_angle.min(safe_angle);
    target = target.clamp(-limit, limit);

    state.seesaw.target_angle = target;
}
