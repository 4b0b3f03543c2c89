//! Anvil lifecycle: spawning, falling, landing, stacking, sliding.
//!
//! Landing uses several overlapping detections on purpose. Anvils fall
//! up to 12 px per tick, so a single position check can tunnel through
//! the plank; the union of the crossing, proximity, swept and
//! overshoot checks cannot.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::ball;
use crate::sim::collision::{self, rect_circle_overlap, swept_plane_crossing};
use crate::sim::particles;
use crate::sim::state::{Anvil, GameState, SplashKind};
use crate::tuning::Tuning;

/// Advance every anvil one tick and run the spawn timers.
pub fn update_anvils(state: &mut GameState, tuning: &Tuning) {
    run_spawn_timers(state, tuning);

    for i in 0..state.anvils.len() {
        apply_gravity(&mut state.anvils[i]);
        step_anvil(state, i, tuning);
        resolve_ball_contact(state, i, tuning);
        update_resting(state, i, tuning);
    }

    // Drop anvils that sank past the bottom of the playfield
    let floor = state.layout.height + 50.0;
    state.anvils.retain(|a| a.pos.y <= floor);
}

fn run_spawn_timers(state: &mut GameState, tuning: &Tuning) {
    state.anvil_spawn_timer += 1;
    if state.anvil_spawn_timer >= tuning.anvil_spawn_period {
        state.anvil_spawn_timer = 0;
        if state.anvils.len() < MAX_ANVILS_ON_SCREEN {
            let x = state.rng.random_range(0.0..state.layout.width);
            state.anvils.push(Anvil::spawn(x, false, tuning));
        }
    }

    state.big_anvil_spawn_timer += 1;
    if state.big_anvil_spawn_timer >= tuning.big_anvil_spawn_period {
        state.big_anvil_spawn_timer = 0;
        if state.anvils.len() < MAX_ANVILS_ON_SCREEN {
            let x = state.rng.random_range(0.0..state.layout.width);
            state.anvils.push(Anvil::spawn(x, true, tuning));
            log::debug!("big anvil incoming at x={x:.0}");
        }
    }
}

fn apply_gravity(anvil: &mut Anvil) {
    if !anvil.hit_seesaw || anvil.falling_off {
        anvil.velocity_y += ANVIL_GRAVITY;
        let cap = if anvil.is_big {
            BIG_ANVIL_MAX_FALL_SPEED
        } else {
            ANVIL_MAX_FALL_SPEED
        };
        anvil.velocity_y = anvil.velocity_y.min(cap);
    }
}

/// Move one anvil: land on the seesaw if any detection fires,
/// otherwise fall freely and splash into the water.
fn step_anvil(state: &mut GameState, i: usize, tuning: &Tuning) {
    let layout = state.layout;
    let plank_top = layout.seesaw_top();

    let (prev_bottom, over_span, can_land, vy) = {
        let a = &mut state.anvils[i];
        a.velocity_y = a.velocity_y.min(ANVIL_VELOCITY_CAP);
        (
            a.bottom(),
            a.pos.x >= layout.seesaw_left() && a.pos.x <= layout.seesaw_right(),
            !a.hit_seesaw && !a.falling_off,
            a.velocity_y,
        )
    };

    if over_span && can_land {
        let new_bottom = prev_bottom + vy;
        let will_cross = prev_bottom <= plank_top && new_bottom >= plank_top;
        let already_at = prev_bottom >= plank_top - 3.0;
        let swept = swept_plane_crossing(prev_bottom, new_bottom, plank_top);
        let overshoot = new_bottom > plank_top + 5.0 && prev_bottom <= plank_top + 5.0;

        if will_cross || already_at || swept || overshoot {
            let impact_velocity = vy;
            {
                let a = &mut state.anvils[i];
                a.pos.y = plank_top - a.half_height();
                a.velocity_y = 0.0;
            }
            land_on_seesaw(state, i, impact_velocity, tuning);
            return;
        }
    }

    {
        let a = &mut state.anvils[i];
        a.pos.y += a.velocity_y;
        // Sliding off the edge accelerates past the normal fall cap
        if a.falling_off {
            a.velocity_y += ANVIL_GRAVITY;
        }
    }

    let splash = {
        let a = &mut state.anvils[i];
        if a.bottom() >= layout.water_level && !a.hit_water {
            a.hit_water = true;
            let magnitude = a.velocity_y.abs() + if a.is_big { 6.0 } else { 3.0 };
            Some((a.pos.x, magnitude))
        } else {
            None
        }
    };
    if let Some((x, magnitude)) = splash {
        particles::spawn_splash(
            &mut state.splash,
            &mut state.events,
            &mut state.rng,
            Vec2::new(x, layout.water_level),
            SplashKind::Anvil,
            magnitude,
        );
    }
}

/// Settle a just-landed anvil onto the plank or an existing stack, and
/// fire the big-anvil catapult if the ball is aboard.
fn land_on_seesaw(state: &mut GameState, i: usize, impact_velocity: f32, tuning: &Tuning) {
    let layout = state.layout;
    let plank_top = layout.seesaw_top();

    // A crowded plank refuses further landings
    if state.resting_anvil_count() >= MAX_ANVILS_ON_SEESAW {
        let a = &mut state.anvils[i];
        a.falling_off = true;
        a.velocity_y = 1.0;
        return;
    }

    let (anvil_x, anvil_width, is_big) = {
        let a = &state.anvils[i];
        (a.pos.x, a.size.x, a.is_big)
    };

    // Land atop the highest overlapping stack neighbor, if any
    let mut blocked = false;
    let mut support_top = plank_top;
    for (j, other) in state.anvils.iter().enumerate() {
        if j == i || !other.is_resting() {
            continue;
        }
        if (anvil_x - other.pos.x).abs() < (anvil_width + other.size.x) / 2.0 + 10.0 {
            blocked = true;
            support_top = support_top.min(other.top());
        }
    }

    state.anvils[i].hit_seesaw = true;

    if is_big {
        let impact = impact_velocity.abs() * 3.0 + 8.0;
        state.anvils[i].impact_force = impact;

        if state.ball.on_seesaw && !state.is_respawning() {
            catapult_ball(state, anvil_x, impact);
        }

        // Heavy landings kick up water even without a catapult
        particles::spawn_splash(
            &mut state.splash,
            &mut state.events,
            &mut state.rng,
            Vec2::new(anvil_x, plank_top),
            SplashKind::Anvil,
            impact,
        );
    }

    let angle = state.seesaw.angle;
    let a = &mut state.anvils[i];
    if blocked {
        a.pos.y = support_top - a.half_height();
    } else {
        let lever = a.pos.x - layout.seesaw_x;
        a.pos.y = plank_top + lever * angle.tan() - a.half_height();
    }
    a.velocity_y = 0.0;
    a.slide_direction = slide_direction(angle);
    log::trace!(
        "anvil landed at x={:.0} (big={}, stacked={})",
        anvil_x,
        is_big,
        blocked
    );
}

/// Big-anvil landing vs a ball riding the plank.
///
/// Opposite sides of the pivot work like a catapult: the anvil's lever
/// arm sets the launch power and the ball flies up and outward. On the
/// same side the ball just gets shoved clear.
fn catapult_ball(state: &mut GameState, anvil_x: f32, impact: f32) {
    let layout = state.layout;
    let anvil_lever = anvil_x - layout.seesaw_x;
    let ball_lever = state.ball.pos.x - layout.seesaw_x;

    if anvil_lever * ball_lever < 0.0 {
        let leverage = anvil_lever.abs() / (layout.seesaw_width / 2.0);
        let power = impact * (1.5 + leverage * 3.0);
        let dir = ball_lever.signum();

        state.ball.vel.y = -(power * 2.0).min(25.0);
        state.ball.vel.x = dir * (power * 1.2).min(18.0);
        state.ball.on_seesaw = false;
        log::debug!("catapult launch, power {power:.1}");

        particles::spawn_splash(
            &mut state.splash,
            &mut state.events,
            &mut state.rng,
            Vec2::new(anvil_x, layout.seesaw_top()),
            SplashKind::Anvil,
            impact * 1.5,
        );
    } else if (anvil_lever - ball_lever).abs() < 50.0 {
        let dir = if state.ball.pos.x > anvil_x { 1.0 } else { -1.0 };
        state.ball.vel.x = dir * impact * 0.8;
        state.ball.vel.y = -impact * 1.2;
        state.ball.on_seesaw = false;
    }
}

/// Ball vs one anvil, checked at both the current and the predicted
/// next ball position so neither can pass through the other.
fn resolve_ball_contact(state: &mut GameState, i: usize, tuning: &Tuning) {
    if state.anvils[i].crushed_ball || state.is_respawning() {
        return;
    }

    let (pos, half) = {
        let a = &state.anvils[i];
        (a.pos, a.size / 2.0)
    };
    let hit_now = rect_circle_overlap(state.ball.pos, state.ball.radius, pos, half);
    let hit_next =
        rect_circle_overlap(state.ball.pos + state.ball.vel, state.ball.radius, pos, half);
    if !hit_now && !hit_next {
        return;
    }

    let falling = !state.anvils[i].hit_seesaw || state.anvils[i].falling_off;
    if falling {
        state.anvils[i].crushed_ball = true;
        // Only a grounded ball gets crushed; mid-air contact deflects
        if state.ball.on_seesaw || state.ball.pos.y >= state.layout.height - 150.0 {
            ball::squish_ball(state);
        } else {
            let anvil = state.anvils[i].clone();
            collision::deflect_ball(&mut state.ball, &anvil, tuning, &mut state.rng);
        }
    } else {
        push_ball_off_resting(state, i);
    }
}

/// The ball may perch on top of a resting anvil but never clip into
/// its sides.
fn push_ball_off_resting(state: &mut GameState, i: usize) {
    let a = state.anvils[i].clone();
    let ball = &mut state.ball;
    let (side_pad, push_speed) = if a.is_big { (5.0, 4.0) } else { (2.0, 2.0) };

    if ball.pos.y < a.top() && ball.vel.y >= 0.0 {
        ball.pos.y = a.top() - ball.radius;
        ball.vel.y = 0.0;
    } else if (ball.pos.y - a.pos.y).abs() < a.half_height() + ball.radius / 2.0 {
        let dir = if ball.pos.x < a.pos.x { -1.0 } else { 1.0 };
        ball.pos.x = a.pos.x + dir * (a.half_width() + ball.radius + side_pad);
        ball.vel.x = dir * push_speed;
    }
}

/// Resting anvils ride the plank surface, push their neighbors apart,
/// and slide toward the low end until they drop off the edge.
fn update_resting(state: &mut GameState, i: usize, _tuning: &Tuning) {
    if !state.anvils[i].is_resting() {
        return;
    }
    let layout = state.layout;
    let angle = state.seesaw.angle;

    {
        let a = &mut state.anvils[i];
        let lever = a.pos.x - layout.seesaw_x;
        a.pos.y = layout.seesaw_top() + lever * angle.tan() - a.half_height();
    }

    let mut blocked = false;
    for j in 0..state.anvils.len() {
        if j == i || !state.anvils[j].is_resting() {
            continue;
        }
        let (a, other) = pair_mut(&mut state.anvils, i, j);
        let dist_x = (a.pos.x - other.pos.x).abs();
        let dist_y = (a.pos.y - other.pos.y).abs();
        let overlap_x = dist_x < (a.size.x + other.size.x) / 2.0 + 3.0;
        let overlap_y = dist_y < (a.size.y + other.size.y) / 2.0 + 3.0;
        if !(overlap_x && overlap_y) {
            continue;
        }

        // Push the pair apart symmetrically
        let away = if a.pos.x < other.pos.x { -1.0 } else { 1.0 };
        let separation = (a.size.x + other.size.x) / 2.0 + 5.0 - dist_x;
        a.pos.x += away * (separation / 2.0 + 1.0);
        other.pos.x -= away * (separation / 2.0 + 1.0);

        // A sliding anvil shunts its neighbor along and may shove it
        // right off the edge
        if a.slide_direction as f32 * away < 0.0 {
            other.pos.x -= away * 2.0;
            other.slide_direction = -away as i8;
            if other.pos.x <= layout.seesaw_left() || other.pos.x >= layout.seesaw_right() {
                other.falling_off = true;
                other.velocity_y = 1.0;
            }
            blocked = true;
        }
    }

    let a = &mut state.anvils[i];
    a.slide_direction = slide_direction(angle);
    if !blocked && a.slide_direction != 0 {
        a.pos.x += a.slide_direction as f32 * ANVIL_SLIDE_SPEED;
    }
    if a.pos.x <= layout.seesaw_left() || a.pos.x >= layout.seesaw_right() {
        a.falling_off = true;
        a.velocity_y = 1.0;
    }
}

fn slide_direction(angle: f32) -> i8 {
    if angle > TILT_DEADBAND {
        1
    } else if angle < -TILT_DEADBAND {
        -1
    } else {
        0
    }
}

fn pair_mut(anvils: &mut [Anvil], i: usize, j: usize) -> (&mut Anvil, &mut Anvil) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = anvils.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = anvils.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
