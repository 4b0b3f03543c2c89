//! Water geysers: timed rescue columns rising out of the water.
//!
//! Each side of the playfield runs its own spawn timer and hosts at
//! most one live geyser, so a rescue chance is never far away but the
//! two columns stay staggered.

use glam::Vec2;
use rand::Rng;

use crate::sim::particles;
use crate::sim::state::{GameState, PocketPhase, PocketSide, SplashKind, WaterPocket};
use crate::tuning::Tuning;

/// Run spawn timers and advance every geyser one tick.
pub fn update_water_pockets(state: &mut GameState, tuning: &Tuning) {
    state.left_pocket_timer += 1;
    if state.left_pocket_timer >= tuning.pocket_spawn_period {
        state.left_pocket_timer = 0;
        try_spawn(state, PocketSide::Left, tuning);
    }

    state.right_pocket_timer += 1;
    if state.right_pocket_timer >= tuning.pocket_spawn_period {
        state.right_pocket_timer = 0;
        try_spawn(state, PocketSide::Right, tuning);
    }

    let mut i = 0;
    while i < state.pockets.len() {
        if !advance_phase(&mut state.pockets[i], tuning) {
            state.pockets.remove(i);
            continue;
        }
        rescue_ball(state, i, tuning);
        refresh_spray(state, i, tuning);
        i += 1;
    }
}

fn try_spawn(state: &mut GameState, side: PocketSide, tuning: &Tuning) {
    // One live geyser per side
    if state
        .pockets
        .iter()
        .any(|p| p.side == side && p.height > 0.0)
    {
        return;
    }

    let layout = state.layout;
    let width = tuning.pocket_width;
    let avoid_left = layout.seesaw_left() - tuning.pocket_seesaw_buffer;
    let avoid_right = layout.seesaw_right() + tuning.pocket_seesaw_buffer;

    // Place the column in the open water outside the seesaw's keep-out
    // span, hugging the wall when the span leaves no room
    let x = match side {
        PocketSide::Left => {
            let space = avoid_left - width / 2.0;
            if space > width {
                width / 2.0 + state.rng.random::<f32>() * (space - width / 2.0)
            } else {
                width / 2.0
            }
        }
        PocketSide::Right => {
            let space = layout.width - avoid_right - width / 2.0;
            if space > width {
                avoid_right + width / 2.0 + state.rng.random::<f32>() * (space - width / 2.0)
            } else {
                layout.width - width / 2.0
            }
        }
    };

    let max_height = tuning.pocket_max_height * (0.7 + state.rng.random::<f32>() * 0.6);
    state.pockets.push(WaterPocket {
        x,
        height: 0.0,
        phase: PocketPhase::Rising,
        timer: 0,
        max_height,
        side,
        spray: Vec::new(),
    });
    log::debug!("geyser spawning at x={x:.0} ({side:?}, peak {max_height:.0})");
}

/// Advance the rise/hold/fall lifecycle. Returns false once the column
/// has sunk back into the water.
fn advance_phase(pocket: &mut WaterPocket, tuning: &Tuning) -> bool {
    pocket.timer += 1;
    match pocket.phase {
        PocketPhase::Rising => {
            pocket.height += tuning.pocket_rise_speed;
            if pocket.height >= pocket.max_height {
                pocket.height = pocket.max_height;
                pocket.phase = PocketPhase::Active;
                pocket.timer = 0;
            }
        }
        PocketPhase::Active => {
            if pocket.timer >= tuning.pocket_lifetime {
                pocket.phase = PocketPhase::Falling;
                pocket.timer = 0;
            }
        }
        PocketPhase::Falling => {
            pocket.height -= tuning.pocket_fall_speed;
            if pocket.height <= 0.0 {
                return false;
            }
        }
    }
    true
}

/// A ball touching the column gets thrown back up toward the seesaw.
fn rescue_ball(state: &mut GameState, i: usize, tuning: &Tuning) {
    let (x, height) = {
        let p = &state.pockets[i];
        (p.x, p.height)
    };
    if height <= 0.0 {
        return;
    }

    let layout = state.layout;
    let top = layout.water_level - height;
    let left = x - tuning.pocket_width / 2.0;
    let right = x + tuning.pocket_width / 2.0;
    let ball = &state.ball;

    let touching = ball.pos.x >= left
        && ball.pos.x <= right
        && ball.pos.y + ball.radius >= top
        && ball.pos.y - ball.radius <= layout.water_level;
    if !touching {
        return;
    }

    let ball = &mut state.ball;
    ball.vel.y = tuning.pocket_push_force;
    ball.pos.y = top - ball.radius;
    // Nudge the flight back toward the pivot
    ball.vel.x += (layout.seesaw_x - ball.pos.x).signum() * 3.0;
    ball.air_jumps = 0;
    ball.on_seesaw = false;
    log::debug!("geyser rescue at x={:.0}", state.ball.pos.x);

    let splash_pos = Vec2::new(state.ball.pos.x, top);
    particles::spawn_splash(
        &mut state.splash,
        &mut state.events,
        &mut state.rng,
        splash_pos,
        SplashKind::Ball,
        1.0,
    );
    particles::spawn_spray(
        &mut state.pockets[i].spray,
        &mut state.rng,
        x,
        top,
        tuning.pocket_width,
    );
}

/// Keep the spray pool churning while the column stands.
fn refresh_spray(state: &mut GameState, i: usize, tuning: &Tuning) {
    let (x, top, spraying) = {
        let p = &state.pockets[i];
        (
            p.x,
            state.layout.water_level - p.height,
            matches!(p.phase, PocketPhase::Rising | PocketPhase::Active),
        )
    };
    if spraying && state.rng.random::<f32>() < 0.3 {
        particles::spawn_spray(
            &mut state.pockets[i].spray,
            &mut state.rng,
            x,
            top,
            tuning.pocket_width,
        );
    }
    particles::update_spray(&mut state.pockets[i].spray);
}
