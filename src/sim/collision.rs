//! Collision primitives shared by the anvil and ball systems.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::sim::state::{Anvil, Ball};
use crate::tuning::Tuning;

/// Circle vs axis-aligned rectangle overlap, by closest point.
pub fn rect_circle_overlap(center: Vec2, radius: f32, rect_center: Vec2, half: Vec2) -> bool {
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) <= radius * radius
}

/// Did a downward-moving edge cross a horizontal plane this tick?
///
/// Sub-samples the travel so a fast mover cannot tunnel past the plane
/// between positions. Upward travel never crosses.
pub fn swept_plane_crossing(prev: f32, next: f32, surface: f32) -> bool {
    if next <= prev {
        return false;
    }
    let span = next - prev;
    let steps = ((span / 3.0).ceil() as u32).max(3);
    for i in 1..=steps {
        let y = prev + span * i as f32 / steps as f32;
        if prev <= surface && y >= surface {
            return true;
        }
    }
    false
}

/// Knock an airborne ball clear of a falling anvil.
///
/// Side contact deflects instead of squishing: the ball is forced
/// outside the overlap, then takes a capped impulse along the contact
/// normal plus a share of the anvil's fall speed.
pub(crate) fn deflect_ball(ball: &mut Ball, anvil: &Anvil, tuning: &Tuning, rng: &mut Pcg32) {
    let delta = ball.pos - anvil.pos;
    let distance = delta.length();
    if distance == 0.0 {
        ball.pos.x += ball.radius + 5.0;
        return;
    }
    let normal = delta / distance;

    let mass = tuning.anvil_weight_for(anvil.is_big);
    let power = (anvil.velocity_y.abs() * mass * 0.3).min(15.0);

    // Immediate separation so the pair cannot re-collide next tick
    let anvil_extent = anvil.size.x.max(anvil.size.y) / 2.0;
    let min_sep = ball.radius + anvil_extent + 8.0;
    if distance < min_sep {
        ball.pos = anvil.pos + normal * min_sep;
    }

    // No impulse if the ball is already moving away
    let relative = Vec2::new(ball.vel.x, ball.vel.y - anvil.velocity_y);
    if relative.dot(normal) > 0.0 {
        return;
    }

    ball.vel.x += normal.x * power * 0.8;
    ball.vel.y += normal.y * power * 0.6;
    // Momentum transfer from the anvil's fall
    ball.vel.y += anvil.velocity_y * 0.3;
    ball.vel.x += (rng.random::<f32>() - 0.5) * 2.0;
    ball.vel.y += (rng.random::<f32>() - 0.5) * 1.0;

    ball.vel.x = ball.vel.x.clamp(-20.0, 20.0);
    ball.vel.y = ball.vel.y.clamp(-20.0, 20.0);
    ball.on_seesaw = false;
}
