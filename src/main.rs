//! Anvil Rain entry point
//!
//! Headless demo loop: runs the simulation at its fixed 60 Hz rate
//! with a scripted pilot and logs a snapshot once per second. A real
//! front-end drives `tick` with live input and draws from `snapshot`.

use std::panic::{self, AssertUnwindSafe, UnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use anvil_rain::consts::*;
use anvil_rain::{DeviceClass, DisplayMetrics, GameEvent, GameState, TickInput, Tuning, tick};

fn main() {
    env_logger::init();

    let device = std::env::args()
        .nth(1)
        .and_then(|s| DeviceClass::from_str(&s))
        .unwrap_or_default();
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EE5A11);

    let tuning = Tuning::for_device(device);
    let metrics = DisplayMetrics::base(&tuning);
    let mut state = GameState::new(&tuning, metrics, seed);
    log::info!("anvil-rain demo ({} preset, seed {seed})", device.as_str());

    let tick_ms = TICK_DT as f64 * 1000.0;
    let mut last = Instant::now();
    let mut carry = 0.0f64;

    loop {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f64() * 1000.0;
        last = now;

        // A long stall (debugger, machine suspend) skips time instead
        // of fast-forwarding through it
        if elapsed_ms > STALL_THRESHOLD_MS {
            log::warn!("skipping a {elapsed_ms:.0}ms stall");
            carry = 0.0;
            continue;
        }

        carry += elapsed_ms;
        while carry >= tick_ms {
            carry -= tick_ms;

            let input = pilot(&state);
            contain_fault(AssertUnwindSafe(|| tick(&mut state, &input, &tuning)));

            for event in state.drain_events() {
                let GameEvent::Splash { pos, kind, magnitude } = event;
                log::debug!("splash {kind:?} at ({:.0}, {:.0}), magnitude {magnitude:.1}", pos.x, pos.y);
            }

            if state.time_ticks % 60 == 0 {
                let snap = state.snapshot();
                log::info!(
                    "t={:>5.0}s lives={} ball=({:>4.0},{:>4.0}) angle={:+.2} anvils={} geysers={}",
                    snap.survival_time,
                    snap.lives,
                    snap.ball.pos.x,
                    snap.ball.pos.y,
                    snap.seesaw_angle,
                    snap.anvils.len(),
                    snap.water_pockets.len(),
                );
            }

            if state.snapshot().game_over {
                log::info!("game over, survived {:.1}s", state.survival_time());
                return;
            }
        }

        thread::sleep(Duration::from_millis(2));
    }
}

/// Run one frame's worth of simulation, containing any fault so one
/// bad tick never halts the loop. Returns whether the frame ran clean.
fn contain_fault<F: FnOnce() + UnwindSafe>(f: F) -> bool {
    match panic::catch_unwind(f) {
        Ok(()) => true,
        Err(err) => {
            let msg = err
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| err.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown panic");
            log::error!("tick faulted: {msg}");
            false
        }
    }
}

/// Keep the demo alive for a while: drift back over the pivot and hop
/// when an anvil is falling straight at the ball.
fn pilot(state: &GameState) -> TickInput {
    let ball = &state.ball;
    let offset = ball.pos.x - state.layout.seesaw_x;

    let threat = state.anvils.iter().any(|a| {
        !a.hit_seesaw
            && a.pos.y < ball.pos.y
            && (a.pos.x - ball.pos.x).abs() < a.size.x / 2.0 + ball.radius + 40.0
    });

    TickInput {
        left: offset > 30.0,
        right: offset < -30.0,
        jump: threat && state.time_ticks % 2 == 0,
        down: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faulting_frame_is_contained() {
        assert!(contain_fault(|| ()));
        // A panicking frame is swallowed and the caller keeps going
        assert!(!contain_fault(|| panic!("boom")));
        assert!(!contain_fault(|| panic!("{}", String::from("boom"))));
    }

    #[test]
    fn test_simulation_survives_a_contained_fault() {
        let tuning = Tuning::desktop();
        let metrics = DisplayMetrics::base(&tuning);
        let mut state = GameState::new(&tuning, metrics, 1);
        let input = TickInput::default();

        contain_fault(AssertUnwindSafe(|| tick(&mut state, &input, &tuning)));
        contain_fault(AssertUnwindSafe(|| panic!("mid-run fault")));
        contain_fault(AssertUnwindSafe(|| tick(&mut state, &input, &tuning)));
        assert_eq!(state.time_ticks, 2);
    }
}
