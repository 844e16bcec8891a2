//! Fixed timestep simulation step
//!
//! Order within a step: spawn check, platform ticks, avatar motion, scroll,
//! collision, wraparound, death. Platform ticks always run before the
//! collision check so landings see current platform positions.

use super::collision::find_contact;
use super::difficulty;
use super::events::{DebugEvent, GameEvent};
use super::state::World;
use crate::consts::*;

/// Slack when comparing the platform clock against the tick length
const CLOCK_EPSILON: f32 = 1e-6;

/// Advance the world by one step. `steps_per_second` is the caller's step rate
/// and scales velocities into per-step displacements.
pub fn advance(world: &mut World, steps_per_second: f32) {
    world.events.clear();

    if !world.avatar.alive {
        return;
    }
    if steps_per_second.is_nan() || steps_per_second <= 0.0 {
        log::warn!("Ignoring step with non-positive rate {}", steps_per_second);
        return;
    }

    world.time_ticks += 1;

    spawn_if_needed(world);
    run_platform_ticks(world, 1.0 / steps_per_second);
    step_avatar(world, steps_per_second);
    refill_if_empty(world);

    if world.listener.is_some() {
        let snapshot = world.snapshot();
        if let Some(listener) = world.listener.as_mut() {
            listener.display(&snapshot);
        }
    }
}

/// Spawn a platform above the canvas once the top-most one has dropped below
/// a gap sampled from the current score
fn spawn_if_needed(world: &mut World) {
    let top_y = match world.platforms.last() {
        Some(platform) => platform.pos.y,
        None => {
            log::error!("No platforms left while the avatar is alive");
            panic!("platform collection emptied while the avatar is alive");
        }
    };

    let bounds = difficulty::spawn_gap_bounds(world.score);
    let uniform = world.sample_unit();
    let gap = difficulty::gap_within(&bounds, world.score, uniform);

    if top_y > gap {
        world.emit_debug(DebugEvent::gaps(&bounds, gap));
        world.spawn_platform();
    }
}

/// A single large scroll (low step rates) can push every platform off the
/// canvas; keep one above the screen so the avatar always has a spawn reference
fn refill_if_empty(world: &mut World) {
    if world.avatar.alive && world.platforms.is_empty() {
        log::debug!("All platforms scrolled away, spawning a replacement");
        world.spawn_platform();
    }
}

/// Run the platform ticks covered by `elapsed` seconds
fn run_platform_ticks(world: &mut World, elapsed: f32) {
    let tick_dt = 1.0 / world.platform_tick_hz;
    world.platform_clock += elapsed;

    let ticks = ((world.platform_clock + CLOCK_EPSILON) / tick_dt).floor() as u32;
    world.platform_clock = (world.platform_clock - ticks as f32 * tick_dt).max(0.0);

    for _ in 0..ticks {
        tick_platforms(world);
    }
}

/// One tick of moving and collapsing platforms; removes any that fell off
fn tick_platforms(world: &mut World) {
    let (width, height) = (world.width, world.height);
    let mut removed = Vec::new();

    world.platforms.retain_mut(|platform| {
        if !platform.is_animated() {
            return true;
        }
        let gone = platform.platform_tick(width, height);
        if gone {
            removed.push(platform.id);
        }
        !gone
    });

    for id in removed {
        log::debug!("Platform {} collapsed out of view", id);
        world.events.push(GameEvent::PlatformRemoved { id });
    }
}

/// Shift every platform down by `distance` and award points for it
fn scroll_world(world: &mut World, distance: f32) {
    let height = world.height;
    let mut removed = Vec::new();

    world.platforms.retain_mut(|platform| {
        let gone = platform.scroll_down(distance, height);
        if gone {
            removed.push(platform.id);
        }
        !gone
    });

    let points = (distance / SCROLL_PER_POINT).floor() as u64;
    world.score += points;
    world.events.push(GameEvent::Scrolled { distance, points });

    for id in removed {
        world.events.push(GameEvent::PlatformRemoved { id });
    }
}

/// Gravity, movement, scrolling, landing, wraparound and death for one step
fn step_avatar(world: &mut World, steps_per_second: f32) {
    world.avatar.integrate(steps_per_second);

    // Climbing past the scroll line moves the world instead of the avatar
    let scroll_line = world.height * SCROLL_LINE;
    if world.avatar.pos.y < scroll_line {
        world.avatar.pos.y = scroll_line;
        let distance = world.avatar.vertical_velocity.abs() / steps_per_second;
        scroll_world(world, distance);
    }

    if world.avatar.is_falling() {
        let feet = world.avatar.feet();
        if let Some(index) = find_contact(&feet, &world.platforms) {
            world.avatar.jump();

            let platform = &mut world.platforms[index];
            let (id, kind) = (platform.id, platform.kind);
            let collapsed = platform.trigger_collapse();

            world.events.push(GameEvent::Bounced { id, kind });
            if collapsed {
                log::debug!("Platform {} starts collapsing", id);
                world.events.push(GameEvent::CollapseStarted { id });
            }
        }
    }

    world.avatar.wrap_horizontal(world.width);

    if world.avatar.pos.y > world.height {
        world.avatar.alive = false;
        log::info!("Avatar fell out of the world with score {}", world.score);
        world.events.push(GameEvent::Died { score: world.score });
    }
}

impl World {
    /// Advance the simulation by one fixed step
    pub fn advance(&mut self, steps_per_second: f32) {
        advance(self, steps_per_second);
    }
}
