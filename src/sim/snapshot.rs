//! Read-only view of the world for renderers
//!
//! Copied out of [`World`] after each step so the presentation layer never
//! touches simulation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, Platform, PlatformKind, World};
use crate::consts::{PLATFORM_HEIGHT, PLATFORM_WIDTH};

/// Drawable platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl From<&Platform> for PlatformView {
    fn from(p: &Platform) -> Self {
        Self {
            x: p.pos.x,
            y: p.pos.y,
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            kind: p.kind,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub avatar_position: Vec2,
    /// Currently held direction
    pub avatar_direction: Direction,
    /// Last non-zero direction (sprite facing)
    pub facing: Direction,
    pub platforms: Vec<PlatformView>,
    pub score: u64,
    pub is_alive: bool,
}

impl Snapshot {
    pub fn capture(world: &World) -> Self {
        Self {
            avatar_position: world.avatar.pos,
            avatar_direction: world.avatar.direction,
            facing: world.avatar.last_direction,
            platforms: world.platforms.iter().map(PlatformView::from).collect(),
            score: world.score,
            is_alive: world.avatar.alive,
        }
    }
}

impl World {
    /// Build the renderer view of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }
}
