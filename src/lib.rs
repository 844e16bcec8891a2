//! Doodle Jump - simulation core for a vertical platform jumper
//!
//! Core modules:
//! - `sim`: Deterministic simulation (avatar physics, platforms, difficulty, collisions)
//! - `settings`: Canvas bounds, step rates and seed

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{Direction, InvalidDirection, Listener, Snapshot, World};

/// Game configuration constants
pub mod consts {
    /// Default main simulation rate (steps per second)
    pub const DEFAULT_STEPS_PER_SECOND: f32 = 60.0;
    /// Default cadence of platform self-updates (moving and collapsing platforms)
    pub const DEFAULT_PLATFORM_TICK_HZ: f32 = 60.0;

    /// Default playfield dimensions (pixels)
    pub const DEFAULT_CANVAS_WIDTH: u32 = 480;
    pub const DEFAULT_CANVAS_HEIGHT: u32 = 640;

    /// Avatar bounding box used for all collision math
    pub const AVATAR_WIDTH: f32 = 57.0;
    pub const AVATAR_HEIGHT: f32 = 50.0;
    /// Velocity increment applied every step (pixels/s per step)
    pub const GRAVITY: f32 = 20.0;
    /// Upward velocity after landing on a platform (pixels/s)
    pub const JUMP_FORCE: f32 = 850.0;
    /// Horizontal speed when a direction is held (pixels/s)
    pub const SPEED: f32 = 300.0;

    /// Foot segment, relative to the avatar's top-left corner
    pub const FEET_LEFT: f32 = 16.0;
    pub const FEET_RIGHT: f32 = 57.0;
    pub const FEET_DEPTH: f32 = 80.0;

    /// Avatar may leave the canvas by this much before wrapping to the other side
    pub const WRAP_MARGIN: f32 = 30.0;
    /// Fraction of the canvas height above which the world scrolls instead
    pub const SCROLL_LINE: f32 = 0.35;
    /// Pixels of scroll per point of score
    pub const SCROLL_PER_POINT: f32 = 5.0;

    /// Platform dimensions
    pub const PLATFORM_WIDTH: f32 = 57.0;
    pub const PLATFORM_HEIGHT: f32 = 17.0;
    /// Horizontal shift of a moving platform per platform tick
    pub const MOVING_PLATFORM_STEP: f32 = 3.0;
    /// Descent of a collapsing platform per platform tick
    pub const COLLAPSE_STEP: f32 = 5.0;
    /// Vertical position new platforms spawn at (just above the canvas)
    pub const SPAWN_Y: f32 = -10.0;

    /// Initial scattering: first platform sits this far above the bottom edge
    pub const INITIAL_BOTTOM_OFFSET: f32 = 30.0;
    /// Initial scattering: vertical spacing range [min, max)
    pub const INITIAL_SPACING_MIN: u32 = 30;
    pub const INITIAL_SPACING_MAX: u32 = 70;
}
