//! Game state and core simulation types
//!
//! Everything a single play session needs lives in [`World`]. Platforms and the
//! avatar never hold a reference back to the world; bounds and the platform
//! list are passed in where an operation needs them.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty;
use super::events::{DebugEvent, GameEvent, Listener};
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Horizontal input direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    None,
    Right,
}

impl Direction {
    /// Signed unit value (-1, 0, 1)
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::None => 0.0,
            Direction::Right => 1.0,
        }
    }
}

/// A direction value outside {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDirection(pub i8);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid direction {} (expected -1, 0 or 1)", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

impl TryFrom<i8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Left),
            0 => Ok(Direction::None),
            1 => Ok(Direction::Right),
            other => Err(InvalidDirection(other)),
        }
    }
}

/// Platform types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Static landing surface
    #[default]
    Normal,
    /// Oscillates horizontally between the canvas edges
    Moving,
    /// Drops out of the world after the avatar lands on it
    Falling,
}

/// A platform entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub kind: PlatformKind,
    /// +1 or -1, only used by moving platforms
    pub direction: f32,
    /// Set once a falling platform has been landed on
    pub collapsing: bool,
}

impl Platform {
    pub fn new(id: u32, pos: Vec2, kind: PlatformKind) -> Self {
        Self {
            id,
            pos,
            kind,
            direction: 1.0,
            collapsing: false,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + PLATFORM_WIDTH
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + PLATFORM_HEIGHT
    }

    /// Whether this platform still runs a periodic update
    pub fn is_animated(&self) -> bool {
        match self.kind {
            PlatformKind::Normal => false,
            PlatformKind::Moving => true,
            PlatformKind::Falling => self.collapsing,
        }
    }

    /// One platform tick of autonomous motion.
    ///
    /// Moving platforms reverse only after crossing an edge, so they overshoot
    /// by up to one step. Returns true once the platform is below `height`.
    pub fn platform_tick(&mut self, width: f32, height: f32) -> bool {
        match self.kind {
            PlatformKind::Normal => {}
            PlatformKind::Moving => {
                self.pos.x += self.direction * MOVING_PLATFORM_STEP;
                if self.pos.x > width - PLATFORM_WIDTH {
                    self.direction = -1.0;
                }
                if self.pos.x < 0.0 {
                    self.direction = 1.0;
                }
            }
            PlatformKind::Falling => {
                if self.collapsing {
                    return self.scroll_down(COLLAPSE_STEP, height);
                }
            }
        }
        false
    }

    /// Shift the platform down. Returns true when it has left the canvas
    /// and should be removed by its owner.
    pub fn scroll_down(&mut self, delta: f32, height: f32) -> bool {
        self.pos.y += delta;
        self.is_out_of_bounds(height)
    }

    #[inline]
    pub fn is_out_of_bounds(&self, height: f32) -> bool {
        self.pos.y > height
    }

    /// Start collapsing (falling platforms only). Returns true on the first trigger.
    pub fn trigger_collapse(&mut self) -> bool {
        if self.kind == PlatformKind::Falling && !self.collapsing {
            self.collapsing = true;
            return true;
        }
        false
    }
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    /// Top-left corner of the collision box
    pub pos: Vec2,
    /// Positive means falling (pixels/s)
    pub vertical_velocity: f32,
    pub direction: Direction,
    /// Last held non-zero direction, kept for sprite facing
    pub last_direction: Direction,
    pub alive: bool,
}

impl Avatar {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vertical_velocity: 0.0,
            direction: Direction::None,
            last_direction: Direction::Right,
            alive: true,
        }
    }

    /// Place the avatar two body heights above a platform's top-left corner
    pub fn above(platform_pos: Vec2) -> Self {
        Self::new(Vec2::new(platform_pos.x, platform_pos.y - AVATAR_HEIGHT * 2.0))
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        if direction != Direction::None {
            self.last_direction = direction;
        }
    }

    /// Apply gravity and integrate position over one step
    pub fn integrate(&mut self, steps_per_second: f32) {
        self.vertical_velocity += GRAVITY;
        self.pos.y += self.vertical_velocity / steps_per_second;
        self.pos.x += self.direction.sign() * SPEED / steps_per_second;
    }

    pub fn is_falling(&self) -> bool {
        self.vertical_velocity > 0.0
    }

    /// Bounce off a platform
    pub fn jump(&mut self) {
        self.vertical_velocity = -JUMP_FORCE;
    }

    /// Leave one side of the canvas and reappear on the other
    pub fn wrap_horizontal(&mut self, width: f32) {
        if self.pos.x > width - WRAP_MARGIN {
            self.pos.x = -WRAP_MARGIN;
        }
        if self.pos.x < -WRAP_MARGIN {
            self.pos.x = width - WRAP_MARGIN;
        }
    }
}

/// Complete simulation state for one play session
pub struct World {
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,
    /// Score (vertical distance climbed / 5)
    pub score: u64,
    /// Active platforms in spawn order
    pub platforms: Vec<Platform>,
    pub avatar: Avatar,
    /// Seed the world was created with
    pub seed: u64,
    /// Cadence of platform updates (Hz)
    pub platform_tick_hz: f32,
    /// Simulation step counter since the last reset
    pub time_ticks: u64,
    /// Elapsed time not yet consumed by platform ticks (seconds)
    pub(crate) platform_clock: f32,
    /// Events produced by the last step
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    pub(crate) listener: Option<Box<dyn Listener>>,
    next_id: u32,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("score", &self.score)
            .field("platforms", &self.platforms.len())
            .field("avatar", &self.avatar)
            .field("time_ticks", &self.time_ticks)
            .finish()
    }
}

impl World {
    /// Create a new world from settings
    pub fn new(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    /// Default-sized world with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::build(&Settings {
            seed: Some(seed),
            ..Settings::default()
        })
    }

    /// Construct from settings that already passed validation
    fn build(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut world = Self {
            width: settings.canvas_width as f32,
            height: settings.canvas_height as f32,
            score: 0,
            platforms: Vec::new(),
            avatar: Avatar::new(Vec2::ZERO),
            seed,
            platform_tick_hz: settings.platform_tick_hz,
            time_ticks: 0,
            platform_clock: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            listener: None,
            next_id: 1,
        };
        world.init();
        log::info!(
            "World initialized with seed {} ({}x{}, {} platforms)",
            seed,
            world.width,
            world.height,
            world.platforms.len()
        );
        world
    }

    /// Register the presentation/diagnostics observer
    pub fn set_listener(&mut self, listener: Box<dyn Listener>) {
        self.listener = Some(listener);
    }

    /// Remove and return the registered observer
    pub fn take_listener(&mut self) -> Option<Box<dyn Listener>> {
        self.listener.take()
    }

    /// Discard the session and start over. The RNG stream continues, so
    /// consecutive games differ while staying reproducible from the seed.
    pub fn reset(&mut self) {
        log::info!("World reset (previous score {})", self.score);
        self.init();
    }

    fn init(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.platform_clock = 0.0;
        self.events.clear();
        self.platforms.clear();
        self.next_id = 1;
        let bottom = self.generate_initial_platforms();
        self.avatar = Avatar::above(bottom);
    }

    /// Scatter platforms over the full canvas height, bottom to top.
    /// Returns the position of the bottom platform.
    fn generate_initial_platforms(&mut self) -> Vec2 {
        let bottom = Vec2::new(self.random_platform_x(), self.height - INITIAL_BOTTOM_OFFSET);
        self.push_platform(bottom);

        let mut y = bottom.y - self.initial_spacing();
        while y > 0.0 {
            let x = self.random_platform_x();
            self.push_platform(Vec2::new(x, y));
            y -= self.initial_spacing();
        }
        bottom
    }

    fn initial_spacing(&mut self) -> f32 {
        self.rng
            .random_range(INITIAL_SPACING_MIN..INITIAL_SPACING_MAX) as f32
    }

    /// Random integer x keeping the platform fully on the canvas
    fn random_platform_x(&mut self) -> f32 {
        let span = (self.width - PLATFORM_WIDTH).max(0.0);
        (self.rng.random::<f32>() * span).floor()
    }

    /// Spawn a platform typed from the current score
    fn push_platform(&mut self, pos: Vec2) -> u32 {
        let weights = difficulty::type_weights(self.score);
        self.emit_debug(DebugEvent::Prob(weights));
        let kind = difficulty::pick_kind(&weights, self.rng.random::<f32>());
        let id = self.next_entity_id();
        self.platforms.push(Platform::new(id, pos, kind));
        id
    }

    /// Spawn a new platform just above the visible area
    pub(crate) fn spawn_platform(&mut self) {
        let x = self.random_platform_x();
        let id = self.push_platform(Vec2::new(x, SPAWN_Y));
        let kind = self.platforms.last().map(|p| p.kind).unwrap_or_default();
        log::debug!("Spawned {:?} platform {} at x={} (score {})", kind, id, x, self.score);
        self.events.push(GameEvent::PlatformSpawned { id, kind });
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform sample in [0, 1) from the world's RNG
    pub(crate) fn sample_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub(crate) fn emit_debug(&mut self, event: DebugEvent) {
        log::trace!("debug event {}: {:?}", event.name(), event);
        if let Some(listener) = self.listener.as_mut() {
            listener.debug(&event);
        }
    }

    /// Set the held direction from a raw signal. Values outside {-1, 0, 1}
    /// are rejected and leave the avatar unchanged.
    pub fn set_direction(&mut self, value: i8) -> Result<(), InvalidDirection> {
        match Direction::try_from(value) {
            Ok(direction) => {
                self.avatar.set_direction(direction);
                Ok(())
            }
            Err(err) => {
                log::warn!("Ignoring {}", err);
                Err(err)
            }
        }
    }

    pub fn set_direction_typed(&mut self, direction: Direction) {
        self.avatar.set_direction(direction);
    }

    pub fn is_alive(&self) -> bool {
        self.avatar.alive
    }

    /// Events produced by the most recent step
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the events produced by the most recent step
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn platform(&self, id: u32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_platforms_span_height() {
        let world = World::with_seed(7);
        assert!(!world.platforms.is_empty());

        let first = &world.platforms[0];
        assert_eq!(first.pos.y, world.height - INITIAL_BOTTOM_OFFSET);

        for pair in world.platforms.windows(2) {
            let spacing = pair[0].pos.y - pair[1].pos.y;
            assert!((30.0..70.0).contains(&spacing));
        }
        let last = world.platforms.last().unwrap();
        assert!(last.pos.y > 0.0 && last.pos.y <= 70.0);

        for p in &world.platforms {
            assert_eq!(p.kind, PlatformKind::Normal);
            assert!(p.pos.x >= 0.0 && p.pos.x <= world.width - PLATFORM_WIDTH);
            assert_eq!(p.pos.x, p.pos.x.floor());
        }
    }

    #[test]
    fn test_avatar_starts_above_first_platform() {
        let world = World::with_seed(3);
        let first = &world.platforms[0];
        assert_eq!(world.avatar.pos.x, first.pos.x);
        assert_eq!(world.avatar.pos.y, first.pos.y - 2.0 * AVATAR_HEIGHT);
        assert_eq!(world.avatar.vertical_velocity, 0.0);
        assert!(world.avatar.alive);
        assert_eq!(world.avatar.last_direction, Direction::Right);
    }

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            canvas_height: 20,
            ..Settings::default()
        };
        assert!(matches!(World::new(&settings), Err(SettingsError::Invalid(_))));

        let world = World::new(&Settings {
            seed: Some(9),
            ..Settings::default()
        })
        .unwrap();
        assert_eq!(world.seed, 9);
        assert!(!world.platforms.is_empty());
    }

    #[test]
    fn test_take_listener_detaches_observer() {
        use crate::sim::events::DebugLog;

        let mut world = World::with_seed(2);
        assert!(world.take_listener().is_none());

        world.set_listener(Box::new(DebugLog::default()));
        assert!(world.take_listener().is_some());
        assert!(world.take_listener().is_none());

        // Stepping without an observer is unaffected
        world.advance(60.0);
        assert!(world.is_alive());
    }

    #[test]
    fn test_platform_ids_are_unique() {
        let world = World::with_seed(11);
        let mut ids: Vec<u32> = world.platforms.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), world.platforms.len());
    }

    #[test]
    fn test_set_direction() {
        let mut world = World::with_seed(1);
        assert!(world.set_direction(-1).is_ok());
        assert_eq!(world.avatar.direction, Direction::Left);
        assert_eq!(world.avatar.last_direction, Direction::Left);

        assert!(world.set_direction(0).is_ok());
        assert_eq!(world.avatar.direction, Direction::None);
        // Facing is remembered
        assert_eq!(world.avatar.last_direction, Direction::Left);

        assert_eq!(world.set_direction(2), Err(InvalidDirection(2)));
        assert_eq!(world.avatar.direction, Direction::None);
    }

    #[test]
    fn test_moving_platform_bounces_after_crossing() {
        let width = 480.0;
        let mut platform = Platform::new(1, Vec2::new(width - PLATFORM_WIDTH - 1.0, 100.0), PlatformKind::Moving);

        platform.platform_tick(width, 640.0);
        // Crossed the edge by 2px, direction flips but no clamping
        assert_eq!(platform.pos.x, width - PLATFORM_WIDTH + 2.0);
        assert_eq!(platform.direction, -1.0);

        platform.platform_tick(width, 640.0);
        assert_eq!(platform.pos.x, width - PLATFORM_WIDTH - 1.0);

        let mut platform = Platform::new(2, Vec2::new(1.0, 100.0), PlatformKind::Moving);
        platform.direction = -1.0;
        platform.platform_tick(width, 640.0);
        assert_eq!(platform.pos.x, -2.0);
        assert_eq!(platform.direction, 1.0);
    }

    #[test]
    fn test_falling_platform_inert_until_triggered() {
        let mut platform = Platform::new(1, Vec2::new(10.0, 100.0), PlatformKind::Falling);
        assert!(!platform.is_animated());
        platform.platform_tick(480.0, 640.0);
        assert_eq!(platform.pos.y, 100.0);

        assert!(platform.trigger_collapse());
        assert!(!platform.trigger_collapse());
        platform.platform_tick(480.0, 640.0);
        assert_eq!(platform.pos.y, 100.0 + COLLAPSE_STEP);
    }

    #[test]
    fn test_only_falling_platforms_collapse() {
        let mut platform = Platform::new(1, Vec2::ZERO, PlatformKind::Normal);
        assert!(!platform.trigger_collapse());
        assert!(!platform.collapsing);
    }

    #[test]
    fn test_scroll_down_reports_out_of_bounds() {
        let mut platform = Platform::new(1, Vec2::new(0.0, 630.0), PlatformKind::Normal);
        assert!(!platform.scroll_down(10.0, 640.0));
        assert!(platform.scroll_down(0.5, 640.0));
    }

    #[test]
    fn test_avatar_wraps_horizontally() {
        let mut avatar = Avatar::new(Vec2::new(451.0, 0.0));
        avatar.wrap_horizontal(480.0);
        assert_eq!(avatar.pos.x, -30.0);
        avatar.wrap_horizontal(480.0);
        assert_eq!(avatar.pos.x, -30.0);

        avatar.pos.x = -31.0;
        avatar.wrap_horizontal(480.0);
        assert_eq!(avatar.pos.x, 450.0);
    }
}
