//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Stepped only by the caller, at the caller's fixed rate
//! - Seeded RNG only
//! - Stable iteration order (platforms in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod events;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{FeetLine, feet_touch_platform, find_contact};
pub use difficulty::{
    GapBounds, TypeWeights, classify, sample_gap, spawn_gap_bounds, type_weights,
};
pub use events::{DebugEvent, DebugLog, GameEvent, Listener};
pub use snapshot::{PlatformView, Snapshot};
pub use state::{Avatar, Direction, InvalidDirection, Platform, PlatformKind, World};
pub use tick::advance;
