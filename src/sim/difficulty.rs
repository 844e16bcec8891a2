//! Score-driven difficulty curves
//!
//! Pure functions of the current score (plus a uniform sample supplied by the
//! caller). The World owns the RNG and reports the results to its listener.

use serde::{Deserialize, Serialize};

use super::state::PlatformKind;

/// Score at which the platform type distribution saturates
pub const DIFFICULTY_SATURATION_SCORE: f32 = 5000.0;
/// Score at which the gap sampling exponent reaches its floor
pub const GAP_EXPONENT_SCORE: f32 = 250.0;

/// Bounds of the vertical gap between the top-most platform and the next spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapBounds {
    pub min_gap: f32,
    pub max_gap: f32,
}

/// Normalized platform type probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeWeights {
    pub normal: f32,
    pub moving: f32,
    pub falling: f32,
}

impl TypeWeights {
    pub fn sum(&self) -> f32 {
        self.normal + self.moving + self.falling
    }
}

/// Difficulty factor in [0, 1]
#[inline]
pub fn difficulty_factor(score: u64) -> f32 {
    (score as f32 / DIFFICULTY_SATURATION_SCORE).min(1.0)
}

/// Minimum and maximum spawn gap for a score. Both grow with score and saturate.
pub fn spawn_gap_bounds(score: u64) -> GapBounds {
    let s = score as f32;
    GapBounds {
        min_gap: (30.0 + s / 20.0).min(240.0),
        max_gap: (120.0 + s / 30.0).min(280.0),
    }
}

/// Sample a spawn gap from a uniform value in [0, 1).
///
/// The sample is raised to an exponent that shrinks from 1 towards 0.2 as the
/// score grows, which pushes the average gap up without moving the bounds.
pub fn sample_gap(score: u64, uniform: f32) -> f32 {
    let bounds = spawn_gap_bounds(score);
    gap_within(&bounds, score, uniform)
}

/// Same as [`sample_gap`] with precomputed bounds
pub fn gap_within(bounds: &GapBounds, score: u64, uniform: f32) -> f32 {
    let exponent = 1.0 - (score as f32 / GAP_EXPONENT_SCORE).min(0.8);
    let factor = uniform.clamp(0.0, 1.0).powf(exponent);
    (bounds.min_gap + factor * (bounds.max_gap - bounds.min_gap)).ceil()
}

/// Platform type probabilities for a score
pub fn type_weights(score: u64) -> TypeWeights {
    let d = difficulty_factor(score);
    let normal = (1.0 - 1.5 * d).max(0.2);
    let moving = (0.8 * d).min(0.4);
    let falling = (0.7 * d).min(0.4);

    let total = normal + moving + falling;
    debug_assert!(total > 0.0, "platform type weights must sum to a positive value");

    TypeWeights {
        normal: normal / total,
        moving: moving / total,
        falling: falling / total,
    }
}

/// Draw a platform type from normalized weights (cumulative, Normal, Moving, Falling)
pub fn pick_kind(weights: &TypeWeights, uniform: f32) -> PlatformKind {
    if uniform < weights.normal {
        PlatformKind::Normal
    } else if uniform < weights.normal + weights.moving {
        PlatformKind::Moving
    } else {
        PlatformKind::Falling
    }
}

/// Classify a new platform from the score at spawn time
pub fn classify(score: u64, uniform: f32) -> PlatformKind {
    pick_kind(&type_weights(score), uniform)
}
