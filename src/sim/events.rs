//! Events emitted by the simulation
//!
//! `GameEvent`s are collected per step and drained by the caller (audio,
//! effects). `DebugEvent`s and frame snapshots are pushed to an optional
//! [`Listener`]; nothing in the simulation depends on whether one is attached.

use serde::Serialize;

use super::difficulty::{GapBounds, TypeWeights};
use super::snapshot::Snapshot;
use super::state::PlatformKind;

/// Gameplay events produced during a step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    PlatformSpawned { id: u32, kind: PlatformKind },
    /// Avatar bounced off a platform
    Bounced { id: u32, kind: PlatformKind },
    CollapseStarted { id: u32 },
    /// Platform left the bottom of the canvas
    PlatformRemoved { id: u32 },
    /// World scrolled down to follow the climbing avatar
    Scrolled { distance: f32, points: u64 },
    Died { score: u64 },
}

/// Diagnostics emitted while generating platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum DebugEvent {
    /// Gap sampled for a platform spawn
    Gaps { min_gap: f32, max_gap: f32, gap: f32 },
    /// Type distribution used to classify a platform
    Prob(TypeWeights),
}

impl DebugEvent {
    pub fn gaps(bounds: &GapBounds, gap: f32) -> Self {
        DebugEvent::Gaps {
            min_gap: bounds.min_gap,
            max_gap: bounds.max_gap,
            gap,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DebugEvent::Gaps { .. } => "gaps",
            DebugEvent::Prob(_) => "prob",
        }
    }
}

/// Observer for presentation and diagnostics layers
pub trait Listener {
    /// Called with `"gaps"` and `"prob"` diagnostics
    fn debug(&mut self, _event: &DebugEvent) {}

    /// Called after every step with the state to draw
    fn display(&mut self, _snapshot: &Snapshot) {}
}

/// Listener that keeps every debug event, handy for tests and tooling
#[derive(Debug, Default)]
pub struct DebugLog {
    pub events: Vec<DebugEvent>,
    pub frames: usize,
}

impl Listener for DebugLog {
    fn debug(&mut self, event: &DebugEvent) {
        self.events.push(*event);
    }

    fn display(&mut self, _snapshot: &Snapshot) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_event_names() {
        let gaps = DebugEvent::gaps(
            &GapBounds {
                min_gap: 30.0,
                max_gap: 120.0,
            },
            42.0,
        );
        assert_eq!(gaps.name(), "gaps");

        let prob = DebugEvent::Prob(TypeWeights {
            normal: 1.0,
            moving: 0.0,
            falling: 0.0,
        });
        assert_eq!(prob.name(), "prob");
    }

    #[test]
    fn test_debug_event_json_shape() {
        let gaps = DebugEvent::gaps(
            &GapBounds {
                min_gap: 30.0,
                max_gap: 120.0,
            },
            42.0,
        );
        let json = serde_json::to_value(gaps).unwrap();
        assert_eq!(json["name"], "gaps");
        assert_eq!(json["min_gap"], 30.0);
        assert_eq!(json["max_gap"], 120.0);
        assert_eq!(json["gap"], 42.0);
    }
}
