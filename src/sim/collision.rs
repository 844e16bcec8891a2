//! Collision detection between the avatar's feet and platform tops
//!
//! The avatar only lands while falling. Its feet are a horizontal segment
//! below the collision box; a platform is hit when the segment's height lies
//! within the platform's vertical extent and at least one end of the segment
//! lies within its horizontal extent. All bounds are inclusive.

use glam::Vec2;

use super::state::{Avatar, Platform};
use crate::consts::{FEET_DEPTH, FEET_LEFT, FEET_RIGHT};

/// Horizontal segment at the avatar's feet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeetLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

impl FeetLine {
    pub fn of(pos: Vec2) -> Self {
        Self {
            x1: pos.x + FEET_LEFT,
            x2: pos.x + FEET_RIGHT,
            y: pos.y + FEET_DEPTH,
        }
    }
}

impl Avatar {
    pub fn feet(&self) -> FeetLine {
        FeetLine::of(self.pos)
    }
}

/// Check whether the feet touch a platform
pub fn feet_touch_platform(feet: &FeetLine, platform: &Platform) -> bool {
    if feet.y < platform.top() || feet.y > platform.bottom() {
        return false;
    }
    let within = |x: f32| x >= platform.left() && x <= platform.right();
    within(feet.x1) || within(feet.x2)
}

/// Index of the first platform (in collection order) touched by the feet
pub fn find_contact(feet: &FeetLine, platforms: &[Platform]) -> Option<usize> {
    platforms
        .iter()
        .position(|platform| feet_touch_platform(feet, platform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;

    fn platform_at(id: u32, x: f32, y: f32) -> Platform {
        Platform::new(id, Vec2::new(x, y), PlatformKind::Normal)
    }

    #[test]
    fn test_feet_line_offsets() {
        let feet = FeetLine::of(Vec2::new(100.0, 200.0));
        assert_eq!(feet.x1, 116.0);
        assert_eq!(feet.x2, 157.0);
        assert_eq!(feet.y, 280.0);
    }

    #[test]
    fn test_contact_on_left_edge() {
        let platform = platform_at(1, 200.0, 300.0);
        // Right foot exactly on the platform's left edge
        let feet = FeetLine::of(Vec2::new(200.0 - FEET_RIGHT, 300.0 - FEET_DEPTH));
        assert_eq!(feet.x2, platform.left());
        assert!(feet_touch_platform(&feet, &platform));
    }

    #[test]
    fn test_contact_on_right_edge() {
        let platform = platform_at(1, 200.0, 300.0);
        // Left foot exactly on the platform's right edge
        let feet = FeetLine::of(Vec2::new(200.0 + 57.0 - FEET_LEFT, 300.0 - FEET_DEPTH));
        assert_eq!(feet.x1, platform.right());
        assert!(feet_touch_platform(&feet, &platform));
    }

    #[test]
    fn test_contact_vertical_bounds_inclusive() {
        let platform = platform_at(1, 200.0, 300.0);
        let top = FeetLine { x1: 210.0, x2: 251.0, y: 300.0 };
        let bottom = FeetLine { x1: 210.0, x2: 251.0, y: 317.0 };
        let below = FeetLine { x1: 210.0, x2: 251.0, y: 317.5 };
        let above = FeetLine { x1: 210.0, x2: 251.0, y: 299.5 };
        assert!(feet_touch_platform(&top, &platform));
        assert!(feet_touch_platform(&bottom, &platform));
        assert!(!feet_touch_platform(&below, &platform));
        assert!(!feet_touch_platform(&above, &platform));
    }

    #[test]
    fn test_miss_horizontally() {
        let platform = platform_at(1, 200.0, 300.0);
        let feet = FeetLine { x1: 258.0, x2: 299.0, y: 305.0 };
        assert!(!feet_touch_platform(&feet, &platform));
        let feet = FeetLine { x1: 150.0, x2: 199.0, y: 305.0 };
        assert!(!feet_touch_platform(&feet, &platform));
    }

    #[test]
    fn test_first_platform_wins() {
        let platforms = vec![
            platform_at(1, 0.0, 0.0),
            platform_at(2, 200.0, 300.0),
            platform_at(3, 220.0, 305.0),
        ];
        let feet = FeetLine { x1: 230.0, x2: 271.0, y: 310.0 };
        assert_eq!(find_contact(&feet, &platforms), Some(1));
        assert_eq!(find_contact(&feet, &platforms[2..]), Some(0));
        assert_eq!(find_contact(&feet, &platforms[..1]), None);
    }
}
