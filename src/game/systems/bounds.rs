//! Arena boundary confinement
//!
//! Keeps a combatant's body inside the arena walls. The movable region is the
//! arena inset by the body radius on every side, so the body itself never
//! crosses a wall. Height (Y) is never touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::vec3::Vec3;

/// Arena outline on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArenaShape {
    /// Axis-aligned square with side `2 * half_extent`
    #[default]
    Square,
    /// Circle of radius `half_extent`
    Circle,
}

impl ArenaShape {
    /// Clamp a position into this arena (see [`clamp`])
    pub fn clamp(self, position: Vec3, center: Vec3, half_extent: f32, body_radius: f32) -> Vec3 {
        clamp(self, position, center, half_extent, body_radius)
    }
}

impl fmt::Display for ArenaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaShape::Square => write!(f, "square"),
            ArenaShape::Circle => write!(f, "circle"),
        }
    }
}

impl FromStr for ArenaShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(ArenaShape::Square),
            "circle" | "round" => Ok(ArenaShape::Circle),
            other => Err(format!("unknown arena shape '{}'", other)),
        }
    }
}

/// Clamp `position` into the arena centred at `center`.
///
/// Positions already inside the inset region come back unchanged; positions
/// outside land exactly on the nearest point of the inset boundary. If the
/// body is wider than the arena the inset collapses to the centre.
pub fn clamp(
    shape: ArenaShape,
    position: Vec3,
    center: Vec3,
    half_extent: f32,
    body_radius: f32,
) -> Vec3 {
    let limit = (half_extent - body_radius).max(0.0);

    match shape {
        ArenaShape::Square => Vec3::new(
            clamp_axis(position.x, center.x, limit),
            position.y,
            clamp_axis(position.z, center.z, limit),
        ),
        ArenaShape::Circle => {
            let offset = (position - center).horizontal();
            let distance = offset.length();
            if distance <= limit {
                return position;
            }
            let edge = offset * (limit / distance);
            Vec3::new(center.x + edge.x, position.y, center.z + edge.z)
        }
    }
}

#[inline]
fn clamp_axis(value: f32, center: f32, limit: f32) -> f32 {
    let min = center - limit;
    let max = center + limit;
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Whether `position` lies inside the inset region (boundary included)
pub fn contains(
    shape: ArenaShape,
    position: Vec3,
    center: Vec3,
    half_extent: f32,
    body_radius: f32,
) -> bool {
    let limit = (half_extent - body_radius).max(0.0);
    let offset = (position - center).horizontal();
    match shape {
        ArenaShape::Square => offset.x.abs() <= limit && offset.z.abs() <= limit,
        ArenaShape::Circle => offset.length() <= limit,
    }
}
