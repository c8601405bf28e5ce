use serde::{Deserialize, Serialize};

/// Stable caller-supplied star identifier.
pub type StarId = String;

/// Cartesian coordinates for a star, in light-years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Coordinate along a splitting axis (0 = x, 1 = y, 2 = z).
    pub(crate) fn coord(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Calculate the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance; avoids the square root while comparing.
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

/// A star record: a unique identifier paired with a fixed position.
///
/// Identifiers must be unique within one index or graph build; duplicates are
/// rejected at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub id: StarId,
    pub position: Point3,
}

impl Star {
    pub fn new(id: impl Into<StarId>, position: Point3) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}
