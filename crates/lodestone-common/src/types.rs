use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

pub type Result<T> = std::result::Result<T, crate::error::LodestoneError>;

/// An absolute point in the world. Block `(x, y, z)` spans `[x, x + 1)` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        (other - *self).length()
    }

    /// Floors every axis toward negative infinity.
    pub fn floored(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<BlockPos> for Position {
    fn from(pos: BlockPos) -> Self {
        Position::new(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}

/// A floored block position. Canonical key for everything attached to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floored_rounds_toward_negative_infinity() {
        assert_eq!(Position::new(1.7, 64.0, 2.2).floored(), BlockPos::new(1, 64, 2));
        assert_eq!(
            Position::new(-0.5, -1.0, -15.01).floored(),
            BlockPos::new(-1, -1, -16)
        );
    }

    #[test]
    fn test_vector_ops() {
        let a = Position::new(1.0, 2.0, 3.0);
        let b = Position::new(4.0, 6.0, 3.0);
        assert_eq!(b - a, Position::new(3.0, 4.0, 0.0));
        assert_eq!((b - a).length(), 5.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a * 2.0, Position::new(2.0, 4.0, 6.0));
        assert_eq!(a + b, Position::new(5.0, 8.0, 6.0));
        assert_eq!(a.offset(0.0, 1.5, 0.0), Position::new(1.0, 3.5, 3.0));
    }

    #[test]
    fn test_block_pos_display() {
        assert_eq!(BlockPos::new(-3, 70, 12).to_string(), "(-3, 70, 12)");
        assert_eq!(Position::from(BlockPos::new(2, 3, 4)), Position::new(2.0, 3.0, 4.0));
    }
}
