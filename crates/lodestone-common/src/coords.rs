use crate::types::{BlockPos, Position};

/// Horizontal extent of a chunk column.
pub const COLUMN_WIDTH: i32 = 16;
/// Vertical extent of a chunk column.
pub const COLUMN_HEIGHT: i32 = 256;
/// Height of a single section inside a column.
pub const SECTION_HEIGHT: i32 = 16;
/// Number of sections stacked in a column.
pub const SECTION_COUNT: usize = (COLUMN_HEIGHT / SECTION_HEIGHT) as usize;

/// Identifies a chunk column by its corner divided by 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub x: i32,
    pub z: i32,
}

impl ColumnKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column owning the absolute block coordinates `(x, z)`.
    pub fn from_block(x: i32, z: i32) -> Self {
        Self::new(x.div_euclid(COLUMN_WIDTH), z.div_euclid(COLUMN_WIDTH))
    }

    pub fn from_position(point: Position) -> Self {
        let pos = point.floored();
        Self::from_block(pos.x, pos.z)
    }

    /// World coordinates of the column's lowest corner.
    pub fn corner(&self) -> BlockPos {
        BlockPos::new(self.x * COLUMN_WIDTH, 0, self.z * COLUMN_WIDTH)
    }
}

/// Coordinates inside a single column, always within `16 x 256 x 16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        debug_assert!(x < 16 && y < 256 && z < 16);
        Self { x, y, z }
    }

    pub fn section(&self) -> usize {
        self.y >> 4
    }

    /// Index of this cell inside its 16x16x16 section.
    pub fn section_index(&self) -> usize {
        ((self.y & 15) << 8) | (self.z << 4) | self.x
    }

    /// Absolute position of this cell inside the column identified by `key`.
    pub fn to_absolute(&self, key: ColumnKey) -> BlockPos {
        key.corner()
            .offset(self.x as i32, self.y as i32, self.z as i32)
    }
}

/// Maps an absolute block position to its coordinates inside the owning column.
pub fn to_local(pos: BlockPos) -> LocalPos {
    LocalPos {
        x: pos.x.rem_euclid(COLUMN_WIDTH) as usize,
        y: pos.y.rem_euclid(COLUMN_HEIGHT) as usize,
        z: pos.z.rem_euclid(COLUMN_WIDTH) as usize,
    }
}

/// Whether `y` lies inside the vertical extent of a column.
pub fn in_height(y: i32) -> bool {
    (0..COLUMN_HEIGHT).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_key_from_block() {
        assert_eq!(ColumnKey::from_block(0, 0), ColumnKey::new(0, 0));
        assert_eq!(ColumnKey::from_block(15, 31), ColumnKey::new(0, 1));
        assert_eq!(ColumnKey::from_block(-1, -16), ColumnKey::new(-1, -1));
        assert_eq!(ColumnKey::from_block(-17, 16), ColumnKey::new(-2, 1));
    }

    #[test]
    fn test_column_key_from_fractional_position() {
        let key = ColumnKey::from_position(Position::new(-0.25, 70.0, 16.9));
        assert_eq!(key, ColumnKey::new(-1, 1));
        assert_eq!(key.corner(), BlockPos::new(-16, 0, 16));
    }

    #[test]
    fn test_to_local_is_never_negative() {
        assert_eq!(to_local(BlockPos::new(-1, 64, -16)), LocalPos::new(15, 64, 0));
        assert_eq!(to_local(BlockPos::new(33, 255, 47)), LocalPos::new(1, 255, 15));
        assert_eq!(to_local(BlockPos::new(5, -1, 5)).y, 255);
    }

    #[test]
    fn test_local_round_trip() {
        let pos = BlockPos::new(-35, 130, 77);
        let key = ColumnKey::from_block(pos.x, pos.z);
        assert_eq!(to_local(pos).to_absolute(key), pos);
    }

    #[test]
    fn test_section_index() {
        let local = LocalPos::new(3, 17, 2);
        assert_eq!(local.section(), 1);
        assert_eq!(local.section_index(), (1 << 8) | (2 << 4) | 3);
        assert!(in_height(0) && in_height(255));
        assert!(!in_height(-1) && !in_height(256));
    }
}
