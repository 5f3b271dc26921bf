use lodestone_common::BlockPos;

/// A single block changed. `state` is the packed `type << 4 | metadata` id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockChange {
    pub location: BlockPos,
    pub state: u16,
}

/// One entry of a [`MultiBlockChange`], relative to the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockChangeRecord {
    pub x: u8,
    pub z: u8,
    pub y: u8,
    pub state: u16,
}

impl BlockChangeRecord {
    /// Builds a record from the wire form, where `horizontal_pos` packs x in
    /// the high nibble and z in the low nibble.
    pub fn from_horizontal(horizontal_pos: u8, y: u8, state: u16) -> Self {
        Self {
            x: (horizontal_pos >> 4) & 0x0F,
            z: horizontal_pos & 0x0F,
            y,
            state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiBlockChange {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub records: Vec<BlockChangeRecord>,
}

impl MultiBlockChange {
    /// Absolute positions and states of every record.
    pub fn changes(&self) -> impl Iterator<Item = (BlockPos, u16)> + '_ {
        let base_x = self.chunk_x * 16;
        let base_z = self.chunk_z * 16;
        self.records.iter().map(move |record| {
            (
                BlockPos::new(
                    base_x + record.x as i32,
                    record.y as i32,
                    base_z + record.z as i32,
                ),
                record.state,
            )
        })
    }
}

/// Every affected offset becomes air.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub offsets: Vec<(i8, i8, i8)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_unpacking() {
        let record = BlockChangeRecord::from_horizontal(0x3A, 64, 1 << 4);
        assert_eq!((record.x, record.z, record.y), (3, 10, 64));
    }

    #[test]
    fn test_multi_block_change_positions() {
        let change = MultiBlockChange {
            chunk_x: -1,
            chunk_z: 2,
            records: vec![
                BlockChangeRecord::from_horizontal(0x00, 10, 16),
                BlockChangeRecord::from_horizontal(0xFF, 255, 32),
            ],
        };
        let changes: Vec<_> = change.changes().collect();
        assert_eq!(
            changes,
            vec![
                (BlockPos::new(-16, 10, 32), 16),
                (BlockPos::new(-1, 255, 47), 32),
            ]
        );
    }
}
