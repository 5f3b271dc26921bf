use crate::block::{Block, BlockSource};
use crate::chunk::{ChunkColumn, BIOME_LEN};
use lodestone_common::{in_height, to_local, BlockPos, ColumnKey, LodestoneError, Position, Result};
use lodestone_logger::{log, LogSeverity::Debug};
use lodestone_protocol::UpdateLight;
use std::collections::HashMap;

/// What a column fragment did to the store. Both carry the column's world corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnChange {
    Loaded(BlockPos),
    Unloaded(BlockPos),
}

/// Every column currently loaded, by key.
#[derive(Debug, Default)]
pub struct ChunkColumnStore {
    columns: HashMap<ColumnKey, ChunkColumn>,
}

impl ChunkColumnStore {
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
        }
    }

    /// Applies one column fragment. A zero `bit_map` unloads the column.
    /// On error the column for `key` is exactly as it was before the call.
    pub fn load_column(
        &mut self,
        key: ColumnKey,
        data: &[u8],
        bit_map: u16,
        sky_light_sent: bool,
        full: bool,
        biomes: Option<&[u8]>,
    ) -> Result<ColumnChange> {
        if bit_map == 0 {
            self.unload_column(key);
            return Ok(ColumnChange::Unloaded(key.corner()));
        }

        let malformed = |reason: String| LodestoneError::MalformedColumn {
            x: key.x,
            z: key.z,
            reason,
        };
        if let Some(biomes) = biomes {
            if biomes.len() != BIOME_LEN {
                return Err(malformed(format!(
                    "expected {} biome bytes, got {}",
                    BIOME_LEN,
                    biomes.len()
                )));
            }
        }

        let mut fresh = None;
        let column = match self.columns.get_mut(&key) {
            Some(column) => column,
            None => fresh.insert(ChunkColumn::new()),
        };
        column
            .load(data, bit_map, sky_light_sent, full)
            .map_err(|err| malformed(err.to_string()))?;
        if let Some(biomes) = biomes {
            column
                .load_biomes(biomes)
                .map_err(|err| malformed(err.to_string()))?;
        }
        if let Some(column) = fresh {
            self.columns.insert(key, column);
        }

        log(format!("Loaded column {}, {}", key.x, key.z), Debug);
        Ok(ColumnChange::Loaded(key.corner()))
    }

    /// Drops the column. Returns whether one was loaded.
    pub fn unload_column(&mut self, key: ColumnKey) -> bool {
        let removed = self.columns.remove(&key).is_some();
        if removed {
            log(format!("Unloaded column {}, {}", key.x, key.z), Debug);
        }
        removed
    }

    /// Merges light into the column, creating it if needed.
    pub fn load_light(&mut self, key: ColumnKey, light: &UpdateLight) {
        self.columns.entry(key).or_default().load_light(light);
    }

    /// `None` when the column is not loaded or `pos` is outside the build height.
    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        if !in_height(pos.y) {
            return None;
        }
        let column = self.columns.get(&ColumnKey::from_block(pos.x, pos.z))?;
        let mut block = column.get_block(to_local(pos));
        block.position = pos;
        Some(block)
    }

    /// Overwrites one cell. Returns `false`, changing nothing, when the column
    /// is not loaded or `pos` is outside the build height.
    pub fn set_block_state(&mut self, pos: BlockPos, state: u16) -> bool {
        if !in_height(pos.y) {
            return false;
        }
        match self.columns.get_mut(&ColumnKey::from_block(pos.x, pos.z)) {
            Some(column) => {
                column.set_block_state_id(to_local(pos), state);
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self, key: ColumnKey) -> bool {
        self.columns.contains_key(&key)
    }

    pub fn column(&self, key: ColumnKey) -> Option<&ChunkColumn> {
        self.columns.get(&key)
    }

    pub fn column_mut(&mut self, key: ColumnKey) -> Option<&mut ChunkColumn> {
        self.columns.get_mut(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.columns.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn clear_all(&mut self) {
        self.columns.clear();
    }
}

impl BlockSource for ChunkColumnStore {
    fn block_at(&self, point: Position) -> Option<Block> {
        self.get_block(point.floored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::state_id;
    use assert_matches::assert_matches;
    use lodestone_common::LocalPos;

    fn stone_floor() -> (u16, Vec<u8>) {
        let mut column = ChunkColumn::new();
        for x in 0..16 {
            for z in 0..16 {
                column.set_block_state_id(LocalPos::new(x, 0, z), state_id(1, 0));
            }
        }
        let (bit_map, data) = column.dump(true, true);
        (bit_map, data.to_vec())
    }

    #[test]
    fn test_load_and_query() {
        let mut store = ChunkColumnStore::new();
        let (bit_map, data) = stone_floor();
        let key = ColumnKey::new(-1, 2);

        let change = store.load_column(key, &data, bit_map, true, true, None);
        assert_matches!(change, Ok(ColumnChange::Loaded(corner)) if corner == BlockPos::new(-16, 0, 32));

        let block = store.get_block(BlockPos::new(-5, 0, 40)).unwrap();
        assert_eq!(block.name, "stone");
        assert_eq!(block.position, BlockPos::new(-5, 0, 40));
        assert_eq!(store.get_block(BlockPos::new(-5, 1, 40)).unwrap().type_id, 0);
        assert!(store.get_block(BlockPos::new(-5, 256, 40)).is_none());
        assert!(store.get_block(BlockPos::new(-5, -1, 40)).is_none());
        assert!(store.get_block(BlockPos::new(5, 0, 40)).is_none());
    }

    #[test]
    fn test_block_at_floors_the_point() {
        let mut store = ChunkColumnStore::new();
        let (bit_map, data) = stone_floor();
        store
            .load_column(ColumnKey::new(-1, 0), &data, bit_map, true, true, None)
            .unwrap();
        assert!(store.block_at(Position::new(0.5, 0.9, 0.1)).is_none());
        let block = store.block_at(Position::new(-0.5, 0.9, 15.99)).unwrap();
        assert_eq!(block.position, BlockPos::new(-1, 0, 15));
    }

    #[test]
    fn test_zero_bit_map_unloads() {
        let mut store = ChunkColumnStore::new();
        let (bit_map, data) = stone_floor();
        let key = ColumnKey::new(0, 0);
        store.load_column(key, &data, bit_map, true, true, None).unwrap();

        let change = store.load_column(key, &[], 0, true, true, None);
        assert_matches!(change, Ok(ColumnChange::Unloaded(_)));
        assert!(store.is_empty());
        assert!(store.get_block(BlockPos::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_failed_load_creates_nothing() {
        let mut store = ChunkColumnStore::new();
        let (bit_map, data) = stone_floor();

        let result = store.load_column(ColumnKey::new(3, 4), &data[1..], bit_map, true, true, None);
        assert_matches!(result, Err(LodestoneError::MalformedColumn { x: 3, z: 4, .. }));
        assert!(!store.is_loaded(ColumnKey::new(3, 4)));

        let result = store.load_column(
            ColumnKey::new(3, 4),
            &data,
            bit_map,
            true,
            true,
            Some(&[0u8; 12][..]),
        );
        assert_matches!(result, Err(LodestoneError::MalformedColumn { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_block_state() {
        let mut store = ChunkColumnStore::new();
        assert!(!store.set_block_state(BlockPos::new(1, 1, 1), state_id(20, 0)));
        assert!(store.is_empty());

        let (bit_map, data) = stone_floor();
        store
            .load_column(ColumnKey::new(0, 0), &data, bit_map, true, true, None)
            .unwrap();
        assert!(store.set_block_state(BlockPos::new(1, 100, 1), state_id(20, 0)));
        assert_eq!(store.get_block(BlockPos::new(1, 100, 1)).unwrap().name, "glass");
        assert!(!store.set_block_state(BlockPos::new(1, 300, 1), state_id(20, 0)));
    }

    #[test]
    fn test_biomes_are_applied() {
        let mut store = ChunkColumnStore::new();
        let (bit_map, data) = stone_floor();
        let biomes = [4u8; BIOME_LEN];
        store
            .load_column(ColumnKey::new(0, 0), &data, bit_map, true, true, Some(&biomes[..]))
            .unwrap();
        assert_eq!(store.get_block(BlockPos::new(3, 0, 3)).unwrap().biome, 4);
    }

    #[test]
    fn test_load_light_creates_column() {
        let mut store = ChunkColumnStore::new();
        store.load_light(ColumnKey::new(1, 1), &UpdateLight::default());
        assert_eq!(store.keys().collect::<Vec<_>>(), vec![ColumnKey::new(1, 1)]);
        store.clear_all();
        assert_eq!(store.len(), 0);
    }
}
