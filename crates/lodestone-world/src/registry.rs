//! Static block table, generated by `build.rs` from `data/blocks.json`.

/// Collision shape of a block type, as far as line of sight cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundingBox {
    Block,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: u16,
    pub name: &'static str,
    pub bounding_box: BoundingBox,
}

mod table {
    use super::{BlockInfo, BoundingBox};

    include!(concat!(env!("OUT_DIR"), "/block_table.rs"));
}

pub use table::BLOCKS;

pub const AIR: u16 = 0;

/// Reported for type ids missing from the table. Treated as solid.
pub const UNKNOWN: BlockInfo = BlockInfo {
    id: u16::MAX,
    name: "unknown",
    bounding_box: BoundingBox::Block,
};

pub fn lookup(type_id: u16) -> &'static BlockInfo {
    BLOCKS
        .binary_search_by_key(&type_id, |info| info.id)
        .map(|index| &BLOCKS[index])
        .unwrap_or(&UNKNOWN)
}

pub fn by_name(name: &str) -> Option<&'static BlockInfo> {
    BLOCKS.iter().find(|info| info.name == name)
}

/// Packs a type id and its 4-bit metadata into a block-state id.
pub const fn state_id(type_id: u16, metadata: u8) -> u16 {
    (type_id << 4) | (metadata as u16 & 0x0F)
}

pub const fn type_of(state_id: u16) -> u16 {
    state_id >> 4
}

pub const fn metadata_of(state_id: u16) -> u8 {
    (state_id & 0x0F) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(BLOCKS.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(AIR).name, "air");
        assert_eq!(lookup(AIR).bounding_box, BoundingBox::Empty);
        assert_eq!(lookup(1).name, "stone");
        assert_eq!(lookup(1).bounding_box, BoundingBox::Block);
        assert_eq!(lookup(63).name, "standing_sign");
        assert_eq!(lookup(4000), &UNKNOWN);
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("glass").map(|info| info.id), Some(20));
        assert!(by_name("not_a_block").is_none());
    }

    #[test]
    fn test_state_packing() {
        let state = state_id(35, 14);
        assert_eq!(state, 35 * 16 + 14);
        assert_eq!(type_of(state), 35);
        assert_eq!(metadata_of(state), 14);
    }
}
