use bytes::Bytes;
use lodestone_common::BlockPos;

/// Block-entity metadata for one position. `nbt_data` is a raw, possibly
/// gzip-compressed, NBT compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntityData {
    pub location: BlockPos,
    pub action: u8,
    pub nbt_data: Bytes,
}
