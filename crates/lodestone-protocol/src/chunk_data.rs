use bytes::Bytes;
use lodestone_nbt::Tag;

/// A single chunk column. A `bit_map` of zero tells the client to drop the column.
#[derive(Debug, Clone, Default)]
pub struct MapChunk {
    pub chunk_x: i32,
    pub chunk_z: i32,
    /// Whether this fragment carries the full column, biomes included.
    pub ground_up: bool,
    /// One bit per 16-block section present in `data`, lowest section first.
    pub bit_map: u16,
    pub data: Bytes,
    /// Overrides the dimension-derived sky light flag when set.
    pub sky_light_sent: Option<bool>,
    /// Biomes delivered separately from `data`, one byte per `(x, z)`.
    pub biomes: Option<Vec<u8>>,
    pub heightmaps: Option<Tag>,
    /// Block entities, already decoded by the packet layer.
    pub block_entities: Vec<Tag>,
}

/// Per-column framing inside a [`MapChunkBulk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkMeta {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub bit_map: u16,
}

/// Several full columns concatenated into one payload, sized by their metas.
#[derive(Debug, Clone, Default)]
pub struct MapChunkBulk {
    pub sky_light_sent: bool,
    pub meta: Vec<ChunkMeta>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnloadChunk {
    pub chunk_x: i32,
    pub chunk_z: i32,
}
