//! Decoded packet records consumed by the world model, plus the one packet it writes.

pub mod block_change;
pub mod chunk_data;
pub mod login;
pub mod packet;
pub mod painting;
pub mod tile_entity_data;
pub mod update_light;
pub mod update_sign;

pub use block_change::{BlockChange, BlockChangeRecord, Explosion, MultiBlockChange};
pub use chunk_data::{ChunkMeta, MapChunk, MapChunkBulk, UnloadChunk};
pub use login::{Login, Respawn};
pub use packet::{frame_packet, Packet, PacketBuffer};
pub use painting::{EntityDestroy, SpawnPainting};
pub use tile_entity_data::TileEntityData;
pub use update_light::UpdateLight;
pub use update_sign::{UpdateSign, UpdateSignRequest};

/// Every clientbound record that touches the world model.
#[derive(Debug, Clone)]
pub enum ClientboundPacket {
    Login(Login),
    Respawn(Respawn),
    MapChunk(MapChunk),
    MapChunkBulk(MapChunkBulk),
    UnloadChunk(UnloadChunk),
    UpdateLight(UpdateLight),
    BlockChange(BlockChange),
    MultiBlockChange(MultiBlockChange),
    Explosion(Explosion),
    SpawnPainting(SpawnPainting),
    EntityDestroy(EntityDestroy),
    UpdateSign(UpdateSign),
    TileEntityData(TileEntityData),
}
