pub mod config;
pub mod events;
pub mod sign;
pub mod world;

// Re-export commonly used items
pub use config::WorldConfig;
pub use events::{BlockUpdate, EventBus, WorldEvent};
pub use lodestone_common::{BlockPos, ColumnKey, LodestoneError, Position, Result};
pub use lodestone_logger::{log, LogSeverity};
pub use lodestone_protocol::{ClientboundPacket, Packet, UpdateSignRequest};
pub use lodestone_world::{Block, BlockMatcher, BlockSource, ChunkColumn, FindBlockOptions};
pub use world::World;
