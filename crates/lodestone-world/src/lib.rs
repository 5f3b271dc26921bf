//! Voxel storage and queries: chunk columns, overlays, line of sight and search.

pub mod block;
pub mod chat;
pub mod chunk;
pub mod overlay;
pub mod registry;
pub mod search;
pub mod sight;
pub mod store;

pub use block::{Block, BlockEntity, BlockSource, Painting};
pub use chunk::{expected_payload_len, ChunkColumn, ChunkSection, NibbleArray};
pub use overlay::OverlayIndex;
pub use registry::{BlockInfo, BoundingBox};
pub use search::{find_block, BlockMatcher, FindBlockOptions};
pub use sight::{can_see_block, is_visible};
pub use store::{ChunkColumnStore, ColumnChange};
