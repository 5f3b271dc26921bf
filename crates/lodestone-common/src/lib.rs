pub mod coords;
pub mod error;
pub mod types;

pub use coords::{in_height, to_local, ColumnKey, LocalPos, SECTION_COUNT};
pub use error::LodestoneError;
pub use types::{BlockPos, Position, Result};
