use crate::registry::{self, BoundingBox};
use lodestone_common::{BlockPos, Position};
use serde_json::{Map, Value};

/// Facing vectors for painting directions `0..=3`.
const PAINTING_FACING: [[i32; 3]; 4] = [[0, 0, -1], [-1, 0, 0], [0, 0, 1], [1, 0, 0]];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Painting {
    pub id: i32,
    pub position: BlockPos,
    pub title: String,
    pub facing: [i32; 3],
}

impl Painting {
    /// Returns `None` for a direction outside `0..=3`.
    pub fn new(id: i32, position: BlockPos, title: String, direction: u8) -> Option<Self> {
        let facing = *PAINTING_FACING.get(direction as usize)?;
        Some(Self {
            id,
            position,
            title,
            facing,
        })
    }
}

/// Metadata attached to a block, decoded to plain values.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntity {
    pub position: BlockPos,
    pub fields: Map<String, Value>,
}

impl BlockEntity {
    /// The `id` field, e.g. `minecraft:sign` or the legacy `Sign`.
    pub fn kind(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    pub fn is_sign(&self) -> bool {
        matches!(self.kind(), Some("minecraft:sign") | Some("Sign"))
    }
}

/// Snapshot of one cell, assembled on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub state_id: u16,
    pub type_id: u16,
    pub metadata: u8,
    pub name: &'static str,
    pub bounding_box: BoundingBox,
    pub position: BlockPos,
    pub sky_light: u8,
    pub block_light: u8,
    pub biome: u8,
    pub sign_text: Option<String>,
    pub painting: Option<Painting>,
    pub block_entity: Option<BlockEntity>,
}

impl Block {
    pub fn new(state_id: u16, position: BlockPos) -> Self {
        let type_id = registry::type_of(state_id);
        let info = registry::lookup(type_id);
        Self {
            state_id,
            type_id,
            metadata: registry::metadata_of(state_id),
            name: info.name,
            bounding_box: info.bounding_box,
            position,
            sky_light: 0,
            block_light: 0,
            biome: 0,
            sign_text: None,
            painting: None,
            block_entity: None,
        }
    }

    /// Whether the block takes up space, i.e. stops a line of sight.
    pub fn is_solid(&self) -> bool {
        self.bounding_box != BoundingBox::Empty
    }
}

/// Anything that can answer "what is at this point".
/// `None` means no information, which is distinct from air.
pub trait BlockSource {
    fn block_at(&self, point: Position) -> Option<Block>;
}
