use lodestone_common::BlockPos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnPainting {
    pub entity_id: i32,
    pub location: BlockPos,
    pub title: String,
    /// Facing, `0..=3`: south, west, north, east.
    pub direction: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDestroy {
    pub entity_ids: Vec<i32>,
}
