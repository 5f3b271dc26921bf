use crate::block::{Block, BlockSource};
use lodestone_common::Position;
use std::collections::HashSet;
use std::fmt;

pub const DEFAULT_MAX_DISTANCE: i32 = 16;
/// Upper bound for any search radius: the height of a column.
pub const MAX_SEARCH_DISTANCE: i32 = 256;

/// What `find_block` is looking for.
pub enum BlockMatcher {
    Predicate(Box<dyn Fn(&Block) -> bool>),
    TypeSet(HashSet<u16>),
}

impl BlockMatcher {
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Block) -> bool + 'static,
    {
        BlockMatcher::Predicate(Box::new(predicate))
    }

    pub fn matches(&self, block: &Block) -> bool {
        match self {
            BlockMatcher::Predicate(predicate) => predicate(block),
            BlockMatcher::TypeSet(types) => types.contains(&block.type_id),
        }
    }
}

impl fmt::Debug for BlockMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockMatcher::Predicate(_) => f.write_str("Predicate(..)"),
            BlockMatcher::TypeSet(types) => f.debug_tuple("TypeSet").field(types).finish(),
        }
    }
}

impl From<u16> for BlockMatcher {
    fn from(type_id: u16) -> Self {
        BlockMatcher::TypeSet(HashSet::from([type_id]))
    }
}

impl From<HashSet<u16>> for BlockMatcher {
    fn from(types: HashSet<u16>) -> Self {
        BlockMatcher::TypeSet(types)
    }
}

impl From<&[u16]> for BlockMatcher {
    fn from(types: &[u16]) -> Self {
        BlockMatcher::TypeSet(types.iter().copied().collect())
    }
}

#[derive(Debug)]
pub struct FindBlockOptions {
    pub point: Position,
    pub matching: BlockMatcher,
    /// Half the edge of the searched cube. `None` uses the world's default.
    pub max_distance: Option<i32>,
}

impl FindBlockOptions {
    pub fn new(point: Position, matching: impl Into<BlockMatcher>) -> Self {
        Self {
            point,
            matching: matching.into(),
            max_distance: None,
        }
    }

    pub fn max_distance(mut self, max_distance: i32) -> Self {
        self.max_distance = Some(max_distance);
        self
    }
}

/// Scans the cube around `options.point`, x outermost then y then z, and
/// returns the first known block the matcher accepts.
pub fn find_block<S: BlockSource + ?Sized>(
    source: &S,
    options: &FindBlockOptions,
    default_max_distance: i32,
) -> Option<Block> {
    let radius = options
        .max_distance
        .unwrap_or(default_max_distance)
        .clamp(0, MAX_SEARCH_DISTANCE);
    let center = options.point.floored();

    for x in center.x.saturating_sub(radius)..center.x.saturating_add(radius) {
        for y in center.y.saturating_sub(radius)..center.y.saturating_add(radius) {
            for z in center.z.saturating_sub(radius)..center.z.saturating_add(radius) {
                let point = Position::new(x as f64, y as f64, z as f64);
                if let Some(block) = source.block_at(point) {
                    if options.matching.matches(&block) {
                        return Some(block);
                    }
                }
            }
        }
    }
    None
}
