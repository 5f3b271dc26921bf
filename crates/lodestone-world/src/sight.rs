use crate::block::{Block, BlockSource};
use lodestone_common::Position;

pub const DEFAULT_SAMPLES_PER_BLOCK: f64 = 5.0;

/// Samples the segment `from -> to` and reports whether no known solid block
/// lies on it. Cells without information never block.
pub fn is_visible<S: BlockSource + ?Sized>(
    source: &S,
    from: Position,
    to: Position,
    samples_per_block: f64,
) -> bool {
    let samples = from.distance_to(to) * samples_per_block;
    if samples.is_nan() || samples <= 0.0 {
        return true;
    }
    let step = (to - from) * (1.0 / samples);

    let mut point = from;
    let mut cell = point.floored();
    for _ in 1..samples.ceil() as u64 {
        point = point + step;
        let next = point.floored();
        if next == cell {
            continue;
        }
        cell = next;
        if let Some(block) = source.block_at(point) {
            if block.is_solid() {
                return false;
            }
        }
    }
    true
}

/// Whether an observer with eyes at `eye` can see `block`.
pub fn can_see_block<S: BlockSource + ?Sized>(
    source: &S,
    eye: Position,
    block: &Block,
    samples_per_block: f64,
) -> bool {
    is_visible(source, eye, Position::from(block.position), samples_per_block)
}
