use bytes::Bytes;

/// Length of one section's light array: 4096 nibbles.
pub const LIGHT_ARRAY_LEN: usize = 2048;

/// Update Light packet.
/// Bit `i` of every mask addresses section `i - 1`, so bit 0 is the section
/// below the world and bit 17 the one above it. Arrays are listed in mask order.
#[derive(Debug, Clone, Default)]
pub struct UpdateLight {
    pub chunk_x: i32,
    pub chunk_z: i32,
    pub sky_light_mask: u32,
    pub block_light_mask: u32,
    pub empty_sky_light_mask: u32,
    pub empty_block_light_mask: u32,
    pub sky_light: Vec<Bytes>,
    pub block_light: Vec<Bytes>,
}

impl UpdateLight {
    /// Sections (`-1..=16`) addressed by `mask`, in ascending order.
    pub fn sections(mask: u32) -> impl Iterator<Item = i32> {
        (0..18).filter(move |bit| mask & (1 << bit) != 0).map(|bit| bit - 1)
    }
}
