use crate::block::Block;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use lodestone_common::{BlockPos, LocalPos, SECTION_COUNT};
use lodestone_logger::{log, LogSeverity::Warning};
use lodestone_nbt::Tag;
use lodestone_protocol::UpdateLight;
use std::io::{self, Cursor, Read};

/// Blocks in one 16x16x16 section.
pub const SECTION_VOLUME: usize = 4096;
/// Bytes of one section's light nibbles.
pub const LIGHT_LEN: usize = SECTION_VOLUME / 2;
/// Bytes of one column's biome map.
pub const BIOME_LEN: usize = 256;
const BLOCK_BYTES: usize = SECTION_VOLUME * 2;
const FULL_SKY_LIGHT: u8 = 15;

/// Exact payload length of a column fragment with the given sections present.
pub fn expected_payload_len(bit_map: u16, sky_light_sent: bool, full: bool) -> usize {
    let sections = bit_map.count_ones() as usize;
    let per_section = BLOCK_BYTES + LIGHT_LEN + if sky_light_sent { LIGHT_LEN } else { 0 };
    sections * per_section + if full { BIOME_LEN } else { 0 }
}

fn section_bits(bit_map: u16) -> impl Iterator<Item = usize> {
    (0..SECTION_COUNT).filter(move |y| bit_map & (1 << y) != 0)
}

/// 4096 light levels packed two per byte, low nibble first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibbleArray(Box<[u8]>);

impl NibbleArray {
    pub fn filled(level: u8) -> Self {
        let level = level & 0x0F;
        NibbleArray(vec![level | (level << 4); LIGHT_LEN].into_boxed_slice())
    }

    /// Returns `None` unless `bytes` is exactly one section long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        (bytes.len() == LIGHT_LEN).then(|| NibbleArray(bytes.into()))
    }

    pub fn get(&self, index: usize) -> u8 {
        let byte = self.0[index >> 1];
        if index & 1 == 0 {
            byte & 0x0F
        } else {
            byte >> 4
        }
    }

    pub fn set(&mut self, index: usize, level: u8) {
        let byte = &mut self.0[index >> 1];
        if index & 1 == 0 {
            *byte = (*byte & 0xF0) | (level & 0x0F);
        } else {
            *byte = (*byte & 0x0F) | ((level & 0x0F) << 4);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Block states of one 16x16x16 section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSection {
    states: Box<[u16]>,
}

impl ChunkSection {
    pub fn new() -> Self {
        ChunkSection {
            states: vec![0; SECTION_VOLUME].into_boxed_slice(),
        }
    }

    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut states = vec![0u16; SECTION_VOLUME];
        reader.read_u16_into::<LittleEndian>(&mut states)?;
        Ok(ChunkSection {
            states: states.into_boxed_slice(),
        })
    }

    pub fn get_state(&self, index: usize) -> u16 {
        self.states[index]
    }

    pub fn set_state(&mut self, index: usize, state: u16) {
        self.states[index] = state;
    }

    /// Number of non-air cells.
    pub fn block_count(&self) -> usize {
        self.states.iter().filter(|state| **state >> 4 != 0).count()
    }
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded fragment, held aside until it is known to be complete.
struct ColumnFragment {
    sections: Vec<(usize, ChunkSection, NibbleArray, Option<NibbleArray>)>,
    biomes: Option<Box<[u8]>>,
}

/// One 16x256x16 column. Absent sections read as air.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkColumn {
    sections: [Option<ChunkSection>; SECTION_COUNT],
    block_light: [Option<NibbleArray>; SECTION_COUNT],
    sky_light: [Option<NibbleArray>; SECTION_COUNT],
    biomes: Box<[u8]>,
    heightmaps: Option<Tag>,
}

impl ChunkColumn {
    pub fn new() -> Self {
        ChunkColumn {
            sections: Default::default(),
            block_light: Default::default(),
            sky_light: Default::default(),
            biomes: vec![0; BIOME_LEN].into_boxed_slice(),
            heightmaps: None,
        }
    }

    /// Decodes a fragment into this column. The column is only modified once
    /// the whole payload has been read successfully.
    pub fn load(
        &mut self,
        data: &[u8],
        bit_map: u16,
        sky_light_sent: bool,
        full: bool,
    ) -> io::Result<()> {
        let fragment = Self::decode(data, bit_map, sky_light_sent, full)?;

        if full {
            self.sections = Default::default();
            self.block_light = Default::default();
            self.sky_light = Default::default();
        }
        for (y, section, block_light, sky_light) in fragment.sections {
            self.sections[y] = Some(section);
            self.block_light[y] = Some(block_light);
            self.sky_light[y] = sky_light;
        }
        if let Some(biomes) = fragment.biomes {
            self.biomes = biomes;
        }
        Ok(())
    }

    fn decode(
        data: &[u8],
        bit_map: u16,
        sky_light_sent: bool,
        full: bool,
    ) -> io::Result<ColumnFragment> {
        let expected = expected_payload_len(bit_map, sky_light_sent, full);
        if data.len() != expected {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "expected {} bytes for section mask {:#06x}, got {}",
                    expected,
                    bit_map,
                    data.len()
                ),
            ));
        }

        let mut reader = Cursor::new(data);
        let mut states = Vec::new();
        for y in section_bits(bit_map) {
            states.push((y, ChunkSection::read(&mut reader)?));
        }

        let read_light = |reader: &mut Cursor<&[u8]>| -> io::Result<NibbleArray> {
            let mut bytes = vec![0u8; LIGHT_LEN];
            reader.read_exact(&mut bytes)?;
            Ok(NibbleArray(bytes.into_boxed_slice()))
        };

        let mut block_light = Vec::with_capacity(states.len());
        for _ in 0..states.len() {
            block_light.push(read_light(&mut reader)?);
        }
        let mut sky_light = Vec::with_capacity(states.len());
        if sky_light_sent {
            for _ in 0..states.len() {
                sky_light.push(Some(read_light(&mut reader)?));
            }
        } else {
            sky_light.resize(states.len(), None);
        }

        let biomes = if full {
            let mut biomes = vec![0u8; BIOME_LEN];
            reader.read_exact(&mut biomes)?;
            Some(biomes.into_boxed_slice())
        } else {
            None
        };

        let sections = states
            .into_iter()
            .zip(block_light)
            .zip(sky_light)
            .map(|(((y, section), block), sky)| (y, section, block, sky))
            .collect();
        Ok(ColumnFragment { sections, biomes })
    }

    /// Replaces the biome map. `biomes` holds one byte per `(x, z)`, index `z << 4 | x`.
    pub fn load_biomes(&mut self, biomes: &[u8]) -> io::Result<()> {
        if biomes.len() != BIOME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected {} biome bytes, got {}", BIOME_LEN, biomes.len()),
            ));
        }
        self.biomes.copy_from_slice(biomes);
        Ok(())
    }

    /// Merges a light update. Arrays of the wrong size are skipped with a warning.
    pub fn load_light(&mut self, light: &UpdateLight) {
        merge_light(
            &mut self.sky_light,
            light.sky_light_mask,
            light.empty_sky_light_mask,
            &light.sky_light,
            "sky",
        );
        merge_light(
            &mut self.block_light,
            light.block_light_mask,
            light.empty_block_light_mask,
            &light.block_light,
            "block",
        );
    }

    /// Encodes the column in the same layout `load` reads.
    /// Returns the section mask together with the payload.
    pub fn dump(&self, sky_light_sent: bool, full: bool) -> (u16, Bytes) {
        let present: Vec<usize> = (0..SECTION_COUNT)
            .filter(|y| self.sections[*y].is_some())
            .collect();
        let bit_map = present.iter().fold(0u16, |mask, y| mask | (1 << y));

        let mut out = Vec::with_capacity(expected_payload_len(bit_map, sky_light_sent, full));
        for y in &present {
            if let Some(section) = &self.sections[*y] {
                for state in section.states.iter() {
                    // Writing into a Vec cannot fail.
                    let _ = out.write_u16::<LittleEndian>(*state);
                }
            }
        }
        let dark = NibbleArray::filled(0);
        for y in &present {
            out.extend_from_slice(self.block_light[*y].as_ref().unwrap_or(&dark).as_bytes());
        }
        if sky_light_sent {
            let bright = NibbleArray::filled(FULL_SKY_LIGHT);
            for y in &present {
                out.extend_from_slice(self.sky_light[*y].as_ref().unwrap_or(&bright).as_bytes());
            }
        }
        if full {
            out.extend_from_slice(&self.biomes);
        }

        (bit_map, Bytes::from(out))
    }

    pub fn get_block_state_id(&self, local: LocalPos) -> u16 {
        self.sections[local.section()]
            .as_ref()
            .map_or(0, |section| section.get_state(local.section_index()))
    }

    pub fn set_block_state_id(&mut self, local: LocalPos, state: u16) {
        self.sections[local.section()]
            .get_or_insert_with(ChunkSection::new)
            .set_state(local.section_index(), state);
    }

    pub fn get_block_light(&self, local: LocalPos) -> u8 {
        self.block_light[local.section()]
            .as_ref()
            .map_or(0, |light| light.get(local.section_index()))
    }

    /// Sections without sky light data read as fully lit.
    pub fn get_sky_light(&self, local: LocalPos) -> u8 {
        self.sky_light[local.section()]
            .as_ref()
            .map_or(FULL_SKY_LIGHT, |light| light.get(local.section_index()))
    }

    pub fn get_biome(&self, x: usize, z: usize) -> u8 {
        self.biomes[(z << 4) | x]
    }

    /// The block at `local`, positioned in column-local coordinates.
    pub fn get_block(&self, local: LocalPos) -> Block {
        let position = BlockPos::new(local.x as i32, local.y as i32, local.z as i32);
        let mut block = Block::new(self.get_block_state_id(local), position);
        block.block_light = self.get_block_light(local);
        block.sky_light = self.get_sky_light(local);
        block.biome = self.get_biome(local.x, local.z);
        block
    }

    pub fn get_section(&self, y: usize) -> Option<&ChunkSection> {
        self.sections.get(y)?.as_ref()
    }

    pub fn section_mask(&self) -> u16 {
        (0..SECTION_COUNT)
            .filter(|y| self.sections[*y].is_some())
            .fold(0, |mask, y| mask | (1 << y))
    }

    pub fn set_heightmaps(&mut self, heightmaps: Tag) {
        self.heightmaps = Some(heightmaps);
    }

    pub fn heightmaps(&self) -> Option<&Tag> {
        self.heightmaps.as_ref()
    }
}

impl Default for ChunkColumn {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_light(
    target: &mut [Option<NibbleArray>; SECTION_COUNT],
    mask: u32,
    empty_mask: u32,
    arrays: &[Bytes],
    kind: &str,
) {
    let sections: Vec<i32> = UpdateLight::sections(mask).collect();
    if sections.len() != arrays.len() {
        log(
            format!(
                "{} light mask names {} sections but {} arrays were sent",
                kind,
                sections.len(),
                arrays.len()
            ),
            Warning,
        );
    }

    for (section, bytes) in sections.into_iter().zip(arrays) {
        let Some(slot) = usize::try_from(section)
            .ok()
            .and_then(|y| target.get_mut(y))
        else {
            continue;
        };
        match NibbleArray::from_slice(bytes) {
            Some(array) => *slot = Some(array),
            None => log(
                format!(
                    "Skipping {} light for section {}: {} bytes",
                    kind,
                    section,
                    bytes.len()
                ),
                Warning,
            ),
        }
    }

    for section in UpdateLight::sections(empty_mask) {
        if let Some(slot) = usize::try_from(section).ok().and_then(|y| target.get_mut(y)) {
            *slot = Some(NibbleArray::filled(0));
        }
    }
}
