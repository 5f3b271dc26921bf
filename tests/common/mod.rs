#![allow(dead_code)]

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use lodestone::{World, WorldConfig};
use lodestone_common::LocalPos;
use lodestone_nbt::{Compound, Tag};
use lodestone_protocol::{ClientboundPacket, Login, MapChunk};
use lodestone_world::registry::state_id;
use lodestone_world::ChunkColumn;
use std::io::Write;

pub const STONE: u16 = state_id(1, 0);
pub const GRASS: u16 = state_id(2, 0);
pub const GLASS: u16 = state_id(20, 0);
pub const DIAMOND_ORE: u16 = state_id(56, 0);
pub const STANDING_SIGN: u16 = state_id(63, 0);

/// A world that has joined the overworld.
pub fn overworld() -> World {
    let mut world = World::new(WorldConfig::default()).unwrap();
    world
        .handle(ClientboundPacket::Login(Login {
            entity_id: 1,
            dimension: 0,
        }))
        .unwrap();
    world
}

/// A column with a stone floor at y = 0..=63 and air above.
pub fn flat_column() -> ChunkColumn {
    column_with(|_, y, _| if y < 64 { Some(STONE) } else { None })
}

pub fn column_with<F>(state_at: F) -> ChunkColumn
where
    F: Fn(usize, usize, usize) -> Option<u16>,
{
    let mut column = ChunkColumn::new();
    for x in 0..16 {
        for y in 0..256 {
            for z in 0..16 {
                if let Some(state) = state_at(x, y, z) {
                    column.set_block_state_id(LocalPos::new(x, y, z), state);
                }
            }
        }
    }
    column
}

/// A full-column fragment carrying sky light.
pub fn map_chunk(chunk_x: i32, chunk_z: i32, column: &ChunkColumn) -> MapChunk {
    let (bit_map, data) = column.dump(true, true);
    MapChunk {
        chunk_x,
        chunk_z,
        ground_up: true,
        bit_map,
        data,
        ..Default::default()
    }
}

pub fn load_flat(world: &mut World, chunk_x: i32, chunk_z: i32) {
    world.load_column(&map_chunk(chunk_x, chunk_z, &flat_column()));
}

/// An uncompressed sign block entity as the server encodes it.
pub fn sign_nbt(x: i32, y: i32, z: i32, lines: [&str; 4]) -> Vec<u8> {
    let mut compound = Compound::new();
    compound.insert("id".to_string(), Tag::String("Sign".to_string()));
    compound.insert("x".to_string(), Tag::Int(x));
    compound.insert("y".to_string(), Tag::Int(y));
    compound.insert("z".to_string(), Tag::Int(z));
    for (index, line) in lines.iter().enumerate() {
        compound.insert(format!("Text{}", index + 1), Tag::String(line.to_string()));
    }

    let mut out = Vec::new();
    Tag::Compound(compound).write(&mut out, "").unwrap();
    out
}

pub fn gzip(bytes: &[u8]) -> Bytes {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    Bytes::from(encoder.finish().unwrap())
}
