use serde::Deserialize;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

#[derive(Deserialize, Debug)]
struct Block {
    id: u16,
    name: String,
    #[serde(rename = "boundingBox")]
    bounding_box: String,
}

fn main() {
    let blocks_json_path = "data/blocks.json";
    let blocks_json = fs::read_to_string(blocks_json_path).expect("Failed to read blocks.json");

    let mut blocks: Vec<Block> =
        serde_json::from_str(&blocks_json).expect("Failed to parse blocks.json");
    blocks.sort_by_key(|block| block.id);
    for pair in blocks.windows(2) {
        assert!(pair[0].id != pair[1].id, "Duplicate block id {}", pair[0].id);
    }

    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("block_table.rs");
    let mut out_file = File::create(&dest_path).expect("Failed to create block_table.rs");

    writeln!(out_file, "pub static BLOCKS: &[BlockInfo] = &[").unwrap();
    for block in &blocks {
        let bounding_box = match block.bounding_box.as_str() {
            "block" => "BoundingBox::Block",
            "empty" => "BoundingBox::Empty",
            other => panic!("Unknown bounding box {:?} for {}", other, block.name),
        };
        writeln!(
            out_file,
            "    BlockInfo {{ id: {}, name: {:?}, bounding_box: {} }},",
            block.id, block.name, bounding_box
        )
        .unwrap();
    }
    writeln!(out_file, "];").unwrap();

    println!("cargo:rerun-if-changed={}", blocks_json_path);
}
