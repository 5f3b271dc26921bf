use crate::block::{Block, BlockEntity, Painting};
use crate::chat;
use lodestone_common::{BlockPos, ColumnKey};
use serde_json::{Map, Value};
use std::collections::HashMap;

const SIGN_FIELDS: [&str; 4] = ["Text1", "Text2", "Text3", "Text4"];

/// Per-position metadata layered over the raw block states.
#[derive(Debug, Default)]
pub struct OverlayIndex {
    signs: HashMap<BlockPos, String>,
    block_entities: HashMap<BlockPos, BlockEntity>,
    paintings_by_id: HashMap<i32, Painting>,
    paintings_by_pos: HashMap<BlockPos, i32>,
}

impl OverlayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores block-entity metadata. Signs also get their text derived.
    pub fn attach_block_entity(&mut self, position: BlockPos, fields: Map<String, Value>) {
        let entity = BlockEntity { position, fields };
        if entity.is_sign() {
            let lines: Vec<&str> = SIGN_FIELDS
                .iter()
                .map(|name| entity.fields.get(*name).and_then(Value::as_str).unwrap_or(""))
                .collect();
            self.signs.insert(position, chat::sign_text(&lines));
        }
        self.block_entities.insert(position, entity);
    }

    pub fn attach_sign_direct<S: AsRef<str>>(&mut self, position: BlockPos, lines: &[S]) {
        self.signs.insert(position, chat::sign_text(lines));
    }

    /// Adds a painting, evicting any painting with the same id or position.
    pub fn add_painting(&mut self, painting: Painting) {
        self.remove_painting(painting.id);
        if let Some(previous) = self.paintings_by_pos.remove(&painting.position) {
            self.paintings_by_id.remove(&previous);
        }
        self.paintings_by_pos.insert(painting.position, painting.id);
        self.paintings_by_id.insert(painting.id, painting);
    }

    pub fn remove_painting(&mut self, id: i32) -> Option<Painting> {
        let painting = self.paintings_by_id.remove(&id)?;
        self.paintings_by_pos.remove(&painting.position);
        Some(painting)
    }

    /// Drops every overlay entry at `position`.
    pub fn clear_at(&mut self, position: BlockPos) {
        self.signs.remove(&position);
        self.block_entities.remove(&position);
        if let Some(id) = self.paintings_by_pos.remove(&position) {
            self.paintings_by_id.remove(&id);
        }
    }

    /// Drops every overlay entry that lies inside the column `key`.
    pub fn clear_column(&mut self, key: ColumnKey) {
        let outside = |position: &BlockPos| ColumnKey::from_block(position.x, position.z) != key;
        self.signs.retain(|position, _| outside(position));
        self.block_entities.retain(|position, _| outside(position));
        self.paintings_by_pos.retain(|position, _| outside(position));
        self.paintings_by_id
            .retain(|_, painting| outside(&painting.position));
    }

    /// Copies whatever is indexed at the block's position onto it.
    pub fn decorate(&self, block: &mut Block) {
        let position = block.position;
        block.sign_text = self.signs.get(&position).cloned();
        block.block_entity = self.block_entities.get(&position).cloned();
        block.painting = self.painting_at(position).cloned();
    }

    pub fn sign_text(&self, position: BlockPos) -> Option<&str> {
        self.signs.get(&position).map(String::as_str)
    }

    pub fn block_entity(&self, position: BlockPos) -> Option<&BlockEntity> {
        self.block_entities.get(&position)
    }

    pub fn painting(&self, id: i32) -> Option<&Painting> {
        self.paintings_by_id.get(&id)
    }

    pub fn painting_at(&self, position: BlockPos) -> Option<&Painting> {
        let id = self.paintings_by_pos.get(&position)?;
        self.paintings_by_id.get(id)
    }

    pub fn painting_count(&self) -> usize {
        self.paintings_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty() && self.block_entities.is_empty() && self.paintings_by_id.is_empty()
    }

    pub fn clear(&mut self) {
        self.signs.clear();
        self.block_entities.clear();
        self.paintings_by_id.clear();
        self.paintings_by_pos.clear();
    }
}
