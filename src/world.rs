use crate::config::WorldConfig;
use crate::events::{BlockUpdate, EventBus, WorldEvent};
use crate::sign;
use lodestone_common::{BlockPos, ColumnKey, LodestoneError, Position, Result};
use lodestone_logger::{log, LogSeverity::*};
use lodestone_nbt::Tag;
use lodestone_protocol::{
    ClientboundPacket, Explosion, MapChunk, MapChunkBulk, MultiBlockChange, SpawnPainting,
    TileEntityData, UpdateLight, UpdateSignRequest,
};
use lodestone_world::{
    expected_payload_len, search, sight, Block, BlockSource, ChunkColumn, ChunkColumnStore,
    ColumnChange, FindBlockOptions, OverlayIndex, Painting,
};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

/// The client's view of the world: loaded columns, the metadata layered over
/// them, and the active dimension.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    store: ChunkColumnStore,
    overlays: OverlayIndex,
    events: EventBus,
    dimension: Option<i32>,
}

impl World {
    /// Creates an empty world and installs the configured log level.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        lodestone_logger::init(config.severity()?);
        Ok(Self {
            config,
            store: ChunkColumnStore::new(),
            overlays: OverlayIndex::new(),
            events: EventBus::new(),
            dimension: None,
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Applies one clientbound record. Only a bulk batch with inconsistent
    /// framing is returned as an error; other bad input is reported as an
    /// [`WorldEvent::Error`] and dropped.
    pub fn handle(&mut self, packet: ClientboundPacket) -> Result<()> {
        match packet {
            ClientboundPacket::Login(login) => self.join_dimension(login.dimension),
            ClientboundPacket::Respawn(respawn) => self.join_dimension(respawn.dimension),
            ClientboundPacket::MapChunk(chunk) => self.load_column(&chunk),
            ClientboundPacket::MapChunkBulk(bulk) => return self.load_column_batch(&bulk),
            ClientboundPacket::UnloadChunk(unload) => {
                self.unload_column(unload.chunk_x, unload.chunk_z)
            }
            ClientboundPacket::UpdateLight(light) => self.load_light(&light),
            ClientboundPacket::BlockChange(change) => {
                self.update_block_state(change.location, change.state)
            }
            ClientboundPacket::MultiBlockChange(change) => self.apply_multi_block_change(&change),
            ClientboundPacket::Explosion(explosion) => self.apply_explosion(&explosion),
            ClientboundPacket::SpawnPainting(painting) => self.spawn_painting(painting),
            ClientboundPacket::EntityDestroy(destroy) => self.destroy_entities(&destroy.entity_ids),
            ClientboundPacket::UpdateSign(update) => self.update_sign(update.location, &update.lines),
            ClientboundPacket::TileEntityData(data) => self.tile_entity_data(&data),
        }
        Ok(())
    }

    /// Whether fragments that don't say otherwise carry sky light.
    pub fn sky_light_sent(&self) -> bool {
        self.dimension == Some(self.config.overworld_dimension)
    }

    pub fn dimension(&self) -> Option<i32> {
        self.dimension
    }

    /// Switches to `dimension`, dropping every column and overlay if it changed.
    pub fn join_dimension(&mut self, dimension: i32) {
        if self.dimension == Some(dimension) {
            return;
        }
        log(
            format!(
                "Dimension changed from {:?} to {}, dropping {} columns",
                self.dimension,
                dimension,
                self.store.len()
            ),
            Info,
        );
        self.dimension = Some(dimension);
        self.store.clear_all();
        self.overlays.clear();
    }

    /// Loads one column fragment. A full fragment replaces every overlay in
    /// the column with its own block entities; those of a fragment that fails
    /// to decode are dropped along with it.
    pub fn load_column(&mut self, chunk: &MapChunk) {
        let key = ColumnKey::new(chunk.chunk_x, chunk.chunk_z);
        let sky_light_sent = chunk.sky_light_sent.unwrap_or_else(|| self.sky_light_sent());
        let result = self.store.load_column(
            key,
            &chunk.data,
            chunk.bit_map,
            sky_light_sent,
            chunk.ground_up,
            chunk.biomes.as_deref(),
        );

        match result {
            Ok(ColumnChange::Loaded(corner)) => {
                if chunk.ground_up {
                    self.overlays.clear_column(key);
                }
                if let (Some(heightmaps), Some(column)) =
                    (&chunk.heightmaps, self.store.column_mut(key))
                {
                    column.set_heightmaps(heightmaps.clone());
                }
                for tag in &chunk.block_entities {
                    if let Err(err) = self.attach_block_entity(tag, None) {
                        self.report(err);
                    }
                }
                self.events.emit(WorldEvent::ColumnLoaded(corner));
            }
            Ok(ColumnChange::Unloaded(corner)) => {
                self.overlays.clear_column(key);
                self.events.emit(WorldEvent::ColumnUnloaded(corner));
            }
            Err(err) => self.report(err),
        }
    }

    /// Loads several full columns from one payload. The per-column sizes must
    /// add up to the payload length exactly, otherwise nothing is applied.
    pub fn load_column_batch(&mut self, bulk: &MapChunkBulk) -> Result<()> {
        let sizes: Vec<usize> = bulk
            .meta
            .iter()
            .map(|meta| expected_payload_len(meta.bit_map, bulk.sky_light_sent, true))
            .collect();
        let declared: usize = sizes.iter().sum();
        if declared != bulk.data.len() {
            let err = LodestoneError::IntegrityMismatch {
                declared,
                actual: bulk.data.len(),
            };
            log(format!("Rejecting column batch: {}", err), Error);
            return Err(err);
        }

        let mut offset = 0;
        for (meta, size) in bulk.meta.iter().zip(sizes) {
            self.load_column(&MapChunk {
                chunk_x: meta.chunk_x,
                chunk_z: meta.chunk_z,
                ground_up: true,
                bit_map: meta.bit_map,
                data: bulk.data.slice(offset..offset + size),
                sky_light_sent: Some(bulk.sky_light_sent),
                ..Default::default()
            });
            offset += size;
        }
        Ok(())
    }

    pub fn unload_column(&mut self, chunk_x: i32, chunk_z: i32) {
        let key = ColumnKey::new(chunk_x, chunk_z);
        self.store.unload_column(key);
        self.overlays.clear_column(key);
        self.events.emit(WorldEvent::ColumnUnloaded(key.corner()));
    }

    pub fn load_light(&mut self, light: &UpdateLight) {
        self.store
            .load_light(ColumnKey::new(light.chunk_x, light.chunk_z), light);
    }

    /// Sets one block and notifies subscribers. Updates for columns that are
    /// not loaded are dropped silently.
    pub fn update_block_state(&mut self, position: BlockPos, state: u16) {
        let old = self.block_at_pos(position);
        if !self.store.set_block_state(position, state) {
            log(
                format!("Dropping block update at {}: column not loaded", position),
                Debug,
            );
            return;
        }

        let new_type = self.store.get_block(position).map(|block| block.type_id);
        if old.as_ref().map(|block| block.type_id) != new_type {
            self.overlays.clear_at(position);
        }
        let new = self.block_at_pos(position);
        self.events.emit_block_update(BlockUpdate { position, old, new });
    }

    pub fn apply_multi_block_change(&mut self, change: &MultiBlockChange) {
        for (position, state) in change.changes() {
            self.update_block_state(position, state);
        }
    }

    pub fn apply_explosion(&mut self, explosion: &Explosion) {
        let origin = Position::new(explosion.x as f64, explosion.y as f64, explosion.z as f64);
        for &(dx, dy, dz) in &explosion.offsets {
            let position = origin.offset(dx as f64, dy as f64, dz as f64).floored();
            self.update_block_state(position, 0);
        }
    }

    pub fn spawn_painting(&mut self, spawn: SpawnPainting) {
        match Painting::new(spawn.entity_id, spawn.location, spawn.title, spawn.direction) {
            Some(painting) => self.overlays.add_painting(painting),
            None => log(
                format!(
                    "Ignoring painting {} with direction {}",
                    spawn.entity_id, spawn.direction
                ),
                Warning,
            ),
        }
    }

    pub fn destroy_entities(&mut self, entity_ids: &[i32]) {
        for id in entity_ids {
            self.overlays.remove_painting(*id);
        }
    }

    /// Records sign text sent by the server and notifies subscribers. The text
    /// is kept even when the column is not loaded.
    pub fn update_sign<S: AsRef<str>>(&mut self, position: BlockPos, lines: &[S]) {
        let old = self.block_at_pos(position);
        self.overlays.attach_sign_direct(position, lines);
        let new = self.block_at_pos(position);
        self.events.emit_block_update(BlockUpdate { position, old, new });
    }

    pub fn tile_entity_data(&mut self, data: &TileEntityData) {
        let result = Tag::from_bytes(&data.nbt_data)
            .map_err(|err| LodestoneError::NbtError(err.to_string()))
            .and_then(|(_, tag)| self.attach_block_entity(&tag, Some(data.location)));
        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Indexes a block-entity compound under the position named by its `x`,
    /// `y` and `z` fields, or under `fallback` when those are missing.
    fn attach_block_entity(&mut self, tag: &Tag, fallback: Option<BlockPos>) -> Result<BlockPos> {
        let fields = match tag.simplify() {
            Value::Object(fields) => fields,
            _ => {
                return Err(LodestoneError::NbtError(
                    "block entity is not a compound".to_string(),
                ))
            }
        };

        let coordinate = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_i64)
                .and_then(|v| i32::try_from(v).ok())
        };
        let position = match (coordinate("x"), coordinate("y"), coordinate("z")) {
            (Some(x), Some(y), Some(z)) => BlockPos::new(x, y, z),
            _ => fallback.ok_or_else(|| {
                LodestoneError::NbtError("block entity has no position".to_string())
            })?,
        };

        self.overlays.attach_block_entity(position, fields);
        Ok(position)
    }

    fn report(&mut self, err: LodestoneError) {
        log(format!("Dropping malformed input: {}", err), Warning);
        self.events.emit_error(err);
    }

    /// The block at `point`, or `None` when nothing is known about it.
    pub fn block_at(&self, point: Position) -> Option<Block> {
        self.block_at_pos(point.floored())
    }

    fn block_at_pos(&self, position: BlockPos) -> Option<Block> {
        let mut block = self.store.get_block(position)?;
        self.overlays.decorate(&mut block);
        Some(block)
    }

    pub fn find_block(&self, options: &FindBlockOptions) -> Option<Block> {
        search::find_block(self, options, self.config.find_block_max_distance)
    }

    pub fn is_visible(&self, from: Position, to: Position) -> bool {
        sight::is_visible(self, from, to, self.config.sight_samples_per_block)
    }

    pub fn can_see_block(&self, eye: Position, block: &Block) -> bool {
        sight::can_see_block(self, eye, block, self.config.sight_samples_per_block)
    }

    /// The loaded column at chunk coordinates `(chunk_x, chunk_z)`.
    pub fn column_at(&self, chunk_x: i32, chunk_z: i32) -> Option<&ChunkColumn> {
        self.store.column(ColumnKey::new(chunk_x, chunk_z))
    }

    pub fn loaded_columns(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.store.keys()
    }

    pub fn overlays(&self) -> &OverlayIndex {
        &self.overlays
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<WorldEvent> {
        self.events.subscribe()
    }

    pub fn subscribe_at(&mut self, position: BlockPos) -> UnboundedReceiver<BlockUpdate> {
        self.events.subscribe_at(position)
    }

    /// Builds the request that writes `lines` onto `block`.
    pub fn request_sign_write<S: AsRef<str>>(
        &self,
        block: &Block,
        lines: &[S],
    ) -> Result<UpdateSignRequest> {
        sign::sign_write_request(block.position, lines)
    }
}

impl BlockSource for World {
    fn block_at(&self, point: Position) -> Option<Block> {
        World::block_at(self, point)
    }
}
