use lodestone_common::{BlockPos, LodestoneError};
use lodestone_world::Block;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A single cell changed. Either side is `None` when its column was not loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockUpdate {
    pub position: BlockPos,
    pub old: Option<Block>,
    pub new: Option<Block>,
}

#[derive(Debug, Clone)]
pub enum WorldEvent {
    /// A column was loaded. Carries its world corner.
    ColumnLoaded(BlockPos),
    ColumnUnloaded(BlockPos),
    BlockUpdated(BlockUpdate),
    /// Input that had to be dropped.
    Error(Arc<LodestoneError>),
}

/// Fan-out of world events to every live subscriber.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<WorldEvent>>,
    position_subscribers: HashMap<BlockPos, Vec<mpsc::UnboundedSender<BlockUpdate>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<WorldEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Watches a single position. Watchers dropped elsewhere are swept first.
    pub fn subscribe_at(&mut self, position: BlockPos) -> mpsc::UnboundedReceiver<BlockUpdate> {
        self.position_subscribers.retain(|_, watchers| {
            watchers.retain(|tx| !tx.is_closed());
            !watchers.is_empty()
        });
        let (tx, rx) = mpsc::unbounded_channel();
        self.position_subscribers.entry(position).or_default().push(tx);
        rx
    }

    /// Sends to every general subscriber, dropping those whose receiver is gone.
    pub fn emit(&mut self, event: WorldEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn emit_error(&mut self, error: LodestoneError) {
        self.emit(WorldEvent::Error(Arc::new(error)));
    }

    /// Sends a block update on the general stream and to the watchers of its position.
    pub fn emit_block_update(&mut self, update: BlockUpdate) {
        if let Some(watchers) = self.position_subscribers.get_mut(&update.position) {
            watchers.retain(|tx| tx.send(update.clone()).is_ok());
            if watchers.is_empty() {
                self.position_subscribers.remove(&update.position);
            }
        }
        self.emit(WorldEvent::BlockUpdated(update));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len() + self.position_subscribers.values().map(Vec::len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn update(position: BlockPos) -> BlockUpdate {
        BlockUpdate {
            position,
            old: None,
            new: None,
        }
    }

    #[test]
    fn test_general_subscribers_get_everything() {
        let mut bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit(WorldEvent::ColumnLoaded(BlockPos::new(16, 0, 0)));
        bus.emit_block_update(update(BlockPos::new(1, 2, 3)));

        for rx in [&mut first, &mut second] {
            assert_matches!(rx.try_recv(), Ok(WorldEvent::ColumnLoaded(pos)) if pos == BlockPos::new(16, 0, 0));
            assert_matches!(rx.try_recv(), Ok(WorldEvent::BlockUpdated(u)) if u.position == BlockPos::new(1, 2, 3));
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_position_subscribers_are_scoped() {
        let mut bus = EventBus::new();
        let mut watcher = bus.subscribe_at(BlockPos::new(1, 2, 3));

        bus.emit_block_update(update(BlockPos::new(9, 9, 9)));
        assert!(watcher.try_recv().is_err());

        bus.emit_block_update(update(BlockPos::new(1, 2, 3)));
        assert_eq!(watcher.try_recv().map(|u| u.position), Ok(BlockPos::new(1, 2, 3)));
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        drop(bus.subscribe_at(BlockPos::default()));
        assert_eq!(bus.subscriber_count(), 3);

        bus.emit_error(LodestoneError::NbtError("bad tag".into()));
        bus.emit_block_update(update(BlockPos::default()));
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_subscribe_at_sweeps_quiet_positions() {
        let mut bus = EventBus::new();
        let watchers: Vec<_> = (0..8)
            .map(|x| bus.subscribe_at(BlockPos::new(x, 64, 0)))
            .collect();
        assert_eq!(bus.subscriber_count(), 8);
        drop(watchers);

        let mut live = bus.subscribe_at(BlockPos::new(100, 64, 0));
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_block_update(update(BlockPos::new(100, 64, 0)));
        assert!(live.try_recv().is_ok());
    }
}
