//! Grid lifecycle detection
//!
//! The host offers no per-grid-entity callbacks at all; everything about
//! the grid has to be derived by diffing the room layout between frames.
//! This adapter keeps a snapshot of every occupied cell and, on each global
//! update, derives five events from the difference:
//!
//! - remove: a tracked cell is now empty, or its occupant changed type
//! - init: an untracked cell is now occupied
//! - state-changed: a tracked occupant's state field differs
//! - broken: a state change crossed into the type's destroyed form
//! - update: fired for every occupied cell, every update frame
//!
//! A cell whose occupant changes type counts as a removal of the old
//! occupant followed by an init of the new one, and all removals of a frame
//! are dispatched before any init. The initial room scan happens in
//! `on_room_enter`, so entities present when the room loads fire init
//! before their first update frame; the scan fires init only, update events
//! begin with the first frame.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use parking_lot::Mutex;

use modforge_sdk::{is_grid_entity_broken, GridEntity, GridIndex, Room};

use crate::events::{CallbackKind, CallbackRegistry, GridRemoved, GridStateChanged};
use crate::host::{NativeCallback, NativeEventData, NativeHookSpec};

use super::CallbackAdapter;

const PROVIDES: &[CallbackKind] = &[
    CallbackKind::PostGridInit,
    CallbackKind::PostGridUpdate,
    CallbackKind::PostGridRemove,
    CallbackKind::PostGridStateChanged,
    CallbackKind::PostGridBroken,
];

const HOOKS: &[NativeHookSpec] = &[NativeHookSpec::global(NativeCallback::PostUpdate)];

/// Last-seen identity and state of one tracked cell.
#[derive(Debug, Clone, Copy)]
struct CellSnapshot {
    grid_type: modforge_sdk::GridEntityType,
    variant: i32,
    state: i32,
}

impl CellSnapshot {
    fn of(grid_entity: &GridEntity) -> Self {
        Self {
            grid_type: grid_entity.grid_type,
            variant: grid_entity.variant,
            state: grid_entity.state,
        }
    }
}

/// One detected state change, queued while the snapshot lock is held.
struct StateDelta {
    grid_entity: GridEntity,
    previous_state: i32,
    broke: bool,
}

/// Derives grid lifecycle events by diffing the room grid each frame.
pub struct GridLifecycleAdapter {
    cells: Mutex<HashMap<GridIndex, CellSnapshot>>,
}

impl GridLifecycleAdapter {
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Diff the room against the stored snapshots and dispatch the derived
    /// events. Events are queued under the lock and fired after it is
    /// released, so handlers may re-enter.
    fn diff_and_fire(&self, callbacks: &CallbackRegistry, room: &Room) {
        let mut removed: Vec<GridRemoved> = Vec::new();
        let mut inited: Vec<GridEntity> = Vec::new();
        let mut deltas: Vec<StateDelta> = Vec::new();

        {
            let mut cells = self.cells.lock();

            // Removals first. A type change at a cell is a removal of the
            // old occupant; the survivor pass below re-inits the cell.
            cells.retain(|&grid_index, snapshot| {
                let survives = room
                    .grid_entity(grid_index)
                    .map_or(false, |current| current.grid_type == snapshot.grid_type);
                if !survives {
                    removed.push(GridRemoved {
                        grid_index,
                        grid_type: snapshot.grid_type,
                        variant: snapshot.variant,
                    });
                }
                survives
            });

            for (grid_index, grid_entity) in room.grid_entities() {
                match cells.entry(grid_index) {
                    Entry::Vacant(slot) => {
                        slot.insert(CellSnapshot::of(grid_entity));
                        inited.push(*grid_entity);
                    }
                    Entry::Occupied(mut slot) => {
                        let snapshot = slot.get_mut();
                        if snapshot.state != grid_entity.state {
                            let previous = GridEntity {
                                state: snapshot.state,
                                ..*grid_entity
                            };
                            deltas.push(StateDelta {
                                grid_entity: *grid_entity,
                                previous_state: snapshot.state,
                                broke: is_grid_entity_broken(grid_entity)
                                    && !is_grid_entity_broken(&previous),
                            });
                        }
                        *snapshot = CellSnapshot::of(grid_entity);
                    }
                }
            }
        }

        for removal in &removed {
            tracing::debug!(
                "grid cell {} lost its {:?}",
                removal.grid_index,
                removal.grid_type
            );
            callbacks.post_grid_remove.fire(removal);
        }
        for grid_entity in &inited {
            callbacks.post_grid_init.fire(grid_entity);
        }
        for delta in &deltas {
            callbacks.post_grid_state_changed.fire(&GridStateChanged {
                grid_entity: delta.grid_entity,
                previous_state: delta.previous_state,
                current_state: delta.grid_entity.state,
            });
            if delta.broke {
                callbacks.post_grid_broken.fire(&delta.grid_entity);
            }
        }
    }

    fn any_subscriptions(callbacks: &CallbackRegistry) -> bool {
        PROVIDES.iter().any(|&kind| callbacks.has_subscriptions(kind))
    }
}

impl Default for GridLifecycleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackAdapter for GridLifecycleAdapter {
    fn name(&self) -> &'static str {
        "grid_lifecycle"
    }

    fn provides(&self) -> &[CallbackKind] {
        PROVIDES
    }

    fn native_hooks(&self) -> &[NativeHookSpec] {
        HOOKS
    }

    fn on_native(&self, callbacks: &CallbackRegistry, room: &Room, data: &NativeEventData<'_>) {
        if !matches!(data, NativeEventData::Global) {
            return;
        }
        // Once tracking has started it must continue even with no
        // subscribers, or the snapshots go stale and a later subscriber
        // would see spurious diffs.
        if self.cells.lock().is_empty() && !Self::any_subscriptions(callbacks) {
            return;
        }
        self.diff_and_fire(callbacks, room);
        for (_, grid_entity) in room.grid_entities() {
            callbacks.post_grid_update.fire(grid_entity);
        }
    }

    fn on_room_enter(&self, callbacks: &CallbackRegistry, room: &Room) {
        if !Self::any_subscriptions(callbacks) {
            return;
        }
        // Initial scan: everything present at room load fires init.
        self.diff_and_fire(callbacks, room);
    }

    fn reset_room(&self) {
        self.cells.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modforge_sdk::{grid_state, GridEntityType, RoomType};
    use std::sync::Arc;

    fn tick(adapter: &GridLifecycleAdapter, callbacks: &CallbackRegistry, room: &Room) {
        adapter.on_native(callbacks, room, &NativeEventData::Global);
    }

    #[test]
    fn test_room_scan_fires_init_for_loaded_entities() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();
        let inits = Arc::new(Mutex::new(Vec::new()));
        {
            let inits = Arc::clone(&inits);
            callbacks
                .post_grid_init
                .subscribe(move |grid_entity| inits.lock().push(grid_entity.grid_index));
        }

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(20, GridEntityType::Rock, 0));
        room.set_grid_entity(GridEntity::new(4, GridEntityType::Pit, 0));

        adapter.on_room_enter(&callbacks, &room);
        assert_eq!(*inits.lock(), vec![4, 20]);

        // Already tracked: the next frame inits nothing.
        tick(&adapter, &callbacks, &room);
        assert_eq!(*inits.lock(), vec![4, 20]);
    }

    #[test]
    fn test_removal_carries_stored_identity() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();
        let removals = Arc::new(Mutex::new(Vec::new()));
        {
            let removals = Arc::clone(&removals);
            callbacks.post_grid_remove.subscribe(move |removal| {
                removals
                    .lock()
                    .push((removal.grid_index, removal.grid_type, removal.variant));
            });
        }

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(7, GridEntityType::Barrel, 2));
        adapter.on_room_enter(&callbacks, &room);

        room.remove_grid_entity(7);
        tick(&adapter, &callbacks, &room);

        assert_eq!(*removals.lock(), vec![(7, GridEntityType::Barrel, 2)]);
    }

    #[test]
    fn test_type_change_fires_remove_before_init() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        {
            let order = Arc::clone(&order);
            callbacks
                .post_grid_remove
                .subscribe(move |removal| order.lock().push(format!("remove:{:?}", removal.grid_type)));
        }
        {
            let order = Arc::clone(&order);
            callbacks
                .post_grid_init
                .subscribe(move |grid_entity| order.lock().push(format!("init:{:?}", grid_entity.grid_type)));
        }

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(12, GridEntityType::Rock, 0));
        adapter.on_room_enter(&callbacks, &room);
        order.lock().clear();

        // A rock destroyed into a pit: same cell, new occupant type.
        room.set_grid_entity(GridEntity::new(12, GridEntityType::Pit, 0));
        tick(&adapter, &callbacks, &room);

        assert_eq!(*order.lock(), vec!["remove:Rock", "init:Pit"]);
    }

    #[test]
    fn test_state_change_and_broken() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let broken = Arc::new(Mutex::new(0));
        {
            let changes = Arc::clone(&changes);
            callbacks.post_grid_state_changed.subscribe(move |change| {
                changes
                    .lock()
                    .push((change.previous_state, change.current_state));
            });
        }
        {
            let broken = Arc::clone(&broken);
            callbacks.post_grid_broken.subscribe(move |_| *broken.lock() += 1);
        }

        let mut room = Room::new(RoomType::Default);
        let mut rock = GridEntity::new(9, GridEntityType::Rock, 0);
        rock.state = grid_state::ROCK_INTACT;
        room.set_grid_entity(rock);
        adapter.on_room_enter(&callbacks, &room);

        room.grid_entity_mut(9).unwrap().state = grid_state::ROCK_BROKEN;
        tick(&adapter, &callbacks, &room);

        assert_eq!(
            *changes.lock(),
            vec![(grid_state::ROCK_INTACT, grid_state::ROCK_BROKEN)]
        );
        assert_eq!(*broken.lock(), 1);

        // Staying broken fires neither again.
        tick(&adapter, &callbacks, &room);
        assert_eq!(changes.lock().len(), 1);
        assert_eq!(*broken.lock(), 1);
    }

    #[test]
    fn test_update_fires_every_frame_per_cell() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_grid_update.subscribe(move |_| *count.lock() += 1);
        }

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(1, GridEntityType::Rock, 0));
        room.set_grid_entity(GridEntity::new(2, GridEntityType::Web, 0));

        // The room-load scan fires init only, never update.
        adapter.on_room_enter(&callbacks, &room);
        assert_eq!(*count.lock(), 0);

        tick(&adapter, &callbacks, &room);
        tick(&adapter, &callbacks, &room);

        assert_eq!(*count.lock(), 4);
    }

    #[test]
    fn test_idle_without_subscribers_or_tracked_cells() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(1, GridEntityType::Rock, 0));

        // No subscribers, nothing tracked: the frame is skipped entirely.
        tick(&adapter, &callbacks, &room);
        assert!(adapter.cells.lock().is_empty());

        // A subscriber appearing later sees a clean init, not a stale diff.
        let inits = Arc::new(Mutex::new(0));
        {
            let inits = Arc::clone(&inits);
            callbacks.post_grid_init.subscribe(move |_| *inits.lock() += 1);
        }
        tick(&adapter, &callbacks, &room);
        assert_eq!(*inits.lock(), 1);
    }

    #[test]
    fn test_tracking_continues_after_unsubscribe() {
        let adapter = GridLifecycleAdapter::new();
        let callbacks = CallbackRegistry::new();

        let mut room = Room::new(RoomType::Default);
        room.set_grid_entity(GridEntity::new(1, GridEntityType::Rock, 0));

        let key = callbacks.post_grid_init.subscribe(|_| {});
        adapter.on_room_enter(&callbacks, &room);
        callbacks.post_grid_init.unsubscribe(key);

        // Snapshots stay fresh while unsubscribed.
        room.grid_entity_mut(1).unwrap().state = grid_state::ROCK_BROKEN;
        tick(&adapter, &callbacks, &room);

        let changes = Arc::new(Mutex::new(0));
        {
            let changes = Arc::clone(&changes);
            callbacks
                .post_grid_state_changed
                .subscribe(move |_| *changes.lock() += 1);
        }
        // The state change already happened while nobody listened; it must
        // not be replayed now.
        tick(&adapter, &callbacks, &room);
        assert_eq!(*changes.lock(), 0);
    }
}
