//! Simulated game loop
//!
//! [`GameWorld`] stands in for the host engine: it owns the current room
//! and the hook table, and drives the native callback sequence the way the
//! engine would. One [`GameWorld::tick`] is one frame: every live entity's
//! update hook fires, then the global post-update hook, then entity frame
//! counters advance.

use modforge_sdk::{Entity, EntityHandle, Room, RoomType};

use crate::hooks::HookTable;

/// The simulated host. Owns the current room and the registered hooks.
pub struct GameWorld {
    room: Room,
    hooks: HookTable,
    frame: u64,
    run_count: u32,
}

impl GameWorld {
    pub fn new() -> Self {
        Self {
            room: Room::new(RoomType::Default),
            hooks: HookTable::new(),
            frame: 0,
            run_count: 0,
        }
    }

    /// The hook table; pass this to `ModRuntime::attach`.
    pub fn hooks_mut(&mut self) -> &mut HookTable {
        &mut self.hooks
    }

    /// The current room
    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Mutable access to the current room (test scaffolding for morphing
    /// entities or grid contents between ticks)
    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.room
    }

    /// Frames ticked since creation
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Begin a new run in the given starting room.
    ///
    /// Fires the new-run callback, then the new-room callback, matching the
    /// engine's ordering.
    pub fn start_run(&mut self, room: Room) {
        self.run_count += 1;
        self.room = room;
        tracing::info!("Host: run {} begins", self.run_count);
        self.hooks.invoke_new_run(&self.room);
        self.hooks.invoke_new_room(&self.room);
    }

    /// Replace the current room and fire the new-room callback.
    ///
    /// The room must already hold its starting contents; everything present
    /// here counts as loaded with the room.
    pub fn enter_room(&mut self, room: Room) {
        self.room = room;
        tracing::debug!("Host: entering {:?} room", self.room.room_type);
        self.hooks.invoke_new_room(&self.room);
    }

    /// Spawn an entity into the current room.
    pub fn spawn(&mut self, entity: Entity) -> EntityHandle {
        self.room.spawn(entity)
    }

    /// Despawn an entity from the current room.
    pub fn despawn(&mut self, handle: EntityHandle) -> Option<Entity> {
        self.room.despawn(handle)
    }

    /// Advance one frame.
    ///
    /// Each live entity's per-type update hook fires, then the global
    /// post-update hook, then every entity's frame counter advances.
    pub fn tick(&mut self) {
        self.frame += 1;

        let handles: Vec<EntityHandle> = self.room.entities().map(|entity| entity.handle).collect();
        for handle in handles {
            // An entity despawned earlier in this frame is skipped.
            if let Some(entity) = self.room.entity(handle) {
                self.hooks.invoke_entity_update(&self.room, entity);
            }
        }

        self.hooks.invoke_post_update(&self.room);

        for entity in self.room.entities_mut() {
            entity.frame_count += 1;
        }
    }

    /// Advance several frames.
    pub fn tick_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}
