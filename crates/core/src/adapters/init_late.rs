//! Late-init detection
//!
//! The host has no "fully initialized" callback for entities; the closest
//! signal is the first per-entity update frame. This adapter watches one
//! entity type's update hook and fires the matching custom event exactly
//! once per entity, the first time that entity is seen updating.

use std::collections::HashSet;

use parking_lot::Mutex;

use modforge_sdk::{Entity, EntityHandle, EntityType, Room};

use crate::events::{
    CallbackKind, CallbackRegistry, CustomCallback, EntityFilter, PlayerFilter, VariantFilter,
};
use crate::host::{NativeEventData, NativeHookSpec};

use super::CallbackAdapter;

/// Fires a custom event on an entity's first observed update frame.
///
/// `skip_frames` delays the firing for entities whose first update frames
/// are unreliable: a pickup can still morph during its spawn frame, so the
/// pickup variant skips frame zero.
pub struct InitLateAdapter<F: 'static> {
    name: &'static str,
    kinds: [CallbackKind; 1],
    hooks: [NativeHookSpec; 1],
    skip_frames: u32,
    select: fn(&CallbackRegistry) -> &CustomCallback<Entity, F>,
    fired: Mutex<HashSet<EntityHandle>>,
}

impl<F> InitLateAdapter<F> {
    fn with_parts(
        name: &'static str,
        kind: CallbackKind,
        entity_type: EntityType,
        skip_frames: u32,
        select: fn(&CallbackRegistry) -> &CustomCallback<Entity, F>,
    ) -> Self {
        Self {
            name,
            kinds: [kind],
            hooks: [NativeHookSpec::entity_update(entity_type)],
            skip_frames,
            select,
            fired: Mutex::new(HashSet::new()),
        }
    }
}

impl InitLateAdapter<EntityFilter> {
    pub fn npc() -> Self {
        Self::with_parts(
            "npc_init_late",
            CallbackKind::PostNpcInitLate,
            EntityType::Npc,
            0,
            |callbacks| &callbacks.post_npc_init_late,
        )
    }
}

impl InitLateAdapter<PlayerFilter> {
    pub fn player() -> Self {
        Self::with_parts(
            "player_init_late",
            CallbackKind::PostPlayerInitLate,
            EntityType::Player,
            0,
            |callbacks| &callbacks.post_player_init_late,
        )
    }
}

impl InitLateAdapter<VariantFilter> {
    pub fn pickup(skip_frames: u32) -> Self {
        Self::with_parts(
            "pickup_init_late",
            CallbackKind::PostPickupInitLate,
            EntityType::Pickup,
            skip_frames,
            |callbacks| &callbacks.post_pickup_init_late,
        )
    }
}

impl<F: Clone + Send + Sync + 'static> CallbackAdapter for InitLateAdapter<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn provides(&self) -> &[CallbackKind] {
        &self.kinds
    }

    fn native_hooks(&self) -> &[NativeHookSpec] {
        &self.hooks
    }

    fn on_native(&self, callbacks: &CallbackRegistry, _room: &Room, data: &NativeEventData<'_>) {
        let NativeEventData::Entity(entity) = data else {
            return;
        };
        let target = (self.select)(callbacks);
        // Tracking starts with the first subscriber. Once entities have been
        // marked it must continue even with no subscribers, or a later
        // subscriber would see stale fires for long-lived entities.
        if !target.has_subscriptions() && self.fired.lock().is_empty() {
            return;
        }
        if entity.frame_count < self.skip_frames {
            return;
        }
        if !self.fired.lock().insert(entity.handle) {
            return;
        }
        tracing::debug!("{}: entity {:?} init complete", self.name, entity.handle);
        target.fire(entity);
    }

    fn reset_room(&self) {
        self.fired.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn npc_room() -> (Room, EntityHandle) {
        let mut room = Room::new(modforge_sdk::RoomType::Default);
        let handle = room.spawn(Entity::new(EntityType::Npc, 1, 0));
        (room, handle)
    }

    #[test]
    fn test_fires_once_per_entity() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_npc_init_late.subscribe(move |_| *count.lock() += 1);
        }

        let (room, handle) = npc_room();
        let entity = room.entity(handle).unwrap();
        adapter.on_native(&callbacks, &room, &NativeEventData::Entity(entity));
        adapter.on_native(&callbacks, &room, &NativeEventData::Entity(entity));

        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_distinct_entities_each_fire() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_npc_init_late.subscribe(move |_| *count.lock() += 1);
        }

        let mut room = Room::new(modforge_sdk::RoomType::Default);
        let a = room.spawn(Entity::new(EntityType::Npc, 1, 0));
        let b = room.spawn(Entity::new(EntityType::Npc, 2, 0));
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(a).unwrap()),
        );
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(b).unwrap()),
        );

        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_pickup_skips_spawn_frame() {
        let adapter = InitLateAdapter::pickup(1);
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks
                .post_pickup_init_late
                .subscribe(move |_| *count.lock() += 1);
        }

        let mut room = Room::new(modforge_sdk::RoomType::Shop);
        let handle = room.spawn(Entity::new(EntityType::Pickup, 100, 0));

        // Frame zero is skipped.
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(handle).unwrap()),
        );
        assert_eq!(*count.lock(), 0);

        room.entity_mut(handle).unwrap().frame_count = 1;
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(handle).unwrap()),
        );
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_room_reset_forgets_fired_entities() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_npc_init_late.subscribe(move |_| *count.lock() += 1);
        }

        let (room, handle) = npc_room();
        let entity = room.entity(handle).unwrap();
        adapter.on_native(&callbacks, &room, &NativeEventData::Entity(entity));
        adapter.reset_room();
        adapter.on_native(&callbacks, &room, &NativeEventData::Entity(entity));

        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_idle_until_first_subscriber() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let (room, handle) = npc_room();

        // Nobody listening, nothing marked: the frame does no tracking work.
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(handle).unwrap()),
        );
        assert!(adapter.fired.lock().is_empty());

        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_npc_init_late.subscribe(move |_| *count.lock() += 1);
        }
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(handle).unwrap()),
        );
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_tracking_continues_after_unsubscribe() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let key = callbacks.post_npc_init_late.subscribe(|_| {});

        let mut room = Room::new(modforge_sdk::RoomType::Default);
        let a = room.spawn(Entity::new(EntityType::Npc, 1, 0));
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(a).unwrap()),
        );
        callbacks.post_npc_init_late.unsubscribe(key);

        // Entity b completes init while nobody listens; it still gets
        // marked so a later subscriber does not see a stale fire.
        let b = room.spawn(Entity::new(EntityType::Npc, 2, 0));
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(b).unwrap()),
        );

        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks.post_npc_init_late.subscribe(move |_| *count.lock() += 1);
        }
        adapter.on_native(
            &callbacks,
            &room,
            &NativeEventData::Entity(room.entity(b).unwrap()),
        );
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_global_data_ignored() {
        let adapter = InitLateAdapter::npc();
        let callbacks = CallbackRegistry::new();
        let fired = Arc::new(Mutex::new(false));
        {
            let fired = Arc::clone(&fired);
            callbacks
                .post_npc_init_late
                .subscribe(move |_| *fired.lock() = true);
        }

        let (room, _handle) = npc_room();
        adapter.on_native(&callbacks, &room, &NativeEventData::Global);
        assert!(!*fired.lock());
    }
}
