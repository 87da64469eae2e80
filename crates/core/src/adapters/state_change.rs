//! Per-entity state diffing
//!
//! Several custom events mean "some field of this entity is different from
//! last frame". The pattern is always the same: on each update frame, read
//! the watched axis, compare it to the value stored for that entity's
//! handle, and fire with (previous, current) on a difference.
//!
//! The first observation of an entity only seeds the stored value. An
//! entity spawning directly into an unusual state is not a change.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use parking_lot::Mutex;

use modforge_sdk::{Entity, EntityHandle, EntityType, Room};

use crate::events::{
    CallbackKind, CallbackRegistry, CustomCallback, EntityFilter, MachineAnimationChanged,
    NpcStateChanged, PickupChanged, VariantFilter,
};
use crate::host::{NativeEventData, NativeHookSpec};

use super::CallbackAdapter;

/// Fires a custom event when a watched per-entity value changes between
/// update frames.
///
/// Generic over the watched axis `S`, the firing payload `P`, and the
/// filter shape `F`. The axis extractor and payload constructor are plain
/// functions, so one adapter type covers NPC behavior states, machine
/// animations, and pickup morphs.
pub struct StateChangeAdapter<S, P: 'static, F: 'static> {
    name: &'static str,
    kinds: [CallbackKind; 1],
    hooks: [NativeHookSpec; 1],
    axis: fn(&Entity) -> S,
    make_payload: fn(&Entity, S, S) -> P,
    select: fn(&CallbackRegistry) -> &CustomCallback<P, F>,
    seen: Mutex<HashMap<EntityHandle, S>>,
}

impl<S, P, F> StateChangeAdapter<S, P, F> {
    fn with_parts(
        name: &'static str,
        kind: CallbackKind,
        entity_type: EntityType,
        axis: fn(&Entity) -> S,
        make_payload: fn(&Entity, S, S) -> P,
        select: fn(&CallbackRegistry) -> &CustomCallback<P, F>,
    ) -> Self {
        Self {
            name,
            kinds: [kind],
            hooks: [NativeHookSpec::entity_update(entity_type)],
            axis,
            make_payload,
            select,
            seen: Mutex::new(HashMap::new()),
        }
    }
}

/// Watches NPC behavior states.
pub fn npc_state_adapter() -> StateChangeAdapter<i32, NpcStateChanged, EntityFilter> {
    StateChangeAdapter::with_parts(
        "npc_state_changed",
        CallbackKind::PostNpcStateChanged,
        EntityType::Npc,
        |npc| npc.state,
        |npc, previous_state, current_state| NpcStateChanged {
            npc: npc.clone(),
            previous_state,
            current_state,
        },
        |callbacks| &callbacks.post_npc_state_changed,
    )
}

/// Watches machine animation names.
pub fn machine_animation_adapter(
) -> StateChangeAdapter<String, MachineAnimationChanged, VariantFilter> {
    StateChangeAdapter::with_parts(
        "machine_animation_changed",
        CallbackKind::PostMachineAnimationChanged,
        EntityType::Machine,
        |machine| machine.animation.clone(),
        |machine, previous_animation, current_animation| MachineAnimationChanged {
            machine: machine.clone(),
            previous_animation,
            current_animation,
        },
        |callbacks| &callbacks.post_machine_animation_changed,
    )
}

/// Watches pickups morphing into a different variant or sub-type in place.
pub fn pickup_changed_adapter() -> StateChangeAdapter<(i32, i32), PickupChanged, VariantFilter> {
    StateChangeAdapter::with_parts(
        "pickup_changed",
        CallbackKind::PostPickupChanged,
        EntityType::Pickup,
        |pickup| (pickup.variant, pickup.sub_type),
        |pickup, old, new| PickupChanged {
            pickup: pickup.clone(),
            old_variant: old.0,
            old_sub_type: old.1,
            new_variant: new.0,
            new_sub_type: new.1,
        },
        |callbacks| &callbacks.post_pickup_changed,
    )
}

impl<S, P, F> CallbackAdapter for StateChangeAdapter<S, P, F>
where
    S: Clone + PartialEq + Send,
    P: 'static,
    F: Clone + 'static,
{
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
        // Skip the axis extraction entirely while nothing is tracked and
        // nobody listens; once seeded, keep diffing so stored values stay
        // fresh across subscriber churn.
        if !target.has_subscriptions() && self.seen.lock().is_empty() {
            return;
        }
        let current = (self.axis)(entity);

        // Lock scope ends before dispatch so handlers may re-enter.
        let previous = {
            let mut seen = self.seen.lock();
            match seen.entry(entity.handle) {
                Entry::Vacant(slot) => {
                    slot.insert(current);
                    return;
                }
                Entry::Occupied(mut slot) => {
                    if *slot.get() == current {
                        return;
                    }
                    slot.insert(current.clone())
                }
            }
        };

        tracing::debug!("{}: entity {:?} changed", self.name, entity.handle);
        let payload = (self.make_payload)(entity, previous, current);
        target.fire(&payload);
    }

    fn reset_room(&self) {
        self.seen.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modforge_sdk::RoomType;
    use std::sync::Arc;

    fn update(
        adapter: &dyn CallbackAdapter,
        callbacks: &CallbackRegistry,
        room: &Room,
        handle: EntityHandle,
    ) {
        let entity = room.entity(handle).unwrap();
        adapter.on_native(callbacks, room, &NativeEventData::Entity(entity));
    }

    #[test]
    fn test_first_observation_seeds_without_firing() {
        let adapter = npc_state_adapter();
        let callbacks = CallbackRegistry::new();
        let fired = Arc::new(Mutex::new(false));
        {
            let fired = Arc::clone(&fired);
            callbacks
                .post_npc_state_changed
                .subscribe(move |_| *fired.lock() = true);
        }

        let mut room = Room::new(RoomType::Default);
        let mut npc = Entity::new(EntityType::Npc, 1, 0);
        npc.state = 4;
        let handle = room.spawn(npc);

        // Spawning directly into state 4 is not a change.
        update(&adapter, &callbacks, &room, handle);
        assert!(!*fired.lock());
    }

    #[test]
    fn test_change_fires_with_previous_and_current() {
        let adapter = npc_state_adapter();
        let callbacks = CallbackRegistry::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        {
            let changes = Arc::clone(&changes);
            callbacks.post_npc_state_changed.subscribe(move |change| {
                changes
                    .lock()
                    .push((change.previous_state, change.current_state));
            });
        }

        let mut room = Room::new(RoomType::Default);
        let handle = room.spawn(Entity::new(EntityType::Npc, 1, 0));

        update(&adapter, &callbacks, &room, handle);
        room.entity_mut(handle).unwrap().state = 3;
        update(&adapter, &callbacks, &room, handle);
        // Unchanged frame: no firing.
        update(&adapter, &callbacks, &room, handle);
        room.entity_mut(handle).unwrap().state = 9;
        update(&adapter, &callbacks, &room, handle);

        assert_eq!(*changes.lock(), vec![(0, 3), (3, 9)]);
    }

    #[test]
    fn test_machine_animation_axis() {
        let adapter = machine_animation_adapter();
        let callbacks = CallbackRegistry::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        {
            let changes = Arc::clone(&changes);
            callbacks
                .post_machine_animation_changed
                .subscribe(move |change| {
                    changes.lock().push((
                        change.previous_animation.clone(),
                        change.current_animation.clone(),
                    ));
                });
        }

        let mut room = Room::new(RoomType::Default);
        let handle = room.spawn(Entity::new(EntityType::Machine, 1, 0));

        update(&adapter, &callbacks, &room, handle);
        room.entity_mut(handle).unwrap().animation = "Prize".to_string();
        update(&adapter, &callbacks, &room, handle);

        assert_eq!(
            *changes.lock(),
            vec![("Idle".to_string(), "Prize".to_string())]
        );
    }

    #[test]
    fn test_pickup_morph_carries_both_identities() {
        let adapter = pickup_changed_adapter();
        let callbacks = CallbackRegistry::new();
        let changes = Arc::new(Mutex::new(Vec::new()));
        {
            let changes = Arc::clone(&changes);
            callbacks.post_pickup_changed.subscribe(move |change| {
                changes.lock().push((
                    change.old_variant,
                    change.old_sub_type,
                    change.new_variant,
                    change.new_sub_type,
                ));
            });
        }

        let mut room = Room::new(RoomType::Treasure);
        let handle = room.spawn(Entity::new(EntityType::Pickup, 100, 1));

        update(&adapter, &callbacks, &room, handle);
        {
            let pickup = room.entity_mut(handle).unwrap();
            pickup.variant = 20;
            pickup.sub_type = 3;
        }
        update(&adapter, &callbacks, &room, handle);

        assert_eq!(*changes.lock(), vec![(100, 1, 20, 3)]);
    }

    #[test]
    fn test_idle_until_first_subscriber() {
        let adapter = npc_state_adapter();
        let callbacks = CallbackRegistry::new();

        let mut room = Room::new(RoomType::Default);
        let handle = room.spawn(Entity::new(EntityType::Npc, 1, 0));

        // Nobody listening, nothing seeded: no axis work, no stored state.
        update(&adapter, &callbacks, &room, handle);
        assert!(adapter.seen.lock().is_empty());

        // A change that happens while idle is never replayed.
        room.entity_mut(handle).unwrap().state = 5;

        let changes = Arc::new(Mutex::new(Vec::new()));
        {
            let changes = Arc::clone(&changes);
            callbacks.post_npc_state_changed.subscribe(move |change| {
                changes
                    .lock()
                    .push((change.previous_state, change.current_state));
            });
        }

        // First observation after subscribing seeds at the current value.
        update(&adapter, &callbacks, &room, handle);
        assert!(changes.lock().is_empty());

        room.entity_mut(handle).unwrap().state = 6;
        update(&adapter, &callbacks, &room, handle);
        assert_eq!(*changes.lock(), vec![(5, 6)]);
    }

    #[test]
    fn test_room_reset_reseeds() {
        let adapter = npc_state_adapter();
        let callbacks = CallbackRegistry::new();
        let count = Arc::new(Mutex::new(0));
        {
            let count = Arc::clone(&count);
            callbacks
                .post_npc_state_changed
                .subscribe(move |_| *count.lock() += 1);
        }

        let mut room = Room::new(RoomType::Default);
        let handle = room.spawn(Entity::new(EntityType::Npc, 1, 0));
        update(&adapter, &callbacks, &room, handle);

        adapter.reset_room();

        // After a reset the stored value is gone; the next observation
        // seeds again instead of comparing against stale state.
        room.entity_mut(handle).unwrap().state = 5;
        update(&adapter, &callbacks, &room, handle);
        assert_eq!(*count.lock(), 0);

        room.entity_mut(handle).unwrap().state = 6;
        update(&adapter, &callbacks, &room, handle);
        assert_eq!(*count.lock(), 1);
    }
}
