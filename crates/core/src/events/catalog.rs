//! Event kind catalog and callback registry
//!
//! [`CallbackKind`] enumerates every custom event kind the framework can
//! fire. [`CALLBACK_SPECS`] is the static metadata table behind the wiring
//! step: which native hooks each kind's adapter needs, and which custom
//! kinds it chains onto. [`CallbackRegistry`] owns the typed dispatch
//! engine for each kind.

use modforge_sdk::{Entity, EntityType, GridEntity};

use super::dispatcher::CustomCallback;
use super::should_fire::{
    should_fire_always, should_fire_entity, should_fire_grid_entity, should_fire_grid_removed,
    should_fire_player, should_fire_room, should_fire_variant, EntityFilter, GridFilter,
    PlayerFilter, RoomFilter, VariantFilter,
};
use super::types::{
    GridRemoved, GridStateChanged, MachineAnimationChanged, NpcStateChanged, PickupChanged,
    RoomEnter, RunStart,
};
use crate::host::{NativeCallback, NativeHookSpec};

/// Every custom event kind the framework can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    PostNpcInitLate,
    PostPlayerInitLate,
    PostPickupInitLate,
    PostNpcStateChanged,
    PostMachineAnimationChanged,
    PostPickupChanged,
    PostGridInit,
    PostGridUpdate,
    PostGridRemove,
    PostGridStateChanged,
    PostGridBroken,
    PostRoomEnter,
    PostRunStart,
}

/// Hook slots referenced by the catalog
mod hooks {
    use super::*;

    pub const POST_UPDATE: NativeHookSpec = NativeHookSpec::global(NativeCallback::PostUpdate);
    pub const NEW_ROOM: NativeHookSpec = NativeHookSpec::global(NativeCallback::PostNewRoom);
    pub const NEW_RUN: NativeHookSpec = NativeHookSpec::global(NativeCallback::PostNewRun);
    pub const NPC_UPDATE: NativeHookSpec = NativeHookSpec::entity_update(EntityType::Npc);
    pub const PLAYER_UPDATE: NativeHookSpec = NativeHookSpec::entity_update(EntityType::Player);
    pub const PICKUP_UPDATE: NativeHookSpec = NativeHookSpec::entity_update(EntityType::Pickup);
    pub const MACHINE_UPDATE: NativeHookSpec = NativeHookSpec::entity_update(EntityType::Machine);
}

/// Static metadata for one event kind: the native hooks its adapter needs
/// and the custom kinds it chains onto. Custom-dependency edges must be
/// acyclic.
#[derive(Debug, Clone, Copy)]
pub struct CallbackSpec {
    pub kind: CallbackKind,
    pub native_hooks: &'static [NativeHookSpec],
    pub custom_deps: &'static [CallbackKind],
}

/// The complete catalog.
pub const CALLBACK_SPECS: &[CallbackSpec] = &[
    CallbackSpec {
        kind: CallbackKind::PostNpcInitLate,
        native_hooks: &[hooks::NPC_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostPlayerInitLate,
        native_hooks: &[hooks::PLAYER_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostPickupInitLate,
        native_hooks: &[hooks::PICKUP_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostNpcStateChanged,
        native_hooks: &[hooks::NPC_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostMachineAnimationChanged,
        native_hooks: &[hooks::MACHINE_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostPickupChanged,
        native_hooks: &[hooks::PICKUP_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostGridInit,
        native_hooks: &[hooks::POST_UPDATE],
        custom_deps: &[CallbackKind::PostRoomEnter],
    },
    CallbackSpec {
        kind: CallbackKind::PostGridUpdate,
        native_hooks: &[hooks::POST_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostGridRemove,
        native_hooks: &[hooks::POST_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostGridStateChanged,
        native_hooks: &[hooks::POST_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostGridBroken,
        native_hooks: &[hooks::POST_UPDATE],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostRoomEnter,
        native_hooks: &[hooks::NEW_ROOM],
        custom_deps: &[],
    },
    CallbackSpec {
        kind: CallbackKind::PostRunStart,
        native_hooks: &[hooks::NEW_RUN],
        custom_deps: &[],
    },
];

impl CallbackSpec {
    /// Look up the metadata for a kind.
    pub fn of(kind: CallbackKind) -> &'static CallbackSpec {
        CALLBACK_SPECS
            .iter()
            .find(|spec| spec.kind == kind)
            .expect("every CallbackKind has a catalog entry")
    }
}

// Predicate shims: each derived payload filters on its leading object only.

fn npc_state_changed_should_fire(payload: &NpcStateChanged, filter: &EntityFilter) -> bool {
    should_fire_entity(&payload.npc, filter)
}

fn machine_animation_should_fire(payload: &MachineAnimationChanged, filter: &VariantFilter) -> bool {
    should_fire_variant(&payload.machine, filter)
}

fn pickup_changed_should_fire(payload: &PickupChanged, filter: &VariantFilter) -> bool {
    should_fire_variant(&payload.pickup, filter)
}

fn grid_state_changed_should_fire(payload: &GridStateChanged, filter: &GridFilter) -> bool {
    should_fire_grid_entity(&payload.grid_entity, filter)
}

fn room_enter_should_fire(payload: &RoomEnter, filter: &RoomFilter) -> bool {
    should_fire_room(payload.room_type, filter)
}

/// One typed dispatch engine per event kind.
pub struct CallbackRegistry {
    pub post_npc_init_late: CustomCallback<Entity, EntityFilter>,
    pub post_player_init_late: CustomCallback<Entity, PlayerFilter>,
    pub post_pickup_init_late: CustomCallback<Entity, VariantFilter>,
    pub post_npc_state_changed: CustomCallback<NpcStateChanged, EntityFilter>,
    pub post_machine_animation_changed: CustomCallback<MachineAnimationChanged, VariantFilter>,
    pub post_pickup_changed: CustomCallback<PickupChanged, VariantFilter>,
    pub post_grid_init: CustomCallback<GridEntity, GridFilter>,
    pub post_grid_update: CustomCallback<GridEntity, GridFilter>,
    pub post_grid_remove: CustomCallback<GridRemoved, GridFilter>,
    pub post_grid_state_changed: CustomCallback<GridStateChanged, GridFilter>,
    pub post_grid_broken: CustomCallback<GridEntity, GridFilter>,
    pub post_room_enter: CustomCallback<RoomEnter, RoomFilter>,
    pub post_run_start: CustomCallback<RunStart, ()>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self {
            post_npc_init_late: CustomCallback::new("post_npc_init_late", should_fire_entity),
            post_player_init_late: CustomCallback::new("post_player_init_late", should_fire_player),
            post_pickup_init_late: CustomCallback::new(
                "post_pickup_init_late",
                should_fire_variant,
            ),
            post_npc_state_changed: CustomCallback::new(
                "post_npc_state_changed",
                npc_state_changed_should_fire,
            ),
            post_machine_animation_changed: CustomCallback::new(
                "post_machine_animation_changed",
                machine_animation_should_fire,
            ),
            post_pickup_changed: CustomCallback::new(
                "post_pickup_changed",
                pickup_changed_should_fire,
            ),
            post_grid_init: CustomCallback::new("post_grid_init", should_fire_grid_entity),
            post_grid_update: CustomCallback::new("post_grid_update", should_fire_grid_entity),
            post_grid_remove: CustomCallback::new("post_grid_remove", should_fire_grid_removed),
            post_grid_state_changed: CustomCallback::new(
                "post_grid_state_changed",
                grid_state_changed_should_fire,
            ),
            post_grid_broken: CustomCallback::new("post_grid_broken", should_fire_grid_entity),
            post_room_enter: CustomCallback::new("post_room_enter", room_enter_should_fire),
            post_run_start: CustomCallback::new("post_run_start", should_fire_always),
        }
    }

    /// Whether the given kind has at least one live subscription. Used by
    /// the wiring step to decide which native hooks to register.
    pub fn has_subscriptions(&self, kind: CallbackKind) -> bool {
        match kind {
            CallbackKind::PostNpcInitLate => self.post_npc_init_late.has_subscriptions(),
            CallbackKind::PostPlayerInitLate => self.post_player_init_late.has_subscriptions(),
            CallbackKind::PostPickupInitLate => self.post_pickup_init_late.has_subscriptions(),
            CallbackKind::PostNpcStateChanged => self.post_npc_state_changed.has_subscriptions(),
            CallbackKind::PostMachineAnimationChanged => {
                self.post_machine_animation_changed.has_subscriptions()
            }
            CallbackKind::PostPickupChanged => self.post_pickup_changed.has_subscriptions(),
            CallbackKind::PostGridInit => self.post_grid_init.has_subscriptions(),
            CallbackKind::PostGridUpdate => self.post_grid_update.has_subscriptions(),
            CallbackKind::PostGridRemove => self.post_grid_remove.has_subscriptions(),
            CallbackKind::PostGridStateChanged => self.post_grid_state_changed.has_subscriptions(),
            CallbackKind::PostGridBroken => self.post_grid_broken.has_subscriptions(),
            CallbackKind::PostRoomEnter => self.post_room_enter.has_subscriptions(),
            CallbackKind::PostRunStart => self.post_run_start.has_subscriptions(),
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}
