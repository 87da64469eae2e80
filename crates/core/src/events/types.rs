//! Firing payload types
//!
//! One plain struct per derived event kind. Payloads are constructed by an
//! adapter immediately before dispatch and are not retained afterward.

use modforge_sdk::{Entity, GridEntity, GridEntityType, GridIndex, RoomType};

/// An NPC's behavior state changed between frames.
#[derive(Debug, Clone)]
pub struct NpcStateChanged {
    pub npc: Entity,
    pub previous_state: i32,
    pub current_state: i32,
}

/// A machine's playing animation changed between frames.
#[derive(Debug, Clone)]
pub struct MachineAnimationChanged {
    pub machine: Entity,
    pub previous_animation: String,
    pub current_animation: String,
}

/// A pickup morphed into a different variant or sub-type in place.
#[derive(Debug, Clone)]
pub struct PickupChanged {
    pub pickup: Entity,
    pub old_variant: i32,
    pub old_sub_type: i32,
    pub new_variant: i32,
    pub new_sub_type: i32,
}

/// A grid entity was removed (or replaced by a different type) since the
/// previous frame. Carries the stored identity because the object itself no
/// longer exists.
#[derive(Debug, Clone, Copy)]
pub struct GridRemoved {
    pub grid_index: GridIndex,
    pub grid_type: GridEntityType,
    pub variant: i32,
}

/// A grid entity's state changed between frames.
#[derive(Debug, Clone, Copy)]
pub struct GridStateChanged {
    pub grid_entity: GridEntity,
    pub previous_state: i32,
    pub current_state: i32,
}

/// A new room has been entered and its contents are loaded.
#[derive(Debug, Clone, Copy)]
pub struct RoomEnter {
    pub room_type: RoomType,
}

/// A new run has started.
#[derive(Debug, Clone, Copy)]
pub struct RunStart {
    /// 1-based count of runs since the framework was attached
    pub run_count: u32,
}
