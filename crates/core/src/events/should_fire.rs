//! Filter predicate library
//!
//! Consumers may narrow a subscription with optional filter parameters.
//! These are the validation functions for each domain-object kind: every
//! present field of the filter must equal the corresponding field of the
//! fired object, and absent fields impose no constraint.
//!
//! Several predicates exist because different object kinds expose different
//! identifying fields: generic entities carry type + variant + sub-type,
//! grid entities carry type + variant, pooled kinds (pickups, projectiles,
//! machines) are identified by variant + sub-type alone. A predicate only
//! ever inspects the fields its filter shape declares, never extra payload
//! fields.

use modforge_sdk::{Entity, EntityType, GridEntity, GridEntityType, PlayerCharacter, RoomType};

use super::types::GridRemoved;

/// Filter for generic entities: type, variant, and sub-type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFilter {
    pub entity_type: Option<EntityType>,
    pub variant: Option<i32>,
    pub sub_type: Option<i32>,
}

/// Filter for pooled entity kinds identified by variant + sub-type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFilter {
    pub variant: Option<i32>,
    pub sub_type: Option<i32>,
}

/// Filter for players: variant + selected character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub variant: Option<i32>,
    pub character: Option<PlayerCharacter>,
}

/// Filter for grid entities: type + variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridFilter {
    pub grid_type: Option<GridEntityType>,
    pub variant: Option<i32>,
}

/// Filter for grid entity kinds whose type is implied by the event, leaving
/// only the variant (doors, pits, pressure plates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridVariantFilter {
    pub variant: Option<i32>,
}

/// Filter on the room category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomFilter {
    pub room_type: Option<RoomType>,
}

/// Predicate for event kinds with no filter parameters
pub fn should_fire_always<P>(_payload: &P, _filter: &()) -> bool {
    true
}

pub fn should_fire_entity(entity: &Entity, filter: &EntityFilter) -> bool {
    filter
        .entity_type
        .map_or(true, |entity_type| entity_type == entity.entity_type)
        && filter.variant.map_or(true, |variant| variant == entity.variant)
        && filter
            .sub_type
            .map_or(true, |sub_type| sub_type == entity.sub_type)
}

pub fn should_fire_variant(entity: &Entity, filter: &VariantFilter) -> bool {
    filter.variant.map_or(true, |variant| variant == entity.variant)
        && filter
            .sub_type
            .map_or(true, |sub_type| sub_type == entity.sub_type)
}

pub fn should_fire_player(player: &Entity, filter: &PlayerFilter) -> bool {
    filter.variant.map_or(true, |variant| variant == player.variant)
        && filter
            .character
            .map_or(true, |character| Some(character) == player.player_character())
}

pub fn should_fire_grid_entity(grid_entity: &GridEntity, filter: &GridFilter) -> bool {
    filter
        .grid_type
        .map_or(true, |grid_type| grid_type == grid_entity.grid_type)
        && filter
            .variant
            .map_or(true, |variant| variant == grid_entity.variant)
}

/// Removal payloads carry the stored type and variant instead of a live
/// object; the comparison is otherwise identical to
/// [`should_fire_grid_entity`].
pub fn should_fire_grid_removed(removed: &GridRemoved, filter: &GridFilter) -> bool {
    filter
        .grid_type
        .map_or(true, |grid_type| grid_type == removed.grid_type)
        && filter
            .variant
            .map_or(true, |variant| variant == removed.variant)
}

pub fn should_fire_door(door: &GridEntity, filter: &GridVariantFilter) -> bool {
    debug_assert_eq!(door.grid_type, GridEntityType::Door);
    filter.variant.map_or(true, |variant| variant == door.variant)
}

pub fn should_fire_pit(pit: &GridEntity, filter: &GridVariantFilter) -> bool {
    debug_assert_eq!(pit.grid_type, GridEntityType::Pit);
    filter.variant.map_or(true, |variant| variant == pit.variant)
}

pub fn should_fire_pressure_plate(plate: &GridEntity, filter: &GridVariantFilter) -> bool {
    debug_assert_eq!(plate.grid_type, GridEntityType::PressurePlate);
    filter.variant.map_or(true, |variant| variant == plate.variant)
}

/// Rocks keep the full type + variant filter because several grid entity
/// types count as rocks (rocks and blocks).
pub fn should_fire_rock(rock: &GridEntity, filter: &GridFilter) -> bool {
    should_fire_grid_entity(rock, filter)
}

pub fn should_fire_room(room_type: RoomType, filter: &RoomFilter) -> bool {
    filter.room_type.map_or(true, |filtered| filtered == room_type)
}
