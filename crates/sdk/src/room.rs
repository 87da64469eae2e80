//! Room state
//!
//! A [`Room`] is the host's unit of play space: an arena of live entities
//! plus the layout grid. The arena mints [`EntityHandle`]s; the grid is
//! keyed by [`GridIndex`]. A new `Room` is constructed for every room the
//! player enters, so handles never leak across room boundaries.

use std::collections::BTreeMap;

use slotmap::SlotMap;

use crate::entity::{Entity, EntityHandle};
use crate::grid::{GridEntity, GridIndex};

/// Room categories (used by room filters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RoomType {
    Default = 1,
    Shop = 2,
    Treasure = 4,
    Boss = 5,
    Secret = 7,
    Challenge = 11,
}

/// The contents of the current room.
#[derive(Debug, Clone)]
pub struct Room {
    /// Category of this room
    pub room_type: RoomType,
    entities: SlotMap<EntityHandle, Entity>,
    grid: BTreeMap<GridIndex, GridEntity>,
}

impl Room {
    pub fn new(room_type: RoomType) -> Self {
        Self {
            room_type,
            entities: SlotMap::with_key(),
            grid: BTreeMap::new(),
        }
    }

    /// Insert an entity into the arena, minting its handle.
    ///
    /// The entity's `handle` field is overwritten with the minted key.
    pub fn spawn(&mut self, entity: Entity) -> EntityHandle {
        self.entities.insert_with_key(|handle| {
            let mut entity = entity;
            entity.handle = handle;
            entity
        })
    }

    /// Remove an entity from the arena.
    ///
    /// Returns the removed entity, or `None` if the handle is stale.
    pub fn despawn(&mut self, handle: EntityHandle) -> Option<Entity> {
        self.entities.remove(handle)
    }

    /// Look up a live entity. Stale handles return `None`.
    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle)
    }

    /// Mutable lookup of a live entity.
    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle)
    }

    /// All live entities, in arena order (deterministic for a given spawn
    /// sequence).
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Mutable iteration over all live entities.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Place a grid entity, replacing any previous occupant of its cell.
    pub fn set_grid_entity(&mut self, grid_entity: GridEntity) {
        self.grid.insert(grid_entity.grid_index, grid_entity);
    }

    /// Clear a grid cell. Returns the removed occupant, if any.
    pub fn remove_grid_entity(&mut self, grid_index: GridIndex) -> Option<GridEntity> {
        self.grid.remove(&grid_index)
    }

    /// The occupant of a grid cell, if any.
    pub fn grid_entity(&self, grid_index: GridIndex) -> Option<&GridEntity> {
        self.grid.get(&grid_index)
    }

    /// Mutable lookup of a grid cell occupant.
    pub fn grid_entity_mut(&mut self, grid_index: GridIndex) -> Option<&mut GridEntity> {
        self.grid.get_mut(&grid_index)
    }

    /// All occupied grid cells, in ascending grid index order.
    pub fn grid_entities(&self) -> impl Iterator<Item = (GridIndex, &GridEntity)> {
        self.grid.iter().map(|(index, grid_entity)| (*index, grid_entity))
    }
}
