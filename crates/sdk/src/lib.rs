//! modforge SDK - Host game object model
//!
//! Plain data types mirroring the host game's world: entities, grid
//! entities, and rooms. The SDK carries no framework logic; it exists so
//! that `modforge-core` and consumer mods agree on the shape of the world
//! they are observing.
//!
//! Object identity is expressed through [`EntityHandle`], a stable key
//! minted by the room's entity arena. Two lookups of the same live object
//! always yield the same handle within a room's lifetime; handles are not
//! reused for a different object while that object is alive.

mod entity;
mod grid;
mod room;

pub use entity::{Entity, EntityHandle, EntityType, PlayerCharacter};
pub use grid::{grid_state, is_grid_entity_broken, GridEntity, GridEntityType, GridIndex};
pub use room::{Room, RoomType};
