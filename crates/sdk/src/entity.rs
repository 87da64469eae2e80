//! Entity types
//!
//! Every live object in a room is an [`Entity`]. Entities are identified by
//! the `(entity_type, variant, sub_type)` triple for filtering purposes and
//! by an [`EntityHandle`] for tracking a specific instance across frames.

use slotmap::new_key_type;

new_key_type! {
    /// Stable per-object identity key, minted by the room's entity arena.
    ///
    /// Valid for the lifetime of the object within its room. Not stable
    /// across rooms: a persistent object re-entering a new room is assigned
    /// a fresh handle.
    pub struct EntityHandle;
}

/// The broad category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EntityType {
    /// A player-controlled character
    Player = 1,
    /// A non-player character (enemies, bosses)
    Npc = 10,
    /// An item, coin, key, or other collectible drop
    Pickup = 20,
    /// A hostile projectile
    Projectile = 30,
    /// A transient visual effect
    Effect = 40,
    /// A follower that orbits the player
    Companion = 50,
    /// An interactable machine (vending, gambling)
    Machine = 60,
    /// A placed bomb
    Bomb = 70,
}

/// Selectable player characters (used by player filters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PlayerCharacter {
    Knight = 0,
    Rogue = 1,
    Mage = 2,
    Ranger = 3,
}

/// One live object in a room.
///
/// Fields mirror what the host exposes per object each frame. `variant` and
/// `sub_type` narrow the `entity_type`; `state` is the entity's current
/// behavior state (meaning is type-specific); `animation` is the name of the
/// currently playing animation; `frame_count` counts frames since the entity
/// spawned, starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Identity key minted by the owning room's arena
    pub handle: EntityHandle,
    /// Broad category
    pub entity_type: EntityType,
    /// Type-specific variant
    pub variant: i32,
    /// Variant-specific sub-type
    pub sub_type: i32,
    /// Current behavior state
    pub state: i32,
    /// For players: the selected character, as a raw id
    pub character: i32,
    /// Name of the currently playing animation
    pub animation: String,
    /// Frames since spawn (0 on the entity's first update)
    pub frame_count: u32,
}

impl Entity {
    /// Create an entity with default state fields.
    ///
    /// The handle is null until the entity is inserted into a room arena.
    pub fn new(entity_type: EntityType, variant: i32, sub_type: i32) -> Self {
        Self {
            handle: EntityHandle::default(),
            entity_type,
            variant,
            sub_type,
            state: 0,
            character: 0,
            animation: "Idle".to_string(),
            frame_count: 0,
        }
    }

    /// The selected character, if this entity is a player
    pub fn player_character(&self) -> Option<PlayerCharacter> {
        if self.entity_type != EntityType::Player {
            return None;
        }
        match self.character {
            0 => Some(PlayerCharacter::Knight),
            1 => Some(PlayerCharacter::Rogue),
            2 => Some(PlayerCharacter::Mage),
            3 => Some(PlayerCharacter::Ranger),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_defaults() {
        let entity = Entity::new(EntityType::Npc, 3, 7);
        assert_eq!(entity.entity_type, EntityType::Npc);
        assert_eq!(entity.variant, 3);
        assert_eq!(entity.sub_type, 7);
        assert_eq!(entity.frame_count, 0);
        assert_eq!(entity.handle, EntityHandle::default());
    }

    #[test]
    fn test_player_character_lookup() {
        let mut player = Entity::new(EntityType::Player, 0, 0);
        player.character = 2;
        assert_eq!(player.player_character(), Some(PlayerCharacter::Mage));

        let npc = Entity::new(EntityType::Npc, 0, 0);
        assert_eq!(npc.player_character(), None);
    }
}
