//! Grid entity types
//!
//! Grid entities occupy fixed cells of a room's layout grid (rocks, pits,
//! doors, pressure plates). Unlike free entities they are addressed by their
//! [`GridIndex`] rather than by a handle: the grid index is the stable
//! identity of the cell, and the occupant at that cell can change type over
//! the room's lifetime.

/// Index of a cell in the room layout grid
pub type GridIndex = i32;

/// The category of a grid entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum GridEntityType {
    Rock = 2,
    Block = 3,
    Spikes = 8,
    Web = 10,
    Pit = 7,
    Barrel = 14,
    Door = 16,
    Trapdoor = 17,
    PressurePlate = 20,
    Statue = 21,
}

/// One occupied cell of the room grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEntity {
    /// The cell this entity occupies
    pub grid_index: GridIndex,
    /// Category of the occupant
    pub grid_type: GridEntityType,
    /// Type-specific variant
    pub variant: i32,
    /// Current state (meaning is type-specific; see [`grid_state`])
    pub state: i32,
}

impl GridEntity {
    pub fn new(grid_index: GridIndex, grid_type: GridEntityType, variant: i32) -> Self {
        Self {
            grid_index,
            grid_type,
            variant,
            state: 0,
        }
    }
}

/// State constants for grid entity types that have a destroyed form.
pub mod grid_state {
    /// Rocks and blocks: intact
    pub const ROCK_INTACT: i32 = 1;
    /// Rocks and blocks: smashed
    pub const ROCK_BROKEN: i32 = 2;
    /// Barrels step through damage states; this one and above are destroyed
    pub const BARREL_BROKEN: i32 = 4;
    /// Webs: cleared
    pub const WEB_BROKEN: i32 = 1;
    /// Spikes: retracted into the floor
    pub const SPIKES_RETRACTED: i32 = 1;
    /// Pressure plates: triggered at least once
    pub const PLATE_TRIGGERED: i32 = 3;
    /// Trapdoors: open
    pub const TRAPDOOR_OPEN: i32 = 1;
}

/// Whether a grid entity is in its broken/destroyed state.
///
/// Types without a destroyed form (doors, statues, pits, pressure plates)
/// never report broken.
pub fn is_grid_entity_broken(grid_entity: &GridEntity) -> bool {
    match grid_entity.grid_type {
        GridEntityType::Rock | GridEntityType::Block => {
            grid_entity.state == grid_state::ROCK_BROKEN
        }
        GridEntityType::Barrel => grid_entity.state >= grid_state::BARREL_BROKEN,
        GridEntityType::Web => grid_entity.state == grid_state::WEB_BROKEN,
        GridEntityType::Door
        | GridEntityType::Trapdoor
        | GridEntityType::Spikes
        | GridEntityType::Pit
        | GridEntityType::PressurePlate
        | GridEntityType::Statue => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rock_broken_state() {
        let mut rock = GridEntity::new(12, GridEntityType::Rock, 0);
        rock.state = grid_state::ROCK_INTACT;
        assert!(!is_grid_entity_broken(&rock));

        rock.state = grid_state::ROCK_BROKEN;
        assert!(is_grid_entity_broken(&rock));
    }

    #[test]
    fn test_barrel_broken_is_threshold() {
        let mut barrel = GridEntity::new(5, GridEntityType::Barrel, 0);
        barrel.state = grid_state::BARREL_BROKEN - 1;
        assert!(!is_grid_entity_broken(&barrel));

        barrel.state = grid_state::BARREL_BROKEN;
        assert!(is_grid_entity_broken(&barrel));

        barrel.state = grid_state::BARREL_BROKEN + 2;
        assert!(is_grid_entity_broken(&barrel));
    }

    #[test]
    fn test_types_without_broken_form() {
        let mut plate = GridEntity::new(9, GridEntityType::PressurePlate, 0);
        plate.state = grid_state::PLATE_TRIGGERED;
        assert!(!is_grid_entity_broken(&plate));

        let pit = GridEntity::new(3, GridEntityType::Pit, 0);
        assert!(!is_grid_entity_broken(&pit));
    }
}
