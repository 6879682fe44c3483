use magic_maze_core::{Direction, EntityId, Layer, Plane, Position, TileRef};

use crate::map::{Map, Slot};

/// Where an entity lives: its owner, its plane and its cell.
///
/// The location is the only way an entity touches the occupancy layers, which
/// keeps the layer cell and the stored position in agreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityLocation {
    owner: EntityId,
    plane: Plane,
    position: Position,
}

impl EntityLocation {
    pub(crate) const fn new(owner: EntityId, plane: Plane, position: Position) -> Self {
        Self {
            owner,
            plane,
            position,
        }
    }

    /// Entity that owns this location.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Plane the entity occupies.
    #[must_use]
    pub const fn plane(&self) -> Plane {
        self.plane
    }

    /// Cell the entity occupies.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Reads `layer` at this location.
    #[must_use]
    pub fn get(&self, map: &Map, layer: Layer) -> Option<Slot> {
        map.get(layer, self.position)
    }

    /// Writes a tile into `layer` at this location.
    pub fn set(&self, map: &mut Map, layer: Layer, tile: Option<TileRef>) -> bool {
        map.set_tile(layer, self.position, tile)
    }

    /// Reports whether this entity's plane may enter `target`.
    #[must_use]
    pub fn allowed_access_to(&self, map: &Map, target: Position) -> bool {
        map.allowed_access_to(self.plane, target)
    }

    /// Moves one cell in `direction`.
    ///
    /// On success the old cell is vacated and the new one occupied in a
    /// single step. On failure nothing changes.
    pub(crate) fn add(&mut self, map: &mut Map, direction: Direction) -> bool {
        let target = self.position.step(direction);
        if !map.relocate(self.plane, self.owner, self.position, target) {
            return false;
        }
        self.position = target;
        true
    }

    /// Clears the occupied cell and deregisters the owner from ticking.
    pub(crate) fn remove_old_entity(&self, map: &mut Map) {
        map.evict(self.plane, self.owner, self.position);
    }
}
