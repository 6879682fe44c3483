use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use magic_maze_core::{
    tiles, Direction, EntityId, Layer, LifeSignal, Plane, PlayerStatus, Position, TileKind,
    TileRef,
};

use crate::{
    astral::AstralBody,
    entity::{Entity, Role},
    location::EntityLocation,
    missile::Missile,
    monster::Monster,
    player::Player,
};

/// Content of a single layer cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// A static tile from the background or object layer.
    Tile(TileRef),
    /// An entity occupying a physical or spiritual cell.
    Entity(EntityId),
}

#[derive(Clone, Debug)]
struct Grid<T> {
    columns: u32,
    rows: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    fn filled(columns: u32, rows: u32, value: T) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![value; capacity],
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn get(&self, position: Position) -> Option<&T> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        let index = self.index(position)?;
        self.cells.get_mut(index)
    }
}

/// Live missiles per attack spell, used to enforce the in-flight limit.
#[derive(Debug, Default)]
pub(crate) struct MissileLedger {
    live: HashMap<&'static str, Vec<EntityId>>,
}

impl MissileLedger {
    fn register(&mut self, spell: TileRef, missile: EntityId) {
        self.live.entry(spell.name()).or_default().push(missile);
    }

    pub(crate) fn release(&mut self, spell: TileRef, missile: EntityId) {
        if let Some(missiles) = self.live.get_mut(spell.name()) {
            missiles.retain(|live| *live != missile);
        }
    }

    fn live_count(&self, spell: TileRef) -> usize {
        self.live.get(spell.name()).map_or(0, Vec::len)
    }
}

/// Layered grid of a level together with the entities living on it.
///
/// The map owns every entity in an arena indexed by [`EntityId`]. Identifiers
/// are never reused, so a removed entity keeps its slot and simply stops being
/// referenced by the occupancy layers and the active registry.
#[derive(Debug)]
pub struct Map {
    background: Grid<TileRef>,
    object: Grid<Option<TileRef>>,
    entity: Grid<Option<EntityId>>,
    spiritual: Grid<Option<EntityId>>,
    entities: Vec<Option<Entity>>,
    active: Vec<EntityId>,
    registered: HashSet<EntityId>,
    missiles: MissileLedger,
    player_start: Option<Position>,
}

impl Map {
    /// Creates a map whose background is filled with `fill`.
    #[must_use]
    pub fn new(columns: u32, rows: u32, fill: TileRef) -> Self {
        Self {
            background: Grid::filled(columns, rows, fill),
            object: Grid::filled(columns, rows, None),
            entity: Grid::filled(columns, rows, None),
            spiritual: Grid::filled(columns, rows, None),
            entities: Vec::new(),
            active: Vec::new(),
            registered: HashSet::new(),
            missiles: MissileLedger::default(),
            player_start: None,
        }
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.background.columns
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.background.rows
    }

    /// Reports whether `position` lies inside the map.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.background.index(position).is_some()
    }

    /// Background tile at `position`.
    #[must_use]
    pub fn background(&self, position: Position) -> Option<TileRef> {
        self.background.get(position).copied()
    }

    /// Object tile at `position`, if any.
    #[must_use]
    pub fn object(&self, position: Position) -> Option<TileRef> {
        self.object.get(position).copied().flatten()
    }

    /// Entity occupying `position` in `plane`.
    #[must_use]
    pub fn occupant(&self, plane: Plane, position: Position) -> Option<EntityId> {
        self.occupancy(plane).get(position).copied().flatten()
    }

    /// Content of `layer` at `position`.
    #[must_use]
    pub fn get(&self, layer: Layer, position: Position) -> Option<Slot> {
        match layer {
            Layer::Background => self.background(position).map(Slot::Tile),
            Layer::Object => self.object(position).map(Slot::Tile),
            Layer::Entity => self.occupant(Plane::Physical, position).map(Slot::Entity),
            Layer::Spiritual => self.occupant(Plane::Spiritual, position).map(Slot::Entity),
        }
    }

    /// Writes a tile into the background or object layer.
    ///
    /// Occupancy layers only change through spawning, movement and removal,
    /// so writing to them is refused. The background cannot be cleared.
    pub fn set_tile(&mut self, layer: Layer, position: Position, tile: Option<TileRef>) -> bool {
        match layer {
            Layer::Background => match (self.background.get_mut(position), tile) {
                (Some(cell), Some(tile)) => {
                    *cell = tile;
                    true
                }
                _ => false,
            },
            Layer::Object => match self.object.get_mut(position) {
                Some(cell) => {
                    *cell = tile;
                    true
                }
                None => false,
            },
            Layer::Entity | Layer::Spiritual => false,
        }
    }

    /// Reports whether an entity of `plane` may enter `position`.
    ///
    /// The cell must be inside the map, its background must not block and
    /// the same plane must be free. Physical and spiritual entities never
    /// block each other.
    #[must_use]
    pub fn allowed_access_to(&self, plane: Plane, position: Position) -> bool {
        self.background(position)
            .map_or(false, |tile| !tile.is_blocked())
            && self.occupant(plane, position).is_none()
    }

    /// Cell the player spawns on when a world is built from this map.
    #[must_use]
    pub const fn player_start(&self) -> Option<Position> {
        self.player_start
    }

    /// Marks the player's starting cell.
    pub fn set_player_start(&mut self, position: Position) -> bool {
        if !self.contains(position) {
            return false;
        }
        self.player_start = Some(position);
        true
    }

    /// Spawns a monster of the species described by `tile`.
    pub fn spawn_monster(&mut self, position: Position, tile: TileRef) -> Option<EntityId> {
        let TileKind::Monster(stats) = tile.kind() else {
            warn!("refusing to spawn non-monster tile {} as monster", tile.name());
            return None;
        };
        let monster = Monster::new(*stats, position);
        self.spawn(position, Plane::Physical, tile, Role::Monster(monster), true)
    }

    /// Places a locked door.
    pub fn spawn_door(&mut self, position: Position) -> Option<EntityId> {
        self.spawn(position, Plane::Physical, &tiles::DOOR, Role::Door, false)
    }

    /// Launches a missile of `spell` that may travel `movements` cells.
    ///
    /// The missile lives in the spiritual plane so it can leave the caster's
    /// cell, and is tracked against the spell's in-flight limit until it is
    /// destroyed.
    pub fn spawn_missile(
        &mut self,
        caster: EntityId,
        position: Position,
        direction: Direction,
        spell: TileRef,
        movements: u32,
    ) -> Option<EntityId> {
        if !matches!(spell.kind(), TileKind::AttackSpell(_)) {
            warn!("refusing to launch {} as a missile", spell.name());
            return None;
        }
        let missile = Missile::new(caster, direction, movements);
        let id = self.spawn(position, Plane::Spiritual, spell, Role::Missile(missile), true)?;
        self.missiles.register(spell, id);
        Some(id)
    }

    /// Number of missiles of `spell` currently in flight.
    #[must_use]
    pub fn live_missiles(&self, spell: TileRef) -> usize {
        self.missiles.live_count(spell)
    }

    /// Read-only access to an entity that is not currently ticking.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(Self::slot_index(id)?)?.as_ref()
    }

    /// Entities ticked every world tick, in registration order.
    #[must_use]
    pub fn active_entities(&self) -> &[EntityId] {
        &self.active
    }

    /// Reports whether `id` is still in the active registry.
    #[must_use]
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.registered.contains(&id)
    }

    /// Changes the life of a player or monster, see [`crate::Being`].
    pub fn add_life(&mut self, id: EntityId, delta: i32) -> Option<LifeSignal> {
        self.with_entity(id, |entity, map| entity.add_life(map, delta))
            .flatten()
    }

    /// Removes an entity from the map and the active registry.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        self.with_entity(id, |entity, map| entity.remove_from(map))
            .is_some()
    }

    pub(crate) fn spawn_player(
        &mut self,
        position: Position,
        status: &PlayerStatus,
    ) -> Option<EntityId> {
        let player = Player::from_status(status);
        self.spawn(position, Plane::Physical, &tiles::PLAYER, Role::Player(player), false)
    }

    pub(crate) fn spawn_projection(
        &mut self,
        position: Position,
        spell: TileRef,
        projection: AstralBody,
    ) -> Option<EntityId> {
        self.spawn(position, Plane::Spiritual, spell, Role::Astral(projection), false)
    }

    fn spawn(
        &mut self,
        position: Position,
        plane: Plane,
        tile: TileRef,
        role: Role,
        ticking: bool,
    ) -> Option<EntityId> {
        if !self.allowed_access_to(plane, position) {
            debug!("cannot spawn {} at {position:?}", tile.name());
            return None;
        }
        let id = EntityId::new(u32::try_from(self.entities.len()).ok()?);
        let location = EntityLocation::new(id, plane, position);
        *self.occupancy_mut(plane).get_mut(position)? = Some(id);
        self.entities.push(Some(Entity::new(location, tile, role)));
        if ticking {
            self.active.push(id);
            let _ = self.registered.insert(id);
        }
        Some(id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(Self::slot_index(id)?)?.as_mut()
    }

    /// Runs `action` with the entity temporarily taken out of the arena so
    /// that it can mutate the map it lives on.
    pub(crate) fn with_entity<R, F>(&mut self, id: EntityId, action: F) -> Option<R>
    where
        F: FnOnce(&mut Entity, &mut Map) -> R,
    {
        let index = Self::slot_index(id)?;
        let mut entity = self.entities.get_mut(index)?.take()?;
        let result = action(&mut entity, &mut *self);
        if let Some(slot) = self.entities.get_mut(index) {
            *slot = Some(entity);
        }
        Some(result)
    }

    /// Moves the occupancy of `owner` one cell, or does nothing at all.
    pub(crate) fn relocate(
        &mut self,
        plane: Plane,
        owner: EntityId,
        from: Position,
        to: Position,
    ) -> bool {
        if self.occupant(plane, from) != Some(owner) || !self.allowed_access_to(plane, to) {
            return false;
        }
        let grid = self.occupancy_mut(plane);
        let (Some(source), Some(target)) = (grid.index(from), grid.index(to)) else {
            return false;
        };
        grid.cells[source] = None;
        grid.cells[target] = Some(owner);
        true
    }

    /// Clears the cell if `owner` occupies it and drops `owner` from the
    /// active registry.
    pub(crate) fn evict(&mut self, plane: Plane, owner: EntityId, position: Position) {
        if let Some(cell) = self.occupancy_mut(plane).get_mut(position) {
            if *cell == Some(owner) {
                *cell = None;
            }
        }
        if self.registered.remove(&owner) {
            self.active.retain(|id| *id != owner);
        }
    }

    pub(crate) fn missiles_mut(&mut self) -> &mut MissileLedger {
        &mut self.missiles
    }

    fn occupancy(&self, plane: Plane) -> &Grid<Option<EntityId>> {
        match plane {
            Plane::Physical => &self.entity,
            Plane::Spiritual => &self.spiritual,
        }
    }

    fn occupancy_mut(&mut self, plane: Plane) -> &mut Grid<Option<EntityId>> {
        match plane {
            Plane::Physical => &mut self.entity,
            Plane::Spiritual => &mut self.spiritual,
        }
    }

    fn slot_index(id: EntityId) -> Option<usize> {
        usize::try_from(id.get()).ok()
    }
}
