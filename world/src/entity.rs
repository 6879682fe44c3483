use magic_maze_core::{
    tiles, Direction, EntityId, Event, Layer, LevelState, LifeSignal, Position, TileRef,
    MAX_LIFE, MAX_MANA,
};
use rand_chacha::ChaCha8Rng;

use crate::{
    astral::AstralBody, location::EntityLocation, map::Map, missile::Missile, monster::Monster,
    player::Player,
};

/// Shared state handed to entities while they tick.
pub(crate) struct TickContext<'a> {
    pub(crate) player: Option<Position>,
    pub(crate) rng: &'a mut ChaCha8Rng,
    pub(crate) events: &'a mut Vec<Event>,
}

/// Coarse classification of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// The player character.
    Player,
    /// A monster.
    Monster,
    /// A locked door.
    Door,
    /// An attack spell missile.
    Missile,
    /// A scouting eyeball the camera follows.
    Eyeball,
    /// A manifestation revealing the map as it travels.
    MapManifestation,
}

/// Life, mana and facing shared by the player and monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Being {
    life: i32,
    mana: i32,
    direction: Direction,
}

impl Being {
    pub(crate) fn new(life: i32, mana: i32, direction: Direction) -> Self {
        Self {
            life: life.clamp(0, MAX_LIFE),
            mana: mana.clamp(0, MAX_MANA),
            direction,
        }
    }

    /// Remaining life in `0..=100`.
    #[must_use]
    pub const fn life(&self) -> i32 {
        self.life
    }

    /// Remaining mana in `0..=100`.
    #[must_use]
    pub const fn mana(&self) -> i32 {
        self.mana
    }

    /// Direction the being faces.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Reports whether the being still has life left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub(crate) fn face(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Applies a life change and handles death.
    ///
    /// Life is capped at [`MAX_LIFE`]. Reaching zero removes the owner from
    /// the map, leaves a blood splat on an empty object cell and reports
    /// [`LifeSignal::Died`]. Death is final: later changes keep life at zero
    /// and report [`LifeSignal::Dead`].
    pub(crate) fn add_life(
        &mut self,
        delta: i32,
        location: &EntityLocation,
        map: &mut Map,
    ) -> Option<LifeSignal> {
        if !self.is_alive() {
            Self::leave_corpse(location, map);
            return Some(LifeSignal::Dead);
        }

        self.life = self.life.saturating_add(delta).min(MAX_LIFE);
        if self.life > 0 {
            return None;
        }

        self.life = 0;
        Self::leave_corpse(location, map);
        Some(LifeSignal::Died)
    }

    /// Applies a mana change clamped to `0..=100`.
    pub(crate) fn add_mana(&mut self, delta: i32) {
        self.mana = self.mana.saturating_add(delta).clamp(0, MAX_MANA);
    }

    fn leave_corpse(location: &EntityLocation, map: &mut Map) {
        location.remove_old_entity(map);
        if location.get(map, Layer::Object).is_none() {
            let _ = location.set(map, Layer::Object, Some(&tiles::BLOOD_SPLAT));
        }
    }
}

/// Behaviour specific to each kind of entity.
#[derive(Debug)]
pub(crate) enum Role {
    Player(Player),
    Monster(Monster),
    Door,
    Missile(Missile),
    Astral(AstralBody),
}

/// Something that occupies a cell of the physical or spiritual plane.
#[derive(Debug)]
pub struct Entity {
    location: EntityLocation,
    tile: TileRef,
    role: Role,
}

impl Entity {
    pub(crate) const fn new(location: EntityLocation, tile: TileRef, role: Role) -> Self {
        Self {
            location,
            tile,
            role,
        }
    }

    /// Identifier of the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.location.owner()
    }

    /// Where the entity lives.
    #[must_use]
    pub const fn location(&self) -> &EntityLocation {
        &self.location
    }

    /// Static tile the entity was created from.
    #[must_use]
    pub const fn tile(&self) -> TileRef {
        self.tile
    }

    /// Coarse classification of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match &self.role {
            Role::Player(_) => EntityKind::Player,
            Role::Monster(_) => EntityKind::Monster,
            Role::Door => EntityKind::Door,
            Role::Missile(_) => EntityKind::Missile,
            Role::Astral(projection) if projection.is_eyeball() => EntityKind::Eyeball,
            Role::Astral(_) => EntityKind::MapManifestation,
        }
    }

    /// Sprite drawn for the entity; the player sprite follows its facing.
    #[must_use]
    pub fn sprite_id(&self) -> u16 {
        match &self.role {
            Role::Player(player) => {
                self.tile.sprite_id() + u16::from(player.being().direction().value())
            }
            _ => self.tile.sprite_id(),
        }
    }

    /// Life and mana of players and monsters.
    #[must_use]
    pub const fn being(&self) -> Option<&Being> {
        match &self.role {
            Role::Player(player) => Some(player.being()),
            Role::Monster(monster) => Some(monster.being()),
            _ => None,
        }
    }

    /// Reports whether the entity still takes part in the level.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        match &self.role {
            Role::Player(player) => player.being().is_alive(),
            Role::Monster(monster) => monster.being().is_alive(),
            Role::Door => true,
            Role::Missile(missile) => missile.is_active(),
            Role::Astral(projection) => projection.is_active(),
        }
    }

    /// Damage a living monster deals to an adjacent player.
    #[must_use]
    pub const fn contact_damage(&self) -> Option<i32> {
        match &self.role {
            Role::Monster(monster) if monster.being().is_alive() => Some(monster.attack()),
            _ => None,
        }
    }

    pub(crate) const fn as_player(&self) -> Option<&Player> {
        match &self.role {
            Role::Player(player) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.role {
            Role::Player(player) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn being_mut(&mut self) -> Option<&mut Being> {
        match &mut self.role {
            Role::Player(player) => Some(player.being_mut()),
            Role::Monster(monster) => Some(monster.being_mut()),
            _ => None,
        }
    }

    pub(crate) fn add_life(&mut self, map: &mut Map, delta: i32) -> Option<LifeSignal> {
        let location = self.location;
        self.being_mut()?.add_life(delta, &location, map)
    }

    /// Runs the entity's action tick and returns a requested level state.
    pub(crate) fn tick(&mut self, map: &mut Map, context: &mut TickContext<'_>) -> Option<LevelState> {
        match &mut self.role {
            Role::Player(player) => player.action_tick(&mut self.location, map, context.events),
            Role::Monster(monster) => {
                monster.action_tick(&mut self.location, map, context);
                None
            }
            Role::Missile(missile) => {
                missile.action_tick(&mut self.location, self.tile, map, context.events);
                None
            }
            Role::Door | Role::Astral(_) => None,
        }
    }

    /// Turns an astral projection and lets it travel; returns whether it is
    /// still active afterwards.
    pub(crate) fn steer(
        &mut self,
        direction: Direction,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> bool {
        match &mut self.role {
            Role::Astral(projection) => projection.steer(direction, &mut self.location, map, events),
            _ => false,
        }
    }

    pub(crate) fn remove_from(&mut self, map: &mut Map) {
        match &mut self.role {
            Role::Missile(missile) => missile.destroy(&self.location, self.tile, map),
            Role::Astral(projection) => projection.dismiss(&self.location, map),
            _ => self.location.remove_old_entity(map),
        }
    }
}
