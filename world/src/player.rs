use log::{debug, info};
use magic_maze_core::{
    Direction, EntityId, Event, Impulse, Inventory, Item, Layer, LevelState, Plane, PlayerStatus,
    Position, SoundCue, SpellSlot, TileKind, TileRef,
};

use crate::{
    entity::{Being, Entity, EntityKind},
    location::EntityLocation,
    map::Map,
    spells::SpellBook,
};

/// Ticks between two rounds of monster contact damage.
pub(crate) const HURT_INTERVAL: u32 = 4;

#[derive(Debug)]
pub(crate) struct Player {
    being: Being,
    score: u32,
    inventory: Inventory,
    spellbook: SpellBook,
    impulse: Option<Impulse>,
    hurt_timer: u32,
}

impl Player {
    pub(crate) fn from_status(status: &PlayerStatus) -> Self {
        Self {
            being: Being::new(status.life, status.mana, Direction::default()),
            score: status.score,
            inventory: status.inventory,
            spellbook: SpellBook::new(status.primary_spell, status.secondary_spell),
            impulse: None,
            hurt_timer: 0,
        }
    }

    pub(crate) fn status(&self) -> PlayerStatus {
        PlayerStatus {
            life: self.being.life(),
            mana: self.being.mana(),
            score: self.score,
            inventory: self.inventory,
            primary_spell: self.spellbook.index(SpellSlot::Primary),
            secondary_spell: self.spellbook.index(SpellSlot::Secondary),
        }
    }

    pub(crate) const fn being(&self) -> &Being {
        &self.being
    }

    pub(crate) fn being_mut(&mut self) -> &mut Being {
        &mut self.being
    }

    pub(crate) const fn score(&self) -> u32 {
        self.score
    }

    pub(crate) const fn inventory(&self) -> Inventory {
        self.inventory
    }

    pub(crate) fn spell(&self, slot: SpellSlot) -> TileRef {
        self.spellbook.spell(slot)
    }

    pub(crate) fn page_spell(&mut self, slot: SpellSlot, step: i32) {
        self.spellbook.page(slot, step);
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Replaces the impulse executed by the next tick.
    pub(crate) fn queue_impulse(&mut self, impulse: Impulse) {
        self.impulse = Some(impulse);
    }

    pub(crate) fn action_tick(
        &mut self,
        location: &mut EntityLocation,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> Option<LevelState> {
        if !self.being.is_alive() {
            return Some(LevelState::PlayerDied);
        }
        if let Some(state) = self.follow_impulse(location, map, events) {
            return Some(state);
        }
        self.suffer_contact(location, map, events)
    }

    fn follow_impulse(
        &mut self,
        location: &mut EntityLocation,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> Option<LevelState> {
        match self.impulse.take()? {
            Impulse::TurnTo(direction) => {
                self.being.face(direction);
                None
            }
            Impulse::MoveForward => {
                let direction = self.being.direction();
                if location.add(map, direction) {
                    return self.collect(location, map, events);
                }
                self.open_door(location.position().step(direction), map, events);
                None
            }
        }
    }

    fn collect(
        &mut self,
        location: &EntityLocation,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> Option<LevelState> {
        let here = location.position();
        let tile = map.object(here)?;
        match tile.kind() {
            TileKind::Item(item) => {
                let item = *item;
                match item {
                    Item::Key => self.inventory.keys = self.inventory.keys.saturating_add(1),
                    Item::LifePotion { life } => {
                        let _ = self.being.add_life(life, location, map);
                    }
                    Item::ManaPotion { mana } => self.being.add_mana(mana),
                    Item::Treasure { score } => self.award(score),
                }
                let _ = map.set_tile(Layer::Object, here, None);
                debug!("player collected {} at {here:?}", tile.name());
                events.push(Event::ItemCollected { item });
                events.push(Event::Sound {
                    cue: SoundCue::Pickup,
                });
                None
            }
            TileKind::Exit => {
                info!("player reached the exit at {here:?}");
                Some(LevelState::NextLevel)
            }
            _ => None,
        }
    }

    fn open_door(&mut self, target: Position, map: &mut Map, events: &mut Vec<Event>) {
        if self.inventory.keys == 0 {
            return;
        }
        let Some(door) = door_at(map, target) else {
            return;
        };
        if map.remove_entity(door) {
            self.inventory.keys -= 1;
            events.push(Event::DoorOpened { at: target });
            events.push(Event::Sound {
                cue: SoundCue::Door,
            });
        }
    }

    /// Every few ticks each adjacent monster lands its attack.
    fn suffer_contact(
        &mut self,
        location: &EntityLocation,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> Option<LevelState> {
        self.hurt_timer += 1;
        if self.hurt_timer < HURT_INTERVAL {
            return None;
        }
        self.hurt_timer = 0;

        let here = location.position();
        let damage: i32 = Direction::ALL
            .iter()
            .filter_map(|direction| map.occupant(Plane::Physical, here.step(*direction)))
            .filter_map(|id| map.entity(id))
            .filter_map(Entity::contact_damage)
            .sum();
        if damage == 0 {
            return None;
        }

        if self.being.add_life(-damage, location, map).is_some() {
            info!("player died at {here:?}");
            return Some(LevelState::PlayerDied);
        }
        events.push(Event::PlayerHurt {
            life: self.being.life(),
        });
        events.push(Event::Sound {
            cue: SoundCue::Ouch,
        });
        None
    }
}

fn door_at(map: &Map, target: Position) -> Option<EntityId> {
    map.occupant(Plane::Physical, target)
        .filter(|id| map.entity(*id).map(Entity::kind) == Some(EntityKind::Door))
}
