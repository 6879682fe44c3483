use log::debug;
use magic_maze_core::{Direction, EntityId, Event, LifeSignal, Plane, SoundCue, TileKind, TileRef};

use crate::{entity::EntityKind, location::EntityLocation, map::Map};

/// Cells a freshly cast missile may travel.
pub(crate) const MISSILE_RANGE: u32 = 10;
/// Score credited to the caster for every kill.
pub(crate) const KILL_SCORE: u32 = 10;

#[derive(Debug)]
pub(crate) struct Missile {
    caster: EntityId,
    direction: Direction,
    movements: u32,
    active: bool,
}

impl Missile {
    pub(crate) const fn new(caster: EntityId, direction: Direction, movements: u32) -> Self {
        Self {
            caster,
            direction,
            movements,
            active: true,
        }
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.active
    }

    /// Checks for impact on the current cell and otherwise flies on.
    pub(crate) fn action_tick(
        &mut self,
        location: &mut EntityLocation,
        spell: TileRef,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) {
        if !self.active {
            return;
        }

        let here = location.position();
        let blocked = map.background(here).map_or(true, |tile| tile.is_blocked());
        if blocked {
            self.destroy(location, spell, map);
            return;
        }

        let target = map
            .occupant(Plane::Physical, here)
            .filter(|occupant| *occupant != self.caster);
        if let Some(target) = target {
            self.hit(target, location, spell, map, events);
            return;
        }

        self.movements = self.movements.saturating_sub(1);
        let moved = location.add(map, self.direction);
        if !moved || self.movements < 1 {
            self.destroy(location, spell, map);
        }
    }

    fn hit(
        &mut self,
        target: EntityId,
        location: &EntityLocation,
        spell: TileRef,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) {
        let is_monster = map
            .entity(target)
            .map_or(false, |entity| entity.kind() == EntityKind::Monster);
        if is_monster {
            let damage = match spell.kind() {
                TileKind::AttackSpell(stats) => stats.damage,
                _ => 0,
            };
            if map.add_life(target, -damage) == Some(LifeSignal::Died) {
                debug!("{} slew monster {target:?}", spell.name());
                if let Some(caster) = map
                    .entity_mut(self.caster)
                    .and_then(|entity| entity.as_player_mut())
                {
                    caster.award(KILL_SCORE);
                }
                events.push(Event::Sound {
                    cue: SoundCue::Argh,
                });
                events.push(Event::MonsterSlain {
                    monster: target,
                    by: self.caster,
                });
            }
        }
        self.destroy(location, spell, map);
    }

    /// Releases the in-flight slot and takes the missile off the map.
    pub(crate) fn destroy(&mut self, location: &EntityLocation, spell: TileRef, map: &mut Map) {
        map.missiles_mut().release(spell, location.owner());
        self.active = false;
        location.remove_old_entity(map);
    }
}
