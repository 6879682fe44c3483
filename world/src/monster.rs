use log::trace;
use magic_maze_core::{Direction, MonsterStats, Position};
use magic_maze_system_monster_ai::{Action, Body, MonsterBrain};

use crate::{
    entity::{Being, TickContext},
    location::EntityLocation,
    map::Map,
};

#[derive(Debug)]
pub(crate) struct Monster {
    being: Being,
    brain: MonsterBrain,
    attack: i32,
}

impl Monster {
    pub(crate) fn new(stats: MonsterStats, spawn: Position) -> Self {
        Self {
            being: Being::new(stats.start_health, 0, Direction::default()),
            brain: MonsterBrain::new(stats.motion, spawn),
            attack: stats.attack,
        }
    }

    pub(crate) const fn being(&self) -> &Being {
        &self.being
    }

    pub(crate) fn being_mut(&mut self) -> &mut Being {
        &mut self.being
    }

    pub(crate) const fn attack(&self) -> i32 {
        self.attack
    }

    pub(crate) fn action_tick(
        &mut self,
        location: &mut EntityLocation,
        map: &mut Map,
        context: &mut TickContext<'_>,
    ) {
        if !self.being.is_alive() {
            return;
        }
        let mut body = Steering {
            being: &mut self.being,
            location: &mut *location,
            map: &mut *map,
        };
        let action = self.brain.tick(&mut body, context.player, &mut *context.rng);
        if action != Action::Slept {
            trace!("monster {:?} {action:?}", location.owner());
        }
    }
}

/// Lets the brain drive a monster through its location on the map.
struct Steering<'a> {
    being: &'a mut Being,
    location: &'a mut EntityLocation,
    map: &'a mut Map,
}

impl Body for Steering<'_> {
    fn position(&self) -> Position {
        self.location.position()
    }

    fn facing(&self) -> Direction {
        self.being.direction()
    }

    fn face(&mut self, direction: Direction) {
        self.being.face(direction);
    }

    fn can_enter(&self, target: Position) -> bool {
        self.location.allowed_access_to(self.map, target)
    }

    fn move_forward(&mut self) -> bool {
        self.location.add(self.map, self.being.direction())
    }
}
