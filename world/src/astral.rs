use log::debug;
use magic_maze_core::{Direction, EntityId, Event, Position};

use crate::{location::EntityLocation, map::Map};

/// Steps an eyeball may take before it fades.
pub(crate) const EYEBALL_RANGE: u32 = 50;
/// Cells a map manifestation travels per steering command.
pub(crate) const MANIFESTATION_STRIDE: usize = 5;

#[derive(Debug)]
enum Form {
    Eyeball { movements: u32 },
    MapManifestation { last_revealed: Position },
}

/// Spiritual projection the caster steers instead of the player.
#[derive(Debug)]
pub(crate) struct AstralBody {
    caster: EntityId,
    direction: Direction,
    mana_per_step: i32,
    active: bool,
    form: Form,
}

impl AstralBody {
    pub(crate) const fn eyeball(caster: EntityId, direction: Direction, mana_per_step: i32) -> Self {
        Self {
            caster,
            direction,
            mana_per_step,
            active: true,
            form: Form::Eyeball {
                movements: EYEBALL_RANGE,
            },
        }
    }

    pub(crate) const fn map_manifestation(
        caster: EntityId,
        direction: Direction,
        mana_per_step: i32,
        origin: Position,
    ) -> Self {
        Self {
            caster,
            direction,
            mana_per_step,
            active: true,
            form: Form::MapManifestation {
                last_revealed: origin,
            },
        }
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) const fn is_eyeball(&self) -> bool {
        matches!(self.form, Form::Eyeball { .. })
    }

    /// Faces `direction` and travels while the caster can pay for it.
    pub(crate) fn steer(
        &mut self,
        direction: Direction,
        location: &mut EntityLocation,
        map: &mut Map,
        events: &mut Vec<Event>,
    ) -> bool {
        if !self.active {
            return false;
        }
        self.direction = direction;

        if let Form::Eyeball { movements } = &mut self.form {
            *movements = movements.saturating_sub(1);
            if *movements < 1 {
                debug!("eyeball {:?} faded", location.owner());
                self.active = false;
                return false;
            }
        }

        if !self.drain_caster(map) {
            debug!("projection {:?} ran out of mana", location.owner());
            self.active = false;
            return false;
        }

        match &mut self.form {
            Form::Eyeball { .. } => {
                let _ = location.add(map, self.direction);
            }
            Form::MapManifestation { last_revealed } => {
                for _ in 0..MANIFESTATION_STRIDE {
                    if !location.add(map, self.direction) {
                        break;
                    }
                }
                if location.position() != *last_revealed {
                    *last_revealed = location.position();
                    events.push(Event::MapRevealed {
                        center: location.position(),
                    });
                }
            }
        }
        true
    }

    pub(crate) fn dismiss(&mut self, location: &EntityLocation, map: &mut Map) {
        self.active = false;
        location.remove_old_entity(map);
    }

    fn drain_caster(&self, map: &mut Map) -> bool {
        let Some(caster) = map
            .entity_mut(self.caster)
            .and_then(|entity| entity.being_mut())
        else {
            return false;
        };
        if caster.mana() < self.mana_per_step {
            return false;
        }
        caster.add_mana(-self.mana_per_step);
        true
    }
}
