use log::{debug, info};
use magic_maze_core::{
    tiles::{PRIMARY_SPELLS, SECONDARY_SPELLS},
    EntityId, Event, SoundCue, SpellEffect, SpellSlot, TileKind, TileRef,
};

use crate::{astral::AstralBody, map::Map, missile::MISSILE_RANGE};

/// Selected page of each spell slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SpellBook {
    primary: usize,
    secondary: usize,
}

impl SpellBook {
    pub(crate) fn new(primary: usize, secondary: usize) -> Self {
        Self {
            primary: primary % PRIMARY_SPELLS.len(),
            secondary: secondary % SECONDARY_SPELLS.len(),
        }
    }

    pub(crate) const fn index(&self, slot: SpellSlot) -> usize {
        match slot {
            SpellSlot::Primary => self.primary,
            SpellSlot::Secondary => self.secondary,
        }
    }

    pub(crate) fn spell(&self, slot: SpellSlot) -> TileRef {
        match slot {
            SpellSlot::Primary => PRIMARY_SPELLS[self.primary],
            SpellSlot::Secondary => SECONDARY_SPELLS[self.secondary],
        }
    }

    /// Moves the selection by `step` pages with wrap-around.
    pub(crate) fn page(&mut self, slot: SpellSlot, step: i32) {
        let (selected, pages) = match slot {
            SpellSlot::Primary => (&mut self.primary, PRIMARY_SPELLS.len()),
            SpellSlot::Secondary => (&mut self.secondary, SECONDARY_SPELLS.len()),
        };
        let pages = i64::try_from(pages).unwrap_or(1);
        let current = i64::try_from(*selected).unwrap_or(0);
        let next = (current + i64::from(step)).rem_euclid(pages);
        *selected = usize::try_from(next).unwrap_or(0);
    }
}

/// Result of a successful cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cast {
    Missile,
    Heal,
    Projection(EntityId),
}

/// Casts the spell selected in `slot` for `caster`.
///
/// Failed casts emit the fizzle cue and leave the caster untouched.
pub(crate) fn cast(
    map: &mut Map,
    caster: EntityId,
    slot: SpellSlot,
    events: &mut Vec<Event>,
) -> Option<Cast> {
    let player = map.entity(caster)?;
    let spell = player.as_player()?.spell(slot);
    if !player.is_active() {
        return None;
    }

    let cast = match spell.kind() {
        TileKind::AttackSpell(stats) => {
            let affordable = player.being().map_or(false, |being| being.mana() >= stats.mana_cost);
            let below_limit = map.live_missiles(spell) < stats.max_missiles;
            if affordable && below_limit {
                launch_missile(map, caster, spell).map(|_| (stats.mana_cost, Cast::Missile))
            } else {
                None
            }
        }
        TileKind::SecondarySpell(stats) => {
            let affordable = player.being().map_or(false, |being| being.mana() >= stats.mana_cost);
            if affordable {
                invoke(map, caster, spell, stats.effect).map(|cast| (stats.mana_cost, cast))
            } else {
                None
            }
        }
        _ => None,
    };

    let Some((mana_cost, cast)) = cast else {
        debug!("{} fizzled", spell.name());
        events.push(Event::Sound {
            cue: SoundCue::Fizzle,
        });
        return None;
    };

    if let Some(being) = map.entity_mut(caster).and_then(|entity| entity.being_mut()) {
        being.add_mana(-mana_cost);
    }
    info!("cast {}", spell.name());
    events.push(Event::SpellCast {
        slot,
        spell: spell.name(),
    });
    events.push(Event::Sound {
        cue: SoundCue::Cast,
    });
    Some(cast)
}

fn launch_missile(map: &mut Map, caster: EntityId, spell: TileRef) -> Option<EntityId> {
    let location = *map.entity(caster)?.location();
    let direction = map.entity(caster)?.being()?.direction();
    map.spawn_missile(caster, location.position(), direction, spell, MISSILE_RANGE)
}

fn invoke(
    map: &mut Map,
    caster: EntityId,
    spell: TileRef,
    effect: SpellEffect,
) -> Option<Cast> {
    let origin = map.entity(caster)?.location().position();
    let direction = map.entity(caster)?.being()?.direction();
    match effect {
        SpellEffect::Heal { life } => {
            let _ = map.add_life(caster, life);
            Some(Cast::Heal)
        }
        SpellEffect::MagicMap { mana_per_step } => {
            let projection =
                AstralBody::map_manifestation(caster, direction, mana_per_step, origin);
            let id = map.spawn_projection(origin, spell, projection)?;
            Some(Cast::Projection(id))
        }
        SpellEffect::SpyEye { mana_per_step } => {
            let projection = AstralBody::eyeball(caster, direction, mana_per_step);
            let id = map.spawn_projection(origin, spell, projection)?;
            Some(Cast::Projection(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_wraps_both_ways() {
        let mut book = SpellBook::default();
        book.page(SpellSlot::Primary, -1);
        assert_eq!(book.index(SpellSlot::Primary), PRIMARY_SPELLS.len() - 1);
        book.page(SpellSlot::Primary, 1);
        assert_eq!(book.index(SpellSlot::Primary), 0);
        book.page(SpellSlot::Secondary, 4);
        assert_eq!(book.index(SpellSlot::Secondary), 1);
    }

    #[test]
    fn restored_selection_is_wrapped() {
        let book = SpellBook::new(7, 3);
        assert_eq!(book.index(SpellSlot::Primary), 1);
        assert_eq!(book.index(SpellSlot::Secondary), 0);
    }
}
