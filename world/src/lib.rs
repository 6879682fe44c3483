#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Magic Maze.
//!
//! The world owns the layered map of the current level, every entity living
//! on it and the random source that drives monster decisions. All mutation
//! flows through [`apply`]; adapters and systems observe the state through
//! the [`query`] module and the events broadcast by each command.

mod astral;
mod entity;
mod location;
mod map;
mod missile;
mod monster;
mod player;
mod spells;

use log::{debug, info};
use magic_maze_core::{Command, Direction, EntityId, Event, PlayerStatus, Position, SpellSlot};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use entity::{Being, Entity, EntityKind};
pub use location::EntityLocation;
pub use map::{Map, Slot};

use entity::TickContext;
use spells::Cast;

/// Errors raised while populating a world from a map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The map does not mark where the player starts.
    #[error("map has no player start")]
    MissingPlayerStart,
    /// The player start lies on a wall or an occupied cell.
    #[error("player start ({x}, {y}) cannot be entered")]
    PlayerStartBlocked {
        /// Column of the start cell.
        x: i32,
        /// Row of the start cell.
        y: i32,
    },
}

/// Represents the authoritative Magic Maze world state.
#[derive(Debug)]
pub struct World {
    map: Map,
    player: EntityId,
    projection: Option<EntityId>,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Spawns the player on the map's start cell and takes ownership of it.
    ///
    /// `status` restores a checkpointed player; `None` starts fresh.
    pub fn new(mut map: Map, status: Option<PlayerStatus>, seed: u64) -> Result<Self, WorldError> {
        let start = map.player_start().ok_or(WorldError::MissingPlayerStart)?;
        let status = status.unwrap_or_default();
        let player = map
            .spawn_player(start, &status)
            .ok_or(WorldError::PlayerStartBlocked {
                x: start.x(),
                y: start.y(),
            })?;
        info!(
            "world ready: {}x{} map, {} active entities",
            map.columns(),
            map.rows(),
            map.active_entities().len()
        );
        Ok(Self {
            map,
            player,
            projection: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
        })
    }

    fn tick_player(&mut self, out_events: &mut Vec<Event>) {
        let player_position = self.player_position();
        let mut context = TickContext {
            player: player_position,
            rng: &mut self.rng,
            events: out_events,
        };
        let outcome = self
            .map
            .with_entity(self.player, |entity, map| entity.tick(map, &mut context))
            .flatten();
        if let Some(state) = outcome {
            info!("player requested {state:?}");
            out_events.push(Event::StateChangeRequested { state });
        }
    }

    /// Ticks a snapshot of the active registry in order.
    ///
    /// Entities removed earlier in the same pass are skipped. The pass stops
    /// at the first requested state change.
    fn tick_entities(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        let roster = self.map.active_entities().to_vec();
        let mut context = TickContext {
            player: self.player_position(),
            rng: &mut self.rng,
            events: out_events,
        };

        for id in roster {
            if !self.map.is_registered(id) {
                continue;
            }
            let outcome = self
                .map
                .with_entity(id, |entity, map| entity.tick(map, &mut context))
                .flatten();
            if let Some(state) = outcome {
                info!("entity {id:?} requested {state:?}");
                context.events.push(Event::StateChangeRequested { state });
                return;
            }
        }
    }

    fn cast(&mut self, slot: SpellSlot, out_events: &mut Vec<Event>) {
        if self.projection.is_some() {
            return;
        }
        if let Some(Cast::Projection(projection)) =
            spells::cast(&mut self.map, self.player, slot, out_events)
        {
            debug!("projection {projection:?} took over input");
            self.projection = Some(projection);
            out_events.push(Event::ProjectionStarted { projection });
        }
    }

    fn steer(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(projection) = self.projection else {
            return;
        };
        let active = self
            .map
            .with_entity(projection, |entity, map| {
                entity.steer(direction, map, out_events)
            })
            .unwrap_or(false);
        if !active {
            self.end_projection(out_events);
        }
    }

    fn end_projection(&mut self, out_events: &mut Vec<Event>) {
        if let Some(projection) = self.projection.take() {
            let _ = self.map.remove_entity(projection);
            debug!("projection {projection:?} ended");
            out_events.push(Event::ProjectionEnded { projection });
        }
    }

    fn player_position(&self) -> Option<Position> {
        self.map
            .entity(self.player)
            .filter(|player| player.is_active())
            .map(|player| player.location().position())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetImpulse { impulse } => {
            if let Some(player) = world
                .map
                .entity_mut(world.player)
                .and_then(Entity::as_player_mut)
            {
                player.queue_impulse(impulse);
            }
        }
        Command::TickPlayer => world.tick_player(out_events),
        Command::TickEntities => world.tick_entities(out_events),
        Command::CastSpell { slot } => world.cast(slot, out_events),
        Command::PageSpell { slot, step } => {
            if let Some(player) = world
                .map
                .entity_mut(world.player)
                .and_then(Entity::as_player_mut)
            {
                player.page_spell(slot, step);
            }
        }
        Command::SteerProjection { direction } => world.steer(direction, out_events),
        Command::CancelProjection => world.end_projection(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use magic_maze_core::{
        CellSprites, Direction, EntityId, Hud, Plane, PlayerStatus, Position, SceneView,
        SpellSlot,
    };

    use super::{Entity, EntityKind, Map, World};

    /// Provides read-only access to the map of the level.
    #[must_use]
    pub fn map(world: &World) -> &Map {
        &world.map
    }

    /// Identifier of the player entity.
    #[must_use]
    pub fn player(world: &World) -> EntityId {
        world.player
    }

    /// Cell the player occupies, or last occupied before dying.
    #[must_use]
    pub fn player_position(world: &World) -> Position {
        world
            .map
            .entity(world.player)
            .map_or(Position::new(0, 0), |player| player.location().position())
    }

    /// Direction the player faces.
    #[must_use]
    pub fn player_direction(world: &World) -> Direction {
        world
            .map
            .entity(world.player)
            .and_then(Entity::being)
            .map(|being| being.direction())
            .unwrap_or_default()
    }

    /// Snapshot of the persistent player state for checkpoints.
    #[must_use]
    pub fn player_status(world: &World) -> PlayerStatus {
        world
            .map
            .entity(world.player)
            .and_then(Entity::as_player)
            .map(|player| player.status())
            .unwrap_or_default()
    }

    /// Values shown on the head-up display.
    #[must_use]
    pub fn hud(world: &World) -> Hud {
        let Some(player) = world.map.entity(world.player).and_then(Entity::as_player) else {
            return Hud::default();
        };
        Hud {
            score: player.score(),
            life: player.being().life(),
            mana: player.being().mana(),
            keys: player.inventory().keys,
            primary_sprite: player.spell(SpellSlot::Primary).sprite_id(),
            secondary_sprite: player.spell(SpellSlot::Secondary).sprite_id(),
        }
    }

    /// Astral projection currently steered instead of the player.
    #[must_use]
    pub fn projection(world: &World) -> Option<EntityId> {
        world.projection
    }

    /// Number of entity tick passes run so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Cell the camera should centre on: an active eyeball, else the player.
    #[must_use]
    pub fn camera_center(world: &World) -> Position {
        world
            .projection
            .and_then(|id| world.map.entity(id))
            .filter(|entity| entity.kind() == EntityKind::Eyeball)
            .map_or_else(
                || player_position(world),
                |eyeball| eyeball.location().position(),
            )
    }

    /// Sprites of all four layers in a window around `center`.
    #[must_use]
    pub fn scene_view(
        world: &World,
        center: Position,
        half_columns: u32,
        half_rows: u32,
    ) -> SceneView {
        let half_columns = i32::try_from(half_columns).unwrap_or(i32::MAX / 2);
        let half_rows = i32::try_from(half_rows).unwrap_or(i32::MAX / 2);
        let mut cells = Vec::new();
        for dy in -half_rows..=half_rows {
            for dx in -half_columns..=half_columns {
                let position = Position::new(center.x() + dx, center.y() + dy);
                cells.push(cell_sprites(&world.map, position));
            }
        }
        let columns = u32::try_from(half_columns * 2 + 1).unwrap_or(0);
        let rows = u32::try_from(half_rows * 2 + 1).unwrap_or(0);
        SceneView::new(center, columns, rows, cells)
    }

    fn cell_sprites(map: &Map, position: Position) -> CellSprites {
        let occupant_sprite = |plane| {
            map.occupant(plane, position)
                .and_then(|id| map.entity(id))
                .map(Entity::sprite_id)
        };
        CellSprites {
            background: map.background(position).map(|tile| tile.sprite_id()),
            object: map.object(position).map(|tile| tile.sprite_id()),
            entity: occupant_sprite(Plane::Physical),
            spiritual: occupant_sprite(Plane::Spiritual),
        }
    }
}
