#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Magic Maze engine.
//!
//! This crate defines the vocabulary that connects adapters, the game loop
//! and the authoritative world. Adapters translate device state into
//! [`GameCommand`] values and a [`MovementIntent`], the game loop turns them
//! into world [`Command`] values, and the world reports what happened through
//! [`Event`] values. Static tile definitions live in [`tiles`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tiles;

pub use tiles::{
    AttackSpell, Item, MonsterMotion, MonsterStats, SecondarySpell, SpellEffect, Tile, TileKind,
    TileRef,
};

/// Upper bound for life and mana of every being.
pub const MAX_LIFE: i32 = 100;

/// Upper bound for the mana pool of every being.
pub const MAX_MANA: i32 = 100;

/// Compass direction an entity may face or move toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing `y`.
    #[default]
    North,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x`.
    West,
}

impl Direction {
    /// All four directions in `value` order.
    ///
    /// This order doubles as the tie-break order of the monster desire scoring.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Stable integer encoding used for sprite offsets and intent bits.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    /// Decodes a direction from its integer encoding.
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::North),
            1 => Some(Self::East),
            2 => Some(Self::South),
            3 => Some(Self::West),
            _ => None,
        }
    }

    /// Direction obtained by turning 90 degrees clockwise.
    #[must_use]
    pub const fn rotate_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit vector `(dx, dy)` of the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Bit representing the direction inside a [`MovementIntent`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << self.value()
    }
}

/// Location of a single map cell.
///
/// Coordinates are signed so that stepping off the edge of the map yields a
/// position that every query reports as absent rather than wrapping around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Neighbouring position one cell toward `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// One of the four parallel per-cell data planes of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Static floor and walls; decides whether a cell blocks movement.
    Background,
    /// Static decorations and items, may be overwritten at runtime.
    Object,
    /// Physical occupants such as the player, monsters and doors.
    Entity,
    /// Non-physical occupants such as missiles and astral projections.
    Spiritual,
}

/// Occupancy plane an entity lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Registered in the [`Layer::Entity`] layer.
    Physical,
    /// Registered in the [`Layer::Spiritual`] layer.
    Spiritual,
}

impl Plane {
    /// Map layer backing the plane.
    #[must_use]
    pub const fn layer(self) -> Layer {
        match self {
            Self::Physical => Layer::Entity,
            Self::Spiritual => Layer::Spiritual,
        }
    }
}

/// Unique identifier assigned to an entity spawned into a map.
///
/// Identifiers are never reused within a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Directional key state accumulated over one frame, one bit per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MovementIntent(u8);

impl MovementIntent {
    const MASK: u8 = 0b1111;

    /// Intent without any direction held.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Creates an intent from raw bits; bits above the four directions are dropped.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Creates an intent holding every provided direction.
    #[must_use]
    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut intent = Self::empty();
        for direction in directions {
            intent.insert(*direction);
        }
        intent
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Marks `direction` as held.
    pub fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }

    /// Reports whether `direction` is held.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Reports whether no direction is held.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held directions in `value` order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

/// Single queued movement request of the player, overwritten every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Impulse {
    /// Step one cell in the facing direction.
    MoveForward,
    /// Face the provided direction without moving.
    TurnTo(Direction),
}

/// One-shot outcome reported when life drops to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeSignal {
    /// The being was alive before the change and is dead now.
    Died,
    /// The being was already dead before the change.
    Dead,
}

/// States of the per-level game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelState {
    /// The level is running.
    GameLoop,
    /// The player reached the level exit.
    NextLevel,
    /// The player confirmed a restart of the current level.
    RestartLevel,
    /// The player lost all life.
    PlayerDied,
    /// The player confirmed leaving the game.
    StoppedGame,
    /// The last level was completed.
    Endgame,
}

impl LevelState {
    /// Reports whether the loop keeps running in this state.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::GameLoop)
    }
}

/// Spellbook page selected by a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpellSlot {
    /// Attack spells.
    Primary,
    /// Utility spells.
    Secondary,
}

/// Named commands produced by the input collaborator.
///
/// Directional keys are not commands; they accumulate into a
/// [`MovementIntent`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Show the help screen until a key is pressed.
    Help,
    /// Persist the current checkpoint.
    SaveGame,
    /// Ask for confirmation, then restart the level.
    RestartLevel,
    /// Switch between windowed and fullscreen presentation.
    ToggleFullscreen,
    /// Ask for confirmation, then leave the game.
    Escape,
    /// Leave immediately, for instance when the window is closed.
    Quit,
    /// Select the next attack spell.
    NextPrimarySpell,
    /// Select the previous attack spell.
    PreviousPrimarySpell,
    /// Select the next utility spell.
    NextSecondarySpell,
    /// Select the previous utility spell.
    PreviousSecondarySpell,
    /// Pause until a key is pressed.
    PauseGame,
    /// Raise the sound volume one notch.
    IncreaseVolume,
    /// Lower the sound volume one notch.
    DecreaseVolume,
    /// Shorten the frame delay.
    IncreaseSpeed,
    /// Lengthen the frame delay.
    DecreaseSpeed,
    /// Cast the selected attack spell.
    CastPrimarySpell,
    /// Cast the selected utility spell.
    CastAlternativeSpell,
}

/// Named sound cues the world and the game loop may trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A monster was slain.
    Argh,
    /// The player took damage.
    Ouch,
    /// Generic confirmation chime.
    Bonus,
    /// An item was picked up.
    Pickup,
    /// A door was opened.
    Door,
    /// A spell was cast.
    Cast,
    /// A spell failed to cast.
    Fizzle,
}

impl SoundCue {
    /// Name the sound collaborator uses to look up the sample.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Argh => "argh",
            Self::Ouch => "ouch",
            Self::Bonus => "bonus",
            Self::Pickup => "pickup",
            Self::Door => "door",
            Self::Cast => "cast",
            Self::Fizzle => "fizzle",
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the player's pending impulse.
    SetImpulse {
        /// Impulse executed by the next player tick.
        impulse: Impulse,
    },
    /// Runs the player's action tick.
    TickPlayer,
    /// Ticks every registered active entity once.
    TickEntities,
    /// Casts the spell selected in the provided slot.
    CastSpell {
        /// Spellbook page to cast from.
        slot: SpellSlot,
    },
    /// Pages through the spellbook.
    PageSpell {
        /// Spellbook page to change.
        slot: SpellSlot,
        /// Number of entries to advance, negative to go back.
        step: i32,
    },
    /// Turns the active astral projection and lets it take a step.
    SteerProjection {
        /// Direction the projection should face and travel.
        direction: Direction,
    },
    /// Ends the active astral projection.
    CancelProjection,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A sound cue should be played.
    Sound {
        /// Cue to play.
        cue: SoundCue,
    },
    /// A monster's life dropped to zero.
    MonsterSlain {
        /// Identifier of the slain monster.
        monster: EntityId,
        /// Entity credited with the kill.
        by: EntityId,
    },
    /// The player lost life to monster contact.
    PlayerHurt {
        /// Remaining life after the damage.
        life: i32,
    },
    /// The player picked up an item.
    ItemCollected {
        /// Item that was collected.
        item: Item,
    },
    /// A door was unlocked and removed.
    DoorOpened {
        /// Cell that held the door.
        at: Position,
    },
    /// A spell was cast successfully.
    SpellCast {
        /// Spellbook page of the spell.
        slot: SpellSlot,
        /// Name of the spell tile.
        spell: &'static str,
    },
    /// An astral projection took over player input.
    ProjectionStarted {
        /// Identifier of the projection.
        projection: EntityId,
    },
    /// An astral projection ended and input returned to the player.
    ProjectionEnded {
        /// Identifier of the projection.
        projection: EntityId,
    },
    /// The map around a location should be revealed to the player.
    MapRevealed {
        /// Centre of the revealed area.
        center: Position,
    },
    /// A tick requested a non-local state change of the level.
    StateChangeRequested {
        /// Requested state.
        state: LevelState,
    },
}

/// Items carried by the player between levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Number of keys available for opening doors.
    pub keys: u32,
}

/// Persistent part of the player carried across levels and checkpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Remaining life.
    pub life: i32,
    /// Remaining mana.
    pub mana: i32,
    /// Accumulated score.
    pub score: u32,
    /// Carried items.
    pub inventory: Inventory,
    /// Index of the selected attack spell.
    pub primary_spell: usize,
    /// Index of the selected utility spell.
    pub secondary_spell: usize,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            life: MAX_LIFE,
            mana: MAX_MANA,
            score: 0,
            inventory: Inventory::default(),
            primary_spell: 0,
            secondary_spell: 0,
        }
    }
}

impl PlayerStatus {
    /// Encodes the status into the opaque checkpoint blob.
    pub fn to_blob(&self) -> Result<Vec<u8>, StatusError> {
        bincode::serialize(self).map_err(StatusError::Encode)
    }

    /// Decodes a status previously produced by [`PlayerStatus::to_blob`].
    pub fn from_blob(blob: &[u8]) -> Result<Self, StatusError> {
        bincode::deserialize(blob).map_err(StatusError::Decode)
    }
}

/// Errors raised while converting player status checkpoints.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The status could not be serialised.
    #[error("failed to encode player status")]
    Encode(#[source] bincode::Error),
    /// The checkpoint blob did not contain a valid status.
    #[error("failed to decode player status")]
    Decode(#[source] bincode::Error),
}

/// Scalar values shown by the head-up display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Accumulated score.
    pub score: u32,
    /// Remaining life.
    pub life: i32,
    /// Remaining mana.
    pub mana: i32,
    /// Carried keys.
    pub keys: u32,
    /// Sprite of the selected attack spell.
    pub primary_sprite: u16,
    /// Sprite of the selected utility spell.
    pub secondary_sprite: u16,
}

/// Sprite identifiers stacked on a single cell, drawn bottom to top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellSprites {
    /// Floor or wall sprite; absent outside the map.
    pub background: Option<u16>,
    /// Decoration or item sprite.
    pub object: Option<u16>,
    /// Physical occupant sprite.
    pub entity: Option<u16>,
    /// Spiritual occupant sprite.
    pub spiritual: Option<u16>,
}

/// Rectangular window of sprites centred on a position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneView {
    center: Position,
    columns: u32,
    rows: u32,
    cells: Vec<CellSprites>,
}

impl SceneView {
    /// Creates a view from row-major cells.
    #[must_use]
    pub fn new(center: Position, columns: u32, rows: u32, cells: Vec<CellSprites>) -> Self {
        Self {
            center,
            columns,
            rows,
            cells,
        }
    }

    /// Position the view is centred on.
    #[must_use]
    pub const fn center(&self) -> Position {
        self.center
    }

    /// Width and height of the view in cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Sprites at a view-relative column and row.
    #[must_use]
    pub fn cell(&self, column: u32, row: u32) -> Option<&CellSprites> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = usize::try_from(u64::from(row) * u64::from(self.columns) + u64::from(column))
            .ok()?;
        self.cells.get(index)
    }

    /// Iterator over the rows of the view.
    pub fn rows(&self) -> impl Iterator<Item = &[CellSprites]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_values_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_value(direction.value()), Some(direction));
        }
        assert_eq!(Direction::from_value(4), None);
    }

    #[test]
    fn rotating_clockwise_four_times_is_identity() {
        for direction in Direction::ALL {
            let turned = direction
                .rotate_clockwise()
                .rotate_clockwise()
                .rotate_clockwise()
                .rotate_clockwise();
            assert_eq!(turned, direction);
            assert_eq!(direction.rotate_clockwise().rotate_clockwise(), direction.opposite());
        }
    }

    #[test]
    fn stepping_follows_screen_axes() {
        let origin = Position::new(5, 5);
        assert_eq!(origin.step(Direction::North), Position::new(5, 4));
        assert_eq!(origin.step(Direction::East), Position::new(6, 5));
        assert_eq!(origin.step(Direction::South), Position::new(5, 6));
        assert_eq!(origin.step(Direction::West), Position::new(4, 5));
    }

    #[test]
    fn intent_bits_follow_direction_values() {
        let intent = MovementIntent::from_directions(&[Direction::North, Direction::South]);
        assert_eq!(intent.bits(), 0b0101);
        assert_eq!(
            intent.directions().collect::<Vec<_>>(),
            vec![Direction::North, Direction::South]
        );
        assert_eq!(MovementIntent::from_bits(0xff).bits(), 0b1111);
    }

    #[test]
    fn player_status_survives_checkpoint_blob() {
        let status = PlayerStatus {
            life: 42,
            mana: 7,
            score: 1_230,
            inventory: Inventory { keys: 2 },
            primary_spell: 1,
            secondary_spell: 2,
        };
        let blob = status.to_blob().expect("encode");
        assert_eq!(PlayerStatus::from_blob(&blob).expect("decode"), status);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let error = PlayerStatus::from_blob(&[1, 2]).expect_err("truncated blob must fail");
        assert!(matches!(error, StatusError::Decode(_)));
    }

    #[test]
    fn scene_view_indexes_row_major() {
        let cells = (0..6)
            .map(|index| CellSprites {
                background: Some(index),
                ..CellSprites::default()
            })
            .collect();
        let view = SceneView::new(Position::new(1, 1), 3, 2, cells);
        assert_eq!(view.cell(2, 1).and_then(|cell| cell.background), Some(5));
        assert!(view.cell(3, 0).is_none());
        assert_eq!(view.rows().count(), 2);
    }
}
