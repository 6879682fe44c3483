#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame loop and level sequencing for Magic Maze.
//!
//! A [`GameLoop`] runs one level: it draws the camera window, feeds the
//! frame's input into the world through commands and reacts to the events
//! the world broadcasts. A [`Session`] chains levels together, restarting
//! from the entry checkpoint after a death or a confirmed restart.

mod collaborators;
mod control;
mod level;
mod session;
mod settings;

use magic_maze_core::StatusError;
use magic_maze_world::WorldError;
use thiserror::Error;

pub use collaborators::{
    Checkpoint, CheckpointStore, CollaboratorError, Collaborators, FrameClock, FrameInput,
    Graphics, InputDevice, LoadedLevel, MapLoader, Sound, SystemClock,
};
pub use control::InputTarget;
pub use level::{GameLoop, REVEAL_HALF_EXTENT, VIEW_HALF_EXTENT};
pub use session::{Session, SessionOutcome};
pub use settings::{FrameDelay, GameSettings, DELAY_STEP, MAX_DELAY, MIN_DELAY};

/// Errors that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The graphics collaborator failed.
    #[error("graphics failure")]
    Graphics(#[source] CollaboratorError),
    /// The input device could not be opened.
    #[error("input device failure")]
    Input(#[source] CollaboratorError),
    /// A level could not be loaded.
    #[error("failed to load level {level}")]
    LevelLoad {
        /// Level that failed.
        level: u32,
        /// Underlying loader error.
        #[source]
        source: CollaboratorError,
    },
    /// A loaded map could not host the player.
    #[error("level {level} is not playable")]
    World {
        /// Level that failed.
        level: u32,
        /// Underlying world error.
        #[source]
        source: WorldError,
    },
    /// The checkpoint store failed.
    #[error("checkpoint store failure")]
    Checkpoint(#[source] CollaboratorError),
    /// A checkpoint blob could not be converted.
    #[error(transparent)]
    Status(#[from] StatusError),
}
