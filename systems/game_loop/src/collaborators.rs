//! Narrow contracts with the subsystems the game loop drives but does not own.

use std::{
    error::Error,
    time::{Duration, Instant},
};

use magic_maze_core::{GameCommand, Hud, MovementIntent, SceneView, SoundCue};
use magic_maze_world::Map;

/// Error type returned by fallible collaborators.
pub type CollaboratorError = Box<dyn Error + Send + Sync>;

/// Presents frames and modal messages.
pub trait Graphics {
    /// Draws the maze window around the camera.
    fn draw_scene(&mut self, scene: &SceneView) -> Result<(), CollaboratorError>;
    /// Refreshes score, life, mana, inventory and spell widgets.
    fn update_hud(&mut self, hud: &Hud) -> Result<(), CollaboratorError>;
    /// Presents everything drawn since the previous flip.
    fn flip(&mut self) -> Result<(), CollaboratorError>;
    /// Shows a multi-line message over the maze.
    fn show_message(&mut self, message: &str) -> Result<(), CollaboratorError>;
    /// Shows the help screen.
    fn show_help(&mut self) -> Result<(), CollaboratorError>;
    /// Marks a region of the map as explored.
    fn reveal_map(&mut self, region: &SceneView) -> Result<(), CollaboratorError>;
    /// Switches between windowed and fullscreen presentation.
    fn toggle_fullscreen(&mut self) -> Result<(), CollaboratorError>;
}

/// Fire-and-forget audio output.
pub trait Sound {
    /// Plays a named cue.
    fn play(&mut self, cue: SoundCue);
    /// Changes the volume by `delta` notches.
    fn change_volume(&mut self, delta: i32);
}

/// Everything the input device reported during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Named commands in the order they were triggered.
    pub commands: Vec<GameCommand>,
    /// Directional keys held during the frame.
    pub movement: MovementIntent,
}

/// Owned input device with an explicit lifecycle.
pub trait InputDevice {
    /// Acquires the device before the first frame.
    fn open(&mut self) -> Result<(), CollaboratorError>;
    /// Releases the device after the last frame.
    fn close(&mut self);
    /// Collects the frame's commands and held directions without blocking.
    fn poll(&mut self) -> FrameInput;
    /// Blocks until any key is pressed.
    fn wait_for_key(&mut self);
    /// Blocks until a yes or no answer is given.
    fn yes_no(&mut self) -> bool;
}

/// A freshly loaded level.
#[derive(Debug)]
pub struct LoadedLevel {
    /// Fully populated map.
    pub map: Map,
    /// Title shown when entering the level.
    pub title: String,
}

/// Builds maps for level numbers.
pub trait MapLoader {
    /// Loads the map of `level`.
    fn load(&mut self, level: u32) -> Result<LoadedLevel, CollaboratorError>;
    /// Reports whether `level` exists.
    fn has_level(&self, level: u32) -> bool;
}

/// Last persisted checkpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Level the checkpoint was taken on.
    pub level: u32,
    /// Opaque player status blob.
    pub status: Vec<u8>,
}

/// Persists checkpoints as opaque blobs.
pub trait CheckpointStore {
    /// Stores the player status captured when `level` was entered.
    fn save(&mut self, level: u32, status: &[u8]) -> Result<(), CollaboratorError>;
    /// Loads the most recently stored checkpoint, if any.
    fn load_last(&mut self) -> Result<Option<Checkpoint>, CollaboratorError>;
}

/// Time source used for frame pacing.
pub trait FrameClock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    /// Suspends the loop for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Borrowed set of collaborators a session drives.
pub struct Collaborators<'a> {
    /// Frame and message presentation.
    pub graphics: &'a mut dyn Graphics,
    /// Audio cues and volume.
    pub sound: &'a mut dyn Sound,
    /// Keyboard or scripted input.
    pub input: &'a mut dyn InputDevice,
    /// Level source.
    pub maps: &'a mut dyn MapLoader,
    /// Checkpoint persistence.
    pub checkpoints: &'a mut dyn CheckpointStore,
    /// Frame pacing.
    pub clock: &'a mut dyn FrameClock,
}
