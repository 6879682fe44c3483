use std::time::Duration;

use log::{info, warn};
use magic_maze_core::{LevelState, PlayerStatus};
use magic_maze_world::{query, World};

use crate::{
    collaborators::Collaborators,
    level::GameLoop,
    settings::{FrameDelay, GameSettings},
    SessionError,
};

const DEATH_PAUSE: Duration = Duration::from_secs(1);

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Final state of the last level played.
    pub state: LevelState,
    /// Last level played.
    pub level: u32,
    /// Player status when the session ended.
    pub status: PlayerStatus,
}

/// Plays consecutive levels against a set of collaborators.
pub struct Session<'c> {
    io: Collaborators<'c>,
    settings: GameSettings,
    delay: FrameDelay,
    frames: u64,
}

impl<'c> Session<'c> {
    /// Creates a session that has not opened its input device yet.
    #[must_use]
    pub fn new(io: Collaborators<'c>, settings: GameSettings) -> Self {
        Self {
            io,
            delay: settings.frame_delay,
            settings,
            frames: 0,
        }
    }

    /// Frame delay after the speed commands of the levels played so far.
    #[must_use]
    pub const fn frame_delay(&self) -> FrameDelay {
        self.delay
    }

    /// Total frames run across all levels.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Plays from the last stored checkpoint, or a fresh game without one.
    pub fn resume(&mut self) -> Result<SessionOutcome, SessionError> {
        match self
            .io
            .checkpoints
            .load_last()
            .map_err(SessionError::Checkpoint)?
        {
            Some(checkpoint) => {
                let status = PlayerStatus::from_blob(&checkpoint.status)?;
                info!("resuming level {} from checkpoint", checkpoint.level);
                self.run(checkpoint.level, Some(status))
            }
            None => self.run(self.settings.first_level, None),
        }
    }

    /// Plays from `level` until the game stops or ends.
    ///
    /// The input device is opened first and closed on every exit path.
    pub fn run(
        &mut self,
        level: u32,
        status: Option<PlayerStatus>,
    ) -> Result<SessionOutcome, SessionError> {
        self.io.input.open().map_err(SessionError::Input)?;
        let outcome = self.play(level, status.unwrap_or_default());
        self.io.input.close();
        outcome
    }

    fn play(
        &mut self,
        mut level: u32,
        mut entry: PlayerStatus,
    ) -> Result<SessionOutcome, SessionError> {
        loop {
            let mut game = self.enter(level, entry)?;
            let budget = self
                .settings
                .max_frames
                .map(|limit| limit.saturating_sub(self.frames));
            let state = game.run(&mut self.io, budget)?;
            self.frames = self.frames.saturating_add(game.frames());
            self.delay = game.delay();
            let status = query::player_status(game.world());

            match state {
                LevelState::NextLevel => {
                    let next = level.saturating_add(1);
                    if !self.io.maps.has_level(next) {
                        info!("completed the last level with score {}", status.score);
                        return Ok(SessionOutcome {
                            state: LevelState::Endgame,
                            level,
                            status,
                        });
                    }
                    level = next;
                    entry = status;
                }
                LevelState::RestartLevel => info!("restarting level {level}"),
                LevelState::PlayerDied => {
                    warn!("player died on level {level} with score {}", status.score);
                    self.io.clock.sleep(DEATH_PAUSE);
                }
                LevelState::GameLoop | LevelState::StoppedGame | LevelState::Endgame => {
                    return Ok(SessionOutcome {
                        state,
                        level,
                        status,
                    });
                }
            }
        }
    }

    fn enter(&mut self, level: u32, entry: PlayerStatus) -> Result<GameLoop, SessionError> {
        let loaded = self
            .io
            .maps
            .load(level)
            .map_err(|source| SessionError::LevelLoad { level, source })?;
        let seed = self.settings.seed.wrapping_add(u64::from(level));
        let world = World::new(loaded.map, Some(entry), seed)
            .map_err(|source| SessionError::World { level, source })?;
        let checkpoint = entry.to_blob()?;

        let greeting = format!("Entering level {level}\n{}\nGet ready!", loaded.title);
        self.io
            .graphics
            .show_message(&greeting)
            .map_err(SessionError::Graphics)?;
        self.io.graphics.flip().map_err(SessionError::Graphics)?;
        info!("entering level {level}: {}", loaded.title);

        Ok(GameLoop::new(world, level, checkpoint, self.delay))
    }
}
